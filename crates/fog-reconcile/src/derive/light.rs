use super::wall::WallReactor;
use crate::error::ReconcileError;
use crate::local::{LightParams, LocalItem, LocalKind};
use crate::reactor::{Actor, ActorSet, Batch, Context, Reactor, default_diff};
use fog_core::id::ItemId;
use fog_core::light::{LightConfig, LightType};
use fog_core::model::{AuthoritativeItem, Color, Transform};
use fog_geometry::light_polygon;
use kurbo::Point;
use std::any::Any;

fn light_config(parent: &AuthoritativeItem, ctx: &Context<'_>) -> LightConfig {
    parent
        .metadata
        .get_or(&ctx.config.light_key(), LightConfig::default())
}

fn light_transform(parent: &AuthoritativeItem, config: &LightConfig) -> Transform {
    Transform {
        rotation: parent.transform.rotation + config.rotation.unwrap_or(0.0),
        ..Transform::at(parent.transform.position)
    }
}

/// Visibility polygon relative to the parent's position.
fn visibility(parent: &AuthoritativeItem, config: &LightConfig, ctx: &Context<'_>) -> Vec<Point> {
    if ctx.config.shader_occlusion_for_primary
        && config.light_type() == LightType::Primary
        && !config.is_coned()
    {
        return Vec::new();
    }
    let walls = ctx
        .registry
        .find::<WallReactor>()
        .map(WallReactor::world_polylines)
        .unwrap_or_default();
    let origin = parent.transform.position;
    light_polygon(origin, walls, config, parent.transform.rotation, ctx.config)
        .into_iter()
        .map(|p| (p - origin).to_point())
        .collect()
}

/// A light, its visibility polygon, and the effect drawn through it.
#[derive(Debug)]
pub struct LightActor {
    light: ItemId,
    polygon: ItemId,
    effect: ItemId,
}

impl LightActor {
    pub fn item_ids(&self) -> [ItemId; 3] {
        [self.light, self.polygon, self.effect]
    }
}

impl Actor for LightActor {
    fn create(parent: &AuthoritativeItem, ctx: &mut Context<'_>) -> Self {
        let config = light_config(parent, ctx);
        let light = LocalItem::new(LocalKind::Light(LightParams::from_config(&config)))
            .attached(parent.id)
            .with_transform(light_transform(parent, &config))
            .visible(parent.visible);
        let polygon = LocalItem::new(LocalKind::Polygon {
            points: visibility(parent, &config, ctx),
        })
        .attached(parent.id)
        .at(parent.transform.position);
        let effect = LocalItem::new(LocalKind::Effect {
            radius: config.radius(),
            color: config.rgb().unwrap_or(Color::BLACK),
        })
        .attached(polygon.id);

        let actor = Self {
            light: light.id,
            polygon: polygon.id,
            effect: effect.id,
        };
        log::trace!("{}: light {}", parent.id, actor.light);
        ctx.patcher.add_items([light, polygon, effect]);
        actor
    }

    fn update(&mut self, parent: &AuthoritativeItem, ctx: &mut Context<'_>) {
        let config = light_config(parent, ctx);

        let params = LightParams::from_config(&config);
        let transform = light_transform(parent, &config);
        let visible = parent.visible;
        ctx.patcher.update_item(self.light, move |item| {
            item.transform = transform;
            item.visible = visible;
            item.kind = LocalKind::Light(params);
        });

        let points = visibility(parent, &config, ctx);
        let position = parent.transform.position;
        ctx.patcher.update_item(self.polygon, move |item| {
            item.transform.position = position;
            item.set_points(points);
        });

        let next_radius = config.radius();
        let next_color = config.rgb();
        ctx.patcher.update_item(self.effect, move |item| {
            if let LocalKind::Effect { radius, color } = &mut item.kind {
                *radius = next_radius;
                if let Some(rgb) = next_color {
                    *color = rgb;
                }
            }
        });
    }

    fn delete(self, ctx: &mut Context<'_>) {
        ctx.patcher.delete_items(self.item_ids());
    }
}

/// Lights the current player may see.
#[derive(Debug, Default)]
pub struct LightReactor {
    actors: ActorSet<LightActor>,
}

impl LightReactor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actor(&self, id: ItemId) -> Option<&LightActor> {
        self.actors.get(id)
    }
}

impl Reactor for LightReactor {
    fn kind(&self) -> &'static str {
        "lights"
    }

    fn filter(&self, item: &AuthoritativeItem, ctx: &Context<'_>) -> bool {
        if !item.metadata.contains_key(&ctx.config.light_key()) {
            return false;
        }
        light_config(item, ctx).visible_to(ctx.player, &item.created_user_id)
    }

    /// Every light is rebuilt when any wall changed in this pass.
    fn diff(&self, prev: &AuthoritativeItem, next: &AuthoritativeItem, ctx: &Context<'_>) -> bool {
        let walls_dirty = ctx
            .registry
            .find::<WallReactor>()
            .is_some_and(WallReactor::did_update);
        walls_dirty || default_diff(prev, next)
    }

    fn process(&mut self, batch: &Batch<'_>, ctx: &mut Context<'_>) -> Result<(), ReconcileError> {
        if ctx.registry.find::<WallReactor>().is_none() {
            return Err(ReconcileError::MissingDependency {
                reactor: "lights",
                dependency: "walls",
            });
        }
        self.actors.process(batch, ctx);
        Ok(())
    }

    fn has(&self, id: ItemId) -> bool {
        self.actors.has(id)
    }

    fn len(&self) -> usize {
        self.actors.len()
    }

    fn delete(&mut self, ctx: &mut Context<'_>) {
        self.actors.delete_all(ctx);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
