use crate::error::ReconcileError;
use crate::local::{BillboardImage, LocalItem, LocalKind};
use crate::reactor::{Actor, ActorSet, Batch, Context, Reactor};
use fog_core::config::FogConfig;
use fog_core::door::{Door, doors};
use fog_core::id::ItemId;
use fog_core::model::{AuthoritativeItem, Color, Layer, PathCmd};
use fog_geometry::{door_overlay, path_to_commands};
use kurbo::Point;
use std::any::Any;

const OPEN_COLOR: Color = Color::rgba(133.0 / 255.0, 1.0, 102.0 / 255.0, 1.0);
const CLOSED_COLOR: Color = Color::rgba(1.0, 77.0 / 255.0, 77.0 / 255.0, 1.0);

fn stroke_color(open: bool) -> Color {
    if open { OPEN_COLOR } else { CLOSED_COLOR }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OverlayIds {
    billboard: ItemId,
    path: ItemId,
}

/// Billboard position and outline commands for one door.
fn resolve(parent: &AuthoritativeItem, door: &Door, index: usize) -> Option<(Point, Vec<PathCmd>)> {
    let Some(overlay) = door_overlay(parent, door) else {
        log::warn!("door {index} on {} has no overlay geometry", parent.id);
        return None;
    };
    Some((overlay.center, path_to_commands(&overlay.path)))
}

fn create_items(
    parent: &AuthoritativeItem,
    door: &Door,
    index: usize,
    config: &FogConfig,
) -> Option<(LocalItem, LocalItem)> {
    let (center, commands) = resolve(parent, door, index)?;
    let tag = serde_json::Value::from(index);
    let billboard = LocalItem::new(LocalKind::Billboard {
        image: BillboardImage::door(door.open),
    })
    .attached(parent.id)
    .at(center)
    .with_meta(&config.door_index_key(), tag.clone());
    let path = LocalItem::new(LocalKind::Path {
        commands,
        stroke_color: stroke_color(door.open),
        stroke_width: parent.style.stroke_width,
    })
    .attached(parent.id)
    .with_transform(parent.transform)
    .on_layer(Layer::Control)
    .with_meta(&config.door_index_key(), tag);
    Some((billboard, path))
}

/// A billboard and an outline per door, indexed like the door list.
#[derive(Debug)]
pub struct DoorOverlayActor {
    overlays: Vec<Option<OverlayIds>>,
}

impl DoorOverlayActor {
    fn stage_new(
        parent: &AuthoritativeItem,
        door: &Door,
        index: usize,
        ctx: &mut Context<'_>,
    ) -> Option<OverlayIds> {
        let (billboard, path) = create_items(parent, door, index, ctx.config)?;
        let ids = OverlayIds {
            billboard: billboard.id,
            path: path.id,
        };
        ctx.patcher.add_items([billboard, path]);
        Some(ids)
    }

    /// Billboard and path ids of every door that has an overlay.
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.overlays
            .iter()
            .flatten()
            .flat_map(|ids| [ids.billboard, ids.path])
            .collect()
    }
}

impl Actor for DoorOverlayActor {
    fn create(parent: &AuthoritativeItem, ctx: &mut Context<'_>) -> Self {
        let overlays = doors(&parent.metadata, &ctx.config.doors_key())
            .iter()
            .enumerate()
            .map(|(index, door)| Self::stage_new(parent, door, index, ctx))
            .collect();
        Self { overlays }
    }

    fn update(&mut self, parent: &AuthoritativeItem, ctx: &mut Context<'_>) {
        let next = doors(&parent.metadata, &ctx.config.doors_key());
        if next.len() < self.overlays.len() {
            let removed = self.overlays.split_off(next.len());
            ctx.patcher
                .delete_items(removed.into_iter().flatten().flat_map(|ids| [ids.billboard, ids.path]));
        }
        self.overlays.resize(next.len(), None);

        let key = ctx.config.door_index_key();
        for (index, door) in next.iter().enumerate() {
            let Some(ids) = self.overlays[index] else {
                self.overlays[index] = Self::stage_new(parent, door, index, ctx);
                continue;
            };
            let Some((center, commands)) = resolve(parent, door, index) else {
                ctx.patcher.delete_items([ids.billboard, ids.path]);
                self.overlays[index] = None;
                continue;
            };
            let open = door.open;
            let billboard_key = key.clone();
            ctx.patcher.update_item(ids.billboard, move |item| {
                item.transform.position = center;
                item.metadata.insert(&billboard_key, &index);
                if let LocalKind::Billboard { image } = &mut item.kind {
                    *image = BillboardImage::door(open);
                }
            });
            let path_key = key.clone();
            let transform = parent.transform;
            let width = parent.style.stroke_width;
            ctx.patcher.update_item(ids.path, move |item| {
                item.transform = transform;
                item.metadata.insert(&path_key, &index);
                if let LocalKind::Path {
                    commands: current,
                    stroke_color: color,
                    stroke_width,
                } = &mut item.kind
                {
                    *current = commands;
                    *color = stroke_color(open);
                    *stroke_width = width;
                }
            });
        }
    }

    fn delete(self, ctx: &mut Context<'_>) {
        ctx.patcher.delete_items(self.item_ids());
    }
}

/// Door billboards and outlines for every FOG drawing.
#[derive(Debug, Default)]
pub struct DoorOverlayReactor {
    actors: ActorSet<DoorOverlayActor>,
}

impl DoorOverlayReactor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actor(&self, id: ItemId) -> Option<&DoorOverlayActor> {
        self.actors.get(id)
    }
}

impl Reactor for DoorOverlayReactor {
    fn kind(&self) -> &'static str {
        "door-overlays"
    }

    fn filter(&self, item: &AuthoritativeItem, _ctx: &Context<'_>) -> bool {
        item.is_fog_drawing()
    }

    fn process(&mut self, batch: &Batch<'_>, ctx: &mut Context<'_>) -> Result<(), ReconcileError> {
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
