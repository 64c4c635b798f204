use super::door::DoorReactor;
use crate::error::ReconcileError;
use crate::local::{LocalItem, LocalKind};
use crate::reactor::{Actor, ActorSet, Batch, Context, Reactor, default_diff};
use fog_core::id::ItemId;
use fog_core::model::AuthoritativeItem;
use fog_geometry::{Polyline, drawing_to_contours, polylines_to_world};
use std::any::Any;

/// One wall per contour of a FOG drawing, with open doors cut out.
#[derive(Debug)]
pub struct WallActor {
    walls: Vec<ItemId>,
    world: Vec<Polyline>,
}

fn contours(parent: &AuthoritativeItem, ctx: &Context<'_>) -> Vec<Polyline> {
    let open = ctx
        .registry
        .find::<DoorReactor>()
        .map(DoorReactor::open_paths)
        .unwrap_or_default();
    drawing_to_contours(parent, &open, ctx.config)
}

fn wall(parent: &AuthoritativeItem, points: Polyline) -> LocalItem {
    LocalItem::new(LocalKind::Wall { points })
        .attached(parent.id)
        .with_transform(parent.transform)
}

impl WallActor {
    /// This drawing's walls in world space.
    pub fn world_polylines(&self) -> &[Polyline] {
        &self.world
    }

    pub fn wall_ids(&self) -> &[ItemId] {
        &self.walls
    }
}

impl Actor for WallActor {
    fn create(parent: &AuthoritativeItem, ctx: &mut Context<'_>) -> Self {
        let local = contours(parent, ctx);
        let world = polylines_to_world(parent, &local);
        let items: Vec<LocalItem> = local.into_iter().map(|points| wall(parent, points)).collect();
        log::trace!("{}: {} walls", parent.id, items.len());
        let walls = items.iter().map(|item| item.id).collect();
        ctx.patcher.add_items(items);
        Self { walls, world }
    }

    fn update(&mut self, parent: &AuthoritativeItem, ctx: &mut Context<'_>) {
        let next = contours(parent, ctx);
        self.world = polylines_to_world(parent, &next);

        if next.len() < self.walls.len() {
            let removed = self.walls.split_off(next.len());
            ctx.patcher.delete_items(removed);
        }
        let kept = self.walls.len();
        for (i, points) in next.into_iter().enumerate() {
            if i < kept {
                ctx.patcher
                    .update_item(self.walls[i], move |item| item.set_points(points));
            } else {
                let item = wall(parent, points);
                self.walls.push(item.id);
                ctx.patcher.add_items([item]);
            }
        }
    }

    fn delete(self, ctx: &mut Context<'_>) {
        ctx.patcher.delete_items(self.walls);
    }
}

#[derive(Debug, Default)]
pub struct WallReactor {
    actors: ActorSet<WallActor>,
    did_update: bool,
    world: Vec<Polyline>,
}

impl WallReactor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every wall in world space, as of the last pass.
    pub fn world_polylines(&self) -> &[Polyline] {
        &self.world
    }

    /// Whether the last pass changed any wall.
    pub fn did_update(&self) -> bool {
        self.did_update
    }

    pub fn actor(&self, id: ItemId) -> Option<&WallActor> {
        self.actors.get(id)
    }

    fn collect_world(&mut self) {
        self.world = self
            .actors
            .actors()
            .flat_map(|actor| actor.world.iter().cloned())
            .collect();
    }
}

impl Reactor for WallReactor {
    fn kind(&self) -> &'static str {
        "walls"
    }

    fn filter(&self, item: &AuthoritativeItem, _ctx: &Context<'_>) -> bool {
        item.is_fog_drawing()
    }

    /// Any door change rebuilds every wall; an open door may cut walls of
    /// other drawings.
    fn diff(&self, prev: &AuthoritativeItem, next: &AuthoritativeItem, ctx: &Context<'_>) -> bool {
        default_diff(prev, next)
            || ctx
                .registry
                .find::<DoorReactor>()
                .is_some_and(DoorReactor::did_update)
    }

    fn process(&mut self, batch: &Batch<'_>, ctx: &mut Context<'_>) -> Result<(), ReconcileError> {
        if ctx.registry.find::<DoorReactor>().is_none() {
            self.did_update = false;
            return Err(ReconcileError::MissingDependency {
                reactor: "walls",
                dependency: "doors",
            });
        }
        self.actors.process(batch, ctx);
        self.did_update = !batch.is_empty();
        if self.did_update {
            self.collect_world();
        }
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
        self.world.clear();
        self.did_update = true;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
