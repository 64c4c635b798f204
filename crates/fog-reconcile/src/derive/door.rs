use crate::error::ReconcileError;
use crate::reactor::{Actor, ActorSet, Batch, Context, Reactor};
use fog_core::config::FogConfig;
use fog_core::door::{Door, doors};
use fog_core::id::ItemId;
use fog_core::model::AuthoritativeItem;
use fog_geometry::{BezPath, door_path};
use std::any::Any;

/// A persisted door with the world-space region it cuts out of walls.
#[derive(Debug, Clone, PartialEq)]
pub struct DoorPath {
    pub door: Door,
    /// `None` when the door's markers no longer resolve on the drawing.
    pub path: Option<BezPath>,
}

/// Keeps one stroked path per door of a drawing, aligned with the door list.
#[derive(Debug)]
pub struct DoorActor {
    doors: Vec<DoorPath>,
}

impl DoorActor {
    fn build(parent: &AuthoritativeItem, config: &FogConfig) -> Vec<DoorPath> {
        doors(&parent.metadata, &config.doors_key())
            .into_iter()
            .enumerate()
            .map(|(index, door)| {
                let path = door_path(parent, &door, config);
                if path.is_none() {
                    log::warn!("door {index} on {} has no geometry", parent.id);
                }
                DoorPath { door, path }
            })
            .collect()
    }

    pub fn doors(&self) -> &[DoorPath] {
        &self.doors
    }
}

impl Actor for DoorActor {
    fn create(parent: &AuthoritativeItem, ctx: &mut Context<'_>) -> Self {
        Self {
            doors: Self::build(parent, ctx.config),
        }
    }

    fn update(&mut self, parent: &AuthoritativeItem, ctx: &mut Context<'_>) {
        self.doors = Self::build(parent, ctx.config);
    }

    fn delete(self, _ctx: &mut Context<'_>) {}
}

/// Door geometry for every FOG drawing. Stages no local items; walls read
/// it through the registry.
#[derive(Debug, Default)]
pub struct DoorReactor {
    actors: ActorSet<DoorActor>,
    did_update: bool,
}

impl DoorReactor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every door of every drawing.
    pub fn doors(&self) -> impl Iterator<Item = &DoorPath> {
        self.actors.actors().flat_map(|actor| actor.doors.iter())
    }

    /// World-space cut-outs of the open doors that have geometry.
    pub fn open_paths(&self) -> Vec<&BezPath> {
        self.doors()
            .filter(|d| d.door.open)
            .filter_map(|d| d.path.as_ref())
            .collect()
    }

    /// Whether the last pass added, removed or changed any drawing.
    pub fn did_update(&self) -> bool {
        self.did_update
    }

    pub fn actor(&self, id: ItemId) -> Option<&DoorActor> {
        self.actors.get(id)
    }
}

impl Reactor for DoorReactor {
    fn kind(&self) -> &'static str {
        "doors"
    }

    fn filter(&self, item: &AuthoritativeItem, _ctx: &Context<'_>) -> bool {
        item.is_fog_drawing()
    }

    fn process(&mut self, batch: &Batch<'_>, ctx: &mut Context<'_>) -> Result<(), ReconcileError> {
        self.actors.process(batch, ctx);
        self.did_update = !batch.is_empty();
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
        self.did_update = true;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
