use crate::error::ReconcileError;
use crate::local::{BillboardImage, LocalItem, LocalKind};
use crate::reactor::{Actor, ActorSet, Batch, Context, Reactor};
use fog_core::id::ItemId;
use fog_core::model::AuthoritativeItem;
use std::any::Any;

/// A light-bulb billboard on every light source, so lights can be picked
/// with the door tool active.
#[derive(Debug)]
pub struct LightOverlayActor {
    billboard: ItemId,
}

impl LightOverlayActor {
    pub fn billboard(&self) -> ItemId {
        self.billboard
    }
}

impl Actor for LightOverlayActor {
    fn create(parent: &AuthoritativeItem, ctx: &mut Context<'_>) -> Self {
        let billboard = LocalItem::new(LocalKind::Billboard {
            image: BillboardImage::Light,
        })
        .attached(parent.id)
        .at(parent.transform.position)
        .with_meta(&ctx.config.light_overlay_key(), serde_json::Value::Bool(true));
        let actor = Self {
            billboard: billboard.id,
        };
        ctx.patcher.add_items([billboard]);
        actor
    }

    // The billboard follows its parent through the attachment.
    fn update(&mut self, _parent: &AuthoritativeItem, _ctx: &mut Context<'_>) {}

    fn delete(self, ctx: &mut Context<'_>) {
        ctx.patcher.delete_items([self.billboard]);
    }
}

#[derive(Debug, Default)]
pub struct LightOverlayReactor {
    actors: ActorSet<LightOverlayActor>,
}

impl LightOverlayReactor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actor(&self, id: ItemId) -> Option<&LightOverlayActor> {
        self.actors.get(id)
    }
}

impl Reactor for LightOverlayReactor {
    fn kind(&self) -> &'static str {
        "light-overlays"
    }

    fn filter(&self, item: &AuthoritativeItem, ctx: &Context<'_>) -> bool {
        item.metadata.contains_key(&ctx.config.light_key())
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
