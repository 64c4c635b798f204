use crate::error::ReconcileError;
use crate::local::{LightParams, LocalItem, LocalKind};
use crate::reactor::{Actor, ActorSet, Batch, Context, Reactor};
use fog_core::id::ItemId;
use fog_core::light::LightConfig;
use fog_core::model::AuthoritativeItem;
use std::any::Any;

/// A small omni light around a coned primary light, so its owner still
/// sees their own token.
#[derive(Debug)]
pub struct SelfLightActor {
    light: ItemId,
}

impl SelfLightActor {
    pub fn light(&self) -> ItemId {
        self.light
    }
}

impl Actor for SelfLightActor {
    fn create(parent: &AuthoritativeItem, ctx: &mut Context<'_>) -> Self {
        let light = LocalItem::new(LocalKind::Light(LightParams::self_light(&ctx.config.self_light)))
            .attached(parent.id)
            .with_transform(parent.transform)
            .visible(parent.visible);
        let actor = Self { light: light.id };
        ctx.patcher.add_items([light]);
        actor
    }

    fn update(&mut self, _parent: &AuthoritativeItem, _ctx: &mut Context<'_>) {}

    fn delete(self, ctx: &mut Context<'_>) {
        ctx.patcher.delete_items([self.light]);
    }
}

#[derive(Debug, Default)]
pub struct SelfLightReactor {
    actors: ActorSet<SelfLightActor>,
}

impl SelfLightReactor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actor(&self, id: ItemId) -> Option<&SelfLightActor> {
        self.actors.get(id)
    }
}

impl Reactor for SelfLightReactor {
    fn kind(&self) -> &'static str {
        "self-lights"
    }

    fn filter(&self, item: &AuthoritativeItem, ctx: &Context<'_>) -> bool {
        item.metadata
            .get::<LightConfig>(&ctx.config.light_key())
            .is_some_and(|config| config.wants_self_light())
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
