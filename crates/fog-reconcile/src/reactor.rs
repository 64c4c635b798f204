//! Reactors select authoritative items; actors own what is derived from them.

use crate::error::ReconcileError;
use crate::patcher::Patcher;
use fog_core::config::FogConfig;
use fog_core::id::ItemId;
use fog_core::model::{AuthoritativeItem, Player};
use fog_core::parse_timestamp;
use std::any::Any;
use std::collections::HashMap;

/// The items a reactor must react to in one pass.
///
/// `deleted` carries the previous version of each item.
#[derive(Debug, Default)]
pub struct Batch<'a> {
    pub added: Vec<&'a AuthoritativeItem>,
    pub deleted: Vec<&'a AuthoritativeItem>,
    pub updated: Vec<&'a AuthoritativeItem>,
}

impl Batch<'_> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.updated.is_empty()
    }
}

/// Read-only view of the other registered reactors during a pass.
#[derive(Clone, Copy)]
pub struct Registry<'a> {
    before: &'a [Box<dyn Reactor>],
    after: &'a [Box<dyn Reactor>],
}

impl<'a> Registry<'a> {
    pub(crate) fn new(before: &'a [Box<dyn Reactor>], after: &'a [Box<dyn Reactor>]) -> Self {
        Self { before, after }
    }

    pub fn empty() -> Self {
        Self {
            before: &[],
            after: &[],
        }
    }

    /// The registered reactor of concrete type `R`, if any.
    pub fn find<R: Reactor>(&self) -> Option<&'a R> {
        self.before
            .iter()
            .chain(self.after.iter())
            .find_map(|reactor| reactor.as_any().downcast_ref::<R>())
    }
}

/// Shared state handed to reactors and actors.
pub struct Context<'a> {
    pub config: &'a FogConfig,
    pub player: &'a Player,
    pub registry: Registry<'a>,
    pub patcher: &'a mut Patcher,
}

/// Selects a subset of authoritative items and keeps one actor per match.
pub trait Reactor: Any {
    /// Stable name used by `unregister` and in logs.
    fn kind(&self) -> &'static str;

    fn filter(&self, item: &AuthoritativeItem, ctx: &Context<'_>) -> bool;

    /// Whether a still-matching item needs its actor updated.
    fn diff(&self, prev: &AuthoritativeItem, next: &AuthoritativeItem, _ctx: &Context<'_>) -> bool {
        default_diff(prev, next)
    }

    fn process(&mut self, batch: &Batch<'_>, ctx: &mut Context<'_>) -> Result<(), ReconcileError>;

    /// Whether an actor exists for `id`.
    fn has(&self, id: ItemId) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delete every actor this reactor owns.
    fn delete(&mut self, ctx: &mut Context<'_>);

    fn as_any(&self) -> &dyn Any;
}

/// Two versions differ when their parsed modification times differ.
/// Unparseable timestamps count as unchanged.
pub fn default_diff(prev: &AuthoritativeItem, next: &AuthoritativeItem) -> bool {
    match (
        parse_timestamp(&prev.last_modified),
        parse_timestamp(&next.last_modified),
    ) {
        (Some(a), Some(b)) => a != b,
        _ => {
            log::warn!(
                "cannot compare timestamps of {} ({:?} vs {:?})",
                next.id,
                prev.last_modified,
                next.last_modified
            );
            false
        }
    }
}

// ─── Actors ──────────────────────────────────────────────────────────────

/// Owns the local items derived from one authoritative item.
pub trait Actor: Sized {
    /// Build the actor and stage creation of its local items.
    fn create(parent: &AuthoritativeItem, ctx: &mut Context<'_>) -> Self;

    /// Bring the local items in line with a new version of the parent.
    fn update(&mut self, parent: &AuthoritativeItem, ctx: &mut Context<'_>);

    /// Stage deletion of every local item this actor created.
    fn delete(self, ctx: &mut Context<'_>);
}

/// One actor per parent id.
#[derive(Debug)]
pub struct ActorSet<A> {
    actors: HashMap<ItemId, A>,
}

impl<A> Default for ActorSet<A> {
    fn default() -> Self {
        Self {
            actors: HashMap::new(),
        }
    }
}

impl<A: Actor> ActorSet<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create, delete, then update actors for a batch.
    pub fn process(&mut self, batch: &Batch<'_>, ctx: &mut Context<'_>) {
        for parent in &batch.added {
            let actor = A::create(parent, ctx);
            if let Some(stale) = self.actors.insert(parent.id, actor) {
                stale.delete(ctx);
            }
        }
        for parent in &batch.deleted {
            if let Some(actor) = self.actors.remove(&parent.id) {
                actor.delete(ctx);
            }
        }
        for parent in &batch.updated {
            if let Some(actor) = self.actors.get_mut(&parent.id) {
                actor.update(parent, ctx);
            }
        }
    }

    pub fn delete_all(&mut self, ctx: &mut Context<'_>) {
        for (_, actor) in self.actors.drain() {
            actor.delete(ctx);
        }
    }

    pub fn has(&self, id: ItemId) -> bool {
        self.actors.contains_key(&id)
    }

    pub fn get(&self, id: ItemId) -> Option<&A> {
        self.actors.get(&id)
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &A)> {
        self.actors.iter()
    }

    pub fn actors(&self) -> impl Iterator<Item = &A> {
        self.actors.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fog_core::model::ItemKind;

    fn item(stamp: &str) -> AuthoritativeItem {
        AuthoritativeItem::new(ItemId::intern("diffed"), ItemKind::Image).modified_at(stamp)
    }

    #[test]
    fn diff_compares_instants_not_strings() {
        let a = item("2024-03-01T12:30:00.000Z");
        let b = item("2024-03-01T13:30:00+01:00");
        let c = item("2024-03-01T12:30:00.001Z");
        assert!(!default_diff(&a, &b));
        assert!(default_diff(&a, &c));
    }

    #[test]
    fn unparseable_timestamps_count_as_unchanged() {
        assert!(!default_diff(&item("yesterday"), &item("2024-03-01T12:30:00Z")));
    }

    #[test]
    fn empty_registry_finds_nothing() {
        struct Nothing;
        impl Reactor for Nothing {
            fn kind(&self) -> &'static str {
                "nothing"
            }
            fn filter(&self, _: &AuthoritativeItem, _: &Context<'_>) -> bool {
                false
            }
            fn process(&mut self, _: &Batch<'_>, _: &mut Context<'_>) -> Result<(), ReconcileError> {
                Ok(())
            }
            fn has(&self, _: ItemId) -> bool {
                false
            }
            fn len(&self) -> usize {
                0
            }
            fn delete(&mut self, _: &mut Context<'_>) {}
            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        let registered: Vec<Box<dyn Reactor>> = vec![Box::new(Nothing)];
        assert!(Registry::empty().find::<Nothing>().is_none());
        assert!(Registry::new(&registered, &[]).find::<Nothing>().is_some());
    }
}
