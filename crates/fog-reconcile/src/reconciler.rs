//! One-way binding from the host's authoritative items to derived local items.
//!
//! Every snapshot is diffed against the previous one per reactor; the
//! resulting batches are processed in registration order and the staged
//! local changes are flushed to the host once at the end of the pass.
//! Local items are never read back, so they must not be edited outside
//! their owning actor.

use crate::derive::{
    DoorOverlayReactor, DoorReactor, LightOverlayReactor, LightReactor, SelfLightReactor,
    WallReactor,
};
use crate::host::Host;
use crate::patcher::{PatchStats, Patcher};
use crate::reactor::{Batch, Context, Reactor, Registry};
use fog_core::config::FogConfig;
use fog_core::id::ItemId;
use fog_core::model::{AuthoritativeItem, Player};
use std::collections::HashMap;

/// An item snapshot in host order, indexed by id.
#[derive(Debug, Default)]
struct Snapshot {
    items: Vec<AuthoritativeItem>,
    index: HashMap<ItemId, usize>,
}

impl Snapshot {
    fn new(items: Vec<AuthoritativeItem>) -> Self {
        let index = items.iter().enumerate().map(|(i, item)| (item.id, i)).collect();
        Self { items, index }
    }

    fn get(&self, id: ItemId) -> Option<&AuthoritativeItem> {
        self.index.get(&id).map(|&i| &self.items[i])
    }

    fn iter(&self) -> impl Iterator<Item = &AuthoritativeItem> {
        self.items.iter()
    }
}

pub struct Reconciler<H: Host> {
    host: H,
    config: FogConfig,
    player: Player,
    reactors: Vec<Box<dyn Reactor>>,
    previous: Snapshot,
    patcher: Patcher,
}

impl<H: Host> Reconciler<H> {
    /// A reconciler with no reactors. The patcher starts not ready; call
    /// `on_ready_change(true)` once the host has a scene.
    pub fn new(host: H, config: FogConfig) -> Self {
        Self {
            host,
            config,
            player: Player::default(),
            reactors: Vec::new(),
            previous: Snapshot::default(),
            patcher: Patcher::new(),
        }
    }

    /// Register the full set of derivations in dependency order.
    pub fn with_default_reactors(mut self) -> Self {
        self.register(Box::new(DoorReactor::new()));
        self.register(Box::new(WallReactor::new()));
        self.register(Box::new(DoorOverlayReactor::new()));
        self.register(Box::new(LightReactor::new()));
        self.register(Box::new(LightOverlayReactor::new()));
        self.register(Box::new(SelfLightReactor::new()));
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &FogConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Append a reactor and hydrate it with every known matching item.
    ///
    /// Reactors that read others through the registry must be registered
    /// after them: doors, then walls, then lights.
    pub fn register(&mut self, reactor: Box<dyn Reactor>) {
        log::debug!("registering reactor {}", reactor.kind());
        self.reactors.push(reactor);
        let last = self.reactors.len() - 1;
        let (before, rest) = self.reactors.split_at_mut(last);
        if let Some((reactor, after)) = rest.split_first_mut() {
            let mut ctx = Context {
                config: &self.config,
                player: &self.player,
                registry: Registry::new(before, after),
                patcher: &mut self.patcher,
            };
            let empty = Snapshot::default();
            let batch = collect_batch(&**reactor, &empty, &self.previous, &ctx);
            if let Err(e) = reactor.process(&batch, &mut ctx) {
                log::error!("reactor {} failed to hydrate: {e}", reactor.kind());
            }
        }
        self.flush();
    }

    /// Remove the reactor named `kind` and delete its actors.
    pub fn unregister(&mut self, kind: &str) -> bool {
        let Some(index) = self.reactors.iter().position(|r| r.kind() == kind) else {
            return false;
        };
        let mut reactor = self.reactors.remove(index);
        let mut ctx = Context {
            config: &self.config,
            player: &self.player,
            registry: Registry::new(&self.reactors, &[]),
            patcher: &mut self.patcher,
        };
        reactor.delete(&mut ctx);
        self.flush();
        true
    }

    pub fn find<R: Reactor>(&self) -> Option<&R> {
        Registry::new(&self.reactors, &[]).find::<R>()
    }

    /// Reconcile a new snapshot of the host's items.
    pub fn on_items_change(&mut self, items: Vec<AuthoritativeItem>) {
        self.reconcile(Snapshot::new(items));
    }

    pub fn on_ready_change(&mut self, ready: bool) {
        self.patcher.set_ready(ready);
        if ready {
            let items = self.host.items();
            self.reconcile(Snapshot::new(items));
        } else {
            self.delete_all();
            self.flush();
        }
    }

    /// Store the new player and re-run the previous snapshot so owner-only
    /// filters take effect.
    pub fn on_player_change(&mut self, player: Player) {
        if self.player == player {
            return;
        }
        self.player = player;
        self.refresh();
    }

    pub fn refresh(&mut self) {
        let items = self.previous.items.clone();
        self.reconcile(Snapshot::new(items));
    }

    /// Delete every reactor's actors, flush, and hand the host back.
    pub fn teardown(mut self) -> H {
        self.delete_all();
        self.flush();
        self.reactors.clear();
        self.host
    }

    fn reconcile(&mut self, next: Snapshot) {
        for i in 0..self.reactors.len() {
            let (before, rest) = self.reactors.split_at_mut(i);
            let Some((reactor, after)) = rest.split_first_mut() else {
                break;
            };
            let mut ctx = Context {
                config: &self.config,
                player: &self.player,
                registry: Registry::new(before, after),
                patcher: &mut self.patcher,
            };
            let batch = collect_batch(&**reactor, &self.previous, &next, &ctx);
            if !batch.is_empty() {
                log::debug!(
                    "{}: {} added, {} deleted, {} updated",
                    reactor.kind(),
                    batch.added.len(),
                    batch.deleted.len(),
                    batch.updated.len()
                );
            }
            if let Err(e) = reactor.process(&batch, &mut ctx) {
                log::error!("reactor {} failed: {e}", reactor.kind());
            }
        }
        self.flush();
        self.previous = next;
    }

    fn delete_all(&mut self) {
        for i in 0..self.reactors.len() {
            let (before, rest) = self.reactors.split_at_mut(i);
            let Some((reactor, after)) = rest.split_first_mut() else {
                break;
            };
            let mut ctx = Context {
                config: &self.config,
                player: &self.player,
                registry: Registry::new(before, after),
                patcher: &mut self.patcher,
            };
            reactor.delete(&mut ctx);
        }
    }

    fn flush(&mut self) -> PatchStats {
        match self.patcher.submit_changes(&mut self.host) {
            Ok(stats) => {
                if !stats.is_empty() {
                    log::debug!(
                        "flushed {} deletions, {} additions, {} updates",
                        stats.deleted,
                        stats.added,
                        stats.updated
                    );
                }
                stats
            }
            Err(e) => {
                log::error!("failed to flush local changes: {e}");
                PatchStats::default()
            }
        }
    }
}

/// Split a snapshot transition into the batch one reactor must process.
///
/// An item is added when it matches and either was not seen before or has
/// no actor yet. It is deleted when an actor exists but the item is gone or
/// no longer matches; the previous version is reported.
fn collect_batch<'s>(
    reactor: &dyn Reactor,
    previous: &'s Snapshot,
    next: &'s Snapshot,
    ctx: &Context<'_>,
) -> Batch<'s> {
    let mut batch = Batch::default();
    for item in next.iter() {
        if !reactor.filter(item, ctx) {
            continue;
        }
        match previous.get(item.id) {
            Some(prev) if reactor.has(item.id) => {
                if reactor.diff(prev, item, ctx) {
                    batch.updated.push(item);
                }
            }
            _ => batch.added.push(item),
        }
    }
    for prev in previous.iter() {
        if !reactor.has(prev.id) {
            continue;
        }
        let still_matches = next.get(prev.id).is_some_and(|item| reactor.filter(item, ctx));
        if !still_matches {
            batch.deleted.push(prev);
        }
    }
    batch
}
