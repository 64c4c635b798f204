//! Staged local-item changes, flushed to the host once per pass.

use crate::error::HostError;
use crate::host::Host;
use crate::local::LocalItem;
use fog_core::id::ItemId;
use smallvec::SmallVec;
use std::collections::HashMap;

type Mutator = Box<dyn FnOnce(&mut LocalItem)>;

/// Counts of what a flush sent to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatchStats {
    pub deleted: usize,
    pub added: usize,
    pub updated: usize,
}

impl PatchStats {
    pub fn is_empty(&self) -> bool {
        self.deleted == 0 && self.added == 0 && self.updated == 0
    }
}

/// Collects additions, deletions and per-item mutators during a pass.
///
/// `submit_changes` sends deletions, then additions, then one coalesced
/// update in which every mutator staged for an id runs in call order.
#[derive(Default)]
pub struct Patcher {
    additions: Vec<LocalItem>,
    deletions: Vec<ItemId>,
    updates: Vec<(ItemId, SmallVec<[Mutator; 2]>)>,
    ready: bool,
}

impl std::fmt::Debug for Patcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Patcher")
            .field("additions", &self.additions.len())
            .field("deletions", &self.deletions.len())
            .field("updates", &self.updates.len())
            .field("ready", &self.ready)
            .finish()
    }
}

impl Patcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_items(&mut self, items: impl IntoIterator<Item = LocalItem>) {
        self.additions.extend(items);
    }

    pub fn delete_items(&mut self, ids: impl IntoIterator<Item = ItemId>) {
        self.deletions.extend(ids);
    }

    pub fn update_item(&mut self, id: ItemId, mutator: impl FnOnce(&mut LocalItem) + 'static) {
        match self.updates.iter_mut().find(|(staged, _)| *staged == id) {
            Some((_, mutators)) => mutators.push(Box::new(mutator)),
            None => {
                let mut mutators: SmallVec<[Mutator; 2]> = SmallVec::new();
                mutators.push(Box::new(mutator));
                self.updates.push((id, mutators));
            }
        }
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.deletions.is_empty() && self.updates.is_empty()
    }

    /// Send everything staged to the host and clear it. When the host is
    /// not ready the staged changes are dropped without a call.
    pub fn submit_changes(&mut self, host: &mut dyn Host) -> Result<PatchStats, HostError> {
        let additions = std::mem::take(&mut self.additions);
        let deletions = std::mem::take(&mut self.deletions);
        let updates = std::mem::take(&mut self.updates);

        if !self.ready {
            if !(additions.is_empty() && deletions.is_empty() && updates.is_empty()) {
                log::trace!(
                    "patcher not ready, dropping {} additions, {} deletions, {} updates",
                    additions.len(),
                    deletions.len(),
                    updates.len()
                );
            }
            return Ok(PatchStats::default());
        }

        let mut stats = PatchStats::default();
        if !deletions.is_empty() {
            stats.deleted = deletions.len();
            host.local_delete(&deletions)?;
        }
        if !additions.is_empty() {
            stats.added = additions.len();
            host.local_add(additions)?;
        }
        if !updates.is_empty() {
            stats.updated = updates.len();
            let ids: Vec<ItemId> = updates.iter().map(|(id, _)| *id).collect();
            let mut pending: HashMap<ItemId, SmallVec<[Mutator; 2]>> = updates.into_iter().collect();
            host.local_update(&ids, &mut |item| {
                if let Some(mutators) = pending.remove(&item.id) {
                    for mutator in mutators {
                        mutator(item);
                    }
                }
            })?;
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostCall, InMemoryHost};
    use crate::local::LocalKind;
    use kurbo::Point;

    fn wall() -> LocalItem {
        LocalItem::new(LocalKind::Wall { points: Vec::new() })
    }

    #[test]
    fn not_ready_discards_everything() {
        let mut host = InMemoryHost::new();
        let mut patcher = Patcher::new();
        patcher.add_items([wall()]);
        let stats = patcher.submit_changes(&mut host).unwrap();
        assert!(stats.is_empty());
        assert!(host.calls().is_empty());

        patcher.set_ready(true);
        assert!(patcher.is_empty());
        assert!(patcher.submit_changes(&mut host).unwrap().is_empty());
    }

    #[test]
    fn mutators_for_one_id_run_in_call_order() {
        let mut host = InMemoryHost::new();
        let mut patcher = Patcher::new();
        patcher.set_ready(true);
        let item = wall();
        let id = item.id;
        patcher.add_items([item]);
        patcher.submit_changes(&mut host).unwrap();

        patcher.update_item(id, |item| item.set_points(vec![Point::new(1.0, 0.0)]));
        patcher.update_item(id, |item| {
            let mut points = item.points().map(<[Point]>::to_vec).unwrap_or_default();
            points.push(Point::new(2.0, 0.0));
            item.set_points(points);
        });
        let stats = patcher.submit_changes(&mut host).unwrap();
        assert_eq!(stats.updated, 1);
        assert_eq!(
            host.local(id).and_then(LocalItem::points),
            Some(&[Point::new(1.0, 0.0), Point::new(2.0, 0.0)][..])
        );
    }

    #[test]
    fn flush_order_is_delete_add_update() {
        let mut host = InMemoryHost::new();
        let mut patcher = Patcher::new();
        patcher.set_ready(true);
        let old = wall();
        let old_id = old.id;
        patcher.add_items([old]);
        patcher.submit_changes(&mut host).unwrap();
        host.take_calls();

        let new = wall();
        let new_id = new.id;
        patcher.update_item(new_id, |item| item.visible = false);
        patcher.add_items([new]);
        patcher.delete_items([old_id]);
        patcher.submit_changes(&mut host).unwrap();

        assert_eq!(
            host.calls(),
            &[
                HostCall::LocalDelete(vec![old_id]),
                HostCall::LocalAdd(vec![new_id]),
                HostCall::LocalUpdate(vec![new_id]),
            ]
        );
        assert_eq!(host.local(new_id).map(|i| i.visible), Some(false));
    }

    #[test]
    fn failed_flush_still_clears_staged_changes() {
        let mut host = InMemoryHost::new();
        host.reject_local_writes(Some("offline"));
        let mut patcher = Patcher::new();
        patcher.set_ready(true);
        patcher.add_items([wall()]);
        assert!(patcher.submit_changes(&mut host).is_err());
        assert!(patcher.is_empty());
    }
}
