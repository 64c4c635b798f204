//! The host boundary: authoritative items in, local items out.

use crate::error::HostError;
use crate::local::LocalItem;
use fog_core::format_timestamp;
use fog_core::id::ItemId;
use fog_core::model::AuthoritativeItem;

/// Everything the reconciler, actions and tools need from the host
/// application. Calls are synchronous from the core's point of view.
pub trait Host {
    /// Snapshot of every authoritative item.
    fn items(&self) -> Vec<AuthoritativeItem>;

    /// The subset of `ids` that exist, in host order.
    fn items_by_id(&self, ids: &[ItemId]) -> Vec<AuthoritativeItem>;

    /// Mutate authoritative items. Unknown ids are skipped.
    fn update_items(
        &mut self,
        ids: &[ItemId],
        mutator: &mut dyn FnMut(&mut AuthoritativeItem),
    ) -> Result<(), HostError>;

    fn local_add(&mut self, items: Vec<LocalItem>) -> Result<(), HostError>;

    fn local_delete(&mut self, ids: &[ItemId]) -> Result<(), HostError>;

    fn local_update(
        &mut self,
        ids: &[ItemId],
        mutator: &mut dyn FnMut(&mut LocalItem),
    ) -> Result<(), HostError>;

    fn select(&mut self, ids: &[ItemId]) -> Result<(), HostError>;
}

// ─── In-memory host ──────────────────────────────────────────────────────

/// One recorded host call, in the order it was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Update(Vec<ItemId>),
    LocalAdd(Vec<ItemId>),
    LocalDelete(Vec<ItemId>),
    LocalUpdate(Vec<ItemId>),
    Select(Vec<ItemId>),
}

/// Deterministic host used by tests and the demo.
///
/// Edits bump `last_modified` from a monotonic millisecond clock, so every
/// edit is seen as a change by the default diff.
#[derive(Debug)]
pub struct InMemoryHost {
    items: Vec<AuthoritativeItem>,
    local: Vec<LocalItem>,
    selection: Vec<ItemId>,
    calls: Vec<HostCall>,
    clock: i64,
    reject: Option<String>,
}

impl Default for InMemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            local: Vec::new(),
            selection: Vec::new(),
            calls: Vec::new(),
            clock: 1_700_000_000_000,
            reject: None,
        }
    }

    pub fn with_items(items: Vec<AuthoritativeItem>) -> Self {
        Self {
            items,
            ..Self::new()
        }
    }

    /// Insert or replace an item verbatim.
    pub fn insert(&mut self, item: AuthoritativeItem) {
        match self.items.iter_mut().find(|i| i.id == item.id) {
            Some(slot) => *slot = item,
            None => self.items.push(item),
        }
    }

    /// Edit an item in place and stamp it as modified. Returns false when
    /// the item does not exist.
    pub fn edit(&mut self, id: ItemId, f: impl FnOnce(&mut AuthoritativeItem)) -> bool {
        let stamp = self.tick();
        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            return false;
        };
        f(item);
        item.last_modified = stamp;
        true
    }

    pub fn remove(&mut self, id: ItemId) -> Option<AuthoritativeItem> {
        let index = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn item(&self, id: ItemId) -> Option<&AuthoritativeItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn local_items(&self) -> &[LocalItem] {
        &self.local
    }

    pub fn local(&self, id: ItemId) -> Option<&LocalItem> {
        self.local.iter().find(|i| i.id == id)
    }

    /// Local items attached to `parent`, in creation order.
    pub fn attached_to(&self, parent: ItemId) -> Vec<&LocalItem> {
        self.local
            .iter()
            .filter(|i| i.attached_to == Some(parent))
            .collect()
    }

    pub fn selection(&self) -> &[ItemId] {
        &self.selection
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    /// Make every following local write fail with `HostError::Rejected`.
    pub fn reject_local_writes(&mut self, reason: Option<&str>) {
        self.reject = reason.map(str::to_string);
    }

    fn tick(&mut self) -> String {
        self.clock += 1;
        format_timestamp(self.clock)
    }

    fn check_local_write(&self) -> Result<(), HostError> {
        match &self.reject {
            Some(reason) => Err(HostError::Rejected(reason.clone())),
            None => Ok(()),
        }
    }
}

impl Host for InMemoryHost {
    fn items(&self) -> Vec<AuthoritativeItem> {
        self.items.clone()
    }

    fn items_by_id(&self, ids: &[ItemId]) -> Vec<AuthoritativeItem> {
        self.items
            .iter()
            .filter(|i| ids.contains(&i.id))
            .cloned()
            .collect()
    }

    fn update_items(
        &mut self,
        ids: &[ItemId],
        mutator: &mut dyn FnMut(&mut AuthoritativeItem),
    ) -> Result<(), HostError> {
        self.calls.push(HostCall::Update(ids.to_vec()));
        let stamp = self.tick();
        for item in self.items.iter_mut().filter(|i| ids.contains(&i.id)) {
            mutator(item);
            item.last_modified = stamp.clone();
        }
        Ok(())
    }

    fn local_add(&mut self, items: Vec<LocalItem>) -> Result<(), HostError> {
        self.check_local_write()?;
        self.calls
            .push(HostCall::LocalAdd(items.iter().map(|i| i.id).collect()));
        for item in items {
            if self.local(item.id).is_some() {
                return Err(HostError::Rejected(format!("{} already exists", item.id)));
            }
            self.local.push(item);
        }
        Ok(())
    }

    fn local_delete(&mut self, ids: &[ItemId]) -> Result<(), HostError> {
        self.check_local_write()?;
        self.calls.push(HostCall::LocalDelete(ids.to_vec()));
        self.local.retain(|i| !ids.contains(&i.id));
        Ok(())
    }

    fn local_update(
        &mut self,
        ids: &[ItemId],
        mutator: &mut dyn FnMut(&mut LocalItem),
    ) -> Result<(), HostError> {
        self.check_local_write()?;
        self.calls.push(HostCall::LocalUpdate(ids.to_vec()));
        for item in self.local.iter_mut().filter(|i| ids.contains(&i.id)) {
            mutator(item);
        }
        Ok(())
    }

    fn select(&mut self, ids: &[ItemId]) -> Result<(), HostError> {
        self.calls.push(HostCall::Select(ids.to_vec()));
        self.selection = ids.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalKind;
    use fog_core::model::ItemKind;
    use fog_core::parse_timestamp;

    #[test]
    fn edits_advance_the_timestamp() {
        let id = ItemId::intern("host-edit");
        let mut host = InMemoryHost::with_items(vec![AuthoritativeItem::new(id, ItemKind::Image)]);
        let before = parse_timestamp(&host.items()[0].last_modified);
        assert!(host.edit(id, |item| item.visible = false));
        let after = parse_timestamp(&host.items()[0].last_modified);
        assert!(after > before);
        assert!(!host.edit(ItemId::intern("host-missing"), |_| {}));
    }

    #[test]
    fn local_writes_are_recorded_in_order() {
        let mut host = InMemoryHost::new();
        let wall = LocalItem::new(LocalKind::Wall { points: Vec::new() });
        let id = wall.id;
        host.local_add(vec![wall]).unwrap();
        host.local_update(&[id], &mut |item| item.visible = false).unwrap();
        host.local_delete(&[id]).unwrap();
        assert_eq!(
            host.calls(),
            &[
                HostCall::LocalAdd(vec![id]),
                HostCall::LocalUpdate(vec![id]),
                HostCall::LocalDelete(vec![id]),
            ]
        );
        assert!(host.local_items().is_empty());
    }

    #[test]
    fn rejected_writes_leave_state_alone() {
        let mut host = InMemoryHost::new();
        host.reject_local_writes(Some("offline"));
        let wall = LocalItem::new(LocalKind::Wall { points: Vec::new() });
        assert_eq!(
            host.local_add(vec![wall]),
            Err(HostError::Rejected("offline".into()))
        );
        assert!(host.local_items().is_empty());
    }
}
