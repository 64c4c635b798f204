//! Item identifiers.
//!
//! Host ids and the ids minted for local items share one interner, so a
//! local item's `attached_to` compares against its parent in O(1).

use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

static IDS: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);
static LOCAL_SEQ: AtomicU64 = AtomicU64::new(1);

/// Interned item id. `Copy`, 4 bytes, hashes the interner key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ItemId(Spur);

impl ItemId {
    pub fn intern(s: &str) -> Self {
        ItemId(IDS.get_or_intern(s))
    }

    pub fn as_str(&self) -> &str {
        IDS.resolve(&self.0)
    }

    /// Mint a fresh id for a local item, e.g. `wall_12`. Never collides with
    /// an earlier minted id in this process.
    pub fn with_prefix(prefix: &str) -> Self {
        let seq = LOCAL_SEQ.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{prefix}_{seq}"))
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self::intern(&s)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::intern(s)
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.as_str().to_string()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_string_same_id() {
        let a = ItemId::intern("fog_wall");
        assert_eq!(a, ItemId::from("fog_wall"));
        assert_eq!(a.to_string(), "fog_wall");
    }

    #[test]
    fn minted_ids_do_not_repeat() {
        let a = ItemId::with_prefix("wall");
        let b = ItemId::with_prefix("wall");
        assert_ne!(a, b);
        assert!(b.as_str().starts_with("wall_"));
    }

    #[test]
    fn json_form_is_the_raw_string() {
        let id = ItemId::intern("token-7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"token-7\"");
        let back: ItemId = serde_json::from_str("\"token-7\"").unwrap();
        assert_eq!(back, id);
    }
}
