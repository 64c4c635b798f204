//! Authoring actions.
//!
//! Every action edits authoritative metadata through the host; the derived
//! items catch up when the edited snapshot comes back through
//! `Reconciler::on_items_change`. Actions on items the host does not know
//! are no-ops and return `Ok(None)`.

use crate::error::{HostError, ReconcileError};
use crate::host::Host;
use fog_core::config::FogConfig;
use fog_core::door::{self, ContourMarker, Door};
use fog_core::id::ItemId;
use fog_core::light::LightConfig;
use fog_core::model::AuthoritativeItem;

/// Run `f` once against item `id` and return its result.
fn edit<T>(
    host: &mut dyn Host,
    id: ItemId,
    f: impl FnOnce(&mut AuthoritativeItem) -> T,
) -> Result<Option<T>, HostError> {
    let mut f = Some(f);
    let mut out = None;
    host.update_items(&[id], &mut |item| {
        if let Some(f) = f.take() {
            out = Some(f(item));
        }
    })?;
    Ok(out)
}

/// Flip door `index` of `item`; returns the new open state.
pub fn toggle_door(
    host: &mut dyn Host,
    config: &FogConfig,
    item: ItemId,
    index: usize,
) -> Result<Option<bool>, ReconcileError> {
    let key = config.doors_key();
    let result = edit(host, item, |target| {
        door::toggle_door(&mut target.metadata, &key, index)
    })?;
    Ok(result.transpose()?)
}

/// Remove door `index` of `item`; later doors shift down by one.
pub fn delete_door(
    host: &mut dyn Host,
    config: &FogConfig,
    item: ItemId,
    index: usize,
) -> Result<Option<Door>, ReconcileError> {
    let key = config.doors_key();
    let result = edit(host, item, |target| {
        door::delete_door(&mut target.metadata, &key, index)
    })?;
    Ok(result.transpose()?)
}

/// Append a closed door between two markers on the same contour; returns
/// its index. Cross-contour doors are rejected before the host is called.
pub fn add_door(
    host: &mut dyn Host,
    config: &FogConfig,
    item: ItemId,
    start: ContourMarker,
    end: ContourMarker,
) -> Result<Option<usize>, ReconcileError> {
    Door::new(start, end)?;
    let key = config.doors_key();
    let result = edit(host, item, |target| {
        door::add_door(&mut target.metadata, &key, start, end)
    })?;
    Ok(result.transpose()?)
}

/// Turn items into lights with a six-cell radius, a 25 unit source and a
/// 0.2 falloff.
pub fn add_light(
    host: &mut dyn Host,
    config: &FogConfig,
    items: &[ItemId],
    grid_dpi: f64,
) -> Result<(), ReconcileError> {
    let key = config.light_key();
    let light = LightConfig::for_new_light(grid_dpi);
    host.update_items(items, &mut |item| item.metadata.insert(&key, &light))?;
    Ok(())
}

/// Apply `f` to the light config of every item that already has a readable
/// one; items without light metadata or with a malformed config are left
/// alone.
pub fn edit_light(
    host: &mut dyn Host,
    config: &FogConfig,
    items: &[ItemId],
    mut f: impl FnMut(&mut LightConfig),
) -> Result<(), ReconcileError> {
    let key = config.light_key();
    host.update_items(items, &mut |item| {
        if let Some(mut light) = item.metadata.get::<LightConfig>(&key) {
            f(&mut light);
            item.metadata.insert(&key, &light);
        }
    })?;
    Ok(())
}

/// Strip light metadata, turning the items back into plain items.
pub fn remove_light(
    host: &mut dyn Host,
    config: &FogConfig,
    items: &[ItemId],
) -> Result<(), ReconcileError> {
    let key = config.light_key();
    host.update_items(items, &mut |item| {
        item.metadata.remove(&key);
    })?;
    Ok(())
}
