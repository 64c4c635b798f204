//! Doors: persisted marker pairs on a drawing's outline.
//!
//! Doors live in an item's metadata as an ordered list; a door's position in
//! that list is its address for toggling and deletion.

use crate::metadata::Metadata;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A transform-independent point on a path: the `index`-th contour,
/// `distance` units of arc length from that contour's start.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContourMarker {
    pub index: usize,
    pub distance: f64,
}

impl ContourMarker {
    pub const fn new(index: usize, distance: f64) -> Self {
        Self { index, distance }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub open: bool,
    pub start: ContourMarker,
    pub end: ContourMarker,
}

impl Door {
    /// A closed door between two markers on the same contour.
    pub fn new(start: ContourMarker, end: ContourMarker) -> Result<Self, DoorError> {
        let door = Self {
            open: false,
            start,
            end,
        };
        if !door.spans_one_contour() {
            return Err(DoorError::CrossContour {
                start: start.index,
                end: end.index,
            });
        }
        Ok(door)
    }

    /// False for doors read back from hand-edited metadata whose markers
    /// sit on different contours.
    pub fn spans_one_contour(&self) -> bool {
        self.start.index == self.end.index
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DoorError {
    #[error("door markers lie on different contours ({start} and {end})")]
    CrossContour { start: usize, end: usize },
    #[error("no door at index {index} (item has {len})")]
    OutOfRange { index: usize, len: usize },
}

// ─── Door list edits ─────────────────────────────────────────────────────

/// Read the door list stored under `key`; missing or malformed lists are empty.
pub fn doors(metadata: &Metadata, key: &str) -> Vec<Door> {
    metadata.get_or(key, Vec::new())
}

/// Append a new closed door.
pub fn add_door(
    metadata: &mut Metadata,
    key: &str,
    start: ContourMarker,
    end: ContourMarker,
) -> Result<usize, DoorError> {
    let door = Door::new(start, end)?;
    let mut list = doors(metadata, key);
    list.push(door);
    metadata.insert(key, &list);
    Ok(list.len() - 1)
}

/// Flip the open state of the door at `index`; returns the new state.
pub fn toggle_door(metadata: &mut Metadata, key: &str, index: usize) -> Result<bool, DoorError> {
    let mut list = doors(metadata, key);
    let len = list.len();
    let door = list
        .get_mut(index)
        .ok_or(DoorError::OutOfRange { index, len })?;
    door.open = !door.open;
    let open = door.open;
    metadata.insert(key, &list);
    Ok(open)
}

/// Remove the door at `index`, shifting later doors down by one.
pub fn delete_door(metadata: &mut Metadata, key: &str, index: usize) -> Result<Door, DoorError> {
    let mut list = doors(metadata, key);
    if index >= list.len() {
        return Err(DoorError::OutOfRange {
            index,
            len: list.len(),
        });
    }
    let removed = list.remove(index);
    metadata.insert(key, &list);
    Ok(removed)
}
