//! The door tool: pointer input → handles, preview and door edits.
//!
//! ## Gestures
//!
//! | Input | Over a FOG drawing | Over a door overlay | Over a light overlay |
//! |-------|--------------------|---------------------|----------------------|
//! | **Move** | Start handle snaps to the outline |   |   |
//! | **Drag** | End handle and preview follow the outline, commit on release |   |   |
//! | **Click** |   | Toggle open/closed | Select the light |
//! | **Alt+Click** |   | Delete the door |   |
//! | **Double click** |   | Delete the door |   |

use crate::actions;
use crate::error::ReconcileError;
use crate::host::Host;
use crate::local::{LocalItem, LocalKind};
use fog_core::config::FogConfig;
use fog_core::id::ItemId;
use fog_core::model::{AuthoritativeItem, Color, Layer};
use fog_geometry::{
    PathIntersection, ScanParams, commands_between, drawing_to_path, item_affine, path_intersection,
    path_intersection_on,
};
use kurbo::{Affine, BezPath, Point};

const HANDLE_COLOR: Color = Color::rgba(1.0, 116.0 / 255.0, 51.0 / 255.0, 1.0);
const HANDLE_DIAMETER: f64 = 24.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
}

/// The item under the pointer.
#[derive(Debug, Clone)]
pub enum PointerTarget {
    Item(AuthoritativeItem),
    Local(LocalItem),
}

#[derive(Debug, Clone)]
pub struct ToolEvent {
    /// Pointer position in world space.
    pub pointer: Point,
    pub target: Option<PointerTarget>,
    pub modifiers: Modifiers,
}

impl ToolEvent {
    pub fn at(pointer: Point) -> Self {
        Self {
            pointer,
            target: None,
            modifiers: Modifiers::default(),
        }
    }

    pub fn over_item(mut self, item: AuthoritativeItem) -> Self {
        self.target = Some(PointerTarget::Item(item));
        self
    }

    pub fn over_local(mut self, item: LocalItem) -> Self {
        self.target = Some(PointerTarget::Local(item));
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }
}

#[derive(Debug, Clone)]
pub enum ToolInput {
    Click(ToolEvent),
    DoubleClick(ToolEvent),
    Move(ToolEvent),
    DragStart(ToolEvent),
    DragMove(ToolEvent),
    DragEnd,
    DragCancel,
    Deactivate,
}

/// A pointer snapped onto the target's outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorHit {
    pub hit: PathIntersection,
    pub world: Point,
}

/// The drawing currently under the tool, with its outline in local space.
#[derive(Debug, Clone)]
struct Target {
    item: AuthoritativeItem,
    path: BezPath,
    affine: Affine,
}

#[derive(Debug)]
pub struct DoorTool {
    config: FogConfig,
    target: Option<Target>,
    start: Option<ItemId>,
    end: Option<ItemId>,
    subpath: Option<ItemId>,
    start_hit: Option<DoorHit>,
    end_hit: Option<DoorHit>,
}

impl DoorTool {
    pub fn new(config: FogConfig) -> Self {
        Self {
            config,
            target: None,
            start: None,
            end: None,
            subpath: None,
            start_hit: None,
            end_hit: None,
        }
    }

    /// Ids of the handles and preview currently shown.
    pub fn controls(&self) -> Vec<ItemId> {
        [self.end, self.subpath, self.start].into_iter().flatten().collect()
    }

    pub fn start_hit(&self) -> Option<DoorHit> {
        self.start_hit
    }

    pub fn end_hit(&self) -> Option<DoorHit> {
        self.end_hit
    }

    pub fn handle(&mut self, input: &ToolInput, host: &mut dyn Host) -> Result<(), ReconcileError> {
        match input {
            ToolInput::Click(event) => self.click(event, host),
            ToolInput::DoubleClick(event) => self.double_click(event, host),
            ToolInput::Move(event) => {
                if self.end.is_none() {
                    self.update_start(event, host)?;
                }
                Ok(())
            }
            ToolInput::DragStart(event) => self.drag_start(event, host),
            ToolInput::DragMove(event) => self.drag_move(event, host),
            ToolInput::DragEnd => self.drag_end(host),
            ToolInput::DragCancel | ToolInput::Deactivate => self.clear_controls(host),
        }
    }

    // ─── Overlays ────────────────────────────────────────────────────────

    fn click(&mut self, event: &ToolEvent, host: &mut dyn Host) -> Result<(), ReconcileError> {
        if let Some((parent, index)) = self.attached_door(event, host) {
            let result = if event.modifiers.alt {
                actions::delete_door(host, &self.config, parent, index).map(|_| ())
            } else {
                actions::toggle_door(host, &self.config, parent, index).map(|_| ())
            };
            return tolerate_stale_index(result);
        }
        if let Some(light) = self.attached_light(event, host) {
            host.select(&[light])?;
        }
        Ok(())
    }

    fn double_click(&mut self, event: &ToolEvent, host: &mut dyn Host) -> Result<(), ReconcileError> {
        if let Some((parent, index)) = self.attached_door(event, host) {
            let result = actions::delete_door(host, &self.config, parent, index).map(|_| ());
            return tolerate_stale_index(result);
        }
        Ok(())
    }

    /// The drawing and door index behind a door overlay.
    fn attached_door(&self, event: &ToolEvent, host: &dyn Host) -> Option<(ItemId, usize)> {
        let Some(PointerTarget::Local(overlay)) = &event.target else {
            return None;
        };
        let index: usize = overlay.metadata.get(&self.config.door_index_key())?;
        let parent = overlay.attached_to?;
        host.items_by_id(&[parent]).first().map(|item| (item.id, index))
    }

    /// The light behind a light overlay.
    fn attached_light(&self, event: &ToolEvent, host: &dyn Host) -> Option<ItemId> {
        let Some(PointerTarget::Local(overlay)) = &event.target else {
            return None;
        };
        if !overlay.metadata.contains_key(&self.config.light_overlay_key()) {
            return None;
        }
        let parent = overlay.attached_to?;
        host.items_by_id(&[parent]).first().map(|item| item.id)
    }

    // ─── Drawing doors ───────────────────────────────────────────────────

    /// Snap `pointer` onto the target's outline, or onto one contour of it.
    fn intersection(&self, pointer: Point, contour: Option<usize>) -> Option<DoorHit> {
        let target = self.target.as_ref()?;
        let local = target.affine.inverse() * pointer;
        let params = ScanParams::from_config(&self.config);
        let hit = match contour {
            Some(index) => path_intersection_on(&target.path, index, local, params)?,
            None => path_intersection(&target.path, local, params)?,
        };
        Some(DoorHit {
            hit,
            world: target.affine * hit.point,
        })
    }

    /// Show, move or hide the start handle for the hovered drawing.
    fn update_start(&mut self, event: &ToolEvent, host: &mut dyn Host) -> Result<(), ReconcileError> {
        let hovered = match &event.target {
            Some(PointerTarget::Item(item)) if item.is_fog_drawing() => Some(item),
            _ => None,
        };
        let Some(item) = hovered else {
            if let Some(start) = self.start.take() {
                host.local_delete(&[start])?;
                self.target = None;
            }
            return Ok(());
        };

        if self.target.as_ref().is_none_or(|t| t.item.id != item.id) {
            self.target = drawing_to_path(item).and_then(|path| {
                Some(Target {
                    item: item.clone(),
                    path,
                    affine: item_affine(item)?,
                })
            });
        }

        let Some(hit) = self.intersection(event.pointer, None) else {
            return Ok(());
        };
        if hit.hit.distance > self.config.min_handle_distance {
            if let Some(start) = self.start.take() {
                host.local_delete(&[start])?;
            }
            return Ok(());
        }

        match self.start {
            Some(start) => {
                let world = hit.world;
                host.local_update(&[start], &mut |handle| handle.transform.position = world)?;
            }
            None => {
                let handle = control_point(hit.world);
                self.start = Some(handle.id);
                host.local_add(vec![handle])?;
            }
        }
        self.start_hit = Some(hit);
        Ok(())
    }

    fn drag_start(&mut self, event: &ToolEvent, host: &mut dyn Host) -> Result<(), ReconcileError> {
        self.update_start(event, host)?;
        if self.start.is_none() {
            return Ok(());
        }
        let Some(target) = &self.target else {
            return Ok(());
        };
        let Some(hit) = self.intersection(event.pointer, None) else {
            return Ok(());
        };

        let end = control_point(hit.world);
        let subpath = LocalItem::new(LocalKind::Path {
            commands: Vec::new(),
            stroke_color: HANDLE_COLOR,
            stroke_width: target.item.style.stroke_width,
        })
        .with_transform(target.item.transform)
        .on_layer(Layer::Control);

        self.end_hit = Some(hit);
        self.end = Some(end.id);
        self.subpath = Some(subpath.id);
        host.local_add(vec![end, subpath])?;
        Ok(())
    }

    fn drag_move(&mut self, event: &ToolEvent, host: &mut dyn Host) -> Result<(), ReconcileError> {
        let (Some(end), Some(subpath), Some(start_hit), Some(target)) =
            (self.end, self.subpath, self.start_hit, &self.target)
        else {
            return Ok(());
        };
        // The end handle stays on the contour the door started on.
        let Some(hit) = self.intersection(event.pointer, Some(start_hit.hit.contour.index)) else {
            return Ok(());
        };
        let commands = commands_between(&target.path, start_hit.hit.contour, hit.hit.contour);
        self.end_hit = Some(hit);

        let world = hit.world;
        host.local_update(&[end, subpath], &mut |item| {
            if item.id == end {
                item.transform.position = world;
            } else if let (LocalKind::Path { commands: current, .. }, Some(next)) =
                (&mut item.kind, &commands)
            {
                *current = next.clone();
            }
        })?;
        Ok(())
    }

    /// Commit a closed door between the two handles, then clear them.
    fn drag_end(&mut self, host: &mut dyn Host) -> Result<(), ReconcileError> {
        let committed = match (&self.target, self.start_hit, self.end_hit) {
            (Some(target), Some(start), Some(end)) => actions::add_door(
                host,
                &self.config,
                target.item.id,
                start.hit.contour,
                end.hit.contour,
            )
            .map(|_| ()),
            _ => Ok(()),
        };
        self.clear_controls(host)?;
        committed
    }

    /// Delete every handle and forget the target.
    fn clear_controls(&mut self, host: &mut dyn Host) -> Result<(), ReconcileError> {
        let controls = self.controls();
        self.start = None;
        self.end = None;
        self.subpath = None;
        self.target = None;
        self.start_hit = None;
        self.end_hit = None;
        if !controls.is_empty() {
            host.local_delete(&controls)?;
        }
        Ok(())
    }
}

fn control_point(position: Point) -> LocalItem {
    LocalItem::new(LocalKind::Handle {
        color: HANDLE_COLOR,
        diameter: HANDLE_DIAMETER,
    })
    .at(position)
    .on_layer(Layer::Control)
}

/// An overlay may point at a door that was removed since it was drawn.
fn tolerate_stale_index(result: Result<(), ReconcileError>) -> Result<(), ReconcileError> {
    match result {
        Err(ReconcileError::Door(e)) => {
            log::warn!("ignoring door edit: {e}");
            Ok(())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::InMemoryHost;
    use fog_core::model::{ItemKind, ShapeType};

    fn room(name: &str) -> AuthoritativeItem {
        AuthoritativeItem::new(
            ItemId::intern(name),
            ItemKind::Shape {
                shape_type: ShapeType::Rectangle,
                width: 200.0,
                height: 100.0,
            },
        )
        .on_layer(Layer::Fog)
    }

    #[test]
    fn hover_shows_and_hides_the_start_handle() {
        let mut host = InMemoryHost::new();
        let mut tool = DoorTool::new(FogConfig::default());
        let item = room("tool-hover");

        let near = ToolEvent::at(Point::new(50.0, 4.0)).over_item(item.clone());
        tool.handle(&ToolInput::Move(near), &mut host).unwrap();
        assert_eq!(host.local_items().len(), 1);
        let handle = &host.local_items()[0];
        assert!((handle.transform.position - Point::new(50.0, 0.0)).hypot() <= 0.5);

        let far = ToolEvent::at(Point::new(100.0, 300.0)).over_item(item);
        tool.handle(&ToolInput::Move(far), &mut host).unwrap();
        assert!(host.local_items().is_empty());
        assert!(tool.controls().is_empty());
    }

    #[test]
    fn non_fog_targets_clear_the_handle() {
        let mut host = InMemoryHost::new();
        let mut tool = DoorTool::new(FogConfig::default());
        let event = ToolEvent::at(Point::new(10.0, 1.0)).over_item(room("tool-leave"));
        tool.handle(&ToolInput::Move(event), &mut host).unwrap();
        assert_eq!(tool.controls().len(), 1);

        tool.handle(&ToolInput::Move(ToolEvent::at(Point::new(10.0, 1.0))), &mut host)
            .unwrap();
        assert!(host.local_items().is_empty());
    }

    #[test]
    fn cancel_removes_every_control() {
        let mut host = InMemoryHost::new();
        let mut tool = DoorTool::new(FogConfig::default());
        let item = room("tool-cancel");
        let event = ToolEvent::at(Point::new(30.0, 0.0)).over_item(item);
        tool.handle(&ToolInput::DragStart(event), &mut host).unwrap();
        assert_eq!(tool.controls().len(), 3);

        tool.handle(&ToolInput::DragCancel, &mut host).unwrap();
        assert!(tool.controls().is_empty());
        assert!(host.local_items().is_empty());
    }
}
