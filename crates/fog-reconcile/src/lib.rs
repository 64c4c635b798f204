pub mod actions;
pub mod derive;
pub mod error;
pub mod host;
pub mod local;
pub mod patcher;
pub mod reactor;
pub mod reconciler;
pub mod tools;

pub use derive::{
    DoorActor, DoorOverlayActor, DoorOverlayReactor, DoorPath, DoorReactor, LightActor,
    LightOverlayActor, LightOverlayReactor, LightReactor, SelfLightActor, SelfLightReactor,
    WallActor, WallReactor,
};
pub use error::{HostError, ReconcileError};
pub use host::{Host, HostCall, InMemoryHost};
pub use local::{BillboardImage, LightParams, LocalItem, LocalKind};
pub use patcher::{PatchStats, Patcher};
pub use reactor::{Actor, ActorSet, Batch, Context, Reactor, Registry, default_diff};
pub use reconciler::Reconciler;
pub use tools::{DoorHit, DoorTool, Modifiers, PointerTarget, ToolEvent, ToolInput};
