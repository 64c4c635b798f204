use fog_core::door::DoorError;
use fog_core::id::ItemId;
use thiserror::Error;

/// Failures raised by a host implementation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("host is not ready")]
    NotReady,
    #[error("unknown item {0}")]
    UnknownItem(ItemId),
    #[error("host rejected the request: {0}")]
    Rejected(String),
}

/// Failures raised while reconciling or applying an authoring action.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReconcileError {
    #[error("{reactor} requires {dependency} to be registered first")]
    MissingDependency {
        reactor: &'static str,
        dependency: &'static str,
    },
    #[error(transparent)]
    Door(#[from] DoorError),
    #[error(transparent)]
    Host(#[from] HostError),
}
