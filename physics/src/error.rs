use crate::types::{BridgeId, EntityId};

/// Errors returned by the host-facing [`crate::PhysicsWorld`] API.
///
/// Pipeline stages never return these mid-tick; per-pair and per-entity problems
/// are reported through [`crate::TickReport`] and [`crate::SyncReport`] instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PhysicsError {
    #[error("timestep must be finite and non-negative, got {0}")]
    InvalidTimestep(f32),
    #[error("entity {0} does not exist")]
    UnknownEntity(EntityId),
    #[error("entity {0} has been despawned")]
    Despawned(EntityId),
    #[error("invalid simulation settings: {0}")]
    InvalidSettings(&'static str),
}

/// Failure reported by a [`crate::SceneSink`] when pushing a transform.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// The scene object behind this handle no longer exists.
    #[error("scene handle {0} is no longer present")]
    MissingHandle(BridgeId),
    #[error("scene rejected transform for handle {handle}: {reason}")]
    Rejected { handle: BridgeId, reason: String },
}
