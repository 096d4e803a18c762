//! Boundary between the simulation and the host scene graph.
//!
//! The world never holds references into the scene. It reads a
//! [`SceneObject`] once at registration and afterwards talks to the scene only
//! through the opaque [`BridgeId`] handle, pushing transforms into a
//! [`SceneSink`] at sync time.

use crate::{
    error::SyncError,
    types::{BridgeId, Quat, Shape, SyncTransform, Vec3},
};

/// Read side: what registration needs from an external object.
pub trait SceneObject {
    fn world_position(&self) -> Vec3;
    fn world_rotation(&self) -> Quat;
    fn world_scale(&self) -> Vec3;
    /// Shape kind and dimensions. Malformed dimensions are tolerated.
    fn collider_shape(&self) -> Shape;
    /// Handle the world will use to address this object at sync.
    fn handle(&self) -> BridgeId;
}

/// Write side: receives the simulated transform of each live entity.
pub trait SceneSink {
    /// Return [`SyncError::MissingHandle`] when the object behind `handle` is
    /// gone; the entity keeps simulating and sync skips it.
    fn push_transform(
        &mut self,
        handle: BridgeId,
        transform: SyncTransform,
    ) -> Result<(), SyncError>;
}
