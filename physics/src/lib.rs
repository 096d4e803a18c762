pub mod collision;
pub mod error;
pub mod flags;
pub mod integrator;
pub mod registration;
pub mod report;
pub mod scene;
pub mod settings;
pub mod stopwatch;
pub mod store;
pub mod types;
pub mod world;

pub use error::{PhysicsError, SyncError};
pub use flags::{SHAPE_BITS, ShapeFlag, ShapeFlags};
pub use report::{SkipReason, SkippedPair, SyncReport, TickReport};
pub use scene::{SceneObject, SceneSink};
pub use settings::SimulationSettings;
pub use types::{Aabb, BridgeId, CollisionPair, EntityId, Quat, Shape, SyncTransform, Vec3};
pub use world::PhysicsWorld;
