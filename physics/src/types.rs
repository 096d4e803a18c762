/*!
Core types and math aliases shared by the store and the pipeline stages.

This module contains no algorithms. It defines the data exchanged between:
- registration (scene object → entity row)
- broad_phase (AABB refresh and candidate pairs)
- narrow_phase (confirmed collision pairs)
- response (impulse resolution)
- the sync boundary (entity row → scene object)
*/

use std::fmt;

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Point3 = na::Point3<f32>;
/// Stored orientation. Deliberately not `UnitQuaternion`: the integrator adds
/// angular velocity component-wise and renormalizes afterwards.
pub type Quat = na::Quaternion<f32>;
pub type UnitQuat = na::UnitQuaternion<f32>;

/// World-space bounding box. Parry's AABB (re-exported through rapier3d).
pub type Aabb = rapier3d::parry::bounding_volume::Aabb;

/// Opaque id of the scene object an entity mirrors.
pub type BridgeId = u64;

/// Dense row index into the entity store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u32);

impl EntityId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Collision shape. Exactly one kind per entity, fixed at registration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Box {
        /// Local-space half-extents (hx, hy, hz).
        half_extents: Vec3,
    },
    Sphere {
        /// Radius in meters.
        radius: f32,
    },
}

impl Shape {
    pub fn cuboid(hx: f32, hy: f32, hz: f32) -> Self {
        Shape::Box {
            half_extents: Vec3::new(hx, hy, hz),
        }
    }

    pub fn sphere(radius: f32) -> Self {
        Shape::Sphere { radius }
    }

    /// Replace negative or non-finite dimensions with zero.
    pub fn sanitized(self) -> Self {
        let clean = |v: f32| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        match self {
            Shape::Box { half_extents } => Shape::Box {
                half_extents: half_extents.map(clean),
            },
            Shape::Sphere { radius } => Shape::Sphere {
                radius: clean(radius),
            },
        }
    }

    /// Lever arm used by the simplified angular response: the sphere radius,
    /// or half the smallest box dimension.
    pub fn characteristic_radius(&self) -> f32 {
        match *self {
            Shape::Sphere { radius } => radius,
            Shape::Box { half_extents } => half_extents.min(),
        }
    }
}

/// Transform pushed to the scene layer at sync.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SyncTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

/// Unordered pair of entities whose shapes overlap this tick. `a < b` by
/// construction of the pairwise scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CollisionPair {
    pub a: EntityId,
    pub b: EntityId,
}

impl CollisionPair {
    #[inline]
    pub fn new(a: EntityId, b: EntityId) -> Self {
        Self { a, b }
    }
}

impl fmt::Display for CollisionPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.a, self.b)
    }
}

/// Unit rotation from a stored quaternion; falls back to identity when the
/// stored value is (near) zero.
#[inline]
pub fn unit_rotation(q: &Quat) -> UnitQuat {
    UnitQuat::try_new(*q, f32::EPSILON).unwrap_or_else(UnitQuat::identity)
}
