//! Flat, index-addressed entity storage.
//!
//! Every component lives in its own `Vec`, and an [`EntityId`] is simply the row
//! index shared by all of them. There are no per-entity heap objects and no
//! relations other than id lookups. Rows are only ever appended; a despawned
//! row is tombstoned and skipped by every stage, and its id is never reused.

use crate::{
    error::PhysicsError,
    flags::ShapeFlags,
    types::{Aabb, BridgeId, EntityId, Quat, Shape, Vec3},
};

/// All components for one entity, used when appending a row.
#[derive(Clone, Copy, Debug)]
pub struct EntityRow {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub mass: f32,
    pub inertia: f32,
    pub flags: ShapeFlags,
    pub shape: Shape,
    pub aabb: Aabb,
    pub force: Vec3,
    pub bridge: Option<BridgeId>,
}

/// Parallel component arrays.
#[derive(Default, Debug)]
pub struct EntityStore {
    pub positions: Vec<Vec3>,
    pub rotations: Vec<Quat>,
    pub scales: Vec<Vec3>,
    pub velocities: Vec<Vec3>,
    pub angular_velocities: Vec<Vec3>,
    pub masses: Vec<f32>,
    pub inertias: Vec<f32>,
    pub flags: Vec<ShapeFlags>,
    pub shapes: Vec<Shape>,
    pub aabbs: Vec<Aabb>,
    pub forces: Vec<Vec3>,
    /// Scene handle per entity; `None` once despawned.
    pub bridges: Vec<Option<BridgeId>>,
    alive: Vec<bool>,
    live: usize,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            rotations: Vec::with_capacity(capacity),
            scales: Vec::with_capacity(capacity),
            velocities: Vec::with_capacity(capacity),
            angular_velocities: Vec::with_capacity(capacity),
            masses: Vec::with_capacity(capacity),
            inertias: Vec::with_capacity(capacity),
            flags: Vec::with_capacity(capacity),
            shapes: Vec::with_capacity(capacity),
            aabbs: Vec::with_capacity(capacity),
            forces: Vec::with_capacity(capacity),
            bridges: Vec::with_capacity(capacity),
            alive: Vec::with_capacity(capacity),
            live: 0,
        }
    }

    /// Append a row and return its id.
    pub fn push(&mut self, row: EntityRow) -> EntityId {
        let id = EntityId(self.alive.len() as u32);
        self.positions.push(row.position);
        self.rotations.push(row.rotation);
        self.scales.push(row.scale);
        self.velocities.push(row.velocity);
        self.angular_velocities.push(row.angular_velocity);
        self.masses.push(row.mass);
        self.inertias.push(row.inertia);
        self.flags.push(row.flags);
        self.shapes.push(row.shape);
        self.aabbs.push(row.aabb);
        self.forces.push(row.force);
        self.bridges.push(row.bridge);
        self.alive.push(true);
        self.live += 1;
        id
    }

    /// Number of rows ever allocated (including tombstones).
    #[inline]
    pub fn len(&self) -> usize {
        self.alive.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }

    /// Number of rows that have not been despawned.
    #[inline]
    pub fn live_count(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.alive.get(id.index()).copied().unwrap_or(false)
    }

    /// Resolve `id` to a row index, rejecting unknown and despawned ids.
    pub fn row(&self, id: EntityId) -> Result<usize, PhysicsError> {
        match self.alive.get(id.index()) {
            None => Err(PhysicsError::UnknownEntity(id)),
            Some(false) => Err(PhysicsError::Despawned(id)),
            Some(true) => Ok(id.index()),
        }
    }

    /// Mark a row dead. Components stay in place; the row is skipped from now on.
    pub fn tombstone(&mut self, id: EntityId) -> Result<(), PhysicsError> {
        let i = self.row(id)?;
        self.alive[i] = false;
        self.bridges[i] = None;
        self.velocities[i] = Vec3::zeros();
        self.angular_velocities[i] = Vec3::zeros();
        self.forces[i] = Vec3::zeros();
        self.live -= 1;
        Ok(())
    }

    /// Ids of live rows in ascending order.
    pub fn live_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(i, _)| EntityId(i as u32))
    }
}
