//! The host-facing simulation object.
//!
//! A [`PhysicsWorld`] owns every piece of simulation state: the entity store,
//! the entity → scene-handle mapping (stored per row), the settings, the tick
//! counter and the pair buffers reused by the collision stages. There are no
//! globals; dropping the world drops everything.
//!
//! Host flow per frame:
//! 1. [`PhysicsWorld::register`] new scene objects (any time).
//! 2. [`PhysicsWorld::tick`] once with the frame's `dt`.
//! 3. [`PhysicsWorld::sync`] to push poses back into the scene.
//!
//! [`PhysicsWorld::step`] does 2 and 3 together.

use log::{debug, info, trace, warn};

use crate::{
    collision::{
        broad::{collect_candidate_pairs, refresh_aabbs},
        narrow_phase::confirm_pairs,
        response::resolve_contacts,
    },
    error::{PhysicsError, SyncError},
    flags::{ShapeFlag, ShapeFlags},
    integrator::{apply_gravity_and_forces, integrate_motion, renormalize},
    registration::build_row,
    report::{SyncReport, TickReport},
    scene::{SceneObject, SceneSink},
    settings::SimulationSettings,
    stopwatch::StageStopwatch,
    store::EntityStore,
    types::{Aabb, BridgeId, CollisionPair, EntityId, Quat, Shape, SyncTransform, Vec3},
};

#[derive(Debug)]
pub struct PhysicsWorld {
    store: EntityStore,
    settings: SimulationSettings,
    tick: u64,
    /// Broad-phase output, cleared and refilled every tick.
    candidates: Vec<CollisionPair>,
    /// Narrow-phase output of the last tick.
    contacts: Vec<CollisionPair>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::with_valid_settings(SimulationSettings::default(), 0)
    }
}

impl PhysicsWorld {
    /// Create an empty world. Fails if `settings` do not validate.
    pub fn new(settings: SimulationSettings) -> Result<Self, PhysicsError> {
        Self::with_capacity(settings, 0)
    }

    /// Like [`PhysicsWorld::new`], with room for `capacity` entities before the
    /// store reallocates.
    pub fn with_capacity(
        settings: SimulationSettings,
        capacity: usize,
    ) -> Result<Self, PhysicsError> {
        settings.validate()?;
        Ok(Self::with_valid_settings(settings, capacity))
    }

    fn with_valid_settings(settings: SimulationSettings, capacity: usize) -> Self {
        info!(
            "physics world created: gravity {} restitution {} correction {}",
            settings.gravity_y, settings.restitution, settings.correction_offset
        );
        Self {
            store: EntityStore::with_capacity(capacity),
            settings,
            tick: 0,
            candidates: Vec::new(),
            contacts: Vec::new(),
        }
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    /// Ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Rows ever allocated, including despawned ones.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.store.live_count()
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.store.is_alive(id)
    }

    /// Pairs confirmed by narrow-phase during the last tick, in scan order.
    pub fn contacts(&self) -> &[CollisionPair] {
        &self.contacts
    }

    // ---------------------------------------------------------------------
    // Entity lifecycle
    // ---------------------------------------------------------------------

    /// Mirror `object` as a new entity and return its id.
    pub fn register<O: SceneObject + ?Sized>(&mut self, object: &O, is_static: bool) -> EntityId {
        let row = build_row(object, is_static, &self.settings);
        let id = self.store.push(row);
        trace!(
            "registered {id} -> handle {} ({:?}, static: {is_static})",
            object.handle(),
            row.shape
        );
        id
    }

    /// Remove an entity from simulation and sync. Its id is never reused.
    pub fn despawn(&mut self, id: EntityId) -> Result<(), PhysicsError> {
        self.store.tombstone(id)?;
        debug!("despawned {id}");
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Host-driven state changes
    // ---------------------------------------------------------------------

    /// Add to the force applied on the next tick. Ignored for static bodies.
    pub fn apply_force(&mut self, id: EntityId, force: Vec3) -> Result<(), PhysicsError> {
        if let Some(i) = self.dynamic_row(id, "force")? {
            self.store.forces[i] += force;
        }
        Ok(())
    }

    /// Ignored for static bodies.
    pub fn set_velocity(&mut self, id: EntityId, velocity: Vec3) -> Result<(), PhysicsError> {
        if let Some(i) = self.dynamic_row(id, "velocity")? {
            self.store.velocities[i] = velocity;
        }
        Ok(())
    }

    /// Ignored for static bodies.
    pub fn set_angular_velocity(
        &mut self,
        id: EntityId,
        angular_velocity: Vec3,
    ) -> Result<(), PhysicsError> {
        if let Some(i) = self.dynamic_row(id, "angular velocity")? {
            self.store.angular_velocities[i] = angular_velocity;
        }
        Ok(())
    }

    /// Move an entity (static or not) to a new pose without touching its
    /// velocities. The AABB is refreshed on the next tick.
    pub fn teleport(
        &mut self,
        id: EntityId,
        position: Vec3,
        rotation: Quat,
    ) -> Result<(), PhysicsError> {
        let i = self.store.row(id)?;
        let mut rotation = rotation;
        renormalize(&mut rotation);
        self.store.positions[i] = position;
        self.store.rotations[i] = rotation;
        self.store.flags[i].insert(ShapeFlag::Dirty);
        Ok(())
    }

    fn dynamic_row(&self, id: EntityId, what: &str) -> Result<Option<usize>, PhysicsError> {
        let i = self.store.row(id)?;
        if self.store.flags[i].is_static() {
            trace!("ignoring {what} on static {id}");
            return Ok(None);
        }
        Ok(Some(i))
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub fn position(&self, id: EntityId) -> Result<Vec3, PhysicsError> {
        Ok(self.store.positions[self.store.row(id)?])
    }

    pub fn rotation(&self, id: EntityId) -> Result<Quat, PhysicsError> {
        Ok(self.store.rotations[self.store.row(id)?])
    }

    pub fn scale(&self, id: EntityId) -> Result<Vec3, PhysicsError> {
        Ok(self.store.scales[self.store.row(id)?])
    }

    pub fn velocity(&self, id: EntityId) -> Result<Vec3, PhysicsError> {
        Ok(self.store.velocities[self.store.row(id)?])
    }

    pub fn angular_velocity(&self, id: EntityId) -> Result<Vec3, PhysicsError> {
        Ok(self.store.angular_velocities[self.store.row(id)?])
    }

    pub fn mass(&self, id: EntityId) -> Result<f32, PhysicsError> {
        Ok(self.store.masses[self.store.row(id)?])
    }

    /// Bounds as of the last refresh. Stale while the entity is dirty.
    pub fn aabb(&self, id: EntityId) -> Result<Aabb, PhysicsError> {
        Ok(self.store.aabbs[self.store.row(id)?])
    }

    pub fn shape(&self, id: EntityId) -> Result<Shape, PhysicsError> {
        Ok(self.store.shapes[self.store.row(id)?])
    }

    pub fn flags(&self, id: EntityId) -> Result<ShapeFlags, PhysicsError> {
        Ok(self.store.flags[self.store.row(id)?])
    }

    pub fn is_static(&self, id: EntityId) -> Result<bool, PhysicsError> {
        Ok(self.store.flags[self.store.row(id)?].is_static())
    }

    pub fn handle(&self, id: EntityId) -> Result<Option<BridgeId>, PhysicsError> {
        Ok(self.store.bridges[self.store.row(id)?])
    }

    // ---------------------------------------------------------------------
    // Per-frame driving
    // ---------------------------------------------------------------------

    /// Advance the simulation by `dt` seconds.
    ///
    /// Stages run in a fixed order: gravity and forces, motion, AABB refresh,
    /// broad-phase, narrow-phase, response. A non-finite or negative `dt` is
    /// rejected before anything changes; `dt == 0` runs collision only.
    pub fn tick(&mut self, dt: f32) -> Result<TickReport, PhysicsError> {
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(PhysicsError::InvalidTimestep(dt));
        }
        self.tick += 1;

        let mut sw = StageStopwatch::new("tick", self.settings.should_sample_timings(self.tick));
        let mut report = TickReport {
            tick: self.tick,
            ..TickReport::default()
        };

        sw.span("integrate");
        apply_gravity_and_forces(&mut self.store, self.settings.gravity_y, dt);
        report.integrated = integrate_motion(&mut self.store, dt);

        sw.span("broad_phase");
        refresh_aabbs(&mut self.store);
        report.candidates = collect_candidate_pairs(&self.store, &mut self.candidates);

        sw.span("narrow_phase");
        report.contacts = confirm_pairs(&self.store, &self.candidates, &mut self.contacts);

        sw.span("response");
        report.resolved = resolve_contacts(
            &mut self.store,
            &self.contacts,
            &self.settings,
            &mut report.skipped,
        );
        sw.end_span();

        debug!(
            "tick {}: integrated {} candidates {} contacts {} resolved {} skipped {}{}",
            report.tick,
            report.integrated,
            report.candidates,
            report.contacts,
            report.resolved,
            report.skipped.len(),
            if report.is_degraded() { " (degraded)" } else { "" }
        );
        Ok(report)
    }

    /// Push the pose of every live, linked entity into `scene`.
    ///
    /// A failed push skips only that entity; it keeps simulating.
    pub fn sync<S: SceneSink + ?Sized>(&self, scene: &mut S) -> SyncReport {
        let mut report = SyncReport::default();
        for id in self.store.live_ids() {
            let i = id.index();
            let Some(handle) = self.store.bridges[i] else {
                continue;
            };
            let transform = SyncTransform {
                position: self.store.positions[i],
                rotation: self.store.rotations[i],
                scale: self.store.scales[i],
            };
            match scene.push_transform(handle, transform) {
                Ok(()) => report.pushed += 1,
                Err(err) => {
                    if matches!(err, SyncError::MissingHandle(_)) {
                        debug!("sync skipped {id}: {err}");
                    } else {
                        warn!("sync failed for {id}: {err}");
                    }
                    report.skipped.push((id, err));
                }
            }
        }
        report
    }

    /// `tick(dt)` followed by `sync(scene)`. Nothing is synced if the tick is
    /// rejected.
    pub fn step<S: SceneSink + ?Sized>(
        &mut self,
        dt: f32,
        scene: &mut S,
    ) -> Result<(TickReport, SyncReport), PhysicsError> {
        let tick = self.tick(dt)?;
        let sync = self.sync(scene);
        Ok((tick, sync))
    }
}
