//! Per-tick velocity and pose integration for dynamic bodies.
//!
//! Two passes, run in order once per tick and never touching static or
//! despawned rows:
//! 1. [`apply_gravity_and_forces`]: `v.y += g·dt`, `v += F/m·dt`, then `F = 0`.
//! 2. [`integrate_motion`]: `p += v·dt`, `q.xyz += ω·dt`, renormalize `q`.
//!
//! The rotation update adds angular velocity straight onto the quaternion's
//! vector part instead of integrating `½·ω·q`. It is a coarse approximation
//! that keeps the per-axis angular rate model simple; renormalizing every tick
//! keeps the result a valid rotation.
//!
//! Inputs are not validated: NaN forces or velocities propagate.

use crate::{
    flags::ShapeFlag,
    settings::ROTATION_EPS,
    store::EntityStore,
    types::{EntityId, Quat, Vec3},
};

#[inline]
fn is_simulated(store: &EntityStore, i: usize) -> bool {
    store.is_alive(EntityId(i as u32)) && !store.flags[i].is_static()
}

/// Accumulate gravity and the pending external force into velocity, then clear
/// the force. Returns the number of bodies updated.
pub fn apply_gravity_and_forces(store: &mut EntityStore, gravity_y: f32, dt: f32) -> usize {
    let mut updated = 0;
    for i in 0..store.len() {
        if !is_simulated(store, i) {
            continue;
        }
        let v = &mut store.velocities[i];
        v.y += gravity_y * dt;

        let force = store.forces[i];
        if force != Vec3::zeros() {
            *v += force / store.masses[i] * dt;
            store.forces[i] = Vec3::zeros();
        }
        updated += 1;
    }
    updated
}

/// Advance position and orientation from linear and angular velocity.
/// Returns the number of bodies moved.
pub fn integrate_motion(store: &mut EntityStore, dt: f32) -> usize {
    let mut moved = 0;
    for i in 0..store.len() {
        if !is_simulated(store, i) {
            continue;
        }
        store.positions[i] += store.velocities[i] * dt;

        let w = store.angular_velocities[i];
        let q = &mut store.rotations[i];
        q.coords.x += w.x * dt;
        q.coords.y += w.y * dt;
        q.coords.z += w.z * dt;
        renormalize(q);

        store.flags[i].insert(ShapeFlag::Dirty);
        moved += 1;
    }
    moved
}

/// Scale `q` back to unit length. Near-zero quaternions are left as they are.
#[inline]
pub fn renormalize(q: &mut Quat) {
    let n = q.norm();
    if n > ROTATION_EPS {
        q.coords /= n;
    }
}
