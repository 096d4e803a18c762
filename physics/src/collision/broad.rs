use nalgebra as na;

use crate::{
    flags::ShapeFlag,
    store::EntityStore,
    types::{Aabb, CollisionPair, EntityId, Point3, Quat, Shape, Vec3, unit_rotation},
};

/// Compute the world-space AABB for a shape at the given pose.
///
/// - Sphere: center ± radius on every axis (rotation ignored).
/// - Box: the eight corners of the oriented box, bounded per axis. This is the
///   world-aligned box around the OBB, so it is conservative for rotated boxes.
pub fn compute_aabb(shape: &Shape, position: &Vec3, rotation: &Quat) -> Aabb {
    match *shape {
        Shape::Sphere { radius } => sphere_aabb_world(radius, position),
        Shape::Box { half_extents } => cuboid_aabb_world(half_extents, position, rotation),
    }
}

fn sphere_aabb_world(radius: f32, center: &Vec3) -> Aabb {
    let r = Vec3::repeat(radius);
    Aabb::new(Point3::from(center - r), Point3::from(center + r))
}

fn cuboid_aabb_world(half_extents: Vec3, center: &Vec3, rotation: &Quat) -> Aabb {
    let rot = unit_rotation(rotation);
    let axes = [
        rot * Vec3::new(half_extents.x, 0.0, 0.0),
        rot * Vec3::new(0.0, half_extents.y, 0.0),
        rot * Vec3::new(0.0, 0.0, half_extents.z),
    ];

    let mut mins = Point3::from(Vec3::repeat(f32::INFINITY));
    let mut maxs = Point3::from(Vec3::repeat(f32::NEG_INFINITY));
    for sx in [-1.0f32, 1.0] {
        for sy in [-1.0f32, 1.0] {
            for sz in [-1.0f32, 1.0] {
                let corner = Point3::from(center + axes[0] * sx + axes[1] * sy + axes[2] * sz);
                mins = mins.inf(&corner);
                maxs = maxs.sup(&corner);
            }
        }
    }
    Aabb::new(mins, maxs)
}

/// Recompute the AABB of every live entity from its current pose and clear
/// its dirty bit. Returns the number of boxes refreshed.
pub fn refresh_aabbs(store: &mut EntityStore) -> usize {
    let mut refreshed = 0;
    for i in 0..store.len() {
        if !store.is_alive(EntityId(i as u32)) {
            continue;
        }
        refresh_row(store, i);
        refreshed += 1;
    }
    refreshed
}

/// Recompute the AABB of one entity if its pose changed since the last refresh.
pub fn refresh_if_dirty(store: &mut EntityStore, id: EntityId) {
    let i = id.index();
    if store.flags[i].is_dirty() {
        refresh_row(store, i);
    }
}

fn refresh_row(store: &mut EntityStore, i: usize) {
    store.aabbs[i] = compute_aabb(&store.shapes[i], &store.positions[i], &store.rotations[i]);
    store.flags[i].remove(ShapeFlag::Dirty);
}

/// Test two AABBs for intersection. Inclusive on faces, so touching boxes are
/// reported as candidates.
#[inline]
pub fn aabb_intersects(a: &Aabb, b: &Aabb) -> bool {
    na::partial_le(&a.mins, &b.maxs) && na::partial_ge(&a.maxs, &b.mins)
}

/// Brute-force O(n²) scan over live entities, pushing each overlapping
/// unordered pair `(i, j)` with `i < j` exactly once into `out`.
///
/// `out` is cleared first so the caller can reuse its allocation every tick.
/// Returns the number of candidate pairs.
pub fn collect_candidate_pairs(store: &EntityStore, out: &mut Vec<CollisionPair>) -> usize {
    out.clear();
    for a in store.live_ids() {
        let aabb_a = &store.aabbs[a.index()];
        for j in a.index() + 1..store.len() {
            let b = EntityId(j as u32);
            if store.is_alive(b) && aabb_intersects(aabb_a, &store.aabbs[j]) {
                out.push(CollisionPair::new(a, b));
            }
        }
    }
    out.len()
}
