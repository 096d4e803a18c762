//! Impulse-based contact response.
//!
//! Each confirmed pair gets one instantaneous impulse along the line between
//! centers, a simplified angular kick and a fixed positional push. Pairs are
//! processed in the order narrow-phase produced them, so earlier corrections
//! can move bodies that later pairs see.

use crate::{
    collision::broad::{aabb_intersects, refresh_if_dirty},
    flags::ShapeFlag,
    report::{SkipReason, SkippedPair},
    settings::{NORMAL_EPS, SimulationSettings},
    store::EntityStore,
    types::{CollisionPair, Vec3},
};

/// Resolve every confirmed pair. Skipped pairs are appended to `skipped`.
/// Returns the number of pairs that received an impulse.
pub fn resolve_contacts(
    store: &mut EntityStore,
    contacts: &[CollisionPair],
    settings: &SimulationSettings,
    skipped: &mut Vec<SkippedPair>,
) -> usize {
    let mut resolved = 0;
    for &pair in contacts {
        match resolve_pair(store, pair, settings) {
            Ok(j) => {
                log::trace!("response {pair}: impulse {j:.4}");
                resolved += 1;
            }
            Err(reason) => {
                log::trace!("response {pair}: skipped ({reason})");
                skipped.push(SkippedPair { pair, reason });
            }
        }
    }
    resolved
}

/// Apply the impulse for one pair and return its magnitude.
///
/// Bounds moved by an earlier correction in the same pass are refreshed before
/// the overlap re-check, so a pair narrow-phase confirmed this tick can still be
/// dropped as [`SkipReason::BoundsNoLongerOverlap`].
pub fn resolve_pair(
    store: &mut EntityStore,
    pair: CollisionPair,
    settings: &SimulationSettings,
) -> Result<f32, SkipReason> {
    let (a, b) = (pair.a.index(), pair.b.index());
    let static_a = store.flags[a].is_static();
    let static_b = store.flags[b].is_static();
    if static_a && static_b {
        return Err(SkipReason::BothStatic);
    }

    // A correction earlier in this pass may have separated the pair.
    refresh_if_dirty(store, pair.a);
    refresh_if_dirty(store, pair.b);
    if !aabb_intersects(&store.aabbs[a], &store.aabbs[b]) {
        return Err(SkipReason::BoundsNoLongerOverlap);
    }

    let n = contact_normal(&store.positions[a], &store.positions[b])
        .ok_or(SkipReason::CoincidentCenters)?;

    let v_rel = (store.velocities[b] - store.velocities[a]).dot(&n);
    if v_rel > 0.0 {
        return Err(SkipReason::Separating);
    }

    let inv_a = inverse_mass(store.masses[a], static_a);
    let inv_b = inverse_mass(store.masses[b], static_b);
    let j = -(1.0 + settings.restitution) * v_rel / (inv_a + inv_b);

    if !static_a {
        apply_impulse(store, a, -1.0, j, &n, settings.correction_offset);
    }
    if !static_b {
        apply_impulse(store, b, 1.0, j, &n, settings.correction_offset);
    }
    Ok(j)
}

/// Unit vector from `a` to `b`, or `None` when the centers coincide.
#[inline]
pub fn contact_normal(a: &Vec3, b: &Vec3) -> Option<Vec3> {
    (b - a).try_normalize(NORMAL_EPS)
}

#[inline]
fn inverse_mass(mass: f32, is_static: bool) -> f32 {
    if is_static { 0.0 } else { 1.0 / mass }
}

/// `side` is `-1` for the first body of a pair and `+1` for the second.
fn apply_impulse(store: &mut EntityStore, i: usize, side: f32, j: f32, n: &Vec3, offset: f32) {
    let signed_j = side * j;
    store.velocities[i] += n * (signed_j / store.masses[i]);

    // Only the normal's x component drives the spin, on all three axes.
    let r = store.shapes[i].characteristic_radius();
    let dw = signed_j * r * n.x / store.inertias[i];
    store.angular_velocities[i] += Vec3::repeat(dw);

    store.positions[i] += n * (side * offset);
    store.flags[i].insert(ShapeFlag::Dirty);
}
