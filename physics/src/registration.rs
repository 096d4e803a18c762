//! Turning an external scene object into a fully populated entity row.

use crate::{
    collision::broad::compute_aabb,
    flags::{ShapeFlag, ShapeFlags},
    integrator::renormalize,
    scene::SceneObject,
    settings::{SimulationSettings, moment_of_inertia},
    store::EntityRow,
    types::{Shape, Vec3},
};

/// Build the row for `object`. Never fails: malformed shape dimensions are
/// clamped to zero size.
///
/// - Static bodies get the static mass sentinel; dynamic ones the default mass.
/// - Velocity, angular velocity and force start at zero.
/// - The AABB is computed from the initial pose and the row is marked dirty.
pub fn build_row<O: SceneObject + ?Sized>(
    object: &O,
    is_static: bool,
    settings: &SimulationSettings,
) -> EntityRow {
    let position = object.world_position();
    let mut rotation = object.world_rotation();
    renormalize(&mut rotation);
    let shape = object.collider_shape().sanitized();

    let mass = if is_static {
        settings.static_mass
    } else {
        settings.dynamic_mass
    };

    EntityRow {
        position,
        rotation,
        scale: object.world_scale(),
        velocity: Vec3::zeros(),
        angular_velocity: Vec3::zeros(),
        mass,
        inertia: moment_of_inertia(mass),
        flags: initial_flags(&shape, is_static),
        shape,
        aabb: compute_aabb(&shape, &position, &rotation),
        force: Vec3::zeros(),
        bridge: Some(object.handle()),
    }
}

fn initial_flags(shape: &Shape, is_static: bool) -> ShapeFlags {
    let mut flags = ShapeFlags::default();
    flags.insert(match shape {
        Shape::Box { .. } => ShapeFlag::Box,
        Shape::Sphere { .. } => ShapeFlag::Sphere,
    });
    flags.set(ShapeFlag::Static, is_static);
    flags.insert(ShapeFlag::Dirty);
    flags
}
