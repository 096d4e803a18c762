use crate::{
    settings::SAT_PARALLEL_EPS,
    store::EntityStore,
    types::{CollisionPair, Quat, Shape, UnitQuat, Vec3, unit_rotation},
};

/// An oriented box in world space: center, unit local axes and half-extents.
#[derive(Clone, Copy, Debug)]
pub struct OrientedBox {
    pub center: Vec3,
    pub axes: [Vec3; 3],
    pub half_extents: Vec3,
}

impl OrientedBox {
    pub fn new(center: Vec3, rotation: &UnitQuat, half_extents: Vec3) -> Self {
        Self {
            center,
            axes: [
                rotation * Vec3::x(),
                rotation * Vec3::y(),
                rotation * Vec3::z(),
            ],
            half_extents,
        }
    }

    /// Half-length of this box's projection onto `axis`.
    #[inline]
    fn projected_radius(&self, axis: &Vec3) -> f32 {
        self.half_extents.x * self.axes[0].dot(axis).abs()
            + self.half_extents.y * self.axes[1].dot(axis).abs()
            + self.half_extents.z * self.axes[2].dot(axis).abs()
    }
}

/// Sphere/sphere: center distance at most the sum of radii (touching counts).
#[inline]
pub fn sphere_sphere(center_a: &Vec3, radius_a: f32, center_b: &Vec3, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    (center_b - center_a).norm_squared() <= reach * reach
}

/// Box/sphere: move the sphere center into the box's local frame, clamp it to
/// the half-extents to find the closest point of the box, and compare the
/// squared distance to that point with the squared radius.
pub fn box_sphere(
    box_center: &Vec3,
    box_rotation: &UnitQuat,
    half_extents: &Vec3,
    sphere_center: &Vec3,
    radius: f32,
) -> bool {
    let local = box_rotation.inverse_transform_vector(&(sphere_center - box_center));
    let closest = local.zip_map(half_extents, |v, h| v.clamp(-h, h));
    (local - closest).norm_squared() <= radius * radius
}

/// Box/box via the Separating Axis Theorem over 15 candidate axes: the three
/// face axes of each box and the nine edge cross products.
///
/// Cross products shorter than `parallel_eps` come from (nearly) parallel edges;
/// they carry no new information and are skipped. Returns `true` when no
/// candidate axis separates the boxes. The test is symmetric in its arguments.
pub fn box_box(a: &OrientedBox, b: &OrientedBox, parallel_eps: f32) -> bool {
    let t = b.center - a.center;

    let separated_on = |axis: &Vec3| -> bool {
        let distance = t.dot(axis).abs();
        distance > a.projected_radius(axis) + b.projected_radius(axis)
    };

    // Face axes.
    for axis in a.axes.iter().chain(b.axes.iter()) {
        if separated_on(axis) {
            return false;
        }
    }

    // Edge-edge axes.
    for ea in &a.axes {
        for eb in &b.axes {
            let axis = ea.cross(eb);
            let len = axis.norm();
            if len < parallel_eps {
                continue;
            }
            if separated_on(&(axis / len)) {
                return false;
            }
        }
    }

    true
}

/// Exact overlap test for two posed shapes, dispatched on the shape pair.
pub fn shapes_overlap(
    shape_a: &Shape,
    position_a: &Vec3,
    rotation_a: &Quat,
    shape_b: &Shape,
    position_b: &Vec3,
    rotation_b: &Quat,
) -> bool {
    match (*shape_a, *shape_b) {
        (Shape::Sphere { radius: ra }, Shape::Sphere { radius: rb }) => {
            sphere_sphere(position_a, ra, position_b, rb)
        }
        (Shape::Box { half_extents }, Shape::Sphere { radius }) => box_sphere(
            position_a,
            &unit_rotation(rotation_a),
            &half_extents,
            position_b,
            radius,
        ),
        (Shape::Sphere { radius }, Shape::Box { half_extents }) => box_sphere(
            position_b,
            &unit_rotation(rotation_b),
            &half_extents,
            position_a,
            radius,
        ),
        (Shape::Box { half_extents: ha }, Shape::Box { half_extents: hb }) => {
            let a = OrientedBox::new(*position_a, &unit_rotation(rotation_a), ha);
            let b = OrientedBox::new(*position_b, &unit_rotation(rotation_b), hb);
            box_box(&a, &b, SAT_PARALLEL_EPS)
        }
    }
}

/// Run the exact test on every broad-phase candidate and push confirmed pairs
/// into `out`, preserving candidate order. `out` is cleared first.
pub fn confirm_pairs(
    store: &EntityStore,
    candidates: &[CollisionPair],
    out: &mut Vec<CollisionPair>,
) -> usize {
    out.clear();
    for pair in candidates {
        let (a, b) = (pair.a.index(), pair.b.index());
        let hit = shapes_overlap(
            &store.shapes[a],
            &store.positions[a],
            &store.rotations[a],
            &store.shapes[b],
            &store.positions[b],
            &store.rotations[b],
        );
        log::trace!(
            "narrow phase {pair} key {:#04b}: {}",
            store.flags[a].shape_bits() | store.flags[b].shape_bits(),
            if hit { "contact" } else { "clear" }
        );
        if hit {
            out.push(*pair);
        }
    }
    out.len()
}
