//! End-to-end scenarios driven through the public world API.

use std::collections::HashMap;
use std::f32::consts::FRAC_PI_4;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use nalgebra::UnitQuaternion;
use physics::{
    BridgeId, CollisionPair, PhysicsWorld, Quat, SceneObject, SceneSink, Shape,
    SimulationSettings, SyncError, SyncTransform, Vec3,
};

/// Minimal scene node used for registration.
struct Node {
    handle: BridgeId,
    position: Vec3,
    rotation: Quat,
    shape: Shape,
}

impl Node {
    fn sphere(handle: BridgeId, position: Vec3, radius: f32) -> Self {
        Self {
            handle,
            position,
            rotation: Quat::identity(),
            shape: Shape::sphere(radius),
        }
    }

    fn cube(handle: BridgeId, position: Vec3, half_extents: Vec3) -> Self {
        Self {
            handle,
            position,
            rotation: Quat::identity(),
            shape: Shape::Box { half_extents },
        }
    }

    fn rotated(mut self, rotation: UnitQuaternion<f32>) -> Self {
        self.rotation = *rotation.quaternion();
        self
    }
}

impl SceneObject for Node {
    fn world_position(&self) -> Vec3 {
        self.position
    }
    fn world_rotation(&self) -> Quat {
        self.rotation
    }
    fn world_scale(&self) -> Vec3 {
        Vec3::repeat(1.0)
    }
    fn collider_shape(&self) -> Shape {
        self.shape
    }
    fn handle(&self) -> BridgeId {
        self.handle
    }
}

/// In-memory scene: handles present in `nodes` accept transforms, removed
/// handles report `MissingHandle`, and handles in `locked` reject updates.
#[derive(Default)]
struct MemoryScene {
    nodes: HashMap<BridgeId, Option<SyncTransform>>,
    locked: Vec<BridgeId>,
}

impl MemoryScene {
    fn with_handles(handles: &[BridgeId]) -> Self {
        Self {
            nodes: handles.iter().map(|h| (*h, None)).collect(),
            locked: Vec::new(),
        }
    }

    fn pose(&self, handle: BridgeId) -> Option<SyncTransform> {
        self.nodes.get(&handle).copied().flatten()
    }
}

impl SceneSink for MemoryScene {
    fn push_transform(
        &mut self,
        handle: BridgeId,
        transform: SyncTransform,
    ) -> Result<(), SyncError> {
        if self.locked.contains(&handle) {
            return Err(SyncError::Rejected {
                handle,
                reason: "node is locked".into(),
            });
        }
        match self.nodes.get_mut(&handle) {
            Some(slot) => {
                *slot = Some(transform);
                Ok(())
            }
            None => Err(SyncError::MissingHandle(handle)),
        }
    }
}

fn weightless() -> PhysicsWorld {
    PhysicsWorld::new(SimulationSettings::default().with_gravity(0.0)).unwrap()
}

#[test]
fn overlapping_spheres_collide() {
    let mut world = weightless();
    let a = world.register(&Node::sphere(1, Vec3::zeros(), 1.0), false);
    let b = world.register(&Node::sphere(2, Vec3::new(1.5, 0.0, 0.0), 1.0), false);

    let report = world.tick(0.0).unwrap();

    assert_eq!(report.contacts, 1);
    assert_eq!(world.contacts(), &[CollisionPair::new(a, b)]);
}

#[test]
fn distant_spheres_do_not_collide() {
    let mut world = weightless();
    world.register(&Node::sphere(1, Vec3::zeros(), 1.0), false);
    world.register(&Node::sphere(2, Vec3::new(3.0, 0.0, 0.0), 1.0), false);

    let report = world.tick(0.0).unwrap();

    assert_eq!(report.candidates, 0);
    assert_eq!(report.contacts, 0);
    assert!(world.contacts().is_empty());
}

#[test]
fn sphere_landing_on_static_box_bounces_up() {
    let mut world = weightless();
    let ground = world.register(
        &Node::cube(1, Vec3::zeros(), Vec3::new(5.0, 0.5, 5.0)),
        true,
    );
    let ball = world.register(&Node::sphere(2, Vec3::new(0.0, 1.4, 0.0), 1.0), false);
    world.set_velocity(ball, Vec3::new(0.0, -1.0, 0.0)).unwrap();

    // dt = 0 isolates a single response pass.
    let report = world.tick(0.0).unwrap();

    assert_eq!(report.resolved, 1);
    assert!(world.velocity(ball).unwrap().y >= 0.0);
    assert_abs_diff_eq!(world.velocity(ball).unwrap().y, 0.8, epsilon = 1.0e-5);
    assert_abs_diff_eq!(world.position(ball).unwrap().y, 1.5, epsilon = 1.0e-6);
    assert_eq!(world.position(ground).unwrap(), Vec3::zeros());
}

#[test]
fn sphere_resting_exactly_on_box_top_bounces_up() {
    let mut world = weightless();
    let ground = world.register(
        &Node::cube(1, Vec3::zeros(), Vec3::new(5.0, 0.5, 5.0)),
        true,
    );
    // Sphere bottom sits on the top face: bounds only touch.
    let ball = world.register(&Node::sphere(2, Vec3::new(0.0, 1.5, 0.0), 1.0), false);
    world.set_velocity(ball, Vec3::new(0.0, -1.0, 0.0)).unwrap();

    let report = world.tick(0.0).unwrap();

    assert_eq!(report.candidates, 1);
    assert_eq!(report.contacts, 1);
    assert_eq!(report.resolved, 1);
    assert!(world.velocity(ball).unwrap().y >= 0.0);
    assert_abs_diff_eq!(world.velocity(ball).unwrap().y, 0.8, epsilon = 1.0e-5);
    assert_abs_diff_eq!(world.position(ball).unwrap().y, 1.6, epsilon = 1.0e-6);
    assert_eq!(world.position(ground).unwrap(), Vec3::zeros());
    assert_eq!(world.velocity(ground).unwrap(), Vec3::zeros());
}

#[test]
fn rotated_box_beside_cube_is_a_broad_phase_false_positive() {
    let mut world = weightless();
    world.register(&Node::cube(1, Vec3::zeros(), Vec3::repeat(1.0)), false);
    world.register(
        &Node::cube(2, Vec3::new(2.2, 2.2, 0.0), Vec3::repeat(1.0))
            .rotated(UnitQuaternion::from_axis_angle(&Vec3::z_axis(), FRAC_PI_4)),
        false,
    );

    let report = world.tick(0.0).unwrap();

    assert_eq!(report.candidates, 1);
    assert_eq!(report.contacts, 0);
}

#[test]
fn one_second_of_free_fall() {
    let mut world = PhysicsWorld::default();
    let anchor = world.register(&Node::cube(1, Vec3::zeros(), Vec3::repeat(1.0)), true);
    let rock = world.register(&Node::sphere(2, Vec3::new(50.0, 100.0, 0.0), 1.0), false);
    let before = (
        world.position(anchor).unwrap(),
        world.rotation(anchor).unwrap(),
        world.velocity(anchor).unwrap(),
        world.angular_velocity(anchor).unwrap(),
    );

    for _ in 0..60 {
        world.tick(1.0 / 60.0).unwrap();
    }

    assert_relative_eq!(world.velocity(rock).unwrap().y, -9.8, epsilon = 1.0e-3);
    assert_eq!(world.position(anchor).unwrap(), before.0);
    assert_eq!(world.rotation(anchor).unwrap(), before.1);
    assert_eq!(world.velocity(anchor).unwrap(), before.2);
    assert_eq!(world.angular_velocity(anchor).unwrap(), before.3);
    assert_eq!(world.tick_count(), 60);
}

#[test]
fn resting_sphere_never_sinks_through_the_floor() {
    let mut world = PhysicsWorld::default();
    world.register(
        &Node::cube(1, Vec3::zeros(), Vec3::new(5.0, 0.5, 5.0)),
        true,
    );
    let ball = world.register(&Node::sphere(2, Vec3::new(0.0, 3.0, 0.0), 1.0), false);

    for _ in 0..300 {
        world.tick(1.0 / 60.0).unwrap();
        let y = world.position(ball).unwrap().y;
        assert!(y.is_finite());
        assert!(y > 1.0, "ball sank to {y}");
    }
}

#[test]
fn rotation_stays_normalized_while_tumbling() {
    let mut world = weightless();
    let id = world.register(&Node::cube(1, Vec3::zeros(), Vec3::new(1.0, 0.5, 0.25)), false);
    world.set_angular_velocity(id, Vec3::new(2.0, -5.0, 9.0)).unwrap();

    for _ in 0..240 {
        world.tick(1.0 / 60.0).unwrap();
        assert_abs_diff_eq!(world.rotation(id).unwrap().norm(), 1.0, epsilon = 1.0e-5);
    }
}

#[test]
fn contact_order_follows_registration_order() {
    let mut world = weightless();
    let ids: Vec<_> = [0.0, 0.5, 1.0]
        .iter()
        .enumerate()
        .map(|(n, x)| world.register(&Node::sphere(n as u64, Vec3::new(*x, 0.0, 0.0), 1.0), true))
        .collect();

    let report = world.tick(0.0).unwrap();

    // All static: confirmed but never resolved.
    assert_eq!(
        world.contacts(),
        &[
            CollisionPair::new(ids[0], ids[1]),
            CollisionPair::new(ids[0], ids[2]),
            CollisionPair::new(ids[1], ids[2]),
        ]
    );
    assert_eq!(report.resolved, 0);
    assert_eq!(report.skipped.len(), 3);
    assert!(!report.is_degraded());
}

#[test]
fn sync_pushes_poses_and_skips_missing_handles() {
    let mut world = PhysicsWorld::default();
    let kept = world.register(&Node::sphere(10, Vec3::new(0.0, 5.0, 0.0), 0.5), false);
    let orphan = world.register(&Node::sphere(11, Vec3::new(10.0, 5.0, 0.0), 0.5), false);
    let mut scene = MemoryScene::with_handles(&[10]);

    let (_, sync) = world.step(1.0 / 60.0, &mut scene).unwrap();

    assert_eq!(sync.pushed, 1);
    assert_eq!(sync.skipped, vec![(orphan, SyncError::MissingHandle(11))]);
    let pose = scene.pose(10).unwrap();
    assert_eq!(pose.position, world.position(kept).unwrap());
    assert_eq!(pose.scale, Vec3::repeat(1.0));

    // The orphan keeps simulating.
    let y = world.position(orphan).unwrap().y;
    world.tick(1.0 / 60.0).unwrap();
    assert!(world.position(orphan).unwrap().y < y);
}

#[test]
fn rejected_transforms_are_reported_per_entity() {
    let mut world = PhysicsWorld::default();
    let a = world.register(&Node::sphere(1, Vec3::zeros(), 0.5), false);
    world.register(&Node::sphere(2, Vec3::new(4.0, 0.0, 0.0), 0.5), false);
    let mut scene = MemoryScene::with_handles(&[1, 2]);
    scene.locked.push(1);

    let sync = world.sync(&mut scene);

    assert_eq!(sync.pushed, 1);
    assert!(sync.is_degraded());
    assert_eq!(sync.skipped[0].0, a);
    assert!(matches!(sync.skipped[0].1, SyncError::Rejected { handle: 1, .. }));
    assert!(scene.pose(1).is_none());
}

#[test]
fn rejected_tick_syncs_nothing() {
    let mut world = PhysicsWorld::default();
    world.register(&Node::sphere(1, Vec3::zeros(), 0.5), false);
    let mut scene = MemoryScene::with_handles(&[1]);

    assert!(world.step(-1.0, &mut scene).is_err());
    assert!(scene.pose(1).is_none());
}
