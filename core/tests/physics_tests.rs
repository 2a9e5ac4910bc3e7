//! Whole-pipeline scenarios exercising the full step loop: broad-phase,
//! narrow-phase, solver and sleep bookkeeping together.

use glam::Vec3;
use talus3d_core::physics::body::{Body, BodyDef, BodyType};
use talus3d_core::physics::bvh::{Bvh, BvhPrimitive, BvhSplitMode};
use talus3d_core::physics::gjk::gjk;
use talus3d_core::physics::shapes::Shape;
use talus3d_core::physics::world::{BodyHandle, PhysicsWorld, WorldDef};
use talus3d_core::physics::aabb::{Aabb, Ray};

fn dynamic_idx(handle: BodyHandle) -> usize {
    match handle {
        BodyHandle::Dynamic(i) => i,
        BodyHandle::Static(_) => panic!("expected a dynamic body handle"),
    }
}

// --- Scenario 1: sphere on ground -----------------------------------------

#[test]
fn sphere_on_ground_settles_and_sleeps() {
    let mut world = PhysicsWorld::new(WorldDef::default().with_iters(4));
    let shape = world.add_shape(Shape::sphere(0.5));
    let handle = world
        .create_body(BodyDef {
            body_type: BodyType::Dynamic,
            pos: Vec3::new(0.0, 0.0, 10.0),
            friction: 0.2,
            restitution: 0.2,
            shapes: vec![shape],
            ..Default::default()
        })
        .unwrap();
    let idx = dynamic_idx(handle);

    let dt = 1.0 / 60.0;
    for _ in 0..(3.0 / dt) as u32 {
        world.step(dt);
    }

    let pos = world.dynamic_bodies[idx].pos;
    let vel = world.dynamic_bodies[idx].dynamics.as_ref().unwrap().vel;
    assert!((0.4..=0.6).contains(&pos.z), "expected height in [0.4, 0.6], got {}", pos.z);
    assert!(vel.length() < 0.2, "expected small velocity, got {}", vel.length());

    for _ in 0..(3.0 / dt) as u32 {
        world.step(dt);
    }
    assert!(!world.dynamic_bodies[idx].is_awake(), "sphere should be asleep by 6s");
}

// --- Scenario 2: stacked boxes ----------------------------------------------

#[test]
fn stacked_boxes_remain_stable() {
    let mut world = PhysicsWorld::new(WorldDef::default().with_iters(4));
    let shape = world.add_shape(Shape::cuboid(Vec3::splat(0.5)));

    let centers = [
        Vec3::new(0.0, 0.0, 0.5),
        Vec3::new(0.0, 0.0, 1.6),
        Vec3::new(0.0, 0.0, 2.7),
    ];
    let handles: Vec<BodyHandle> = centers
        .iter()
        .map(|&pos| {
            world
                .create_body(BodyDef {
                    body_type: BodyType::Dynamic,
                    pos,
                    shapes: vec![shape],
                    ..Default::default()
                })
                .unwrap()
        })
        .collect();

    let dt = 1.0 / 60.0;
    for _ in 0..(2.0 / dt) as u32 {
        world.step(dt);
    }

    let bottom = dynamic_idx(handles[0]);
    let bottom_z = world.dynamic_bodies[bottom].pos.z;
    assert!((0.49..=0.52).contains(&bottom_z), "bottom cube drifted to z={bottom_z}");

    let total_momentum: Vec3 = handles
        .iter()
        .map(|&h| {
            let i = dynamic_idx(h);
            let d = world.dynamic_bodies[i].dynamics.as_ref().unwrap();
            d.vel * d.mass
        })
        .sum();
    assert!(total_momentum.length() < 0.1, "momentum did not settle: {total_momentum:?}");
}

// --- Scenario 3: sphere-sphere head-on --------------------------------------

#[test]
fn sphere_sphere_head_on_reverses_velocity() {
    let mut world = PhysicsWorld::new(WorldDef::default().with_gravity(Vec3::ZERO).with_iters(4));
    let shape = world.add_shape(Shape::sphere(1.0));

    let a = world
        .create_body(BodyDef {
            body_type: BodyType::Dynamic,
            pos: Vec3::new(-2.0, 0.0, 5.0),
            vel: Vec3::new(1.0, 0.0, 0.0),
            restitution: 1.0,
            friction: 0.0,
            shapes: vec![shape],
            ..Default::default()
        })
        .unwrap();
    let b = world
        .create_body(BodyDef {
            body_type: BodyType::Dynamic,
            pos: Vec3::new(2.0, 0.0, 5.0),
            vel: Vec3::new(-1.0, 0.0, 0.0),
            restitution: 1.0,
            friction: 0.0,
            shapes: vec![shape],
            ..Default::default()
        })
        .unwrap();
    let (ia, ib) = (dynamic_idx(a), dynamic_idx(b));

    let dt = 1.0 / 120.0;
    let mut reversed = false;
    for _ in 0..600 {
        world.step(dt);
        let va = world.dynamic_bodies[ia].dynamics.as_ref().unwrap().vel.x;
        let vb = world.dynamic_bodies[ib].dynamics.as_ref().unwrap().vel.x;
        if va < -1e-3 && vb > 1e-3 {
            reversed = true;
            break;
        }
    }
    assert!(reversed, "velocities did not reverse after head-on contact");
}

// --- Scenario 4: BVH build/query --------------------------------------------

#[test]
fn bvh_query_finds_stable_grid_index() {
    struct Sphere {
        center: Vec3,
    }
    impl BvhPrimitive for Sphere {
        fn aabb(&self) -> Aabb {
            Aabb {
                min: self.center - Vec3::splat(0.5),
                max: self.center + Vec3::splat(0.5),
            }
        }
    }

    let spheres: Vec<Sphere> = (0..10).map(|i| Sphere { center: Vec3::splat(i as f32) }).collect();

    let bvh = Bvh::build(spheres, BvhSplitMode::Midpoint);
    let query = Aabb { min: Vec3::new(2.1, 2.1, 2.1), max: Vec3::new(3.9, 3.9, 3.9) };
    assert_eq!(bvh.query(&query), vec![3]);
}

// --- Scenario 5: ray through a box -------------------------------------------

#[test]
fn ray_through_static_box_hits_expected_distance() {
    let shape = Shape::cuboid(Vec3::splat(0.5));
    let ray = Ray::new(Vec3::new(-5.0, 0.1, 0.2), Vec3::new(1.0, 0.0, 0.0));
    let t = shape.ray_cast(&ray).expect("ray should hit the box");
    assert!((t - 4.5).abs() < 1e-4, "expected t≈4.5, got {t}");
}

// --- Scenario 6: GJK disjoint shapes -----------------------------------------

#[test]
fn gjk_reports_disjoint_boxes_as_no_contact() {
    let shapes = vec![Shape::cuboid(Vec3::splat(0.5))];
    let a = Body::new(BodyDef {
        body_type: BodyType::Dynamic,
        pos: Vec3::new(-5.0, 0.0, 0.0),
        shapes: vec![0],
        ..Default::default()
    })
    .unwrap();
    let b = Body::new(BodyDef {
        body_type: BodyType::Dynamic,
        pos: Vec3::new(5.0, 0.0, 0.0),
        shapes: vec![0],
        ..Default::default()
    })
    .unwrap();

    assert!(gjk(&a, &b, &shapes, Vec3::X).is_none());
}

// --- Invariants --------------------------------------------------------------

#[test]
fn sleeping_body_has_zero_velocity_and_enough_still_frames() {
    let mut world = PhysicsWorld::new(WorldDef::default().with_iters(4));
    let shape = world.add_shape(Shape::sphere(0.5));
    let handle = world
        .create_body(BodyDef {
            body_type: BodyType::Dynamic,
            pos: Vec3::new(0.0, 0.0, 2.0),
            shapes: vec![shape],
            ..Default::default()
        })
        .unwrap();
    let idx = dynamic_idx(handle);

    let dt = 1.0 / 60.0;
    for _ in 0..600 {
        world.step(dt);
    }

    let body = &world.dynamic_bodies[idx];
    assert!(!body.is_awake());
    let d = body.dynamics.as_ref().unwrap();
    assert_eq!(d.vel, Vec3::ZERO);
    assert_eq!(d.angular_vel, Vec3::ZERO);
    assert!(d.still_frames >= 80);
}

#[test]
fn dynamic_body_orientation_stays_unit_length() {
    let mut world = PhysicsWorld::new(WorldDef::default().with_iters(4));
    let shape = world.add_shape(Shape::cuboid(Vec3::splat(0.5)));
    let handle = world
        .create_body(BodyDef {
            body_type: BodyType::Dynamic,
            pos: Vec3::new(0.0, 0.0, 5.0),
            angular_vel: Vec3::new(3.0, 1.5, 0.7),
            shapes: vec![shape],
            ..Default::default()
        })
        .unwrap();
    let idx = dynamic_idx(handle);

    let dt = 1.0 / 60.0;
    for _ in 0..300 {
        world.step(dt);
        let q = world.dynamic_bodies[idx].orientation;
        assert!((q.length() - 1.0).abs() < 1e-5, "orientation drifted off unit length: {q:?}");
    }
}

#[test]
fn world_aabb_contains_shape_aabb() {
    let mut world = PhysicsWorld::new(WorldDef::default());
    let shape = Shape::sphere(0.5);
    let shape_handle = world.add_shape(shape.clone());
    let handle = world
        .create_body(BodyDef {
            body_type: BodyType::Dynamic,
            pos: Vec3::new(1.0, 2.0, 3.0),
            shapes: vec![shape_handle],
            ..Default::default()
        })
        .unwrap();
    let idx = dynamic_idx(handle);

    let body = &world.dynamic_bodies[idx];
    let shape_aabb = shape.world_aabb(body.pos, body.orientation);
    assert!(body.aabb.contains_point(shape_aabb.min));
    assert!(body.aabb.contains_point(shape_aabb.max));
}
