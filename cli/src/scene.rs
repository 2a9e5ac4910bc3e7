//! Scene description format consumed by the `simulate` subcommand: a small
//! JSON document listing bodies to create before stepping the world. This
//! format lives entirely outside talus3d-core — the engine itself has no
//! config-file format of its own, only the `BodyDef`/`WorldDef` builders.

use anyhow::{Context, Result};
use glam::{Quat, Vec3};
use serde::Deserialize;
use talus3d_core::physics::body::{BodyDef, BodyType};
use talus3d_core::physics::shapes::Shape;
use talus3d_core::physics::world::{PhysicsWorld, WorldDef};

#[derive(Debug, Deserialize)]
pub struct SceneDef {
    #[serde(default = "default_gravity")]
    pub gravity: [f32; 3],
    #[serde(default = "default_iters")]
    pub iters: u32,
    #[serde(default = "default_dt")]
    pub dt: f32,
    #[serde(default = "default_steps")]
    pub steps: u32,
    pub bodies: Vec<SceneBody>,
}

fn default_gravity() -> [f32; 3] {
    [0.0, 0.0, -9.8]
}

fn default_iters() -> u32 {
    4
}

fn default_dt() -> f32 {
    1.0 / 60.0
}

fn default_steps() -> u32 {
    180
}

#[derive(Debug, Default, Deserialize, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum SceneBodyType {
    #[default]
    Dynamic,
    Static,
}

#[derive(Debug, Deserialize)]
pub struct SceneBody {
    #[serde(default)]
    pub body_type: SceneBodyType,
    pub shape: SceneShape,
    #[serde(default)]
    pub pos: [f32; 3],
    #[serde(default)]
    pub vel: [f32; 3],
    pub friction: Option<f32>,
    pub restitution: Option<f32>,
    pub density: Option<f32>,
    #[serde(default)]
    pub is_sensor: bool,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneShape {
    Sphere { radius: f32 },
    Cuboid { half_extents: [f32; 3] },
    Cylinder { radius: f32, half_height: f32 },
    Capsule { radius: f32, half_height: f32 },
}

impl SceneShape {
    fn build(&self) -> Shape {
        match *self {
            SceneShape::Sphere { radius } => Shape::sphere(radius),
            SceneShape::Cuboid { half_extents } => Shape::cuboid(Vec3::from(half_extents)),
            SceneShape::Cylinder { radius, half_height } => Shape::cylinder(radius, half_height),
            SceneShape::Capsule { radius, half_height } => Shape::capsule(radius, half_height),
        }
    }
}

/// Builds a `PhysicsWorld` from a parsed scene description, creating every
/// listed body and rebuilding the static BVH if any static bodies exist.
pub fn build_world(scene: &SceneDef) -> Result<PhysicsWorld> {
    let def = WorldDef::default().with_gravity(Vec3::from(scene.gravity)).with_iters(scene.iters);
    let mut world = PhysicsWorld::new(def);

    for body in &scene.bodies {
        let shape_handle = world.add_shape(body.shape.build());
        let mut body_def = BodyDef {
            body_type: match body.body_type {
                SceneBodyType::Dynamic => BodyType::Dynamic,
                SceneBodyType::Static => BodyType::Static,
            },
            pos: Vec3::from(body.pos),
            vel: Vec3::from(body.vel),
            orientation: Quat::IDENTITY,
            shapes: vec![shape_handle],
            is_sensor: body.is_sensor,
            ..Default::default()
        };
        if let Some(friction) = body.friction {
            body_def.friction = friction;
        }
        if let Some(restitution) = body.restitution {
            body_def.restitution = restitution;
        }
        if let Some(density) = body.density {
            body_def.density = density;
        }
        world.create_body(body_def).context("failed to create body from scene")?;
    }

    if !world.static_bodies.is_empty() {
        world.build_bvh();
    }

    Ok(world)
}
