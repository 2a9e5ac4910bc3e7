use std::fs;

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use crate::scene::{build_world, SceneDef};

#[derive(Serialize)]
struct BodyPose {
    index: usize,
    pos: [f32; 3],
    orientation: [f32; 4],
    awake: bool,
}

pub fn run(scene_path: &str, steps_override: Option<u32>, dt_override: Option<f32>) -> Result<()> {
    let raw = fs::read_to_string(scene_path)
        .with_context(|| format!("failed to read scene file {scene_path}"))?;
    let scene: SceneDef = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse scene file {scene_path}"))?;

    let steps = steps_override.unwrap_or(scene.steps);
    let dt = dt_override.unwrap_or(scene.dt);

    let mut world = build_world(&scene)?;
    info!(
        "simulating {} dynamic / {} static bodies for {steps} steps at dt={dt}",
        world.dynamic_bodies.len(),
        world.static_bodies.len()
    );

    for _ in 0..steps {
        world.step(dt);
    }

    for (index, body) in world.dynamic_bodies.iter().enumerate() {
        let pose = BodyPose {
            index,
            pos: body.pos.to_array(),
            orientation: [body.orientation.x, body.orientation.y, body.orientation.z, body.orientation.w],
            awake: body.is_awake(),
        };
        println!("{}", serde_json::to_string(&pose)?);
    }

    Ok(())
}
