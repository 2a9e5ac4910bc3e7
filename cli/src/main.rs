mod commands;
mod scene;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "talus3d", about = "Headless example runner for the talus3d physics engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a scene from a JSON description, step it, and print each
    /// dynamic body's final pose as a JSON line
    Simulate {
        /// Path to a scene description JSON file
        scene: String,
        /// Override the scene's step count
        #[arg(long)]
        steps: Option<u32>,
        /// Override the scene's fixed timestep, in seconds
        #[arg(long)]
        dt: Option<f32>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { scene, steps, dt } => commands::simulate::run(&scene, steps, dt),
    }
}
