mod script;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use script::Script;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wayfarer_common::SceneConfig;
use wayfarer_input::KeyboardHub;
use wayfarer_locomotion::ClipSet;
use wayfarer_render::{DebugTextRenderer, FrameReport, RenderView, Renderer, ReportRenderer};
use wayfarer_scene::{Scene, SceneEvent};

/// Clip length handed to the mixer for scripted runs.
const CLIP_DURATION: f32 = 1.0;

#[derive(Parser)]
#[command(name = "wayfarer-cli", about = "CLI tool for the wayfarer scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, crate info and the default config
    Info,
    /// Run the scene headless from a key script and print the final frame
    Simulate {
        #[command(flatten)]
        run: RunArgs,
        /// Print the final frame as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the same script twice and compare state hashes
    Replay {
        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Args, Clone)]
struct RunArgs {
    /// Idle ticks to run after the script
    #[arg(short, long, default_value = "0")]
    ticks: u64,
    /// Comma-separated `keys:ticks` segments, e.g. `w:30,w+shift:20,idle:10`
    #[arg(long, default_value = "idle:60")]
    script: String,
    /// YAML scene config; defaults apply to anything it leaves out
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Terrain noise seed, overriding the config
    #[arg(short, long)]
    seed: Option<u32>,
    /// Tick at which the animation clips arrive
    #[arg(long, default_value = "0")]
    assets_at: u64,
    /// Never deliver animation clips
    #[arg(long)]
    no_assets: bool,
}

#[derive(Serialize)]
struct SimulationReport {
    frame: FrameReport,
    state_hash: u64,
    transitions: Vec<SceneEvent>,
}

fn load_config(run: &RunArgs) -> anyhow::Result<SceneConfig> {
    let mut config = match &run.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if let Some(seed) = run.seed {
        config.terrain.seed = Some(seed);
    }
    Ok(config)
}

fn clip_set(config: &SceneConfig) -> ClipSet {
    let names = &config.locomotion.clips;
    ClipSet::from_names(
        [&names.idle, &names.walk, &names.run, &names.jump].map(String::clone),
        CLIP_DURATION,
    )
}

/// Drive a scene through the script. Keys go through the hub exactly as a
/// window's key events would.
fn simulate(config: &SceneConfig, script: &Script, run: &RunArgs) -> anyhow::Result<Scene> {
    let hub = KeyboardHub::new();
    let mut scene = Scene::attach(config, &hub)?;
    let assets = scene.asset_sender();
    let mut pending = (!run.no_assets).then(|| clip_set(config));

    let mut tick = |scene: &mut Scene| -> anyhow::Result<()> {
        if let Some(clips) = pending.take_if(|_| scene.tick() >= run.assets_at) {
            tracing::info!(tick = scene.tick(), "delivering animation clips");
            assets.send(clips).context("asset inbox closed")?;
        }
        scene.step();
        Ok(())
    };

    for segment in &script.segments {
        for key in &segment.keys {
            hub.press(*key);
        }
        for _ in 0..segment.ticks {
            tick(&mut scene)?;
        }
        for key in &segment.keys {
            hub.release(*key);
        }
    }
    for _ in 0..run.ticks {
        tick(&mut scene)?;
    }
    Ok(scene)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("wayfarer-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", wayfarer_common::crate_info());
            println!("input: {}", wayfarer_input::crate_info());
            println!("locomotion: {}", wayfarer_locomotion::crate_info());
            println!("terrain: {}", wayfarer_terrain::crate_info());
            println!("scene: {}", wayfarer_scene::crate_info());
            println!("render: {}", wayfarer_render::crate_info());
            println!("\n# default config");
            print!("{}", SceneConfig::default().to_yaml_string()?);
        }
        Commands::Simulate { run, json } => {
            let config = load_config(&run)?;
            let script: Script = run.script.parse()?;
            tracing::info!(
                ticks = script.total_ticks() + run.ticks,
                segments = script.segments.len(),
                "simulating"
            );

            let scene = simulate(&config, &script, &run)?;
            let view = RenderView::from_camera(scene.camera());
            if json {
                let report = SimulationReport {
                    frame: ReportRenderer.render(&scene, &view),
                    state_hash: scene.state_hash(),
                    transitions: scene
                        .events()
                        .iter()
                        .filter(|e| matches!(e, SceneEvent::Transition { .. }))
                        .cloned()
                        .collect(),
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", DebugTextRenderer::new().render(&scene, &view));
                println!("State hash: {:#x}", scene.state_hash());
            }
        }
        Commands::Replay { run } => {
            let mut config = load_config(&run)?;
            // Both runs must share the terrain seed.
            if config.terrain.seed.is_none() {
                config.terrain.seed = Some(42);
            }
            let script: Script = run.script.parse()?;

            let first = simulate(&config, &script, &run)?;
            let second = simulate(&config, &script, &run)?;

            println!("Replay: ticks={}", first.tick());
            println!("Run 1: hash={:#x}", first.state_hash());
            println!("Run 2: hash={:#x}", second.state_hash());
            println!(
                "Match: {}",
                if first.state_hash() == second.state_hash() {
                    "OK"
                } else {
                    "MISMATCH"
                }
            );
        }
    }

    Ok(())
}
