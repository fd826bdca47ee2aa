//! Headless runner for the flocking engine: builds a world from a variant
//! preset plus optional JSON overrides, ticks it, and streams JSON
//! snapshots.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use flock_core::{FlockConfig, Shape, Variant, Vector2D, World};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Run a flocking simulation without a display", long_about = None)]
pub struct Args {
    /// Sketch variant whose preset seeds the configuration
    #[arg(long, value_enum, default_value_t = VariantArg::Modular)]
    pub variant: VariantArg,

    /// Number of agents to spawn
    #[arg(short, long, default_value_t = 100)]
    pub agents: usize,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 600)]
    pub ticks: u64,

    #[arg(long, default_value_t = 800.0)]
    pub width: f32,

    #[arg(long, default_value_t = 600.0)]
    pub height: f32,

    /// JSON file with configuration overrides applied on top of the preset
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Random seed (entropy when omitted)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Form a shape at the center of the world before the first tick
    #[arg(short, long, value_enum)]
    pub form: Option<FormArg>,

    /// Attraction target as "x,y"
    #[arg(long, value_parser = parse_point)]
    pub target: Option<Vector2D>,

    /// Print a snapshot every N ticks (0 prints only the final one)
    #[arg(long, default_value_t = 0)]
    pub snapshot_every: u64,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantArg {
    Prototype,
    Modular,
    TongueTracker,
    BeeSwarm,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Prototype => Variant::Prototype,
            VariantArg::Modular => Variant::Modular,
            VariantArg::TongueTracker => Variant::TongueTracker,
            VariantArg::BeeSwarm => Variant::BeeSwarm,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormArg {
    LetterT,
    Pathway,
}

impl FormArg {
    pub fn shape(self, center: Vector2D) -> Shape {
        match self {
            FormArg::LetterT => Shape::letter_t(center),
            FormArg::Pathway => Shape::pathway(center),
        }
    }
}

/// Parses "x,y" into a point.
pub fn parse_point(s: &str) -> Result<Vector2D, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,y\", got {:?}", s))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x {:?}: {}", x, e))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y {:?}: {}", y, e))?;
    let point = Vector2D::new(x, y);
    if !point.is_finite() {
        return Err(format!("point {:?} must be finite", s));
    }
    Ok(point)
}

/// Aggregate state of the world after a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub agents: usize,
    pub centroid: Option<Vector2D>,
    pub mean_speed: f32,
    pub top_speed: f32,
    pub seeking: usize,
    pub paint_marks: usize,
}

impl Snapshot {
    pub fn capture(world: &World) -> Self {
        let agents = world.agents();
        let count = agents.len();

        let (sum, speed_sum, top_speed) = agents.iter().fold(
            (Vector2D::zero(), 0.0f32, 0.0f32),
            |(sum, speed_sum, top), a| {
                let speed = a.velocity.magnitude();
                (sum + a.position, speed_sum + speed, top.max(speed))
            },
        );

        Self {
            tick: world.ticks(),
            agents: count,
            centroid: (count > 0).then(|| sum / count as f32),
            mean_speed: if count > 0 { speed_sum / count as f32 } else { 0.0 },
            top_speed,
            seeking: agents.iter().filter(|a| a.is_seeking()).count(),
            paint_marks: world.paint_marks().count(),
        }
    }
}

/// Loads the preset for `variant`, overlaid with the JSON file at `path`.
pub fn load_config(variant: Variant, path: Option<&Path>) -> Result<FlockConfig> {
    let preset = FlockConfig::preset(variant);
    let Some(path) = path else {
        return Ok(preset);
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let overrides: Value = serde_json::from_str(&text)
        .with_context(|| format!("Config file {} is not valid JSON", path.display()))?;

    let mut merged = serde_json::to_value(preset)?;
    merge(&mut merged, overrides);

    let config: FlockConfig = serde_json::from_value(merged)
        .with_context(|| format!("Config file {} does not describe a flock", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;

    log::debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

/// Overlays `overrides` onto `base`. Objects carrying a `kind` tag pick an
/// enum variant and replace the base value whole.
fn merge(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) if !overrides.contains_key("kind") => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overrides) => *base = overrides,
    }
}

/// Builds the world described by `args`, runs it, and writes snapshots as
/// JSON lines to `out`. Returns the final snapshot.
pub fn run<W: Write>(args: &Args, out: &mut W) -> Result<Snapshot> {
    let config = load_config(args.variant.into(), args.config.as_deref())?;

    let mut world = match args.seed {
        Some(seed) => World::with_seed(args.width, args.height, config, seed),
        None => World::new(args.width, args.height, config),
    }
    .context("Failed to create world")?;

    world.populate(args.agents);
    if let Some(target) = args.target {
        log::info!("Attraction target at ({}, {})", target.x, target.y);
        world.set_target(Some(target));
    }
    if let Some(form) = args.form {
        world.form_shape(form.shape(world.center()));
    }

    log::info!(
        "Running {:?} for {} ticks with {} agents",
        args.variant,
        args.ticks,
        args.agents
    );

    for _ in 0..args.ticks {
        world.update();
        if args.snapshot_every > 0 && world.ticks() % args.snapshot_every == 0 {
            write_snapshot(out, &Snapshot::capture(&world))?;
        }
    }

    let last = Snapshot::capture(&world);
    if args.snapshot_every == 0 || args.ticks % args.snapshot_every != 0 {
        write_snapshot(out, &last)?;
    }

    log::info!(
        "Finished at tick {}: mean speed {:.3}, {} seeking",
        last.tick,
        last.mean_speed,
        last.seeking
    );
    Ok(last)
}

fn write_snapshot<W: Write>(out: &mut W, snapshot: &Snapshot) -> Result<()> {
    serde_json::to_writer(&mut *out, snapshot)?;
    writeln!(out)?;
    Ok(())
}
