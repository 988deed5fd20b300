// Headless level growth.
//
//   sprawl-demo [config.json] [ticks]
//
// Without a config file a built-in catalog with a timed trigger is used.
// An anchor walks a widening circle so proximity configs keep growing.
// The final graph is printed to stdout as JSON.

use std::error::Error;
use std::fs;

use glam::Vec3;
use log::{info, warn};
use sprawl_engine::*;

const DT: f32 = 1.0 / 60.0;
const DEFAULT_TICKS: u64 = 600;
const ANCHOR_SPEED: f32 = 0.5;
const ANCHOR_DRIFT: f32 = 0.02;

fn builtin_config() -> GrowthConfig {
    let hall = |name: &str, count: usize, radius: f32| {
        let mut template = TileTemplate::ring(name, count, radius);
        for connector in &mut template.connectors {
            connector.group = "hall".to_string();
        }
        template
    };
    let vault = TileTemplate::new("vault").with_connector(
        ConnectorTemplate::new("door", Pose::from_position(Vec3::new(0.0, 0.0, 1.0)))
            .with_group("vault")
            .including("hall"),
    );

    GrowthConfig {
        seed: 7,
        catalog: TileCatalog::new()
            .with_entry(hall("cross", 4, 2.0), 1.0)
            .with_entry(hall("corridor", 2, 3.0), 3.0)
            .with_entry(vault, 0.5)
            .with_initial_tile(hall("cross", 4, 2.0)),
        trigger: TriggerConfig::Timed { interval: 0.1 },
        transition: TransitionConfig::default(),
    }
}

fn load_config(path: Option<&str>) -> Result<GrowthConfig, Box<dyn Error>> {
    match path {
        Some(path) => {
            info!("loading {}", path);
            let json = fs::read_to_string(path)?;
            Ok(GrowthConfig::from_json(&json)?)
        }
        None => Ok(builtin_config()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = load_config(args.first().map(String::as_str))?;
    let ticks = match args.get(1) {
        Some(n) => n.parse()?,
        None => DEFAULT_TICKS,
    };

    let mut runner = GrowthRunner::new(config, TemplateFactory::new(), Scene::new())?;
    let mut rejected = 0usize;

    for tick in 0..ticks {
        let t = tick as f32 * DT;
        let reach = 2.0 + t * ANCHOR_DRIFT * 60.0;
        let anchor = Vec3::new((t * ANCHOR_SPEED).cos() * reach, 0.0, (t * ANCHOR_SPEED).sin() * reach);

        let report = runner.tick(DT, &[anchor]);
        rejected += report.rejected.len();
        for event in &report.attached {
            info!(
                "tick {}: {} {:?} onto {:?} at {:?}",
                tick, event.template, event.tile, event.parent, event.goal_pose.position
            );
        }
        if !runner.can_grow() && runner.transitions().is_empty() {
            info!("level closed after {} ticks", tick + 1);
            break;
        }
    }

    if let Err(violation) = runner.graph().check_invariants() {
        warn!("graph invariant broken: {}", violation);
    }
    info!(
        "{} tiles, {} free, {} rejected, {} blueprints released",
        runner.graph().len(),
        runner.graph().free_tiles().len(),
        rejected,
        runner.factory().released()
    );

    println!("{}", serde_json::to_string_pretty(&runner.graph().snapshot())?);
    Ok(())
}
