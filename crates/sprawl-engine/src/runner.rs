use glam::Vec3;
use log::{debug, info};

use crate::api::config::GrowthConfig;
use crate::api::error::{ConfigError, RejectedError};
use crate::api::types::{AttachedEvent, TileId};
use crate::assets::factory::TileFactory;
use crate::core::engine::GrowthEngine;
use crate::core::graph::TileGraph;
use crate::core::scene::SceneHost;
use crate::extensions::transition::{Direction, TransitionScheduler};
use crate::systems::trigger::{self, TickInput, TriggerPolicy};

/// What one tick produced.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub attached: Vec<AttachedEvent>,
    pub rejected: Vec<RejectedError>,
    /// Transitions that reached their goal this tick.
    pub settled: usize,
}

impl TickReport {
    pub fn grew(&self) -> bool {
        !self.attached.is_empty()
    }
}

/// Drives one growth session: trigger policy → engine → scene + transitions.
///
/// Single-threaded and tick-driven. Each `tick` advances running transitions,
/// then runs exactly one evaluate → attach cycle.
pub struct GrowthRunner<F: TileFactory, H: SceneHost> {
    engine: GrowthEngine,
    trigger: Box<dyn TriggerPolicy>,
    transitions: TransitionScheduler,
    factory: F,
    host: H,
    root: TileId,
    ticks: u64,
}

impl<F: TileFactory, H: SceneHost> GrowthRunner<F, H> {
    /// Validate `config`, build the engine and place the seed tile.
    pub fn new(config: GrowthConfig, mut factory: F, mut host: H) -> Result<Self, ConfigError> {
        config.validate()?;
        let trigger = trigger::from_config(&config.trigger);
        let transitions = TransitionScheduler::new(&config.transition, config.seed);
        let mut engine = GrowthEngine::initialize(config.catalog, config.seed)?;

        let root = engine.spawn_initial_tile(&mut factory);
        if let Some(tile) = engine.graph().tile(root) {
            host.spawn_tile(root, &tile.template, tile.goal_pose);
        }
        info!("growth runner started with {} trigger", trigger.name());

        Ok(Self {
            engine,
            trigger,
            transitions,
            factory,
            host,
            root,
            ticks: 0,
        })
    }

    /// Swap in a custom trigger policy.
    pub fn with_trigger(mut self, trigger: Box<dyn TriggerPolicy>) -> Self {
        self.trigger = trigger;
        self
    }

    /// Run one tick. `anchors` are this tick's points of interest for
    /// proximity triggers; other policies ignore them.
    pub fn tick(&mut self, dt: f32, anchors: &[Vec3]) -> TickReport {
        self.ticks += 1;
        let mut report = TickReport::default();

        let engine = &mut self.engine;
        let host = &mut self.host;
        report.settled = self.transitions.tick(dt, |tile, pose| {
            host.set_pose(tile, pose);
            engine.set_tile_pose(tile, pose);
        });

        if self.engine.graph().free_tiles().is_empty() {
            return report;
        }

        let input = TickInput::new(dt, anchors);
        let eligible = self.engine.evaluate_trigger(self.trigger.as_mut(), &input);
        if eligible.is_empty() {
            return report;
        }

        for result in self.engine.grow(&mut self.factory, &eligible) {
            match result {
                Ok(event) => {
                    let shown = self.transitions.start(event.tile, event.goal_pose, Direction::In);
                    self.host.spawn_tile(event.tile, &event.template, shown);
                    self.engine.set_tile_pose(event.tile, shown);
                    report.attached.push(event);
                }
                Err(rejected) => report.rejected.push(rejected),
            }
        }
        debug!(
            "tick {}: {} attached, {} rejected, {} tiles",
            self.ticks,
            report.attached.len(),
            report.rejected.len(),
            self.engine.graph().len()
        );
        report
    }

    pub fn graph(&self) -> &TileGraph {
        self.engine.graph()
    }

    pub fn engine(&self) -> &GrowthEngine {
        &self.engine
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn transitions(&self) -> &TransitionScheduler {
        &self.transitions
    }

    pub fn root(&self) -> TileId {
        self.root
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Whether the graph can still grow.
    pub fn can_grow(&self) -> bool {
        !self.engine.graph().free_tiles().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::{TransitionConfig, TriggerConfig};
    use crate::assets::catalog::TileCatalog;
    use crate::assets::factory::TemplateFactory;
    use crate::components::pose::Pose;
    use crate::components::tile::TileTemplate;
    use crate::core::scene::Scene;
    use crate::extensions::transition::TransitionLaw;

    const DT: f32 = 1.0 / 60.0;

    fn config(catalog: TileCatalog, trigger: TriggerConfig, seed: u64) -> GrowthConfig {
        GrowthConfig {
            seed,
            catalog,
            trigger,
            transition: TransitionConfig::default(),
        }
    }

    fn mixed_catalog() -> TileCatalog {
        TileCatalog::new()
            .with_entry(TileTemplate::ring("cross", 4, 1.0), 1.0)
            .with_entry(TileTemplate::ring("corridor", 2, 1.5), 3.0)
            .with_entry(TileTemplate::ring("cap", 1, 0.5), 0.5)
    }

    fn runner(config: GrowthConfig) -> GrowthRunner<TemplateFactory, Scene> {
        GrowthRunner::new(config, TemplateFactory::new(), Scene::new()).unwrap()
    }

    #[test]
    fn refuses_to_start_on_empty_catalog() {
        let result = GrowthRunner::new(
            config(TileCatalog::new(), TriggerConfig::default(), 1),
            TemplateFactory::new(),
            Scene::new(),
        );
        assert!(matches!(result, Err(ConfigError::EmptyCatalog)));
    }

    #[test]
    fn seed_tile_is_in_scene() {
        let r = runner(config(mixed_catalog(), TriggerConfig::default(), 1));
        assert_eq!(r.host().len(), 1);
        assert_eq!(r.host().get(r.root()).unwrap().pose, Pose::IDENTITY);
    }

    #[test]
    fn invariants_hold_every_tick() {
        let mut r = runner(config(mixed_catalog(), TriggerConfig::Timed { interval: 0.0 }, 17));
        for _ in 0..300 {
            r.tick(DT, &[]);
            r.graph().check_invariants().unwrap();
        }
        assert!(r.graph().len() > 1);
        assert_eq!(r.host().len(), r.graph().len());
    }

    #[test]
    fn single_connector_catalog_stops_growing_without_crashing() {
        let catalog = TileCatalog::new().with_entry(TileTemplate::ring("stub", 1, 1.0), 1.0);
        let mut r = runner(config(catalog, TriggerConfig::Timed { interval: 0.0 }, 1));

        let first = r.tick(DT, &[]);
        assert_eq!(first.attached.len(), 1);
        assert!(!r.can_grow());

        // Root and its only neighbour are both spent: nothing else can happen.
        let second = r.tick(DT, &[]);
        assert!(!second.grew());
        assert!(second.rejected.is_empty());
        assert_eq!(r.graph().len(), 2);
        r.graph().check_invariants().unwrap();
    }

    #[test]
    fn proximity_first_tick_grows_every_connector_in_range() {
        let catalog = TileCatalog::new().with_entry(TileTemplate::ring("cross", 4, 1.0), 1.0);
        let mut r = runner(config(catalog, TriggerConfig::Proximity { radius: 5.0 }, 1));
        let root = r.root();
        let root_connectors = r.graph().tile(root).unwrap().connectors.clone();

        let report = r.tick(DT, &[Vec3::ZERO]);

        let targets: Vec<_> = report.attached.iter().map(|e| e.target).collect();
        assert_eq!(targets, root_connectors);
        assert!(report.attached.iter().all(|e| e.parent == root));
        assert!(!r.graph().free_tiles().contains(&root));
        r.graph().check_invariants().unwrap();
    }

    #[test]
    fn proximity_parent_stays_free_until_last_connector() {
        let catalog = TileCatalog::new().with_entry(TileTemplate::ring("cross", 4, 1.0), 1.0);
        let mut r = runner(config(catalog, TriggerConfig::Proximity { radius: 1.0 }, 1));
        let root = r.root();

        // Each anchor reaches exactly one of the root's connectors.
        let anchors = [
            Vec3::new(0.0, 0.0, 1.5),
            Vec3::new(1.5, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -1.5),
            Vec3::new(-1.5, 0.0, 0.0),
        ];
        for (i, anchor) in anchors.iter().enumerate() {
            let report = r.tick(DT, std::slice::from_ref(anchor));
            assert!(report.attached.iter().any(|e| e.parent == root), "step {}", i);
            let still_free = r.graph().free_tiles().contains(&root);
            assert_eq!(still_free, i < 3, "step {}", i);
        }
    }

    #[test]
    fn no_anchors_means_no_proximity_growth() {
        let mut r = runner(config(mixed_catalog(), TriggerConfig::Proximity { radius: 5.0 }, 1));
        for _ in 0..10 {
            assert!(!r.tick(DT, &[]).grew());
        }
    }

    #[test]
    fn same_seed_same_level() {
        let run = || {
            let mut r = runner(config(mixed_catalog(), TriggerConfig::Timed { interval: 0.05 }, 2024));
            for _ in 0..240 {
                r.tick(DT, &[]);
            }
            r.graph().snapshot()
        };
        let a = run();
        let b = run();
        assert!(a.tiles.len() > 1);
        assert!(a.approx_eq(&b, 1e-5));
    }

    #[test]
    fn different_seeds_diverge() {
        let run = |seed| {
            let mut r = runner(config(mixed_catalog(), TriggerConfig::Timed { interval: 0.0 }, seed));
            for _ in 0..40 {
                r.tick(DT, &[]);
            }
            r.graph().snapshot()
        };
        assert!(!run(1).approx_eq(&run(2), 1e-5));
    }

    #[test]
    fn transition_settings_do_not_change_decisions() {
        let run = |transition: TransitionConfig| {
            let mut cfg = config(mixed_catalog(), TriggerConfig::Timed { interval: 0.1 }, 77);
            cfg.transition = transition;
            let mut r = runner(cfg);
            for _ in 0..180 {
                r.tick(DT, &[]);
            }
            r.graph().snapshot()
        };
        let slow = run(TransitionConfig { rate: 0.25, law: TransitionLaw::default() });
        let fast = run(TransitionConfig { rate: 8.0, law: TransitionLaw::default() });
        let spun = run(TransitionConfig {
            rate: 1.0,
            law: TransitionLaw::SpinAndSlide {
                offset: Vec3::new(0.0, -100.0, 0.0),
                spin: None,
                spin_multiplier: 8.0,
                easing: Default::default(),
            },
        });
        assert!(slow.approx_eq(&fast, 1e-5));
        assert!(slow.approx_eq(&spun, 1e-5));
    }

    #[test]
    fn transitions_settle_on_goal() {
        let catalog = TileCatalog::new().with_entry(TileTemplate::ring("cross", 4, 1.0), 1.0);
        let mut cfg = config(catalog, TriggerConfig::Timed { interval: 100.0 }, 3);
        cfg.transition.rate = 2.0;
        let mut r = runner(cfg);

        let report = r.tick(DT, &[]);
        let event = report.attached[0].clone();
        assert!(r.transitions().is_animating(event.tile));
        assert!(!r.host().get(event.tile).unwrap().pose.approx_eq(&event.goal_pose, 1e-3));

        let mut settled = 0;
        for _ in 0..40 {
            settled += r.tick(DT, &[]).settled;
        }
        assert_eq!(settled, 1);
        assert_eq!(r.host().get(event.tile).unwrap().pose, event.goal_pose);
        assert_eq!(r.graph().tile(event.tile).unwrap().pose, event.goal_pose);
    }
}
