// systems/trigger.rs
//
// Trigger policies decide, once per tick, which free connectors may receive
// a new tile. They only read the graph; all mutation stays in the engine.
//
//   Timed      bounded random search on a fixed cadence (≤ 32×8 probes/tick)
//   Proximity  exhaustive scan of free connectors near the supplied anchors

use glam::Vec3;
use log::trace;

use crate::api::config::TriggerConfig;
use crate::api::types::ConnectorId;
use crate::core::graph::TileGraph;
use crate::core::rng::{pick_index, StreamRng};

/// Free tiles sampled per timed search.
pub const TILE_SEARCH_ATTEMPTS: u32 = 32;
/// Connectors sampled per sampled tile.
pub const CONNECTOR_SEARCH_ATTEMPTS: u32 = 8;

/// Per-tick input from the host.
#[derive(Debug, Clone, Copy)]
pub struct TickInput<'a> {
    /// Seconds since the previous tick.
    pub dt: f32,
    /// World positions of interest this tick (tracked actors, cameras).
    pub anchors: &'a [Vec3],
}

impl<'a> TickInput<'a> {
    pub fn new(dt: f32, anchors: &'a [Vec3]) -> Self {
        Self { dt, anchors }
    }
}

/// Decides which free connectors are eligible to grow this tick.
pub trait TriggerPolicy {
    /// Eligible connectors, possibly none. Only `rng` may be advanced.
    fn evaluate(
        &mut self,
        graph: &TileGraph,
        input: &TickInput<'_>,
        rng: &mut StreamRng,
    ) -> Vec<ConnectorId>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Build the policy described by `config`.
pub fn from_config(config: &TriggerConfig) -> Box<dyn TriggerPolicy> {
    match *config {
        TriggerConfig::Timed { interval } => Box::new(TimedTrigger::new(interval)),
        TriggerConfig::Proximity { radius } => Box::new(ProximityTrigger::new(radius)),
    }
}

/// Fires every `interval` seconds and searches for one free connector.
#[derive(Debug, Clone)]
pub struct TimedTrigger {
    interval: f32,
    time_until_next: f32,
}

impl TimedTrigger {
    /// The first evaluation fires immediately.
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            time_until_next: 0.0,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn time_until_next(&self) -> f32 {
        self.time_until_next
    }

    /// Random free tile, then random connector on it, until an unbonded one
    /// turns up or the attempt budget runs out.
    fn search(graph: &TileGraph, rng: &mut StreamRng) -> Option<ConnectorId> {
        let free = graph.free_tiles();
        if free.is_empty() {
            return None;
        }
        for _ in 0..TILE_SEARCH_ATTEMPTS {
            let tile = free[pick_index(rng, free.len())];
            let Some(connectors) = graph.tile(tile).map(|t| t.connectors.as_slice()) else {
                continue;
            };
            if connectors.is_empty() {
                continue;
            }
            for _ in 0..CONNECTOR_SEARCH_ATTEMPTS {
                let cid = connectors[pick_index(rng, connectors.len())];
                if graph.connector(cid).is_some_and(|c| c.is_free()) {
                    return Some(cid);
                }
            }
        }
        None
    }
}

impl TriggerPolicy for TimedTrigger {
    fn evaluate(
        &mut self,
        graph: &TileGraph,
        input: &TickInput<'_>,
        rng: &mut StreamRng,
    ) -> Vec<ConnectorId> {
        self.time_until_next -= input.dt;
        if self.time_until_next > 0.0 {
            return Vec::new();
        }
        self.time_until_next = self.interval;

        match Self::search(graph, rng) {
            Some(cid) => {
                trace!("timed trigger fired on {:?}", cid);
                vec![cid]
            }
            None => {
                trace!("timed trigger found no free connector");
                Vec::new()
            }
        }
    }

    fn name(&self) -> &'static str {
        "timed"
    }
}

/// Every free connector within `radius` of any anchor.
#[derive(Debug, Clone)]
pub struct ProximityTrigger {
    radius: f32,
}

impl ProximityTrigger {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl TriggerPolicy for ProximityTrigger {
    fn evaluate(
        &mut self,
        graph: &TileGraph,
        input: &TickInput<'_>,
        _rng: &mut StreamRng,
    ) -> Vec<ConnectorId> {
        let radius_sq = self.radius * self.radius;
        let mut triggered = Vec::new();
        for &tile in graph.free_tiles() {
            for connector in graph.free_connectors(tile) {
                let at = connector.goal_pose.position;
                if input.anchors.iter().any(|a| a.distance_squared(at) <= radius_sq) {
                    triggered.push(connector.id);
                }
            }
        }
        if !triggered.is_empty() {
            trace!("proximity trigger: {} connectors in range", triggered.len());
        }
        triggered
    }

    fn name(&self) -> &'static str {
        "proximity"
    }
}
