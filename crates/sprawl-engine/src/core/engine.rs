// core/engine.rs
//
// GrowthEngine: owns the tile graph and both growth RNG streams. It draws
// tiles from the catalog, matches connectors with bounded retries, computes
// placement and keeps the free-tile index correct. It performs no animation;
// attachments are reported as events for the caller to forward.

use log::{debug, info, trace, warn};
use rand::Rng;

use crate::api::error::{ConfigError, RejectReason, RejectedError};
use crate::api::types::{AttachedEvent, ConnectorId, TileId};
use crate::assets::catalog::TileCatalog;
use crate::assets::factory::TileFactory;
use crate::components::pose::Pose;
use crate::components::tile::{TileBlueprint, TileTemplate};
use crate::core::graph::TileGraph;
use crate::core::placement::attach_pose;
use crate::core::rng::{pick_index, GrowthRng};
use crate::systems::trigger::{TickInput, TriggerPolicy};

/// Connector draws on a new tile per target before giving up on it.
pub const CONNECTOR_DRAW_ATTEMPTS: u32 = 8;

/// Outcome of one growth attempt.
pub type GrowthResult = Result<AttachedEvent, RejectedError>;

pub struct GrowthEngine {
    catalog: TileCatalog,
    total_bias: f32,
    graph: TileGraph,
    rng: GrowthRng,
}

impl GrowthEngine {
    /// Validate `catalog` and seed both streams from `seed`.
    pub fn initialize(catalog: TileCatalog, seed: u64) -> Result<Self, ConfigError> {
        catalog.validate()?;
        let total_bias = catalog.total_bias();
        info!(
            "growth engine ready: {} templates, total bias {}, seed {}",
            catalog.len(),
            total_bias,
            seed
        );
        Ok(Self {
            catalog,
            total_bias,
            graph: TileGraph::new(),
            rng: GrowthRng::new(seed),
        })
    }

    pub fn catalog(&self) -> &TileCatalog {
        &self.catalog
    }

    pub fn graph(&self) -> &TileGraph {
        &self.graph
    }

    /// Mirror a tile's current (animated) pose into the graph.
    pub fn set_tile_pose(&mut self, tile: TileId, pose: Pose) {
        self.graph.set_pose(tile, pose);
    }

    /// Place the seed tile at the origin. Picks uniformly from the catalog's
    /// initial tiles when present, otherwise makes a weighted draw.
    pub fn spawn_initial_tile<F: TileFactory + ?Sized>(&mut self, factory: &mut F) -> TileId {
        let initial_count = self.catalog.initial_tiles.as_ref().map_or(0, Vec::len);
        let blueprint = if initial_count > 0 {
            let index = pick_index(&mut self.rng.tiles, initial_count);
            let initial = self.catalog.initial_tiles.as_deref().unwrap_or_default();
            factory.instantiate(&initial[index])
        } else {
            let template = self.draw_weighted_tile();
            factory.instantiate(template)
        };
        let template = blueprint.template.clone();
        let id = self.graph.insert(blueprint, Pose::IDENTITY);
        info!("seed tile {:?} '{}' placed at origin", id, template);
        id
    }

    /// Catalog index for one weighted draw from the tile stream.
    pub fn draw_weighted_index(&mut self) -> usize {
        let r = self.rng.tiles.random::<f32>() * self.total_bias;
        self.catalog.select(r)
    }

    /// One weighted draw from the catalog.
    pub fn draw_weighted_tile(&mut self) -> &TileTemplate {
        let index = self.draw_weighted_index();
        &self.catalog.entries[index].template
    }

    /// Ask `policy` which free connectors may grow this tick. The policy
    /// draws from the connector stream.
    pub fn evaluate_trigger(
        &mut self,
        policy: &mut dyn TriggerPolicy,
        input: &TickInput<'_>,
    ) -> Vec<ConnectorId> {
        policy.evaluate(&self.graph, input, &mut self.rng.connectors)
    }

    /// Draw a fresh tile for every target in order and try to attach it.
    pub fn grow<F: TileFactory + ?Sized>(
        &mut self,
        factory: &mut F,
        targets: &[ConnectorId],
    ) -> Vec<GrowthResult> {
        targets
            .iter()
            .map(|&target| {
                let index = self.draw_weighted_index();
                let blueprint = factory.instantiate(&self.catalog.entries[index].template);
                self.attempt_connection(factory, blueprint, &[target])
            })
            .collect()
    }

    /// Bond `new_tile` to the first candidate that accepts one of its
    /// connectors. Each candidate gets up to `CONNECTOR_DRAW_ATTEMPTS`
    /// uniform draws (with replacement) over the new tile's connectors.
    /// On rejection the blueprint goes back to `factory`.
    pub fn attempt_connection<F: TileFactory + ?Sized>(
        &mut self,
        factory: &mut F,
        new_tile: TileBlueprint,
        candidates: &[ConnectorId],
    ) -> GrowthResult {
        if new_tile.connectors.is_empty() {
            warn!("tile '{}' has no connectors; discarding", new_tile.template);
            return Err(self.reject(factory, new_tile, RejectReason::NoConnectors, 0));
        }

        let mut attempts = 0;
        let mut saw_free = false;
        let mut found = None;
        'targets: for &target in candidates {
            let Some(target_conn) = self.graph.connector(target) else {
                continue;
            };
            if !target_conn.is_free() {
                trace!("candidate {:?} already bonded; skipping", target);
                continue;
            }
            saw_free = true;
            for _ in 0..CONNECTOR_DRAW_ATTEMPTS {
                attempts += 1;
                let index = pick_index(&mut self.rng.connectors, new_tile.connectors.len());
                if new_tile.connectors[index].compatible_with(&target_conn.template) {
                    found = Some((target, index, target_conn.owner, target_conn.goal_pose));
                    break 'targets;
                }
                trace!(
                    "connector '{}' of '{}' incompatible with {:?}",
                    new_tile.connectors[index].name,
                    new_tile.template,
                    target
                );
            }
        }

        let Some((target, index, parent, target_goal)) = found else {
            let reason = if saw_free {
                RejectReason::NoCompatibleConnector
            } else {
                RejectReason::NoFreeCandidate
            };
            return Err(self.reject(factory, new_tile, reason, attempts));
        };

        let goal_pose = attach_pose(&target_goal, &new_tile.connectors[index].local_pose);
        let template = new_tile.template.clone();
        // Connectors are appended in blueprint order.
        let connector = ConnectorId(self.graph.connectors().len() as u32 + index as u32);
        let tile = self.graph.insert(new_tile, goal_pose);
        self.graph.bond(connector, target);

        #[cfg(debug_assertions)]
        if let Err(violation) = self.graph.check_invariants() {
            panic!("tile graph invariant violated after attaching {:?}: {}", tile, violation);
        }

        debug!(
            "attached {:?} '{}' to {:?} of {:?} after {} draws ({} free tiles)",
            tile,
            template,
            target,
            parent,
            attempts,
            self.graph.free_tiles().len()
        );
        Ok(AttachedEvent {
            tile,
            template,
            connector,
            target,
            parent,
            goal_pose,
        })
    }

    fn reject<F: TileFactory + ?Sized>(
        &self,
        factory: &mut F,
        blueprint: TileBlueprint,
        reason: RejectReason,
        attempts: u32,
    ) -> RejectedError {
        let error = RejectedError {
            reason,
            attempts,
            template: blueprint.template.clone(),
        };
        debug!("{}", error);
        factory.release(blueprint);
        error
    }
}
