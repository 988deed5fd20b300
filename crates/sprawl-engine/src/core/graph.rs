use serde::Serialize;

use crate::api::error::InvariantViolation;
use crate::api::types::{ConnectorId, TileId};
use crate::components::connector::Connector;
use crate::components::pose::Pose;
use crate::components::tile::{Tile, TileBlueprint};

/// Arena of placed tiles and their connectors, plus the free-tile index.
///
/// Tiles and connectors are only ever appended, and bonds are never undone,
/// so ids stay valid for the graph's lifetime. A tile is on the free list
/// exactly when at least one of its connectors is unbonded.
#[derive(Debug, Default)]
pub struct TileGraph {
    tiles: Vec<Tile>,
    connectors: Vec<Connector>,
    /// Insertion order; trigger policies index into it.
    free_tiles: Vec<TileId>,
}

impl TileGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `blueprint` at `goal_pose`. Every connector's goal pose is
    /// frozen from it here.
    pub fn insert(&mut self, blueprint: TileBlueprint, goal_pose: Pose) -> TileId {
        let id = TileId(self.tiles.len() as u32);
        let mut owned = Vec::with_capacity(blueprint.connectors.len());
        for template in blueprint.connectors {
            let cid = ConnectorId(self.connectors.len() as u32);
            let connector_goal = goal_pose.compose(&template.local_pose);
            self.connectors.push(Connector {
                id: cid,
                owner: id,
                template,
                goal_pose: connector_goal,
                connected_to: None,
            });
            owned.push(cid);
        }
        let has_free = !owned.is_empty();
        self.tiles.push(Tile {
            id,
            template: blueprint.template,
            connectors: owned,
            pose: goal_pose,
            goal_pose,
        });
        if has_free {
            self.free_tiles.push(id);
        }
        id
    }

    /// Bond two free connectors and repair the free list for both owners.
    ///
    /// Panics if either id is out of range.
    pub fn bond(&mut self, a: ConnectorId, b: ConnectorId) {
        debug_assert!(self.connectors[a.index()].is_free(), "{:?} already bonded", a);
        debug_assert!(self.connectors[b.index()].is_free(), "{:?} already bonded", b);
        self.connectors[a.index()].connected_to = Some(b);
        self.connectors[b.index()].connected_to = Some(a);

        let owners = [self.connectors[a.index()].owner, self.connectors[b.index()].owner];
        for owner in owners {
            self.refresh_free(owner);
        }
    }

    /// Drop `tile` from the free list if it has run out of free connectors.
    /// Bonds are permanent, so a tile never needs to be re-added.
    fn refresh_free(&mut self, tile: TileId) {
        if !self.has_free_connector(tile) {
            self.free_tiles.retain(|&t| t != tile);
        }
    }

    pub fn has_free_connector(&self, tile: TileId) -> bool {
        self.free_connectors(tile).next().is_some()
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.index())
    }

    pub fn connector(&self, id: ConnectorId) -> Option<&Connector> {
        self.connectors.get(id.index())
    }

    /// Update a tile's current (possibly mid-transition) pose.
    pub fn set_pose(&mut self, id: TileId, pose: Pose) {
        if let Some(tile) = self.tiles.get_mut(id.index()) {
            tile.pose = pose;
        }
    }

    /// All placed tiles in spawn order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    /// Tiles with at least one unbonded connector, in insertion order.
    pub fn free_tiles(&self) -> &[TileId] {
        &self.free_tiles
    }

    /// Connectors owned by `tile`, in template order.
    pub fn tile_connectors(&self, tile: TileId) -> impl Iterator<Item = &Connector> {
        self.tile(tile)
            .map(|t| t.connectors.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |&cid| &self.connectors[cid.index()])
    }

    pub fn free_connectors(&self, tile: TileId) -> impl Iterator<Item = &Connector> {
        self.tile_connectors(tile).filter(|c| c.is_free())
    }

    /// Every bond once, lower id first.
    pub fn bonds(&self) -> Vec<(ConnectorId, ConnectorId)> {
        self.connectors
            .iter()
            .filter_map(|c| c.connected_to.filter(|&other| c.id < other).map(|other| (c.id, other)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Full consistency check: bond symmetry, owner back-references, and
    /// the free-list equivalence.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        for c in &self.connectors {
            if let Some(other) = c.connected_to {
                let back = self.connector(other).and_then(|o| o.connected_to);
                if back != Some(c.id) {
                    return Err(InvariantViolation::AsymmetricBond { a: c.id, b: other });
                }
            }
        }
        for tile in &self.tiles {
            for &cid in &tile.connectors {
                if self.connector(cid).map(|c| c.owner) != Some(tile.id) {
                    return Err(InvariantViolation::OwnerMismatch { tile: tile.id, connector: cid });
                }
            }
            let listed = self.free_tiles.contains(&tile.id);
            match (self.has_free_connector(tile.id), listed) {
                (true, false) => return Err(InvariantViolation::FreeListMissing(tile.id)),
                (false, true) => return Err(InvariantViolation::FreeListStale(tile.id)),
                _ => {}
            }
        }
        Ok(())
    }

    /// Serializable summary of the graph.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            tiles: self
                .tiles
                .iter()
                .map(|t| TileRecord {
                    id: t.id,
                    template: t.template.clone(),
                    goal_pose: t.goal_pose,
                })
                .collect(),
            bonds: self.bonds(),
            free_tiles: self.free_tiles.clone(),
        }
    }
}

/// One tile in a `GraphSnapshot`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileRecord {
    pub id: TileId,
    pub template: String,
    pub goal_pose: Pose,
}

/// Point-in-time view of the graph, for output and comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSnapshot {
    pub tiles: Vec<TileRecord>,
    pub bonds: Vec<(ConnectorId, ConnectorId)>,
    pub free_tiles: Vec<TileId>,
}

impl GraphSnapshot {
    /// Same tiles, bonds and free list; poses within `epsilon`.
    pub fn approx_eq(&self, other: &GraphSnapshot, epsilon: f32) -> bool {
        self.bonds == other.bonds
            && self.free_tiles == other.free_tiles
            && self.tiles.len() == other.tiles.len()
            && self.tiles.iter().zip(&other.tiles).all(|(a, b)| {
                a.id == b.id && a.template == b.template && a.goal_pose.approx_eq(&b.goal_pose, epsilon)
            })
    }
}
