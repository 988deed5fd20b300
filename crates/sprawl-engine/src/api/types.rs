use serde::{Deserialize, Serialize};

use crate::components::pose::Pose;

/// Identifier for a placed tile.
///
/// This is an index into the graph's tile arena, and is only meaningful
/// within the lifetime of a given `TileGraph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u32);

/// Identifier for a connector owned by a placed tile (arena index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectorId(pub u32);

impl TileId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl ConnectorId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Emitted once a new tile has been bonded into the graph.
///
/// The engine does no animation itself: the caller forwards `goal_pose` to a
/// transition task (or snaps the tile there directly).
#[derive(Debug, Clone, PartialEq)]
pub struct AttachedEvent {
    /// The newly placed tile.
    pub tile: TileId,
    /// Template name the tile was instantiated from.
    pub template: String,
    /// Connector on the new tile that was consumed.
    pub connector: ConnectorId,
    /// Connector on the existing tile it was bonded to.
    pub target: ConnectorId,
    /// Tile owning `target`.
    pub parent: TileId,
    /// Resting pose of the new tile.
    pub goal_pose: Pose,
}
