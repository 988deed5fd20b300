use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::api::types::{ConnectorId, TileId};
use crate::components::connector::ConnectorTemplate;
use crate::components::pose::Pose;

/// A placeable piece as authored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileTemplate {
    pub name: String,
    #[serde(default)]
    pub connectors: Vec<ConnectorTemplate>,
}

impl TileTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            connectors: Vec::new(),
        }
    }

    pub fn with_connector(mut self, connector: ConnectorTemplate) -> Self {
        self.connectors.push(connector);
        self
    }

    /// `count` connectors spread evenly around +Y at `radius`, each facing
    /// outward. Connector 0 faces +Z.
    pub fn ring(name: impl Into<String>, count: usize, radius: f32) -> Self {
        let mut template = Self::new(name);
        for i in 0..count {
            let angle = TAU * i as f32 / count as f32;
            let rotation = Quat::from_rotation_y(angle);
            template.connectors.push(ConnectorTemplate::new(
                format!("c{i}"),
                Pose::new(rotation * Vec3::new(0.0, 0.0, radius), rotation),
            ));
        }
        template
    }
}

/// A freshly instantiated tile, not yet part of the graph.
///
/// Produced by a `TileFactory`; connectors are already cleaned up.
#[derive(Debug, Clone, PartialEq)]
pub struct TileBlueprint {
    pub template: String,
    pub connectors: Vec<ConnectorTemplate>,
}

/// A tile placed in the graph.
#[derive(Debug, Clone)]
pub struct Tile {
    pub id: TileId,
    pub template: String,
    /// Owned connectors, in template order.
    pub connectors: Vec<ConnectorId>,
    /// Current world pose. Trails `goal_pose` while a transition plays.
    pub pose: Pose,
    /// Resting pose captured at attach time.
    pub goal_pose: Pose,
}
