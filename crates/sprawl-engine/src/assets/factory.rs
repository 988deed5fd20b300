use std::collections::HashSet;

use crate::components::connector::ConnectorTemplate;
use crate::components::tile::{TileBlueprint, TileTemplate};

/// Boundary to whatever actually builds tile instances (scene objects,
/// prefabs, meshes). The engine calls it synchronously and expects a
/// fully-formed blueprint back.
pub trait TileFactory {
    /// Build a new instance of `template`.
    fn instantiate(&mut self, template: &TileTemplate) -> TileBlueprint;

    /// Take back an instance that was never placed.
    fn release(&mut self, _blueprint: TileBlueprint) {}
}

/// Drop duplicate connector entries, keeping the first of each name.
pub fn cleanup_connectors(connectors: &[ConnectorTemplate]) -> Vec<ConnectorTemplate> {
    let mut seen = HashSet::with_capacity(connectors.len());
    let mut kept = Vec::with_capacity(connectors.len());
    for connector in connectors {
        if seen.insert(connector.name.as_str()) {
            kept.push(connector.clone());
        }
    }
    kept
}

/// Default factory: clones the template's connectors and counts traffic.
#[derive(Debug, Default)]
pub struct TemplateFactory {
    instantiated: usize,
    released: usize,
}

impl TemplateFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instances handed out so far.
    pub fn instantiated(&self) -> usize {
        self.instantiated
    }

    /// Instances returned through `release`.
    pub fn released(&self) -> usize {
        self.released
    }
}

impl TileFactory for TemplateFactory {
    fn instantiate(&mut self, template: &TileTemplate) -> TileBlueprint {
        self.instantiated += 1;
        TileBlueprint {
            template: template.name.clone(),
            connectors: cleanup_connectors(&template.connectors),
        }
    }

    fn release(&mut self, _blueprint: TileBlueprint) {
        self.released += 1;
    }
}
