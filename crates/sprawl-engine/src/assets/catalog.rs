use serde::{Deserialize, Serialize};

use crate::api::error::ConfigError;
use crate::components::tile::TileTemplate;

/// One spawnable template and its relative weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub template: TileTemplate,
    /// Relative spawn weight. Lower = rarer. Must be > 0.
    #[serde(default = "default_bias")]
    pub bias: f32,
}

/// Weighted list of tile templates available for spawning.
/// Loaded from JSON alongside the rest of the session configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileCatalog {
    #[serde(default)]
    pub entries: Vec<CatalogEntry>,
    /// If present, the seed tile is picked uniformly from these instead of
    /// a weighted draw from `entries`.
    #[serde(default)]
    pub initial_tiles: Option<Vec<TileTemplate>>,
}

fn default_bias() -> f32 {
    1.0
}

impl TileCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, template: TileTemplate, bias: f32) -> Self {
        self.entries.push(CatalogEntry { template, bias });
        self
    }

    pub fn with_initial_tile(mut self, template: TileTemplate) -> Self {
        self.initial_tiles.get_or_insert_with(Vec::new).push(template);
        self
    }

    /// Parse a catalog from a JSON string. Does not validate.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn total_bias(&self) -> f32 {
        self.entries.iter().map(|e| e.bias).sum()
    }

    /// Reject catalogs the engine cannot grow from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entries.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        for (index, entry) in self.entries.iter().enumerate() {
            if !(entry.bias.is_finite() && entry.bias > 0.0) {
                return Err(ConfigError::InvalidBias { index, bias: entry.bias });
            }
        }
        let total = self.total_bias();
        if !(total.is_finite() && total > 0.0) {
            return Err(ConfigError::NonPositiveBias { total });
        }

        let initial = self.initial_tiles.as_deref().unwrap_or_default();
        if self.initial_tiles.is_some() && initial.is_empty() {
            return Err(ConfigError::EmptyInitialTiles);
        }
        let templates = self.entries.iter().map(|e| &e.template).chain(initial);
        for template in templates {
            if template.connectors.is_empty() {
                return Err(ConfigError::ZeroConnectorTemplate {
                    name: template.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Walk the cumulative bias ranges and return the index whose
    /// `[sum, sum + bias)` contains `r`. Falls back to the last entry when
    /// rounding leaves `r` past the final range.
    pub fn select(&self, r: f32) -> usize {
        let mut sum = 0.0;
        for (i, entry) in self.entries.iter().enumerate() {
            if r >= sum && r < sum + entry.bias {
                return i;
            }
            sum += entry.bias;
        }
        self.entries.len().saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(biases: &[f32]) -> TileCatalog {
        biases.iter().enumerate().fold(TileCatalog::new(), |c, (i, &b)| {
            c.with_entry(TileTemplate::ring(format!("t{i}"), 2, 1.0), b)
        })
    }

    #[test]
    fn select_walks_cumulative_ranges() {
        let c = catalog(&[1.0, 3.0]);
        assert_eq!(c.select(0.0), 0);
        assert_eq!(c.select(0.99), 0);
        assert_eq!(c.select(1.0), 1);
        assert_eq!(c.select(3.99), 1);
    }

    #[test]
    fn select_falls_back_to_last_entry() {
        let c = catalog(&[1.0, 3.0]);
        assert_eq!(c.select(4.0), 1);
        assert_eq!(c.select(f32::NAN), 1);
    }

    #[test]
    fn validate_empty() {
        assert!(matches!(TileCatalog::new().validate(), Err(ConfigError::EmptyCatalog)));
    }

    #[test]
    fn validate_bad_bias() {
        let c = catalog(&[1.0, 0.0]);
        assert!(matches!(c.validate(), Err(ConfigError::InvalidBias { index: 1, .. })));
        let c = catalog(&[-2.0]);
        assert!(matches!(c.validate(), Err(ConfigError::InvalidBias { index: 0, .. })));
    }

    #[test]
    fn validate_zero_connector_template() {
        let c = TileCatalog::new().with_entry(TileTemplate::new("blank"), 1.0);
        match c.validate() {
            Err(ConfigError::ZeroConnectorTemplate { name }) => assert_eq!(name, "blank"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn validate_empty_initial_list() {
        let mut c = catalog(&[1.0]);
        c.initial_tiles = Some(Vec::new());
        assert!(matches!(c.validate(), Err(ConfigError::EmptyInitialTiles)));
    }

    #[test]
    fn parse_catalog_with_default_bias() {
        let json = r#"{
            "entries": [
                { "template": { "name": "hub", "connectors": [{ "name": "n" }] } },
                { "template": { "name": "arm", "connectors": [{ "name": "n" }] }, "bias": 0.25 }
            ],
            "initial_tiles": [{ "name": "start", "connectors": [{ "name": "n" }] }]
        }"#;
        let c = TileCatalog::from_json(json).unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.entries[0].bias, 1.0);
        assert_eq!(c.total_bias(), 1.25);
        assert_eq!(c.initial_tiles.as_ref().map(Vec::len), Some(1));
        assert!(c.validate().is_ok());
    }
}
