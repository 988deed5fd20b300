use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::api::types::{ConnectorId, TileId};
use crate::components::pose::Pose;

/// Wildcard group: in an include list it accepts every group.
pub const ANY_GROUP: &str = "*";

fn default_group() -> String {
    ANY_GROUP.to_string()
}

/// Attachment point as authored on a tile template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorTemplate {
    /// Name, unique within its tile. Duplicates are dropped on instantiation.
    pub name: String,
    /// Group this connector belongs to.
    #[serde(default = "default_group")]
    pub group: String,
    /// Groups this connector may bond with. Empty means every group.
    #[serde(default)]
    pub include_groups: BTreeSet<String>,
    /// Groups this connector refuses, checked after `include_groups`.
    #[serde(default)]
    pub exclude_groups: BTreeSet<String>,
    /// Pose relative to the owning tile. Connectors face outward along +Z.
    #[serde(default)]
    pub local_pose: Pose,
}

impl ConnectorTemplate {
    pub fn new(name: impl Into<String>, local_pose: Pose) -> Self {
        Self {
            name: name.into(),
            group: default_group(),
            include_groups: BTreeSet::new(),
            exclude_groups: BTreeSet::new(),
            local_pose,
        }
    }

    // -- Builder pattern --

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn including(mut self, group: impl Into<String>) -> Self {
        self.include_groups.insert(group.into());
        self
    }

    pub fn excluding(mut self, group: impl Into<String>) -> Self {
        self.exclude_groups.insert(group.into());
        self
    }

    /// Whether this connector is willing to bond with a connector of `group`.
    pub fn accepts(&self, group: &str) -> bool {
        if self.exclude_groups.contains(group) {
            return false;
        }
        self.include_groups.is_empty()
            || self.include_groups.contains(ANY_GROUP)
            || self.include_groups.contains(group)
    }

    /// Both sides must accept each other.
    pub fn compatible_with(&self, other: &ConnectorTemplate) -> bool {
        self.accepts(&other.group) && other.accepts(&self.group)
    }
}

/// A live connector owned by a placed tile.
#[derive(Debug, Clone)]
pub struct Connector {
    pub id: ConnectorId,
    /// Back-reference to the owning tile.
    pub owner: TileId,
    pub template: ConnectorTemplate,
    /// World pose frozen when the owning tile was attached. Placement always
    /// targets this, never a mid-transition pose.
    pub goal_pose: Pose,
    /// Set once on bonding, never cleared.
    pub connected_to: Option<ConnectorId>,
}

impl Connector {
    #[inline]
    pub fn is_free(&self) -> bool {
        self.connected_to.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(group: &str) -> ConnectorTemplate {
        ConnectorTemplate::new("c", Pose::IDENTITY).with_group(group)
    }

    #[test]
    fn empty_include_accepts_everything() {
        assert!(conn("road").accepts("river"));
        assert!(conn("road").compatible_with(&conn("river")));
    }

    #[test]
    fn include_list_restricts() {
        let road = conn("road").including("road");
        assert!(road.accepts("road"));
        assert!(!road.accepts("river"));
    }

    #[test]
    fn wildcard_include_accepts_everything() {
        let any = conn("road").including(ANY_GROUP);
        assert!(any.accepts("river"));
    }

    #[test]
    fn exclude_wins_over_include() {
        let picky = conn("road").including(ANY_GROUP).excluding("river");
        assert!(!picky.accepts("river"));
        assert!(picky.accepts("road"));
    }

    #[test]
    fn compatibility_is_mutual() {
        let open = conn("river");
        let picky = conn("road").excluding("river");
        assert!(open.accepts("road"));
        assert!(!open.compatible_with(&picky));
        assert!(!picky.compatible_with(&open));
    }

    #[test]
    fn group_defaults_to_wildcard_in_json() {
        let c: ConnectorTemplate = serde_json::from_str(r#"{ "name": "north" }"#).unwrap();
        assert_eq!(c.group, ANY_GROUP);
        assert_eq!(c.local_pose, Pose::IDENTITY);
    }
}
