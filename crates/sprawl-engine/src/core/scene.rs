use crate::api::types::TileId;
use crate::components::pose::Pose;

/// What the growth runner needs from the host scene. Setting a pose must be
/// atomic and immediately visible; hierarchy is the host's business.
pub trait SceneHost {
    /// A tile was placed; show it at `pose`.
    fn spawn_tile(&mut self, tile: TileId, template: &str, pose: Pose);

    /// Move a tile (transition step or final snap).
    fn set_pose(&mut self, tile: TileId, pose: Pose);
}

/// A tile as the scene sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub tile: TileId,
    pub template: String,
    pub pose: Pose,
}

/// Simple in-memory scene using a flat Vec.
/// Designed for headless runs and tests (hundreds of tiles, not millions).
#[derive(Debug)]
pub struct Scene {
    nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            nodes: Vec::with_capacity(256),
        }
    }

    pub fn get(&self, tile: TileId) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.tile == tile)
    }

    pub fn get_mut(&mut self, tile: TileId) -> Option<&mut SceneNode> {
        self.nodes.iter_mut().find(|n| n.tile == tile)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneHost for Scene {
    fn spawn_tile(&mut self, tile: TileId, template: &str, pose: Pose) {
        self.nodes.push(SceneNode {
            tile,
            template: template.to_string(),
            pose,
        });
    }

    fn set_pose(&mut self, tile: TileId, pose: Pose) {
        if let Some(node) = self.get_mut(tile) {
            node.pose = pose;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn spawn_and_move() {
        let mut scene = Scene::new();
        let id = TileId(1);
        scene.spawn_tile(id, "hub", Pose::IDENTITY);
        scene.set_pose(id, Pose::from_position(Vec3::new(1.0, 2.0, 3.0)));
        let node = scene.get(id).unwrap();
        assert_eq!(node.template, "hub");
        assert_eq!(node.pose.position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn unknown_tile_pose_is_ignored() {
        let mut scene = Scene::new();
        scene.set_pose(TileId(4), Pose::IDENTITY);
        assert_eq!(scene.len(), 0);
    }
}
