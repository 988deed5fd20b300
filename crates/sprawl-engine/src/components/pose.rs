// components/pose.rs
//
// Rigid-body pose (position + orientation) and the composition rules used to
// place tiles relative to connectors. No scene graph: a "child" pose is just
// parent ∘ local, and solving for the parent inverts that.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position + orientation in 3-D space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    #[serde(default)]
    pub position: Vec3,
    #[serde(default = "identity_rotation")]
    pub rotation: Quat,
}

fn identity_rotation() -> Quat {
    Quat::IDENTITY
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self { position, rotation: Quat::IDENTITY }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// World pose of something sitting at `local` relative to `self`.
    #[inline]
    pub fn compose(&self, local: &Pose) -> Pose {
        Pose {
            position: self.position + self.rotation * local.position,
            rotation: (self.rotation * local.rotation).normalize(),
        }
    }

    /// The pose that undoes `self`: `p.compose(&p.inverse())` is identity.
    #[inline]
    pub fn inverse(&self) -> Pose {
        let inv = self.rotation.inverse();
        Pose {
            position: inv * -self.position,
            rotation: inv,
        }
    }

    /// Map a point from this pose's local frame into the parent frame.
    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * point
    }

    /// Solve `parent` in `parent ∘ local = child`.
    pub fn solve_parent(child: &Pose, local: &Pose) -> Pose {
        child.compose(&local.inverse())
    }

    /// Rotate about this pose's own up axis (+Y) by `angle` radians.
    pub fn turned_about_up(&self, angle: f32) -> Pose {
        Pose {
            position: self.position,
            rotation: (self.rotation * Quat::from_rotation_y(angle)).normalize(),
        }
    }

    /// Tolerance comparison. Quaternions `q` and `-q` are the same rotation.
    pub fn approx_eq(&self, other: &Pose, epsilon: f32) -> bool {
        self.position.abs_diff_eq(other.position, epsilon)
            && self.rotation.dot(other.rotation).abs() >= 1.0 - epsilon
    }
}
