// core/placement.rs
//
// Where a new tile goes once one of its connectors is bonded to a free one.
// Connectors face outward, so mating pieces must face each other: the new
// connector's world pose is the target's goal pose turned half a turn about
// the target's own up axis.

use std::f32::consts::PI;

use crate::components::pose::Pose;

/// World pose a connector must take to mate with `target_goal`.
#[inline]
pub fn mating_pose(target_goal: &Pose) -> Pose {
    target_goal.turned_about_up(PI)
}

/// Pose for a new tile whose connector sits at `local` (tile space) so that
/// the connector lands on the mating pose of `target_goal`.
pub fn attach_pose(target_goal: &Pose, local: &Pose) -> Pose {
    Pose::solve_parent(&mating_pose(target_goal), local)
}
