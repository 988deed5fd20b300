// extensions/transition.rs
//
// Transition tasks animate a freshly attached tile from a start pose to its
// frozen goal pose. Decoupled from the graph: the scheduler only knows tile
// ids and hands poses back through a callback.
//
// Usage:
//   let mut transitions = TransitionScheduler::new(&config.transition, seed);
//   let start = transitions.start(tile, goal, Direction::In);
//   transitions.tick(dt, |tile, pose| scene.set_pose(tile, pose));

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::api::config::TransitionConfig;
use crate::api::types::TileId;
use crate::components::pose::Pose;
use crate::core::rng::{random_rotation, seeded_stream, StreamRng, TRANSITION_STREAM};
use super::easing::{lerp_vec3, slerp_unclamped, Easing};

/// Which way a transition runs relative to the goal pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// From the offset start into the goal.
    #[default]
    In,
    /// From the goal out to the offset.
    Out,
}

/// A time-varying pose for one tile. Progress `alpha` runs over [0, 1].
pub trait TransitionTask {
    fn pose_at(&self, alpha: f32) -> Pose;

    /// Exact pose to snap to once `alpha` reaches 1.
    fn final_pose(&self) -> Pose;
}

/// Which easing law new transitions use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionLaw {
    /// No animation; tiles appear at their goal.
    None,
    /// Straight slide from `goal + offset`, eased out.
    LinearSlide {
        #[serde(default = "default_slide_offset")]
        offset: Vec3,
        #[serde(default)]
        easing: Easing,
    },
    /// Slide plus a spin that unwinds (and overshoots) toward the goal
    /// orientation. `spin: None` draws a random orientation per task.
    SpinAndSlide {
        #[serde(default = "default_spin_offset")]
        offset: Vec3,
        #[serde(default)]
        spin: Option<Quat>,
        #[serde(default = "default_spin_multiplier")]
        spin_multiplier: f32,
        #[serde(default)]
        easing: Easing,
    },
}

impl Default for TransitionLaw {
    fn default() -> Self {
        TransitionLaw::LinearSlide {
            offset: default_slide_offset(),
            easing: Easing::default(),
        }
    }
}

fn default_slide_offset() -> Vec3 {
    Vec3::new(0.0, -512.0, 0.0)
}

fn default_spin_offset() -> Vec3 {
    Vec3::new(0.0, -100.0, 0.0)
}

fn default_spin_multiplier() -> f32 {
    8.0
}

/// Slide along a straight line between the goal and `goal + offset`.
#[derive(Debug, Clone, Copy)]
pub struct LinearSlide {
    pub goal: Pose,
    pub offset: Vec3,
    pub easing: Easing,
    pub direction: Direction,
}

impl TransitionTask for LinearSlide {
    fn pose_at(&self, alpha: f32) -> Pose {
        let eased = self.easing.apply(alpha);
        let away = self.goal.position + self.offset;
        let position = match self.direction {
            Direction::In => lerp_vec3(away, self.goal.position, eased),
            Direction::Out => lerp_vec3(self.goal.position, away, eased),
        };
        Pose::new(position, self.goal.rotation)
    }

    fn final_pose(&self) -> Pose {
        match self.direction {
            Direction::In => self.goal,
            Direction::Out => Pose::new(self.goal.position + self.offset, self.goal.rotation),
        }
    }
}

/// Linear slide whose orientation swings from `spin` back to the goal.
#[derive(Debug, Clone, Copy)]
pub struct SpinAndSlide {
    pub goal: Pose,
    pub offset: Vec3,
    pub spin: Quat,
    pub spin_multiplier: f32,
    pub easing: Easing,
    pub direction: Direction,
}

impl TransitionTask for SpinAndSlide {
    fn pose_at(&self, alpha: f32) -> Pose {
        let eased = self.easing.apply(alpha);
        let away = self.goal.position + self.offset;
        let (position, swing) = match self.direction {
            Direction::In => (lerp_vec3(away, self.goal.position, eased), 1.0 - eased),
            Direction::Out => (lerp_vec3(self.goal.position, away, eased), eased),
        };
        let rotation = slerp_unclamped(self.goal.rotation, self.spin, swing * self.spin_multiplier);
        Pose::new(position, rotation)
    }

    fn final_pose(&self) -> Pose {
        match self.direction {
            Direction::In => self.goal,
            Direction::Out => self.pose_at(1.0),
        }
    }
}

struct ActiveTransition {
    tile: TileId,
    alpha: f32,
    task: Box<dyn TransitionTask>,
}

/// Holds active transitions and advances each once per tick. A plain
/// polling loop: nothing suspends, finished tasks are dropped.
pub struct TransitionScheduler {
    rate: f32,
    law: TransitionLaw,
    active: Vec<ActiveTransition>,
    rng: StreamRng,
}

impl TransitionScheduler {
    pub fn new(config: &TransitionConfig, seed: u64) -> Self {
        Self {
            rate: config.rate,
            law: config.law,
            active: Vec::new(),
            rng: seeded_stream(seed, TRANSITION_STREAM),
        }
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Build a task for `goal` with the configured law. `None` when the law
    /// is `TransitionLaw::None`.
    pub fn make_task(&mut self, goal: Pose, direction: Direction) -> Option<Box<dyn TransitionTask>> {
        match self.law {
            TransitionLaw::None => None,
            TransitionLaw::LinearSlide { offset, easing } => Some(Box::new(LinearSlide {
                goal,
                offset,
                easing,
                direction,
            })),
            TransitionLaw::SpinAndSlide { offset, spin, spin_multiplier, easing } => {
                let spin = spin.unwrap_or_else(|| random_rotation(&mut self.rng));
                Some(Box::new(SpinAndSlide {
                    goal,
                    offset,
                    spin,
                    spin_multiplier,
                    easing,
                    direction,
                }))
            }
        }
    }

    /// Start animating `tile` toward `goal`. Returns the pose to show right
    /// now: the start of the transition, or the final pose if there is none.
    pub fn start(&mut self, tile: TileId, goal: Pose, direction: Direction) -> Pose {
        match self.make_task(goal, direction) {
            Some(task) => {
                let first = task.pose_at(0.0);
                self.add(tile, task);
                first
            }
            None => goal,
        }
    }

    /// Track a caller-built task. Replaces any task already running on `tile`.
    pub fn add(&mut self, tile: TileId, task: Box<dyn TransitionTask>) {
        self.cancel(tile);
        self.active.push(ActiveTransition { tile, alpha: 0.0, task });
    }

    /// Abandon the task on `tile`. Nothing needs releasing.
    pub fn cancel(&mut self, tile: TileId) -> bool {
        let before = self.active.len();
        self.active.retain(|t| t.tile != tile);
        self.active.len() != before
    }

    /// Advance every task by `dt × rate` and report each new pose through
    /// `apply`. Tasks reaching alpha 1 report their exact final pose and are
    /// dropped. Returns how many finished.
    pub fn tick(&mut self, dt: f32, mut apply: impl FnMut(TileId, Pose)) -> usize {
        let step = dt * self.rate;
        let before = self.active.len();
        self.active.retain_mut(|t| {
            t.alpha += step;
            if t.alpha >= 1.0 {
                apply(t.tile, t.task.final_pose());
                false
            } else {
                apply(t.tile, t.task.pose_at(t.alpha));
                true
            }
        });
        before - self.active.len()
    }

    pub fn is_animating(&self, tile: TileId) -> bool {
        self.active.iter().any(|t| t.tile == tile)
    }

    /// Progress of the task on `tile`, if any.
    pub fn progress(&self, tile: TileId) -> Option<f32> {
        self.active.iter().find(|t| t.tile == tile).map(|t| t.alpha)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}
