// extensions/mod.rs
//
// Animation side of growth: easing curves and transition tasks.
// Decoupled from the graph: the runner feeds them goal poses and tile ids.

pub mod easing;
pub mod transition;

pub use easing::{lerp_vec3, slerp_unclamped, Easing};
pub use transition::{
    Direction, LinearSlide, SpinAndSlide, TransitionLaw, TransitionScheduler, TransitionTask,
};
