pub mod engine;
pub mod graph;
pub mod placement;
pub mod rng;
pub mod scene;
