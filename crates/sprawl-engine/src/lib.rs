pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod assets;
pub mod extensions;
pub mod runner;

// Re-export key types at crate root for convenience
pub use api::config::{GrowthConfig, TransitionConfig, TriggerConfig};
pub use api::error::{ConfigError, InvariantViolation, RejectReason, RejectedError};
pub use api::types::{AttachedEvent, ConnectorId, TileId};
pub use assets::catalog::{CatalogEntry, TileCatalog};
pub use assets::factory::{cleanup_connectors, TemplateFactory, TileFactory};
pub use components::connector::{Connector, ConnectorTemplate, ANY_GROUP};
pub use components::pose::Pose;
pub use components::tile::{Tile, TileBlueprint, TileTemplate};
pub use core::engine::{GrowthEngine, GrowthResult, CONNECTOR_DRAW_ATTEMPTS};
pub use core::graph::{GraphSnapshot, TileGraph, TileRecord};
pub use core::scene::{Scene, SceneHost, SceneNode};
pub use runner::{GrowthRunner, TickReport};
pub use systems::trigger::{ProximityTrigger, TickInput, TimedTrigger, TriggerPolicy};

// Extensions: transitions are decoupled from growth
pub use extensions::{
    Easing, lerp_vec3, slerp_unclamped,
    Direction, LinearSlide, SpinAndSlide, TransitionLaw, TransitionScheduler, TransitionTask,
};
