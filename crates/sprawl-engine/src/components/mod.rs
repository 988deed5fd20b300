pub mod connector;
pub mod pose;
pub mod tile;
