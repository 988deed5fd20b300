use thiserror::Error;

use crate::api::types::{ConnectorId, TileId};

/// Fatal configuration problems. The engine refuses to start on any of these.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tile catalog has no entries")]
    EmptyCatalog,
    #[error("tile catalog total bias must be positive, got {total}")]
    NonPositiveBias { total: f32 },
    #[error("catalog entry {index} has invalid bias {bias}")]
    InvalidBias { index: usize, bias: f32 },
    #[error("tile template '{name}' has no connectors")]
    ZeroConnectorTemplate { name: String },
    #[error("initial tile list is present but empty")]
    EmptyInitialTiles,
    #[error("invalid trigger configuration: {0}")]
    InvalidTrigger(String),
    #[error("invalid transition configuration: {0}")]
    InvalidTransition(String),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Why a drawn tile could not be attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The instantiated tile exposes no connectors at all.
    NoConnectors,
    /// No free, group-compatible connector turned up within the retry bound.
    NoCompatibleConnector,
    /// None of the candidate targets was still free.
    NoFreeCandidate,
}

/// A spawn that did not happen. Expected and frequent; never escalated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("tile '{template}' rejected after {attempts} attempts: {reason:?}")]
pub struct RejectedError {
    pub reason: RejectReason,
    /// Connector draws spent before giving up.
    pub attempts: u32,
    /// Name of the discarded template.
    pub template: String,
}

/// Graph bookkeeping went wrong. Always a bug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("tile {0:?} has a free connector but is missing from the free list")]
    FreeListMissing(TileId),
    #[error("tile {0:?} is on the free list with no free connector")]
    FreeListStale(TileId),
    #[error("connector {a:?} bonds to {b:?} but not the other way round")]
    AsymmetricBond { a: ConnectorId, b: ConnectorId },
    #[error("connector {connector:?} is listed on tile {tile:?} but owned elsewhere")]
    OwnerMismatch { tile: TileId, connector: ConnectorId },
}
