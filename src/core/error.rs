//! Engine errors.
//!
//! Almost nothing in the engine fails loudly: a malformed ability or a
//! missing token template degrades to "apply nothing". Internally, fallible
//! lookups still return `Result<_, EngineError>` so the degradation point is
//! explicit and can emit a diagnostic.

use thiserror::Error;

use super::entity::PermanentId;

/// Errors produced by engine lookups and data loading.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{0} is not on the board")]
    UnknownPermanent(PermanentId),

    #[error("{0} is not attached to anything")]
    NotAttached(PermanentId),

    #[error("{id} has no {stat}")]
    MissingStat { id: PermanentId, stat: &'static str },

    #[error("no token template named '{0}'")]
    MissingTemplate(String),

    #[error("invalid quantity '{0}'")]
    InvalidQuantity(String),

    #[error("failed to load token template data: {0}")]
    TemplateData(#[from] serde_json::Error),
}
