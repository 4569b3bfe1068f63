use thiserror::Error;

use crate::LoadError;

/// Unified error type covering rule table loading, parsing and I/O.
///
/// Returned by convenience methods like
/// [`RuleIndex::from_json()`](crate::RuleIndex::from_json) and
/// [`RuleIndex::from_file()`](crate::RuleIndex::from_file).
#[derive(Debug, Error)]
pub enum TierpriceError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("malformed rule table: {0}")]
    Json(#[from] serde_json::Error),
}
