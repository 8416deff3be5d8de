//! Query-level errors.

use findtype_catalog::ResolveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    /// A slash option other than `/n`, or a slash anywhere but the front.
    #[error("bad slash format: {0}")]
    BadSlash(String),

    /// A token that is neither `/n` nor `key=value`.
    #[error("bad option format")]
    BadOption,

    #[error("size value is not an integer: {0}")]
    BadSize(String),

    /// A member requirement whose type expression did not resolve.
    #[error("failed to look up type '{expr}': {source}")]
    Resolution {
        expr: String,
        #[source]
        source: ResolveError,
    },

    /// The name pattern is not a valid regex.
    #[error("bad name pattern: {0}")]
    BadPattern(#[from] regex::Error),
}
