//! Error types for fetching and executing group expressions.

use chrono::{DateTime, Utc};
use follow_algebra::ExprError;
use thiserror::Error;

/// Failures reported by a [`SocialGraphClient`](crate::SocialGraphClient).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The service throttled the request.
    #[error("rate limited: {remaining} of {limit} requests remaining, resets at {reset_at}")]
    RateLimited {
        /// Requests allowed per window.
        limit: u32,
        /// Requests left in the current window.
        remaining: u32,
        /// When the window resets.
        reset_at: DateTime<Utc>,
    },

    /// The account or list does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other service failure.
    #[error("social graph error: {0}")]
    Service(String),
}

/// Result type for client calls.
pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// Errors that can occur while executing an expression.
#[derive(Error, Debug)]
pub enum ExecutorError {
    /// Lexing, parsing or evaluation failed.
    #[error("expression error: {0}")]
    Expression(#[from] ExprError),

    /// Fetching one primitive failed; the whole run is aborted.
    #[error("fetching '{cache_key}' failed: {source}")]
    Fetch {
        /// Cache key of the primitive whose fetch failed.
        cache_key: String,
        /// The client's error, unchanged.
        #[source]
        source: GraphError,
    },

    /// Resolving result identifiers to handles failed.
    #[error("user lookup failed: {0}")]
    Lookup(#[source] GraphError),

    /// A registered fetch task finished without recording an outcome.
    #[error("fetch task for '{0}' did not complete")]
    TaskAbandoned(String),

    /// The fetch worker pool could not be started.
    #[error("cannot start fetch workers: {0}")]
    ThreadPool(String),
}

impl ExecutorError {
    /// The underlying client error, if this failure came from the service.
    pub fn graph_error(&self) -> Option<&GraphError> {
        match self {
            ExecutorError::Fetch { source, .. } | ExecutorError::Lookup(source) => Some(source),
            _ => None,
        }
    }

    /// Returns true if the service throttled a request.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self.graph_error(), Some(GraphError::RateLimited { .. }))
    }
}

/// Result type for executor operations.
pub type ExecResult<T> = std::result::Result<T, ExecutorError>;
