//! Error types for the find-in-page engine.
//!
//! Only boundary-level failures are represented here. Transient DOM
//! staleness (detached nodes, empty selections) and cancellation are not
//! errors: the engine degrades those to no-ops or zero/null results.

/// Result type alias for find-in-page operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types surfaced at the API boundary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The search term did not compile as a pattern.
    ///
    /// The term is used as a regex without escaping, so metacharacters act
    /// as wildcards and malformed patterns (e.g. a lone `(`) fail here.
    #[error("Invalid search pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending search term
        pattern: String,
        /// Compiler message
        reason: String,
    },

    /// No page is attached to the session.
    #[error("No active page context: {0}")]
    NoActiveContext(String),
}
