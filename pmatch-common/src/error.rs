//! Common error types for PMATCH

use thiserror::Error;

use crate::archetype::Archetype;

/// Common result type for PMATCH operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across PMATCH crates
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// External image analysis failed or timed out (never retried locally)
    #[error("Image analysis unavailable: {0}")]
    AnalysisUnavailable(String),

    /// No catalog entry carries the winning archetype
    ///
    /// Unreachable with the builtin catalog; resolved by the fixed fallback pick.
    #[error("No candidate characters for archetype '{0}'")]
    NoCandidatesForArchetype(Archetype),
}
