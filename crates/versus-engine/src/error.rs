//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and simulation execution.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: versus_core::config::ConfigError,
    },

    /// Agent spawning failed.
    #[error("spawner error: {source}")]
    Spawner {
        /// The underlying agent error.
        #[from]
        source: versus_agents::AgentError,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: versus_core::runner::RunnerError,
    },

    /// The notification log could not be opened.
    #[error("failed to open event log {path}: {source}")]
    EventLog {
        /// The path that was configured.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The logging filter could not be built.
    #[error("invalid log filter: {message}")]
    Logging {
        /// Description of the failure.
        message: String,
    },
}
