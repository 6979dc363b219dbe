//! Error types for the telemetry engine

use thiserror::Error;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while configuring or running the engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid configuration value
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The population was already created for this engine
    #[error("Engine already initialized with {agents} agents")]
    AlreadyInitialized { agents: usize },

    /// No status labels to draw from
    #[error("Status catalog is empty")]
    EmptyStatusCatalog,

    /// A snapshot sink rejected a snapshot
    #[error("Sink '{sink}' failed: {message}")]
    Sink { sink: String, message: String },

    /// Snapshot serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// I/O error while reading config or writing to the console
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A tick panicked and was contained by the scheduler
    #[error("Tick {tick} panicked: {message}")]
    TickPanicked { tick: u64, message: String },

    /// Internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EngineError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a sink error
    pub fn sink(sink: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Sink {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
