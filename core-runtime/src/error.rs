use thiserror::Error;

/// Runtime setup failures: configuration, capability wiring and logging.
#[derive(Error, Debug)]
pub enum Error {
    /// A configuration value is missing or out of range
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required host capability was neither injected nor defaulted
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    /// A default capability failed to initialize
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
