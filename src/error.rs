//! Error handling for the doorwatch crate.

/// A specialized `Result` type for doorwatch operations.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// The main error type for sensor monitoring operations.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error (bad LED pattern, invalid poll interval)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Hardware could not be claimed or configured at startup
    #[error("Hardware initialization error: {0}")]
    HardwareInit(String),

    /// Hardware operation failed while running
    #[error("Hardware error: {0}")]
    Hardware(String),

    /// Web server error
    #[error("Web server error: {0}")]
    WebServer(String),
}

impl MonitorError {
    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new hardware initialization error
    pub fn hardware_init_error(msg: impl Into<String>) -> Self {
        Self::HardwareInit(msg.into())
    }

    /// Create a new hardware error
    pub fn hardware_error(msg: impl Into<String>) -> Self {
        Self::Hardware(msg.into())
    }

    /// Create a new web server error
    pub fn web_server_error(msg: impl Into<String>) -> Self {
        Self::WebServer(msg.into())
    }
}
