use thiserror::Error;

/// Errors that can occur when publishing to the event sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The broker rejected or failed to acknowledge the message.
    #[error("Broker error: {0}")]
    Broker(String),

    /// The sink could not be configured.
    #[error("Sink configuration error: {0}")]
    Config(String),

    /// The sink refused the message.
    #[error("Sink unavailable: {0}")]
    Unavailable(String),
}

/// Result type for sink operations.
pub type Result<T> = std::result::Result<T, SinkError>;
