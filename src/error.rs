use thiserror::Error;

#[derive(Debug, Error)]
pub enum GrepUiError {
    /// The command template references a key that has no value in the store.
    #[error("no value for option `${{{0}}}` referenced by the command template")]
    MissingOption(String),

    #[error("failed to start command: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed to read command output: {0}")]
    CaptureRead(#[source] std::io::Error),
}
