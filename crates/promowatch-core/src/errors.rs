/// Core error type for the relay.
///
/// Adapter crates should map their specific errors into this type so the
/// event loop can handle failures consistently (fatal at startup vs logged
/// and swallowed).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
