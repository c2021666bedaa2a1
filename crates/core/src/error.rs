#[derive(Debug, thiserror::Error)]
pub enum WorklistError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to read session file: {0}")]
    SessionRead(std::io::Error),
    #[error("failed to write session file: {0}")]
    SessionWrite(std::io::Error),
    #[error("failed to remove session file: {0}")]
    SessionRemove(std::io::Error),
    #[error("session file schema mismatch at {path}: {message}")]
    SessionParse { path: String, message: String },
    #[error("failed to serialize session: {0}")]
    SessionRender(serde_yaml::Error),
}

pub type WorklistResult<T> = std::result::Result<T, WorklistError>;
