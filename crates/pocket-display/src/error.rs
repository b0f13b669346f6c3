use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("panel I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("render error: {0}")]
    Render(String),
}

pub type DisplayResult<T> = Result<T, DisplayError>;
