use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("value formatter failed: {0}")]
    Format(String),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("invalid json options: {0}")]
    Json(String),
}

impl ChartError {
    pub(crate) fn options(message: impl Into<String>) -> Self {
        Self::InvalidOptions(message.into())
    }

    pub(crate) fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

impl From<std::io::Error> for ChartError {
    fn from(err: std::io::Error) -> Self {
        Self::Backend(err.to_string())
    }
}
