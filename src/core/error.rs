//! Error types for the gold options chart

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GoldError {
    #[error("Invalid expiration: expected a year-month such as 202508, got {0:?}")]
    InvalidExpiration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request failed with HTTP status {status}")]
    Http { status: u16 },

    #[error("Response contained no option data")]
    EmptyResponse,

    #[error("Data error: {0}")]
    Data(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Display error: {0}")]
    Display(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
}

pub type GoldResult<T> = Result<T, GoldError>;

impl GoldError {
    pub fn invalid_expiration(raw: impl Into<String>) -> Self {
        Self::InvalidExpiration(raw.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}
