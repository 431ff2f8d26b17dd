use thiserror::Error;

pub type Result<T> = std::result::Result<T, TripError>;

#[derive(Error, Debug)]
pub enum TripError {
    /// Form input rejected before any call to the generation service.
    #[error("{0}")] Validation(String),
    #[error("configuration error: {0}")] Config(String),
    #[error("provider error: {0}")] Provider(String),
    #[error("network error: {0}")] Network(String),
    #[error("io error: {0}")] Io(#[from] std::io::Error),
    #[error("json error: {0}")] Json(#[from] serde_json::Error),
}

impl TripError {
    pub fn is_validation(&self) -> bool {
        matches!(self, TripError::Validation(_))
    }
}

impl From<reqwest::Error> for TripError {
    fn from(e: reqwest::Error) -> Self {
        TripError::Network(e.to_string())
    }
}
