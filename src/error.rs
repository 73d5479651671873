use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankingError {
    #[error("invalid ranking configuration: {0}")]
    Configuration(String),

    #[error("unknown algorithm version: {0}")]
    UnknownVersion(String),

    #[error("degenerate calibration range: max {max} must be greater than min {min}")]
    DegenerateRange { min: f64, max: f64 },

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("invalid ranking period: {0}")]
    InvalidPeriod(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RankingError>;
