#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Http {0}: {1}")]
    Http(u16, String),

    #[error("Invalid platform URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Record not found")]
    NotFound,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
