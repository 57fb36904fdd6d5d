use serde::Deserialize;
use std::env;
use url::Url;

use crate::error::ClientError;

pub const ENV_PLATFORM_URL: &str = "CHIRP_PLATFORM_URL";
pub const ENV_PLATFORM_ANON_KEY: &str = "CHIRP_PLATFORM_ANON_KEY";

/// Project endpoint and publishable key for the hosted platform. The anon key
/// only grants what row-level security allows; per-viewer access rides on the
/// session bearer token.
#[derive(Debug, Deserialize, Clone)]
pub struct PlatformConfig {
    pub url: String,
    pub anon_key: String,
}

impl PlatformConfig {
    pub fn new(url: &str, anon_key: &str) -> Result<Self, ClientError> {
        let parsed = Url::parse(url)?;
        Ok(Self {
            url: parsed.as_str().trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        })
    }

    pub fn from_env() -> Result<Self, ClientError> {
        let url =
            env::var(ENV_PLATFORM_URL).map_err(|_| ClientError::MissingEnv(ENV_PLATFORM_URL))?;
        let anon_key = env::var(ENV_PLATFORM_ANON_KEY)
            .map_err(|_| ClientError::MissingEnv(ENV_PLATFORM_ANON_KEY))?;
        PlatformConfig::new(&url, &anon_key)
    }
}
