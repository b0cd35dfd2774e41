//! Platform connection configuration.

use serde::{Deserialize, Serialize};

use crate::error::PlatformError;

pub const ENV_BASE_URL: &str = "STORYLINE_BASE_URL";
pub const ENV_SHOP: &str = "STORYLINE_SHOP";
pub const ENV_TOKEN: &str = "STORYLINE_TOKEN";

/// Where and how to reach the platform's admin API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// API root, e.g. `https://api.shop.example/api`.
    pub base_url: String,
    /// The storefront this session operates on.
    pub shop: String,
    /// Bearer token for the admin API.
    pub token: String,
}

impl PlatformConfig {
    pub fn new(
        base_url: impl Into<String>,
        shop: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            shop: shop.into(),
            token: token.into(),
        }
    }

    /// Read the configuration from `STORYLINE_BASE_URL`, `STORYLINE_SHOP`
    /// and `STORYLINE_TOKEN`.
    pub fn from_env() -> Result<Self, PlatformError> {
        Ok(Self {
            base_url: require(ENV_BASE_URL)?,
            shop: require(ENV_SHOP)?,
            token: require(ENV_TOKEN)?,
        })
    }

    /// Join `path` onto the API root, tolerating stray slashes on either
    /// side.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn require(key: &'static str) -> Result<String, PlatformError> {
    std::env::var(key).map_err(|_| PlatformError::MissingEnv(key))
}
