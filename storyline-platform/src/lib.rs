//! # storyline-platform
//!
//! HTTP implementation of the engine's storefront client trait against
//! the platform's admin API. Build a [`PlatformConfig`], wrap it in an
//! [`HttpStorefront`], and hand it to the sync coordinator.

pub mod config;
pub mod error;
pub mod http;

pub use config::PlatformConfig;
pub use error::PlatformError;
pub use http::HttpStorefront;
