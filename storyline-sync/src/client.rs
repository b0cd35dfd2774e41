//! Storefront client trait — the engine's only view of the platform.
//!
//! The coordinator and catalog pool operate exclusively through this
//! trait, so backends are pluggable (HTTP for production, scripted
//! in-memory clients for tests). `assign_products` has full-replace
//! semantics: the supplied list becomes the complete assignment and
//! omission removes.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use storyline_core::{ActivationStatus, ExternalId, Product, ProductId, Template, TemplateId};

/// One entry of the bulk visibility-flag update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoryFlag {
    pub external_id: ExternalId,
    pub story: bool,
}

/// A remote call failure.
///
/// The coordinator treats every variant identically — any failed step is a
/// failed step regardless of cause.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a usable response (network, timeout).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The platform answered with a non-success status.
    #[error("platform rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The platform answered, but the body was not what the contract says.
    #[error("malformed platform response: {0}")]
    Protocol(String),
}

/// Remote operations consumed by the engine.
#[async_trait]
pub trait StorefrontClient: Send + Sync {
    /// Replace a template's product assignment with `product_ids`.
    async fn assign_products(
        &self,
        template_id: &TemplateId,
        product_ids: &[ProductId],
    ) -> Result<Template, ClientError>;

    /// Bulk-set the per-product story visibility flag.
    ///
    /// All-or-nothing per the remote contract: a single failing entry
    /// surfaces as one aggregated error for the whole batch. An empty
    /// batch is a no-op.
    async fn set_story_flags(&self, entries: &[StoryFlag]) -> Result<(), ClientError>;

    async fn list_templates(&self) -> Result<Vec<Template>, ClientError>;

    async fn list_products(&self) -> Result<Vec<Product>, ClientError>;

    async fn list_activation(&self) -> Result<HashMap<ExternalId, ActivationStatus>, ClientError>;
}
