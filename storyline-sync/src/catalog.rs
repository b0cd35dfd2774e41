//! Catalog pool — read-only view of the known products and their platform
//! activation status.
//!
//! The pool is loaded through an injected [`StorefrontClient`] and
//! refreshed after successful syncs (cache invalidation owned by the
//! platform, not by the engine). Nothing in the engine mutates it.

use std::collections::HashMap;

use storyline_core::{ActivationStatus, ExternalId, Product, ProductId};

use crate::client::{ClientError, StorefrontClient};

/// All known products plus the platform's listing state for each.
#[derive(Debug, Clone, Default)]
pub struct CatalogPool {
    products: Vec<Product>,
    activation: HashMap<ExternalId, ActivationStatus>,
}

impl CatalogPool {
    /// Load the pool from the platform.
    pub async fn load(client: &dyn StorefrontClient) -> Result<Self, ClientError> {
        let mut pool = Self::default();
        pool.refresh(client).await?;
        Ok(pool)
    }

    /// Re-pull products and activation from the platform.
    pub async fn refresh(&mut self, client: &dyn StorefrontClient) -> Result<(), ClientError> {
        let products = client.list_products().await?;
        let activation = client.list_activation().await?;
        tracing::debug!(
            products = products.len(),
            activation = activation.len(),
            "catalog pool refreshed",
        );
        self.products = products;
        self.activation = activation;
        Ok(())
    }

    /// Every known product, in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    /// Whether the platform lists the product as active.
    ///
    /// Unknown ids read as inactive — if the platform never reported a
    /// status, the product is not live.
    pub fn is_active(&self, external_id: ExternalId) -> bool {
        self.activation
            .get(&external_id)
            .map(ActivationStatus::is_active)
            .unwrap_or(false)
    }

    pub fn activation(&self, external_id: ExternalId) -> Option<&ActivationStatus> {
        self.activation.get(&external_id)
    }

    /// Blocking precondition: with no products there is nothing any
    /// template operation could do.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
