//! Domain types for the Storyline engine.
//!
//! Catalog ids are opaque strings; only [`ExternalId`] is numeric because
//! the platform's bulk flag operation addresses products by its own id.
//! All types are serializable/deserializable via serde.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed identifier for a catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed identifier for a story template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateId(pub String);

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TemplateId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TemplateId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// The platform's own numeric id for a product.
///
/// Used by the bulk visibility-flag operation; never used as a key inside
/// the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalId(pub u64);

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for ExternalId {
    fn from(n: u64) -> Self {
        Self(n)
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// The platform's listing state for a product.
///
/// Anything the platform reports other than `ACTIVE` is carried verbatim in
/// [`ActivationStatus::Inactive`] for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationStatus {
    Active,
    Inactive(String),
}

impl ActivationStatus {
    /// Map the platform's raw status string.
    pub fn from_platform(status: &str) -> Self {
        if status == "ACTIVE" {
            ActivationStatus::Active
        } else {
            ActivationStatus::Inactive(status.to_owned())
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ActivationStatus::Active)
    }
}

impl fmt::Display for ActivationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivationStatus::Active => write!(f, "ACTIVE"),
            ActivationStatus::Inactive(other) => write!(f, "{other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A catalog product, immutable once loaded within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub external_id: ExternalId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_url: Option<String>,
}

/// A story template and its last platform-confirmed product assignment.
///
/// `baseline_product_ids` is an ordered set: no duplicates, order as
/// accepted by the platform. It is advanced only after a confirmed
/// assignment update, never optimistically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    #[serde(default)]
    pub baseline_product_ids: Vec<ProductId>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
