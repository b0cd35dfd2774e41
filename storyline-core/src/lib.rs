//! Storyline core library — domain types shared by the engine and the
//! platform client.
//!
//! Public API surface:
//! - [`types`] — id newtypes and domain structs
//! - [`notify`] — operator-facing outcome notifications

pub mod notify;
pub mod types;

pub use notify::{Notification, Severity};
pub use types::{ActivationStatus, ExternalId, Product, ProductId, Template, TemplateId};
