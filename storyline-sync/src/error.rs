//! Error types for storyline-sync.

use thiserror::Error;

use storyline_core::{ProductId, TemplateId};

use crate::client::ClientError;

/// All errors that can arise from engine operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The template id is not known to the selection store.
    #[error("unknown template {0}")]
    UnknownTemplate(TemplateId),

    /// The product id is not present in the catalog pool.
    #[error("unknown product {0}")]
    UnknownProduct(ProductId),

    /// The product is already selected in some template's working copy.
    ///
    /// Callers that draw candidates from the availability view never hit
    /// this; it exists to keep the exclusivity invariant enforced at the
    /// store boundary as well.
    #[error("product {product} is already assigned to template {template}")]
    AlreadyClaimed {
        product: ProductId,
        template: TemplateId,
    },

    /// A submission for this template is still in flight.
    #[error("a submission is already in flight for template {0}")]
    SubmissionInFlight(TemplateId),

    /// A remote call failed (transport, rejection, or malformed response).
    #[error(transparent)]
    Client(#[from] ClientError),
}
