//! Sync coordinator — drives the two-stage remote publish.
//!
//! Per template the coordinator runs a small state machine
//! (`Idle → Submitting → {Idle, Failed} → Idle`) around two remote calls:
//! the assignment update replaces the template's product list with the
//! full current selection, then the flag update bulk-sets the visibility
//! flag for exactly the products the submission added or removed. The
//! baseline advances only after the assignment is confirmed; a flag
//! update failing afterwards leaves the baseline advanced and surfaces
//! its own failure notification.
//!
//! All collaborators are injected: the storefront client, the catalog
//! pool, and the notification channel the UI drains.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;

use storyline_core::{Notification, Product, ProductId, TemplateId};

use crate::availability;
use crate::catalog::CatalogPool;
use crate::client::{StorefrontClient, StoryFlag};
use crate::diff::{self, SelectionDiff};
use crate::error::SyncError;
use crate::publish::{publish_mode, PublishMode};
use crate::selection::SelectionStore;

/// Sending half of the operator notification channel.
pub type NotificationSender = mpsc::UnboundedSender<Notification>;

const SUBMIT_FAILURE: (&str, &str) = (
    "Operation Failed",
    "There was an error updating your story. Please try again.",
);
const REMOVE_ALL_FAILURE: (&str, &str) = (
    "Remove All Failed",
    "There was an error removing products. Please try again.",
);

// ---------------------------------------------------------------------------
// Submission state
// ---------------------------------------------------------------------------

/// Where a template currently is in its submission lifecycle.
///
/// Never persisted; a `Failed` template is re-armed by the next attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingState {
    #[default]
    Idle,
    Submitting,
    Failed,
}

/// The confirmed result of a submission, used for the outcome label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Published,
    Republished,
    ProductsRemoved,
}

impl SubmitOutcome {
    fn notification(self) -> Notification {
        match self {
            SubmitOutcome::Published => Notification::success(
                "Story Published",
                "Your story has been successfully published.",
            ),
            SubmitOutcome::Republished => Notification::success(
                "Story Republished",
                "Your story has been successfully republished with the updated products.",
            ),
            SubmitOutcome::ProductsRemoved => Notification::success(
                "Products Removed",
                "All products have been successfully removed from the story.",
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

/// Owns the selection store and catalog pool and serializes submissions
/// per template.
pub struct SyncCoordinator {
    client: Arc<dyn StorefrontClient>,
    catalog: CatalogPool,
    store: SelectionStore,
    pending: HashMap<TemplateId, PendingState>,
    notifications: NotificationSender,
}

impl SyncCoordinator {
    pub fn new(
        client: Arc<dyn StorefrontClient>,
        catalog: CatalogPool,
        store: SelectionStore,
        notifications: NotificationSender,
    ) -> Self {
        Self {
            client,
            catalog,
            store,
            pending: HashMap::new(),
            notifications,
        }
    }

    /// Load the catalog pool and templates from the platform and seed the
    /// store from the template baselines.
    pub async fn connect(
        client: Arc<dyn StorefrontClient>,
        notifications: NotificationSender,
    ) -> Result<Self, SyncError> {
        let catalog = CatalogPool::load(client.as_ref()).await?;
        let templates = client.list_templates().await?;
        let store = SelectionStore::new(templates, catalog.products());
        Ok(Self::new(client, catalog, store, notifications))
    }

    // -----------------------------------------------------------------------
    // Derived views
    // -----------------------------------------------------------------------

    pub fn catalog(&self) -> &CatalogPool {
        &self.catalog
    }

    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    pub fn pending(&self, template_id: &TemplateId) -> PendingState {
        self.pending.get(template_id).copied().unwrap_or_default()
    }

    pub fn diff(&self, template_id: &TemplateId) -> Result<SelectionDiff, SyncError> {
        let baseline = self
            .store
            .baseline_ids(template_id)
            .ok_or_else(|| SyncError::UnknownTemplate(template_id.clone()))?;
        let current = self
            .store
            .current_ids(template_id)
            .ok_or_else(|| SyncError::UnknownTemplate(template_id.clone()))?;
        Ok(diff::diff(baseline, &current))
    }

    pub fn publish_mode(&self, template_id: &TemplateId) -> Result<PublishMode, SyncError> {
        Ok(publish_mode(&self.diff(template_id)?))
    }

    /// Whether the publish control should be enabled for this template.
    pub fn can_submit(&self, template_id: &TemplateId) -> bool {
        if self.pending(template_id) == PendingState::Submitting {
            return false;
        }
        self.publish_mode(template_id)
            .map(|mode| mode != PublishMode::NoChange)
            .unwrap_or(false)
    }

    /// Products no template has claimed, in catalog order.
    pub fn available(&self) -> Vec<Product> {
        availability::available(self.catalog.products(), &self.store.claimed_ids())
    }

    // -----------------------------------------------------------------------
    // Selection editing
    // -----------------------------------------------------------------------

    /// Add a catalog product to a template's working selection.
    pub fn select(
        &mut self,
        template_id: &TemplateId,
        product_id: &ProductId,
    ) -> Result<(), SyncError> {
        let product = self
            .catalog
            .product(product_id)
            .cloned()
            .ok_or_else(|| SyncError::UnknownProduct(product_id.clone()))?;
        self.store.select(template_id, product)
    }

    /// Remove a single product from a template's working selection.
    ///
    /// If this removal empties a selection that had a published baseline,
    /// the emptiness is pushed to the platform immediately so the remote
    /// side never stays stale after a sequence of individual removals.
    /// That submission announces itself only through the ordinary outcome
    /// notifications; its error is logged, not returned.
    pub async fn remove(
        &mut self,
        template_id: &TemplateId,
        product_id: &ProductId,
    ) -> Result<(), SyncError> {
        let removed = self.store.remove(template_id, product_id)?;
        if !removed {
            return Ok(());
        }

        let now_empty = self
            .store
            .selection(template_id)
            .map(|selection| selection.is_empty())
            .unwrap_or(false);
        let had_baseline = self
            .store
            .baseline_ids(template_id)
            .map(|baseline| !baseline.is_empty())
            .unwrap_or(false);
        if now_empty && had_baseline {
            if let Err(err) = self.submit_with(template_id, SUBMIT_FAILURE).await {
                tracing::warn!(
                    template = %template_id,
                    error = %err,
                    "auto-submit after final removal failed",
                );
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    /// Publish the template's current selection.
    ///
    /// Returns `Ok(None)` when there is nothing to do (no changes, or an
    /// empty catalog pool — the blocking precondition).
    pub async fn submit(
        &mut self,
        template_id: &TemplateId,
    ) -> Result<Option<SubmitOutcome>, SyncError> {
        if self.catalog.is_empty() {
            tracing::debug!(template = %template_id, "catalog pool is empty; submit is inert");
            return Ok(None);
        }
        self.submit_with(template_id, SUBMIT_FAILURE).await
    }

    /// Empty the template on the platform.
    ///
    /// The working copy is cleared eagerly so the operator sees the empty
    /// state while the call is in flight; on failure it stays empty and
    /// the operator retries. A template that was never published comes
    /// back as a purely local clear.
    pub async fn remove_all(
        &mut self,
        template_id: &TemplateId,
    ) -> Result<Option<SubmitOutcome>, SyncError> {
        if self.catalog.is_empty() {
            tracing::debug!(template = %template_id, "catalog pool is empty; remove-all is inert");
            return Ok(None);
        }
        if self.pending(template_id) == PendingState::Submitting {
            return Err(SyncError::SubmissionInFlight(template_id.clone()));
        }
        let selection_empty = self
            .store
            .selection(template_id)
            .ok_or_else(|| SyncError::UnknownTemplate(template_id.clone()))?
            .is_empty();
        if selection_empty {
            return Ok(None);
        }

        self.store.clear(template_id)?;
        self.submit_with(template_id, REMOVE_ALL_FAILURE).await
    }

    async fn submit_with(
        &mut self,
        template_id: &TemplateId,
        failure: (&'static str, &'static str),
    ) -> Result<Option<SubmitOutcome>, SyncError> {
        if self.pending(template_id) == PendingState::Submitting {
            return Err(SyncError::SubmissionInFlight(template_id.clone()));
        }
        let delta = self.diff(template_id)?;
        if !delta.has_changes() {
            return Ok(None);
        }

        // The outcome label is decided from the pre-submit diff.
        let mode = publish_mode(&delta);
        let outcome = if delta.current_ids.is_empty() {
            SubmitOutcome::ProductsRemoved
        } else if mode == PublishMode::Publish {
            SubmitOutcome::Published
        } else {
            SubmitOutcome::Republished
        };

        self.pending
            .insert(template_id.clone(), PendingState::Submitting);
        tracing::info!(
            template = %template_id,
            products = delta.current_ids.len(),
            added = delta.added.len(),
            removed = delta.removed.len(),
            "assigning products to template",
        );

        if let Err(err) = self
            .client
            .assign_products(template_id, &delta.current_ids)
            .await
        {
            tracing::warn!(template = %template_id, error = %err, "template assignment failed");
            self.pending
                .insert(template_id.clone(), PendingState::Failed);
            self.notify(Notification::error(failure.0, failure.1));
            return Err(err.into());
        }

        self.store
            .advance_baseline(template_id, delta.current_ids.clone())?;
        self.pending.insert(template_id.clone(), PendingState::Idle);
        self.notify(outcome.notification());

        self.sync_story_flags(&delta).await;
        self.refresh_catalog().await;
        Ok(Some(outcome))
    }

    /// Flag every added product in and every removed product out.
    async fn sync_story_flags(&mut self, delta: &SelectionDiff) {
        let entries = self.flag_entries(delta);
        if entries.is_empty() {
            return;
        }
        tracing::debug!(entries = entries.len(), "updating story visibility flags");
        match self.client.set_story_flags(&entries).await {
            Ok(()) => {
                self.notify(Notification::info(
                    "Story Flags Updated",
                    "Product visibility flags are in sync with the published story.",
                ));
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "story flag update failed after a confirmed assignment",
                );
                self.notify(Notification::error(
                    "Flag Sync Failed",
                    "The story was updated, but product visibility flags could not be \
                     changed. Toggle the affected products to retry.",
                ));
            }
        }
    }

    fn flag_entries(&self, delta: &SelectionDiff) -> Vec<StoryFlag> {
        let mut entries = Vec::with_capacity(delta.added.len() + delta.removed.len());
        for (ids, story) in [(&delta.added, true), (&delta.removed, false)] {
            for id in ids {
                match self.catalog.product(id) {
                    Some(product) => entries.push(StoryFlag {
                        external_id: product.external_id,
                        story,
                    }),
                    None => tracing::warn!(
                        product = %id,
                        "product missing from catalog; visibility flag not updated",
                    ),
                }
            }
        }
        entries
    }

    // -----------------------------------------------------------------------
    // Per-product flag toggle
    // -----------------------------------------------------------------------

    /// Toggle a single product's story visibility, independent of any
    /// template assignment.
    pub async fn set_story_flag(
        &mut self,
        product_id: &ProductId,
        story: bool,
    ) -> Result<(), SyncError> {
        let external_id = self
            .catalog
            .product(product_id)
            .ok_or_else(|| SyncError::UnknownProduct(product_id.clone()))?
            .external_id;
        let entries = [StoryFlag { external_id, story }];
        tracing::info!(product = %product_id, story, "toggling story flag");
        match self.client.set_story_flags(&entries).await {
            Ok(()) => {
                let title = if story {
                    "Story Added in Product Theme"
                } else {
                    "Story Removed in Product Theme"
                };
                self.notify(Notification::success(
                    title,
                    "The product's story visibility has been updated.",
                ));
                self.refresh_catalog().await;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(product = %product_id, error = %err, "story flag toggle failed");
                self.notify(Notification::error(
                    "Flag Update Failed",
                    "The product's story visibility could not be changed. Please try again.",
                ));
                Err(err.into())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    async fn refresh_catalog(&mut self) {
        let client = Arc::clone(&self.client);
        if let Err(err) = self.catalog.refresh(client.as_ref()).await {
            tracing::warn!(error = %err, "catalog refresh after sync failed");
        }
    }

    fn notify(&self, notification: Notification) {
        // A dropped receiver just means nobody is listening anymore.
        let _ = self.notifications.send(notification);
    }

    #[cfg(test)]
    fn mark_submitting(&mut self, template_id: &TemplateId) {
        self.pending
            .insert(template_id.clone(), PendingState::Submitting);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
