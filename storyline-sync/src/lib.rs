//! # storyline-sync
//!
//! Selection reconciliation engine for story templates.
//!
//! The engine tracks, per template, the last platform-confirmed product
//! assignment (the baseline) and the operator's in-progress selection,
//! computes the difference between them, decides whether submitting would
//! publish, republish, or do nothing, and drives the two-stage remote
//! update through a [`StorefrontClient`]. Construct a [`SyncCoordinator`]
//! with an injected client and drain its notification channel for
//! operator-facing outcomes.

pub mod availability;
pub mod catalog;
pub mod client;
pub mod coordinator;
pub mod diff;
pub mod error;
pub mod publish;
pub mod selection;

pub use catalog::CatalogPool;
pub use client::{ClientError, StorefrontClient, StoryFlag};
pub use coordinator::{NotificationSender, PendingState, SubmitOutcome, SyncCoordinator};
pub use diff::SelectionDiff;
pub use error::SyncError;
pub use publish::{publish_mode, PublishMode};
pub use selection::SelectionStore;
