//! Publish-mode decision over a selection diff.
//!
//! Rule precedence (first match wins):
//! 1. empty baseline, something added → `Publish`
//! 2. every baseline product removed, something added → `Publish`
//!    (a full swap reads as a fresh publish, not a republish)
//! 3. non-empty baseline, something added → `Republish`
//! 4. non-empty baseline, some but not all removed → `Republish`
//! 5. otherwise → `NoChange` (nothing changed, or a full clear with
//!    nothing added)

use crate::diff::SelectionDiff;

/// What submitting the current selection would mean for the live story.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishMode {
    NoChange,
    Publish,
    Republish,
}

/// Classify a diff. Total and deterministic: every diff maps to exactly
/// one mode.
pub fn publish_mode(diff: &SelectionDiff) -> PublishMode {
    let baseline = &diff.baseline_ids;
    let added = &diff.added;
    let removed = &diff.removed;

    if baseline.is_empty() && !added.is_empty() {
        return PublishMode::Publish;
    }
    // removed is always a subset of baseline, so equal length means the
    // whole baseline is being replaced.
    if removed.len() == baseline.len() && !added.is_empty() {
        return PublishMode::Publish;
    }
    if !baseline.is_empty() && !added.is_empty() {
        return PublishMode::Republish;
    }
    if !baseline.is_empty() && !removed.is_empty() && removed.len() < baseline.len() {
        return PublishMode::Republish;
    }
    PublishMode::NoChange
}
