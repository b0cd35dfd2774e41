//! Baseline-vs-current selection difference.

use std::collections::HashSet;

use storyline_core::ProductId;

/// The difference between a template's baseline and its current selection.
///
/// `added` keeps current-selection order, `removed` keeps baseline order;
/// ordering matters only for display and for the flag-update batch, never
/// for correctness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionDiff {
    pub baseline_ids: Vec<ProductId>,
    pub current_ids: Vec<ProductId>,
    pub added: Vec<ProductId>,
    pub removed: Vec<ProductId>,
}

impl SelectionDiff {
    /// True iff the selection differs from the baseline in either
    /// direction.
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }
}

/// Compute `added = current − baseline` and `removed = baseline − current`.
///
/// Pure; O(n) via hashed membership. Empty baseline (first publish) and
/// empty current (full removal) are ordinary inputs.
pub fn diff(baseline_ids: &[ProductId], current_ids: &[ProductId]) -> SelectionDiff {
    let baseline: HashSet<&ProductId> = baseline_ids.iter().collect();
    let current: HashSet<&ProductId> = current_ids.iter().collect();

    let added = current_ids
        .iter()
        .filter(|id| !baseline.contains(*id))
        .cloned()
        .collect();
    let removed = baseline_ids
        .iter()
        .filter(|id| !current.contains(*id))
        .cloned()
        .collect();

    SelectionDiff {
        baseline_ids: baseline_ids.to_vec(),
        current_ids: current_ids.to_vec(),
        added,
        removed,
    }
}
