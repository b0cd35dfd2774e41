//! Selection store — the one mutable component.
//!
//! Holds, per template, the last confirmed baseline and the operator's
//! working copy. Selections are ordered and duplicate-free, and a product
//! can be selected in at most one template across the whole store; both
//! invariants are enforced here rather than trusted to callers. Baselines
//! move only through [`SelectionStore::advance_baseline`], which the sync
//! coordinator calls after a confirmed assignment update.

use std::collections::{HashMap, HashSet};

use storyline_core::{Product, ProductId, Template, TemplateId};

use crate::error::SyncError;

#[derive(Debug, Clone)]
struct TemplateEntry {
    template: Template,
    selection: Vec<Product>,
}

/// Per-template baselines and working selections.
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    entries: Vec<TemplateEntry>,
}

impl SelectionStore {
    /// Seed the store from loaded templates, resolving each baseline id
    /// against the catalog pool.
    ///
    /// A baseline id missing from the pool, or already claimed by an
    /// earlier template, is skipped with a warning; the next diff will
    /// then show it as removed, which is exactly the reconciliation the
    /// engine exists to perform.
    pub fn new(templates: Vec<Template>, pool: &[Product]) -> Self {
        let by_id: HashMap<&ProductId, &Product> =
            pool.iter().map(|product| (&product.id, product)).collect();

        let mut claimed: HashSet<ProductId> = HashSet::new();
        let mut entries = Vec::with_capacity(templates.len());
        for template in templates {
            let mut selection = Vec::new();
            for id in &template.baseline_product_ids {
                if claimed.contains(id) {
                    tracing::warn!(
                        template = %template.id,
                        product = %id,
                        "baseline product already claimed by another template; skipping",
                    );
                    continue;
                }
                match by_id.get(id) {
                    Some(product) => {
                        claimed.insert(id.clone());
                        selection.push((*product).clone());
                    }
                    None => tracing::warn!(
                        template = %template.id,
                        product = %id,
                        "baseline references a product missing from the catalog",
                    ),
                }
            }
            entries.push(TemplateEntry {
                template,
                selection,
            });
        }

        Self { entries }
    }

    // -----------------------------------------------------------------------
    // Read side
    // -----------------------------------------------------------------------

    pub fn templates(&self) -> impl Iterator<Item = &Template> {
        self.entries.iter().map(|entry| &entry.template)
    }

    pub fn template(&self, template_id: &TemplateId) -> Option<&Template> {
        self.entry(template_id).map(|entry| &entry.template)
    }

    /// The working selection for a template, in display order.
    pub fn selection(&self, template_id: &TemplateId) -> Option<&[Product]> {
        self.entry(template_id).map(|entry| entry.selection.as_slice())
    }

    pub fn baseline_ids(&self, template_id: &TemplateId) -> Option<&[ProductId]> {
        self.entry(template_id)
            .map(|entry| entry.template.baseline_product_ids.as_slice())
    }

    pub fn current_ids(&self, template_id: &TemplateId) -> Option<Vec<ProductId>> {
        self.entry(template_id)
            .map(|entry| entry.selection.iter().map(|p| p.id.clone()).collect())
    }

    /// The union of every template's current selection.
    pub fn claimed_ids(&self) -> HashSet<ProductId> {
        self.entries
            .iter()
            .flat_map(|entry| entry.selection.iter().map(|p| p.id.clone()))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Write side
    // -----------------------------------------------------------------------

    /// Add a product to a template's selection.
    ///
    /// Rejects products already selected anywhere, including the target
    /// template itself.
    pub fn select(&mut self, template_id: &TemplateId, product: Product) -> Result<(), SyncError> {
        let owner = self.owner_of(&product.id);
        let entry = self
            .entry_mut(template_id)
            .ok_or_else(|| SyncError::UnknownTemplate(template_id.clone()))?;
        if let Some(template) = owner {
            return Err(SyncError::AlreadyClaimed {
                product: product.id.clone(),
                template,
            });
        }
        entry.selection.push(product);
        Ok(())
    }

    /// Remove a product from a template's selection.
    ///
    /// Returns whether the product was present; removing an absent id is
    /// a quiet no-op, matching how a remove control behaves when clicked
    /// twice.
    pub fn remove(
        &mut self,
        template_id: &TemplateId,
        product_id: &ProductId,
    ) -> Result<bool, SyncError> {
        let entry = self
            .entry_mut(template_id)
            .ok_or_else(|| SyncError::UnknownTemplate(template_id.clone()))?;
        let before = entry.selection.len();
        entry.selection.retain(|product| &product.id != product_id);
        Ok(entry.selection.len() < before)
    }

    /// Clear a template's selection entirely.
    pub fn clear(&mut self, template_id: &TemplateId) -> Result<(), SyncError> {
        let entry = self
            .entry_mut(template_id)
            .ok_or_else(|| SyncError::UnknownTemplate(template_id.clone()))?;
        entry.selection.clear();
        Ok(())
    }

    /// Record a confirmed assignment: the baseline becomes `ids`.
    ///
    /// Only the sync coordinator calls this, and only after the platform
    /// accepted that exact list.
    pub fn advance_baseline(
        &mut self,
        template_id: &TemplateId,
        ids: Vec<ProductId>,
    ) -> Result<(), SyncError> {
        let entry = self
            .entry_mut(template_id)
            .ok_or_else(|| SyncError::UnknownTemplate(template_id.clone()))?;
        entry.template.baseline_product_ids = ids;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn entry(&self, template_id: &TemplateId) -> Option<&TemplateEntry> {
        self.entries
            .iter()
            .find(|entry| &entry.template.id == template_id)
    }

    fn entry_mut(&mut self, template_id: &TemplateId) -> Option<&mut TemplateEntry> {
        self.entries
            .iter_mut()
            .find(|entry| &entry.template.id == template_id)
    }

    fn owner_of(&self, product_id: &ProductId) -> Option<TemplateId> {
        self.entries
            .iter()
            .find(|entry| entry.selection.iter().any(|p| &p.id == product_id))
            .map(|entry| entry.template.id.clone())
    }
}
