//! Component catalog and the selection it carries.
//!
//! The catalog is the single source of truth for which components are
//! selected. The address is derived from it with [`Catalog::to_address`] and
//! written back with [`Catalog::from_address`].

use std::collections::HashSet;

use crate::logic::query::CommonParams;
use crate::state::types::{ComponentKey, ComponentRef};

/// All known product/component pairs, in file order.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: Vec<ComponentRef>,
}

impl Catalog {
    /// Build a catalog from loaded records. Every entry starts unselected.
    #[must_use]
    pub fn new(mut entries: Vec<ComponentRef>) -> Self {
        for e in &mut entries {
            e.selected = false;
        }
        Self { entries }
    }

    /// All entries in catalog order.
    #[must_use]
    pub fn entries(&self) -> &[ComponentRef] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ComponentRef> {
        self.entries.get(index)
    }

    /// Iterate over the selected entries in catalog order.
    pub fn selected(&self) -> impl Iterator<Item = &ComponentRef> {
        self.entries.iter().filter(|c| c.selected)
    }

    /// Number of selected entries.
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selected().count()
    }

    /// What: Flip the selection flag of the entry with the given identity.
    ///
    /// Inputs:
    /// - `key`: `(product_id, component_id)` of the entry.
    ///
    /// Output:
    /// - `Some(new_state)` when the entry exists; `None` otherwise.
    pub fn toggle(&mut self, key: ComponentKey) -> Option<bool> {
        let entry = self.entries.iter_mut().find(|c| c.key() == key)?;
        entry.selected = !entry.selected;
        Some(entry.selected)
    }

    /// What: Overwrite the selection from address `component` values.
    ///
    /// Inputs:
    /// - `values`: `"{product}:{component}"` strings.
    ///
    /// Output:
    /// - None; every entry is set selected iff its address value appears in `values`.
    ///
    /// Details:
    /// - Full overwrite, not a merge. Unknown values are ignored.
    pub fn from_address<S: AsRef<str>>(&mut self, values: &[S]) {
        let wanted: HashSet<&str> = values.iter().map(AsRef::as_ref).collect();
        for e in &mut self.entries {
            e.selected = wanted.contains(e.address_value().as_str());
        }
    }

    /// The address `component` values of the selected entries, in catalog order.
    #[must_use]
    pub fn to_address(&self) -> Vec<String> {
        self.selected().map(ComponentRef::address_value).collect()
    }

    /// What: Collect the product and component filters shared by every search.
    ///
    /// Output:
    /// - Distinct selected product names and component names, each in first-seen catalog order.
    #[must_use]
    pub fn common_params(&self) -> CommonParams {
        let mut products: Vec<String> = Vec::new();
        let mut components: Vec<String> = Vec::new();
        for c in self.selected() {
            if !products.contains(&c.product_name) {
                products.push(c.product_name.clone());
            }
            if !components.contains(&c.component_name) {
                components.push(c.component_name.clone());
            }
        }
        CommonParams {
            products,
            components,
        }
    }

    /// What: Indices of entries matching a free-text filter.
    ///
    /// Inputs:
    /// - `filter`: Whitespace-separated words.
    ///
    /// Output:
    /// - Indices in catalog order; all indices when the filter is blank.
    ///
    /// Details:
    /// - Every word must occur, case-insensitively, in
    ///   `"{product}: {component} {description}"`.
    #[must_use]
    pub fn filtered_indices(&self, filter: &str) -> Vec<usize> {
        let words: Vec<String> = filter
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, c)| {
                if words.is_empty() {
                    return true;
                }
                let hay = format!("{} {}", c.label(), c.description).to_lowercase();
                words.iter().all(|w| hay.contains(w.as_str()))
            })
            .map(|(i, _)| i)
            .collect()
    }
}
