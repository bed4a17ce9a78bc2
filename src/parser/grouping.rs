use std::collections::HashMap;

use tracing::{debug, warn};

use super::variants::{implicit_base, VariantAxis, VariantMatch, DEFAULT_TITLE};
use crate::catalog::CatalogItem;

/// Lowercase, spaces to hyphens, one pass of `--` collapsing.
pub fn handle_for(code: &str) -> String {
    code.to_lowercase().replace(' ', "-").replace("--", "-")
}

#[derive(Debug, Clone)]
pub struct Group {
    pub key: String,
    pub axis: VariantAxis,
    pub base_title: String,
    pub items: Vec<CatalogItem>,
}

/// Output of the reconcile pass.
#[derive(Debug, Clone, Default)]
pub struct Grouped {
    pub groups: Vec<Group>,
    pub standalone: Vec<CatalogItem>,
    pub reconciled: usize,
    pub conflicts: usize,
}

/// Accumulates routed rows until the whole table has been seen.
#[derive(Debug, Default)]
pub struct GroupingState {
    groups: Vec<Group>,
    index: HashMap<String, usize>,
    pending: Vec<CatalogItem>,
    conflicts: usize,
}

impl GroupingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route pass: a matched row joins (or opens) the group keyed by its base
    /// code, an unmatched row waits in the pending set with the commercial
    /// temperature guess.
    pub fn route(&mut self, mut item: CatalogItem, matched: Option<VariantMatch>) {
        let Some(m) = matched else {
            let guess = implicit_base(&item.title);
            item.axis = guess.axis;
            item.label = guess.label;
            item.sort_key = guess.sort_key;
            self.pending.push(item);
            return;
        };

        let key = handle_for(&m.base);
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                debug!(key = %key, axis = m.axis.as_str(), "opening group");
                self.groups.push(Group {
                    key: key.clone(),
                    axis: m.axis,
                    base_title: m.base.clone(),
                    items: Vec::new(),
                });
                self.index.insert(key, self.groups.len() - 1);
                self.groups.len() - 1
            }
        };

        let group = &mut self.groups[idx];
        if group.axis != m.axis {
            // Filed under the group's axis; the first row decides.
            warn!(
                code = %item.title,
                group = %group.key,
                group_axis = group.axis.as_str(),
                row_axis = m.axis.as_str(),
                "variant axis conflicts with its group"
            );
            self.conflicts += 1;
        }

        item.axis = group.axis;
        item.label = m.label;
        item.sort_key = m.sort_key;
        group.items.push(item);
    }

    /// Reconcile pass: a pending row whose own handle names a group is that
    /// group's unlabeled base; everything else is a single-variant product.
    pub fn reconcile(self) -> Grouped {
        let GroupingState {
            mut groups,
            index,
            pending,
            conflicts,
        } = self;

        let mut standalone = Vec::new();
        let mut reconciled = 0;
        for mut item in pending {
            match index.get(&item.handle) {
                Some(&idx) => {
                    let group = &mut groups[idx];
                    item.axis = group.axis;
                    item.label = group.axis.base_label().to_string();
                    item.sort_key = group.axis.base_sort_key();
                    group.items.push(item);
                    reconciled += 1;
                }
                None => {
                    item.axis = VariantAxis::Title;
                    item.label = DEFAULT_TITLE.to_string();
                    standalone.push(item);
                }
            }
        }

        Grouped {
            groups,
            standalone,
            reconciled,
            conflicts,
        }
    }
}

// ── Tests ──
