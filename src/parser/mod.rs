pub mod classify;
pub mod grouping;
pub mod normalize;
pub mod variants;

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::catalog::{self, CatalogItem};
use crate::config::Settings;
use classify::classify;
use grouping::{handle_for, Grouped, GroupingState};
use normalize::{normalize, price, NormalizedRow, RawRow};
use variants::{match_variant, VariantAxis, DEFAULT_TITLE};

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub rows_read: usize,
    pub skipped: BTreeMap<&'static str, usize>,
    pub groups: usize,
    pub grouped_items: usize,
    pub reconciled: usize,
    pub standalone: usize,
    pub conflicts: usize,
    pub supplemental: usize,
    pub supplemental_skipped: usize,
    pub emitted: usize,
}

impl RunSummary {
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }

    pub fn print(&self) {
        println!("Rows read:      {}", self.rows_read);
        println!("Skipped:        {}", self.skipped_total());
        for (reason, n) in &self.skipped {
            println!("  {:<22} {}", reason, n);
        }
        println!(
            "Groups:         {} ({} variants, {} reconciled bases)",
            self.groups, self.grouped_items, self.reconciled
        );
        println!("Standalone:     {}", self.standalone);
        println!(
            "Supplemental:   {} ({} already listed)",
            self.supplemental, self.supplemental_skipped
        );
        if self.conflicts > 0 {
            println!("Axis conflicts: {}", self.conflicts);
        }
        println!("Emitted rows:   {}", self.emitted);
    }
}

pub struct CatalogRun {
    pub items: Vec<CatalogItem>,
    pub summary: RunSummary,
}

/// Route pass over every row, then the reconcile pass. Grouping needs the
/// whole table, so nothing is emitted until all rows are in.
pub fn group_rows(rows: &[RawRow], settings: &Settings) -> (Grouped, RunSummary) {
    let mut summary = RunSummary {
        rows_read: rows.len(),
        ..RunSummary::default()
    };
    let mut state = GroupingState::new();

    for raw in rows {
        let row = match normalize(raw) {
            Ok(row) => row,
            Err(reason) => {
                debug!(code = ?raw.code, reason = reason.as_str(), "row skipped");
                *summary.skipped.entry(reason.as_str()).or_default() += 1;
                continue;
            }
        };
        let item = build_item(row, settings);
        let matched = match_variant(&item.title, item.category);
        state.route(item, matched);
    }

    let grouped = state.reconcile();
    summary.groups = grouped.groups.len();
    summary.grouped_items = grouped.groups.iter().map(|g| g.items.len()).sum();
    summary.reconciled = grouped.reconciled;
    summary.standalone = grouped.standalone.len();
    summary.conflicts = grouped.conflicts;
    (grouped, summary)
}

/// Four stages: normalize → classify/match → group (route + reconcile) → emit.
pub fn process_rows(rows: &[RawRow], settings: &Settings) -> CatalogRun {
    let (grouped, mut summary) = group_rows(rows, settings);
    let emitted = catalog::emit(grouped, settings);

    summary.supplemental = emitted.supplemental;
    summary.supplemental_skipped = emitted.supplemental_skipped;
    summary.emitted = emitted.items.len();
    info!(
        rows = summary.rows_read,
        skipped = summary.skipped_total(),
        groups = summary.groups,
        standalone = summary.standalone,
        emitted = summary.emitted,
        "catalog built"
    );

    CatalogRun {
        items: emitted.items,
        summary,
    }
}

fn build_item(row: NormalizedRow, settings: &Settings) -> CatalogItem {
    let classification = classify(&row.code, &row.description);
    CatalogItem {
        handle: handle_for(&row.code),
        title: row.code,
        description: row.description,
        category: classification.category,
        tags: classification.tags,
        axis: VariantAxis::Title,
        label: DEFAULT_TITLE.to_string(),
        sort_key: 0.0,
        price: price(row.cost, settings.markup),
        inventory_qty: settings.inventory_qty,
        inventory_policy: settings.inventory_policy.clone(),
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::catalog::write_csv;
    use crate::parser::normalize::CostCell;
    use proptest::prelude::*;

    fn raw(code: &str, description: &str, cost: f64) -> RawRow {
        RawRow {
            code: Some(code.to_string()),
            description: Some(description.to_string()),
            unit_cost: CostCell::Number(cost),
        }
    }

    fn settings() -> Settings {
        Settings {
            supplemental: Vec::new(),
            ..Settings::default()
        }
    }

    fn price_list() -> Vec<RawRow> {
        vec![
            raw("SFP-1G-SX-I", "1G SX 850nm industrial", 12.0),
            raw("DAC-10G-SFP-3M", "10G SFP+ DAC cable 3m", 15.0),
            raw("SFP-1G-SX", "1G SX 850nm", 8.0),
            raw("SFP-10G-ZR-DWDM-C17", "10G DWDM ZR C17", 300.0),
            raw("DAC-10G-SFP-0-5M", "10G SFP+ DAC cable 0.5m", 11.0),
            raw("XYZ-HP", "HP coded duplicate", 1.0),
            raw("SFP-10G-ZR-DWDM", "10G DWDM ZR tunable", 900.0),
            raw("SFP-1G-CWDM-1490", "1G CWDM 1490nm", 40.0),
            raw("SFP-1G-CWDM-1470", "1G CWDM 1470nm", 40.0),
            raw("QSFP28-100G-SR4", "100G SR4", 60.0),
            raw("SFP-1G-SX-E", "1G SX 850nm extended", 10.0),
            raw("SFP-10G-LR", "10G LR compatible HW", 20.0),
        ]
    }

    fn labels_for<'a>(items: &'a [CatalogItem], handle: &str) -> Vec<&'a str> {
        items
            .iter()
            .filter(|i| i.handle == handle)
            .map(|i| i.label.as_str())
            .collect()
    }

    #[test]
    fn full_price_list() {
        let run = process_rows(&price_list(), &settings());
        let items = &run.items;

        assert_eq!(
            labels_for(items, "sfp-1g-sx"),
            vec![
                "Commercial (0/70°C)",
                "Extended (-10/+80°C)",
                "Industrial (-40/+85°C)"
            ]
        );
        assert_eq!(labels_for(items, "dac-10g-sfp"), vec!["0.5m", "3m"]);
        assert_eq!(
            labels_for(items, "sfp-10g-zr-dwdm"),
            vec!["Tunable / Unspecified", "Channel 17 (C17)"]
        );
        assert_eq!(labels_for(items, "sfp-1g-cwdm"), vec!["1470nm", "1490nm"]);
        assert_eq!(labels_for(items, "qsfp28-100g-sr4"), vec!["Default Title"]);
        assert!(items.iter().all(|i| !i.title.contains("-HP")));
        assert!(items.iter().all(|i| i.handle != "sfp-10g-lr"));

        let s = &run.summary;
        assert_eq!(s.rows_read, 12);
        assert_eq!(s.skipped_total(), 2);
        assert_eq!(s.groups, 4);
        assert_eq!(s.reconciled, 2);
        assert_eq!(s.standalone, 1);
        assert_eq!(s.emitted, 10);
    }

    #[test]
    fn group_titles_use_base_code() {
        let run = process_rows(&price_list(), &settings());
        let dac: Vec<_> = run.items.iter().filter(|i| i.handle == "dac-10g-sfp").collect();
        assert!(dac.iter().all(|i| i.title == "DAC-10G-SFP"));
        assert_eq!(dac[0].price, 11.77);
    }

    #[test]
    fn groups_then_standalone_then_supplemental() {
        let run = process_rows(&price_list(), &Settings::default());
        let handles: Vec<_> = run.items.iter().map(|i| i.handle.as_str()).collect();
        let first_group = handles.iter().position(|h| *h == "sfp-1g-sx").unwrap();
        let standalone = handles.iter().position(|h| *h == "qsfp28-100g-sr4").unwrap();
        let supplemental = handles.iter().position(|h| *h == "qsfp-dd-400g-fr4").unwrap();
        assert_eq!(first_group, 0);
        assert!(standalone < supplemental);
        assert_eq!(run.summary.supplemental, 4);
    }

    #[test]
    fn excluded_code_emits_nothing() {
        let run = process_rows(&[raw("XYZ-HP", "module", 5.0)], &settings());
        assert!(run.items.is_empty());
        assert_eq!(run.summary.skipped.get("-HP duplicate"), Some(&1));
    }

    #[test]
    fn byte_identical_across_runs() {
        let render = || {
            let run = process_rows(&price_list(), &Settings::default());
            let mut buf = Vec::new();
            write_csv(&run.items, "Vaonix", &mut buf).unwrap();
            buf
        };
        assert_eq!(render(), render());
    }

    fn code_strategy() -> impl Strategy<Value = String> {
        (
            prop::sample::select(vec!["SFP-1G-SX", "SFP-10G-LR", "DAC-10G-SFP", "SFP-10G-DWDM"]),
            prop::sample::select(vec!["", "-I", "-E", "-1M", "-3M", "-0-5M", "-C21", "-C17", "-1550"]),
        )
            .prop_map(|(base, suffix)| format!("{}{}", base, suffix))
    }

    proptest! {
        #[test]
        fn handles_partition_groups_and_standalone(
            codes in prop::collection::vec(code_strategy(), 1..20)
        ) {
            let rows: Vec<_> = codes.iter().map(|c| raw(c, "module", 10.0)).collect();
            let (grouped, _) = group_rows(&rows, &settings());

            let keys: HashSet<_> = grouped.groups.iter().map(|g| g.key.clone()).collect();
            for item in &grouped.standalone {
                prop_assert!(!keys.contains(&item.handle));
            }

            let run = process_rows(&rows, &settings());
            for w in run.items.windows(2) {
                if w[0].handle == w[1].handle {
                    prop_assert!(w[0].sort_key <= w[1].sort_key);
                }
            }
            prop_assert_eq!(run.items.len(), rows.len());
        }
    }
}
