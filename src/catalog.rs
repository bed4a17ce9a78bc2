use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use itertools::Itertools;
use tracing::warn;

use crate::config::{Settings, SupplementalEntry};
use crate::error::CatalogError;
use crate::parser::classify::{classify, Category};
use crate::parser::grouping::{handle_for, Grouped};
use crate::parser::normalize::price;
use crate::parser::variants::{VariantAxis, DEFAULT_TITLE};

/// Column order of the import table.
pub const COLUMNS: [&str; 15] = [
    "Handle",
    "Title",
    "Body (HTML)",
    "Vendor",
    "Type",
    "Tags",
    "Published",
    "Option1 Name",
    "Option1 Value",
    "Variant Grams",
    "Variant Inventory Qty",
    "Variant Inventory Policy",
    "Variant Price",
    "Variant Compare At Price",
    "Image Src",
];

const VARIANT_GRAMS: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub handle: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub axis: VariantAxis,
    pub label: String,
    pub sort_key: f64,
    pub price: f64,
    pub inventory_qty: u32,
    pub inventory_policy: String,
}

impl CatalogItem {
    fn record(&self, vendor: &str) -> [String; 15] {
        [
            self.handle.clone(),
            self.title.clone(),
            self.description.clone(),
            vendor.to_string(),
            self.category.product_type().to_string(),
            self.tags.iter().join(", "),
            "TRUE".to_string(),
            self.axis.as_str().to_string(),
            self.label.clone(),
            VARIANT_GRAMS.to_string(),
            self.inventory_qty.to_string(),
            self.inventory_policy.clone(),
            format!("{:.2}", self.price),
            String::new(),
            String::new(),
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct Emitted {
    pub items: Vec<CatalogItem>,
    pub supplemental: usize,
    pub supplemental_skipped: usize,
}

/// Groups first (first-encounter order, variants by ascending sort key), then
/// standalone items, then the supplemental entries.
pub fn emit(grouped: Grouped, settings: &Settings) -> Emitted {
    let mut items = Vec::new();

    for mut group in grouped.groups {
        group.items.sort_by(|a, b| a.sort_key.total_cmp(&b.sort_key));
        for mut item in group.items {
            item.handle = group.key.clone();
            item.title = group.base_title.clone();
            items.push(item);
        }
    }

    items.extend(grouped.standalone);

    let mut seen: HashSet<String> = items.iter().map(|i| i.handle.clone()).collect();
    let mut supplemental = 0;
    let mut supplemental_skipped = 0;
    for entry in &settings.supplemental {
        let item = supplemental_item(entry, settings);
        if !seen.insert(item.handle.clone()) {
            warn!(code = %entry.code, "supplemental entry already in the price list, skipped");
            supplemental_skipped += 1;
            continue;
        }
        items.push(item);
        supplemental += 1;
    }

    Emitted {
        items,
        supplemental,
        supplemental_skipped,
    }
}

fn supplemental_item(entry: &SupplementalEntry, settings: &Settings) -> CatalogItem {
    CatalogItem {
        handle: handle_for(&entry.code),
        title: entry.code.clone(),
        description: entry.description.clone(),
        category: classify(&entry.code, &entry.description).category,
        tags: entry.tags.clone(),
        axis: VariantAxis::Title,
        label: DEFAULT_TITLE.to_string(),
        sort_key: 0.0,
        price: price(entry.price, settings.markup),
        inventory_qty: settings.supplemental_inventory_qty,
        inventory_policy: settings.inventory_policy.clone(),
    }
}

pub fn write_csv<W: Write>(items: &[CatalogItem], vendor: &str, out: W) -> Result<(), CatalogError> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(COLUMNS)?;
    for item in items {
        wtr.write_record(item.record(vendor))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_csv_file(items: &[CatalogItem], vendor: &str, path: &Path) -> Result<(), CatalogError> {
    let file = std::fs::File::create(path).map_err(|source| CatalogError::Output {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(items, vendor, std::io::BufWriter::new(file))
}

// ── Tests ──
