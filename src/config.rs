use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::CatalogError;

/// Hand-authored product absent from the price list.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SupplementalEntry {
    pub code: String,
    pub description: String,
    /// Base price before markup.
    pub price: f64,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub markup: f64,
    pub vendor: String,
    pub sheet: String,
    pub inventory_qty: u32,
    pub supplemental_inventory_qty: u32,
    pub inventory_policy: String,
    pub supplemental: Vec<SupplementalEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            markup: 1.07,
            vendor: "Vaonix".to_string(),
            sheet: "Liste de prix".to_string(),
            inventory_qty: 100,
            supplemental_inventory_qty: 50,
            inventory_policy: "deny".to_string(),
            supplemental: default_supplemental(),
        }
    }
}

impl Settings {
    /// Defaults, then the optional file, then `CATALOG_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let settings: Settings = builder
            .add_source(
                Environment::with_prefix("CATALOG")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if !self.markup.is_finite() || self.markup < 0.0 {
            return Err(CatalogError::InvalidMarkup(self.markup));
        }
        Ok(())
    }
}

fn entry(code: &str, description: &str, price: f64, tags: &[&str]) -> SupplementalEntry {
    SupplementalEntry {
        code: code.to_string(),
        description: description.to_string(),
        price,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

fn default_supplemental() -> Vec<SupplementalEntry> {
    vec![
        entry(
            "QSFP-DD-400G-FR4",
            "400G QSFP-DD FR4 1310nm 2km Duplex LC SMF Optical Transceiver Module",
            650.00,
            &["400G", "QSFP-DD", "FR4", "Transceiver"],
        ),
        entry(
            "QSFP-DD-400G-DR4",
            "400G QSFP-DD DR4 1310nm 500m MPO-12 SMF Optical Transceiver Module",
            580.00,
            &["400G", "QSFP-DD", "DR4", "Transceiver"],
        ),
        entry(
            "QSFP-DD-400G-SR8",
            "400G QSFP-DD SR8 850nm 100m MPO-16 MMF Optical Transceiver Module",
            450.00,
            &["400G", "QSFP-DD", "SR8", "Transceiver"],
        ),
        entry(
            "QSFP28-100G-LR4",
            "100G QSFP28 LR4 1310nm 10km LC SMF Transceiver Module",
            180.00,
            &["100G", "QSFP28", "LR4", "Transceiver"],
        ),
    ]
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn defaults_without_sources() {
        let s = Settings::load(None).unwrap();
        assert_eq!(s.sheet, "Liste de prix");
        assert_eq!(s.inventory_policy, "deny");
        assert_eq!(s.supplemental.len(), 4);
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("bom-catalog-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("catalog.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
markup = 1.15
vendor = "Acme Optics"

[[supplemental]]
code = "SFP-10G-SR"
description = "10G SR 850nm"
price = 20.0
tags = ["10G", "SFP+"]
"#
        )
        .unwrap();
        drop(f);

        let s = Settings::load(Some(&path)).unwrap();
        assert_eq!(s.markup, 1.15);
        assert_eq!(s.vendor, "Acme Optics");
        assert_eq!(s.sheet, "Liste de prix");
        assert_eq!(s.supplemental.len(), 1);
        assert_eq!(s.supplemental[0].tags, vec!["10G", "SFP+"]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn negative_markup_rejected() {
        let s = Settings {
            markup: -1.0,
            ..Settings::default()
        };
        assert!(matches!(s.validate(), Err(CatalogError::InvalidMarkup(_))));
    }
}
