use std::sync::LazyLock;

use regex::Regex;

use super::classify::Category;

static LENGTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.+?)-(\d+(?:-\d+)?)M(.*)$").unwrap());
static CWDM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.+)-(\d{4})(?:NM)?(?:-([IE]))?$").unwrap());
static DWDM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^(.+)-C(\d{2})$").unwrap());
static TEMPERATURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.+)-([IE])$").unwrap());

const CWDM_GRID: std::ops::RangeInclusive<u32> = 1270..=1610;

pub const COMMERCIAL: &str = "Commercial (0/70°C)";
pub const EXTENDED: &str = "Extended (-10/+80°C)";
pub const INDUSTRIAL: &str = "Industrial (-40/+85°C)";
pub const DEFAULT_TITLE: &str = "Default Title";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantAxis {
    Title,
    Length,
    Temperature,
    Channel,
    Wavelength,
}

impl VariantAxis {
    /// Value of the "Option1 Name" column.
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantAxis::Title => "Title",
            VariantAxis::Length => "Length",
            VariantAxis::Temperature => "Temperature",
            VariantAxis::Channel => "Channel",
            VariantAxis::Wavelength => "Wavelength",
        }
    }

    /// Label given to an unsuffixed base code once it joins a group on this axis.
    pub fn base_label(&self) -> &'static str {
        match self {
            VariantAxis::Temperature => COMMERCIAL,
            VariantAxis::Channel => "Tunable / Unspecified",
            VariantAxis::Wavelength => "Unspecified",
            VariantAxis::Length => "Standard",
            VariantAxis::Title => DEFAULT_TITLE,
        }
    }

    /// Sort key of a reconciled base: commercial grade ranks first among
    /// temperatures, every other axis puts the base ahead of its variants.
    pub fn base_sort_key(&self) -> f64 {
        match self {
            VariantAxis::Temperature => 1.0,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariantMatch {
    pub axis: VariantAxis,
    pub base: String,
    pub label: String,
    pub sort_key: f64,
}

/// One pattern-shape in the priority list.
pub struct Matcher {
    applies: fn(Category) -> bool,
    extract: fn(&str) -> Option<VariantMatch>,
}

impl Matcher {
    pub fn try_match(&self, code: &str, category: Category) -> Option<VariantMatch> {
        if (self.applies)(category) {
            (self.extract)(code)
        } else {
            None
        }
    }
}

/// Priority order: first match wins, nothing else is tried for that row.
/// Cables only ever try the length shape; AOC rows not described as cables
/// take the transceiver shapes.
pub static MATCHERS: &[Matcher] = &[
    Matcher {
        applies: cable,
        extract: match_length,
    },
    Matcher {
        applies: not_cable,
        extract: match_cwdm,
    },
    Matcher {
        applies: not_cable,
        extract: match_dwdm,
    },
    Matcher {
        applies: not_cable,
        extract: match_temperature,
    },
];

fn cable(category: Category) -> bool {
    category.is_cable()
}

fn not_cable(category: Category) -> bool {
    !category.is_cable()
}

pub fn match_variant(code: &str, category: Category) -> Option<VariantMatch> {
    MATCHERS.iter().find_map(|m| m.try_match(code, category))
}

/// Implicit guess for a code no matcher fired on: the commercial-grade member
/// of a potential temperature family.
pub fn implicit_base(code: &str) -> VariantMatch {
    VariantMatch {
        axis: VariantAxis::Temperature,
        base: code.to_string(),
        label: COMMERCIAL.to_string(),
        sort_key: 1.0,
    }
}

/// `DAC-10G-SFP-0-5M` → (`DAC-10G-SFP`, `0.5m`, 0.5)
pub fn match_length(code: &str) -> Option<VariantMatch> {
    let caps = LENGTH_RE.captures(code)?;
    let length = caps[2].replace('-', ".");
    let sort_key = length.parse::<f64>().ok()?;
    let suffix = caps[3].trim_matches(|c| c == '-' || c == ' ');

    let mut label = format!("{}m", length);
    if !suffix.is_empty() {
        label.push_str(&format!(" ({})", suffix));
    }
    Some(VariantMatch {
        axis: VariantAxis::Length,
        base: caps[1].to_string(),
        label,
        sort_key,
    })
}

pub fn match_cwdm(code: &str) -> Option<VariantMatch> {
    let caps = CWDM_RE.captures(code)?;
    let wave: u32 = caps[2].parse().ok()?;
    if !CWDM_GRID.contains(&wave) {
        return None;
    }

    let mut label = format!("{}nm", wave);
    match caps.get(3).map(|m| m.as_str().to_ascii_uppercase()).as_deref() {
        Some("I") => label.push_str(" (Ind.)"),
        Some("E") => label.push_str(" (Ext.)"),
        _ => {}
    }
    Some(VariantMatch {
        axis: VariantAxis::Wavelength,
        base: caps[1].to_string(),
        label,
        sort_key: wave as f64,
    })
}

pub fn match_dwdm(code: &str) -> Option<VariantMatch> {
    let caps = DWDM_RE.captures(code)?;
    let digits = &caps[2];
    let channel: u32 = digits.parse().ok()?;
    Some(VariantMatch {
        axis: VariantAxis::Channel,
        base: caps[1].to_string(),
        label: format!("Channel {} (C{})", channel, digits),
        sort_key: channel as f64,
    })
}

pub fn match_temperature(code: &str) -> Option<VariantMatch> {
    let caps = TEMPERATURE_RE.captures(code)?;
    let (label, sort_key) = if caps[2].eq_ignore_ascii_case("I") {
        (INDUSTRIAL, 3.0)
    } else {
        (EXTENDED, 2.0)
    };
    Some(VariantMatch {
        axis: VariantAxis::Temperature,
        base: caps[1].to_string(),
        label: label.to_string(),
        sort_key,
    })
}

// ── Tests ──
