#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Transceiver,
    Cable,
    ActiveOpticalCable,
}

impl Category {
    /// Value of the "Type" column.
    pub fn product_type(&self) -> &'static str {
        match self {
            Category::Transceiver => "Optical Transceiver",
            Category::Cable => "Network Cable",
            Category::ActiveOpticalCable => "Active Optical Cable",
        }
    }

    /// Only plain cables carry a length variant; an AOC code without "cable"
    /// in its description is handled like a transceiver.
    pub fn is_cable(&self) -> bool {
        matches!(self, Category::Cable)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: Category,
    pub tags: Vec<String>,
}

// Most specific first; at most one fires.
const FORM_FACTORS: &[(&str, &str)] = &[
    ("QSFP-DD", "QSFP-DD"),
    ("QSFP28", "QSFP28"),
    ("QSFP", "QSFP+"),
    ("SFP28", "SFP28"),
    ("SFP+", "SFP+"),
    ("SFP", "SFP"),
    ("XFP", "XFP"),
];

const SPEEDS: &[&str] = &["400G", "100G", "40G", "25G", "10G", "1G"];

// Independent; any subset may fire. Checked on code and description.
const TECHNOLOGIES: &[(&str, &str)] = &[("DWDM", "DWDM"), ("CWDM", "CWDM"), ("BIDI", "BiDi")];

pub fn classify(code: &str, description: &str) -> Classification {
    let code_u = code.to_uppercase();
    let desc_u = description.to_uppercase();

    let category = if code_u.contains("DAC") || desc_u.contains("CABLE") {
        Category::Cable
    } else if code_u.contains("AOC") {
        Category::ActiveOpticalCable
    } else {
        Category::Transceiver
    };

    let mut tags: Vec<String> = match category {
        Category::Cable => vec!["DAC".into(), "Cable".into()],
        Category::ActiveOpticalCable => vec!["AOC".into(), "Cable".into()],
        Category::Transceiver => vec!["Transceiver".into()],
    };

    if let Some((_, tag)) = FORM_FACTORS.iter().find(|(needle, _)| code_u.contains(needle)) {
        tags.push((*tag).to_string());
    }

    for (needle, tag) in TECHNOLOGIES {
        if code_u.contains(needle) || desc_u.contains(needle) {
            tags.push((*tag).to_string());
        }
    }
    if desc_u.contains("TUNABLE") {
        tags.push("Tunable".to_string());
    }

    if let Some(speed) = SPEEDS.iter().find(|s| code_u.contains(*s)) {
        tags.push((*speed).to_string());
    }

    Classification { category, tags }
}

// ── Tests ──
