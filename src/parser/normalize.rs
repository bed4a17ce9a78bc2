/// Cost cell as it comes out of the sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum CostCell {
    Number(f64),
    Text(String),
    Empty,
}

/// One price-list record before any cleaning.
#[derive(Debug, Clone)]
pub struct RawRow {
    pub code: Option<String>,
    pub description: Option<String>,
    pub unit_cost: CostCell,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub code: String,
    pub description: String,
    pub cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    MissingCode,
    MissingDescription,
    HighPerformanceDuplicate,
    HardwareDuplicate,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::MissingCode => "missing code",
            SkipReason::MissingDescription => "missing description",
            SkipReason::HighPerformanceDuplicate => "-HP duplicate",
            SkipReason::HardwareDuplicate => "HW duplicate",
        }
    }
}

pub fn normalize(row: &RawRow) -> Result<NormalizedRow, SkipReason> {
    let code = non_empty(row.code.as_deref()).ok_or(SkipReason::MissingCode)?;
    let description =
        non_empty(row.description.as_deref()).ok_or(SkipReason::MissingDescription)?;

    // Duplicate markers are looked for in the cells as written, before trimming.
    let raw_code = row.code.as_deref().unwrap_or_default().to_uppercase();
    let raw_description = row.description.as_deref().unwrap_or_default().to_uppercase();
    if raw_code.contains("-HP") {
        return Err(SkipReason::HighPerformanceDuplicate);
    }
    if raw_code.contains(" HW") || raw_description.contains(" HW") {
        return Err(SkipReason::HardwareDuplicate);
    }

    Ok(NormalizedRow {
        code: code.to_string(),
        description: description.to_string(),
        cost: clean_cost(&row.unit_cost),
    })
}

/// Textual costs keep only digits, commas and periods; the comma is the
/// decimal separator. Anything unparseable is 0.
pub fn clean_cost(cell: &CostCell) -> f64 {
    match cell {
        CostCell::Number(n) if n.is_finite() => *n,
        CostCell::Number(_) | CostCell::Empty => 0.0,
        CostCell::Text(raw) => {
            let kept: String = raw
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
                .map(|c| if c == ',' { '.' } else { c })
                .collect();
            kept.parse::<f64>().unwrap_or(0.0)
        }
    }
}

pub fn price(cost: f64, markup: f64) -> f64 {
    round_cents(cost * markup)
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn row(code: &str, description: &str, cost: CostCell) -> RawRow {
        RawRow {
            code: Some(code.to_string()),
            description: Some(description.to_string()),
            unit_cost: cost,
        }
    }

    #[test]
    fn euro_formatted_cost() {
        let cost = clean_cost(&CostCell::Text("1 234,56 €".to_string()));
        assert!((cost - 1234.56).abs() < 1e-9);
        assert_eq!(price(cost, 1.07), 1320.98);
    }

    #[test]
    fn unparseable_cost_is_zero() {
        assert_eq!(clean_cost(&CostCell::Text("sur devis".to_string())), 0.0);
        assert_eq!(clean_cost(&CostCell::Text("1.234,56".to_string())), 0.0);
        assert_eq!(clean_cost(&CostCell::Empty), 0.0);
        assert_eq!(clean_cost(&CostCell::Number(f64::NAN)), 0.0);
    }

    #[test]
    fn numeric_cost_passes_through() {
        let n = normalize(&row("SFP-1G-SX", "1G SX", CostCell::Number(12.0))).unwrap();
        assert_eq!(n.cost, 12.0);
        assert_eq!(price(n.cost, 1.15), 13.8);
    }

    #[test]
    fn missing_fields_skip() {
        let mut r = row("SFP-1G-SX", "1G SX", CostCell::Empty);
        r.code = None;
        assert_eq!(normalize(&r), Err(SkipReason::MissingCode));

        let r = row("SFP-1G-SX", "   ", CostCell::Empty);
        assert_eq!(normalize(&r), Err(SkipReason::MissingDescription));
    }

    #[test]
    fn hp_and_hw_duplicates_skip() {
        let r = row("XYZ-HP", "some module", CostCell::Number(1.0));
        assert_eq!(normalize(&r), Err(SkipReason::HighPerformanceDuplicate));

        let r = row("dac-10g-1m-hp", "cable", CostCell::Number(1.0));
        assert_eq!(normalize(&r), Err(SkipReason::HighPerformanceDuplicate));

        let r = row("SFP-10G-LR", "10G LR compatible HW", CostCell::Number(1.0));
        assert_eq!(normalize(&r), Err(SkipReason::HardwareDuplicate));

        let r = row("SFP-10G-LR HW", "10G LR", CostCell::Number(1.0));
        assert_eq!(normalize(&r), Err(SkipReason::HardwareDuplicate));

        let r = row("SFP-10G-LR", " HW compatible 10G LR", CostCell::Number(1.0));
        assert_eq!(normalize(&r), Err(SkipReason::HardwareDuplicate));
    }

    #[test]
    fn whitespace_is_trimmed() {
        let n = normalize(&row("  SFP-1G-LX ", " 1G LX ", CostCell::Empty)).unwrap();
        assert_eq!(n.code, "SFP-1G-LX");
        assert_eq!(n.description, "1G LX");
    }
}
