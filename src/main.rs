mod catalog;
mod config;
mod error;
mod parser;
mod sheet;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use itertools::Itertools;
use tracing::info;

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "bom-catalog", about = "Turn a BOM price list into a grouped product import")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the import CSV from a price-list workbook
    Generate {
        /// Price-list workbook (.xlsx, .xlsm, .xls, .ods)
        #[arg(short, long)]
        input: PathBuf,
        /// Destination CSV
        #[arg(short, long)]
        output: PathBuf,
        /// Settings file (TOML, JSON or YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Price multiplier applied to every cost
        #[arg(long)]
        markup: Option<f64>,
        /// Vendor column value
        #[arg(long)]
        vendor: Option<String>,
        /// Worksheet holding the price list
        #[arg(long)]
        sheet: Option<String>,
    },
    /// List sheets and print their first rows
    Inspect {
        #[arg(short, long)]
        input: PathBuf,
        /// Rows to show per sheet
        #[arg(short = 'n', long, default_value = "5")]
        rows: usize,
    },
    /// Show how rows would be grouped, without writing anything
    Groups {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        sheet: Option<String>,
        /// Max groups to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            input,
            output,
            config,
            markup,
            vendor,
            sheet,
        } => {
            let mut settings = load_settings(config.as_deref())?;
            if let Some(m) = markup {
                settings.markup = m;
            }
            if let Some(v) = vendor {
                settings.vendor = v;
            }
            if let Some(s) = sheet {
                settings.sheet = s;
            }
            settings.validate()?;
            info!(markup = settings.markup, vendor = %settings.vendor, sheet = %settings.sheet, "settings");

            let rows = sheet::read_price_list(&input, &settings.sheet)
                .with_context(|| format!("Failed to read price list {}", input.display()))?;
            let run = parser::process_rows(&rows, &settings);
            catalog::write_csv_file(&run.items, &settings.vendor, &output)
                .with_context(|| format!("Failed to write {}", output.display()))?;

            run.summary.print();
            println!("\nSaved to {}", output.display());
            Ok(())
        }
        Commands::Inspect { input, rows } => {
            let previews = sheet::preview(&input, rows)
                .with_context(|| format!("Failed to inspect {}", input.display()))?;
            println!("Sheets: {}", previews.iter().map(|p| p.name.as_str()).join(", "));
            for p in &previews {
                println!("\n--- {} ({} rows x {} cols) ---", p.name, p.height, p.width);
                for (i, row) in p.rows.iter().enumerate() {
                    if row.is_empty() {
                        continue;
                    }
                    println!("Row {}:", i + 1);
                    for (col, value) in row {
                        println!("  Col{}: {}", col, truncate(value, 50));
                    }
                }
            }
            Ok(())
        }
        Commands::Groups {
            input,
            config,
            sheet,
            limit,
        } => {
            let mut settings = load_settings(config.as_deref())?;
            if let Some(s) = sheet {
                settings.sheet = s;
            }
            let rows = sheet::read_price_list(&input, &settings.sheet)
                .with_context(|| format!("Failed to read price list {}", input.display()))?;
            let (grouped, summary) = parser::group_rows(&rows, &settings);

            if grouped.groups.is_empty() {
                println!("No groups found.");
            } else {
                println!(
                    "{:>3} | {:<28} | {:<11} | {:>4} | {}",
                    "#", "Group", "Axis", "Vars", "Labels"
                );
                println!("{}", "-".repeat(100));
                for (i, g) in grouped.groups.iter().take(limit).enumerate() {
                    let labels = g.items.iter().map(|it| it.label.as_str()).join(", ");
                    println!(
                        "{:>3} | {:<28} | {:<11} | {:>4} | {}",
                        i + 1,
                        truncate(&g.key, 28),
                        g.axis.as_str(),
                        g.items.len(),
                        truncate(&labels, 45)
                    );
                }
            }
            println!(
                "\n{} groups | {} standalone | {} skipped | {} axis conflicts",
                summary.groups,
                summary.standalone,
                summary.skipped_total(),
                summary.conflicts
            );
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    Settings::load(path).with_context(|| match path {
        Some(p) => format!("Failed to load settings from {}", p.display()),
        None => "Failed to load settings".to_string(),
    })
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
