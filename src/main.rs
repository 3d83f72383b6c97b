use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ifta_calc::insights::{format_money, mpg_display, net_tax_label};
use ifta_calc::jurisdiction::is_known_code;
use ifta_calc::{all_rates, normalize_state, rate_for, to_json, write_csv, FilingBatch, FilingReport};

#[derive(Parser)]
#[command(name = "ifta-calc", version, about = "Quarterly IFTA fuel tax summary from fuel and ELD CSV exports")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Calculate the quarterly summary
    Calculate {
        /// Fuel purchase CSV (repeatable)
        #[arg(long = "fuel", required = true)]
        fuel: Vec<PathBuf>,

        /// Mileage / ELD CSV (repeatable)
        #[arg(long = "mileage", alias = "eld", required = true)]
        mileage: Vec<PathBuf>,

        /// Write the CSV summary here
        #[arg(long)]
        export: Option<PathBuf>,

        /// Write the full JSON report here
        #[arg(long)]
        json: Option<PathBuf>,

        /// Skip the per-source intake listing
        #[arg(long)]
        quiet: bool,
    },

    /// Print the fuel tax rate table
    Rates,

    /// Show how a jurisdiction name normalizes
    Normalize {
        name: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Calculate {
            fuel,
            mileage,
            export,
            json,
            quiet,
        } => run_calculate(&fuel, &mileage, export, json, quiet),
        Command::Rates => {
            run_rates();
            Ok(())
        }
        Command::Normalize { name } => {
            run_normalize(&name);
            Ok(())
        }
    }
}

fn run_calculate(
    fuel: &[PathBuf],
    mileage: &[PathBuf],
    export: Option<PathBuf>,
    json: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let mut batch = FilingBatch::new();

    for path in fuel {
        batch
            .add_fuel_file(path)
            .with_context(|| format!("Failed to load fuel file {}", path.display()))?;
    }
    for path in mileage {
        batch
            .add_mileage_file(path)
            .with_context(|| format!("Failed to load mileage file {}", path.display()))?;
    }

    if !quiet {
        println!("📂 Sources");
        for source in batch.sources() {
            println!("   {:<28} {}", source.label, source.intake.summary());
        }
        println!();
    }

    let report = batch.calculate()?;
    print_report(&report);

    if let Some(path) = export {
        write_csv(&report.result, &path)
            .with_context(|| format!("Failed to write CSV summary to {}", path.display()))?;
        println!("\n✓ CSV summary written to {}", path.display());
    }

    if let Some(path) = json {
        let text = to_json(&report)?;
        std::fs::write(&path, text)
            .with_context(|| format!("Failed to write JSON report to {}", path.display()))?;
        println!("✓ JSON report written to {}", path.display());
    }

    Ok(())
}

fn print_report(report: &FilingReport) {
    let result = &report.result;

    println!("🧾 IFTA Summary - {} ({})", report.quarter.chip(), report.quarter.context());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "{:<8} {:>12} {:>12} {:>8} {:>12} {:>12} {:>12}",
        "State", "Miles", "Gal Used", "Rate", "Tax Paid", "Tax Owed", "Net Tax"
    );

    for row in &result.rows {
        println!(
            "{:<8} {:>12.2} {:>12.4} {:>8.3} {:>12} {:>12} {:>12}",
            row.state,
            row.miles,
            row.gallons_used,
            row.tax_rate,
            format_money(row.tax_paid),
            format_money(row.tax_owed),
            format_money(row.net_tax)
        );
    }

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Total miles:    {:.2}", result.total_miles);
    println!("Total gallons:  {:.2}", result.total_gallons);
    println!("Fleet MPG:      {}", mpg_display(result.mpg));
    println!("Tax paid:       {}", format_money(result.total_tax_paid));
    println!("Tax owed:       {}", format_money(result.total_tax_owed));
    println!(
        "{:<16}{}",
        format!("{}:", net_tax_label(result.total_net_tax)),
        format_money(result.total_net_tax)
    );

    println!();
    for headline in report.insights.headlines() {
        println!("💡 {:<18} {}", headline.title, headline.value);
        println!("   {:<18} {}", "", headline.meta);
    }
}

fn run_rates() {
    println!("{:<6} {:>8}", "State", "$/gal");
    for entry in all_rates() {
        println!("{:<6} {:>8.3}", entry.state, entry.rate);
    }
}

fn run_normalize(name: &str) {
    match normalize_state(name) {
        Some(code) if is_known_code(&code) => {
            println!("{} → {} (rate {:.3})", name, code, rate_for(&code))
        }
        Some(code) => println!("{} → {} (unrecognized, no tax rate)", name, code),
        None => println!("{:?} is empty and cannot be attributed", name),
    }
}
