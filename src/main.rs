// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use std::env;
use std::path::{Path, PathBuf};

use anyhow::Result;

use glacier_catalog::{
    load_inventory, load_measurements, write_series_json, GlacierCatalog, DEFAULT_TOP_N,
};

// Sheet names follow the WGMS export convention; every mode accepts
// overrides as positional arguments.
const DEFAULT_INVENTORY_SHEET: &str = "sheet-A.csv";
const DEFAULT_BALANCE_SHEET: &str = "sheet-EE.csv";
const DEFAULT_ARTIFACT: &str = "extremes.json";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let (inventory, balances) = sheet_paths(&args);

    match args.get(1).map(String::as_str) {
        Some("summary") => run_summary(&inventory, &balances)?,
        Some("export") => {
            let artifact = args
                .get(4)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACT));
            run_export(&inventory, &balances, &artifact)?;
        }
        Some("ui") | None => run_ui_mode(&inventory, &balances)?,
        Some(other) => {
            eprintln!("❌ Unknown mode '{other}'");
            eprintln!(
                "   Usage: glacier-catalog [summary|export|ui] [inventory.csv] [balances.csv] [artifact.json]"
            );
            std::process::exit(1);
        }
    }

    Ok(())
}

fn sheet_paths(args: &[String]) -> (PathBuf, PathBuf) {
    let inventory = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INVENTORY_SHEET));
    let balances = args
        .get(3)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BALANCE_SHEET));
    (inventory, balances)
}

fn load_catalog(inventory: &Path, balances: &Path) -> Result<GlacierCatalog> {
    println!("📂 Loading {}...", inventory.display());
    let records = load_inventory(inventory)?;
    println!("✓ Read {} inventory rows", records.len());

    let mut catalog = GlacierCatalog::from_inventory(&records)?;

    println!("📂 Loading {}...", balances.display());
    let readings = load_measurements(balances)?;
    let applied = catalog.ingest_measurements(&readings)?;
    println!("✓ Applied {} of {} balance rows", applied, readings.len());

    Ok(catalog)
}

fn run_summary(inventory: &Path, balances: &Path) -> Result<()> {
    println!("🧊 Glacier Catalog - Summary");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let catalog = load_catalog(inventory, balances)?;

    println!();
    println!("{}", catalog.summary()?);

    match catalog.sort_by_latest_balance(DEFAULT_TOP_N, false) {
        Ok(top) => {
            println!("\n📈 Top {DEFAULT_TOP_N} by latest balance:");
            print_ranking(&top);
        }
        Err(e) => println!("\n📈 No growth ranking: {e}"),
    }

    match catalog.sort_by_latest_balance(DEFAULT_TOP_N, true) {
        Ok(bottom) => {
            println!("\n📉 Bottom {DEFAULT_TOP_N} by latest balance:");
            print_ranking(&bottom);
        }
        Err(e) => println!("\n📉 No shrinkage ranking: {e}"),
    }

    Ok(())
}

fn print_ranking(glaciers: &[&glacier_catalog::Glacier]) {
    for glacier in glaciers {
        if let Some((year, value)) = glacier.latest() {
            println!("   {:<30} {:>10.1} mm w.e. ({})", glacier.name(), value, year);
        }
    }
}

fn run_export(inventory: &Path, balances: &Path, artifact: &Path) -> Result<()> {
    println!("🧊 Glacier Catalog - Extremes Export");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let catalog = load_catalog(inventory, balances)?;

    let (grower, shrinker) = catalog.extremes()?;
    println!("\n📈 Strongest growth:    {}", grower.label);
    println!("📉 Strongest shrinkage: {}", shrinker.label);

    write_series_json(artifact, &[grower, shrinker])?;
    println!("\n✓ Chart artifact written to {}", artifact.display());

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(inventory: &Path, balances: &Path) -> Result<()> {
    println!("🖥️  Loading glacier catalog UI...\n");

    if !inventory.exists() {
        eprintln!("❌ Inventory sheet not found: {}", inventory.display());
        eprintln!("   Pass the sheets explicitly:");
        eprintln!("   glacier-catalog ui <inventory.csv> <balances.csv>");
        std::process::exit(1);
    }

    let catalog = load_catalog(inventory, balances)?;
    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(catalog);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_inventory: &Path, _balances: &Path) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or print a report with: cargo run -- summary");
    std::process::exit(1);
}
