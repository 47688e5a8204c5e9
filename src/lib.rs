// Glacier Catalog - Core Library
// Exposes the catalog, entities and record loaders for the CLI and tests

pub mod catalog; // Insertion-ordered registry + analysis queries
pub mod chart; // Chart-sink payloads + JSON artifact writer
pub mod error; // Domain error taxonomy
pub mod geo; // Coordinate ranges + ranking distance
pub mod glacier; // Glacier entity
pub mod records; // CSV record source

// Re-export commonly used types
pub use catalog::{CatalogSummary, GlacierCatalog, DEFAULT_TOP_N};
pub use chart::{combined_value_range, combined_year_range, write_series_json, BalanceSeries};
pub use error::{GlacierError, Result};
pub use geo::distance_km;
pub use glacier::Glacier;
pub use records::{
    load_inventory, load_measurements, read_inventory, read_measurements, InventoryRecord,
    MeasurementRecord,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
