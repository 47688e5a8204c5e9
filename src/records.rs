// CSV record source: WGMS-style inventory and mass-balance sheets.
//
// Rows arrive as raw string fields. Numeric interpretation and domain
// validation happen at catalog ingestion, where failures can be tagged
// with the offending row.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// One row of the glacier inventory sheet. Columns not listed here are
/// ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryRecord {
    #[serde(rename = "WGMS_ID")]
    pub id: String,

    #[serde(rename = "POLITICAL_UNIT")]
    pub political_unit: String,

    #[serde(rename = "NAME")]
    pub name: String,

    #[serde(rename = "LATITUDE")]
    pub latitude: String,

    #[serde(rename = "LONGITUDE")]
    pub longitude: String,

    #[serde(rename = "PRIM_CLASSIFIC")]
    pub primary_class: String,

    #[serde(rename = "FORM")]
    pub form: String,

    #[serde(rename = "FRONTAL_CHARS")]
    pub frontal_chars: String,
}

/// One row of the annual mass-balance sheet.
#[derive(Debug, Clone, Deserialize)]
pub struct MeasurementRecord {
    #[serde(rename = "WGMS_ID")]
    pub id: String,

    #[serde(rename = "YEAR")]
    pub year: String,

    /// Empty when no annual figure was reported; ingestion skips such rows.
    #[serde(rename = "ANNUAL_BALANCE")]
    pub annual_balance: String,

    #[serde(rename = "LOWER_BOUND")]
    pub lower_bound: String,

    #[serde(rename = "UPPER_BOUND")]
    pub upper_bound: String,
}

/// Reads inventory rows from any reader (files, in-memory fixtures).
pub fn read_inventory<R: Read>(reader: R) -> Result<Vec<InventoryRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: InventoryRecord = result.context("Failed to deserialize inventory row")?;
        records.push(record);
    }

    Ok(records)
}

/// Reads mass-balance rows from any reader.
pub fn read_measurements<R: Read>(reader: R) -> Result<Vec<MeasurementRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: MeasurementRecord = result.context("Failed to deserialize balance row")?;
        records.push(record);
    }

    Ok(records)
}

pub fn load_inventory(path: &Path) -> Result<Vec<InventoryRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open inventory sheet {}", path.display()))?;
    read_inventory(file)
}

pub fn load_measurements(path: &Path) -> Result<Vec<MeasurementRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open mass-balance sheet {}", path.display()))?;
    read_measurements(file)
}
