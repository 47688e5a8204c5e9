// 🧊 Glacier Entity - validated identity + mass-balance bookkeeping
//
// A glacier is identified by its 5-character WGMS id. Identity fields are
// validated once at construction and never change; the only mutable state
// is the year → balance map, which merges repeated readings according to
// the partial flag of the incoming reading.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use chrono::{Datelike, Utc};

use crate::error::{GlacierError, Result};
use crate::geo;

/// The current calendar year, the upper bound for measurement years.
pub(crate) fn current_year() -> i32 {
    Utc::now().year()
}

// ============================================================================
// GLACIER ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Glacier {
    /// WGMS id, exactly 5 characters. Unique within a catalog.
    id: String,

    /// Display name, never empty.
    name: String,

    /// "99" or a two-letter uppercase country code.
    political_unit: String,

    latitude: f64,
    longitude: f64,

    /// Three-digit classification code (primary class, form, frontal
    /// characteristics, one digit each).
    code: u32,

    /// Year → net mass balance. Kept ordered so the series exports sorted.
    mass_balances: BTreeMap<i32, f64>,
}

impl Glacier {
    /// Validates every identity field and creates the glacier with an
    /// empty measurement map.
    pub fn new(
        id: String,
        name: String,
        political_unit: String,
        latitude: f64,
        longitude: f64,
        code: u32,
    ) -> Result<Self> {
        if id.chars().count() != 5 {
            return Err(GlacierError::invalid_value(
                "id",
                format!("must be exactly 5 characters, got '{id}'"),
            ));
        }

        if name.is_empty() {
            return Err(GlacierError::invalid_value("name", "must not be empty"));
        }

        let unit_ok = political_unit == "99"
            || (political_unit.chars().count() == 2
                && political_unit.chars().all(|c| c.is_ascii_uppercase()));
        if !unit_ok {
            return Err(GlacierError::invalid_value(
                "political unit",
                format!("must be '99' or two uppercase letters, got '{political_unit}'"),
            ));
        }

        geo::validate_latitude(latitude)?;
        geo::validate_longitude(longitude)?;

        if !(100..=999).contains(&code) {
            return Err(GlacierError::invalid_value(
                "code",
                format!("must be a 3-digit classification code, got {code}"),
            ));
        }

        Ok(Glacier {
            id,
            name,
            political_unit,
            latitude,
            longitude,
            code,
            mass_balances: BTreeMap::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn political_unit(&self) -> &str {
        &self.political_unit
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    // ========================================================================
    // MEASUREMENTS
    // ========================================================================

    /// Records a mass-balance reading for a year in [0, current year].
    ///
    /// The first reading for a year always lands. After that the incoming
    /// partial flag decides: partial readings accumulate onto the stored
    /// value, a repeated full-year reading is dropped.
    pub fn add_measurement(&mut self, year: i32, balance: f64, partial: bool) -> Result<()> {
        let current = current_year();
        if !(0..=current).contains(&year) {
            return Err(GlacierError::invalid_value(
                "year",
                format!("must be between 0 and {current}, got {year}"),
            ));
        }

        match self.mass_balances.entry(year) {
            Entry::Vacant(slot) => {
                slot.insert(balance);
            }
            Entry::Occupied(mut slot) => {
                if partial {
                    *slot.get_mut() += balance;
                }
            }
        }

        Ok(())
    }

    /// The most recent reading as (year, balance), if any.
    pub fn latest(&self) -> Option<(i32, f64)> {
        self.mass_balances.last_key_value().map(|(y, v)| (*y, *v))
    }

    /// The balance of the most recent reading.
    pub fn latest_balance(&self) -> Result<f64> {
        self.latest().map(|(_, v)| v).ok_or(GlacierError::NoData)
    }

    /// The year of the oldest reading, if any.
    pub fn earliest_year(&self) -> Option<i32> {
        self.mass_balances.first_key_value().map(|(y, _)| *y)
    }

    /// All readings as (year, balance) pairs in ascending year order.
    pub fn series(&self) -> Vec<(i32, f64)> {
        self.mass_balances.iter().map(|(y, v)| (*y, *v)).collect()
    }

    pub fn measurement_count(&self) -> usize {
        self.mass_balances.len()
    }

    pub fn has_measurements(&self) -> bool {
        !self.mass_balances.is_empty()
    }
}
