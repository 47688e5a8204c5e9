// 🏔️ Glacier Catalog - insertion-ordered registry + analysis queries
//
// The catalog owns every glacier, keyed by WGMS id, and answers the
// analysis questions: nearest neighbours, classification-code filtering,
// latest-balance rankings, summary statistics and charting extremes.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::chart::BalanceSeries;
use crate::error::{GlacierError, Result};
use crate::geo;
use crate::glacier::{current_year, Glacier};
use crate::records::{InventoryRecord, MeasurementRecord};

/// How many entries ranking call sites ask for unless told otherwise.
pub const DEFAULT_TOP_N: usize = 5;

// ============================================================================
// CATALOG
// ============================================================================

#[derive(Debug, Default)]
pub struct GlacierCatalog {
    /// Glaciers in ingestion order. Results that promise "catalog order"
    /// mean this order.
    glaciers: Vec<Glacier>,

    /// id → position in `glaciers`.
    index: HashMap<String, usize>,
}

impl GlacierCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from an inventory record set.
    pub fn from_inventory(records: &[InventoryRecord]) -> Result<Self> {
        let mut catalog = Self::new();
        catalog.ingest_inventory(records)?;
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.glaciers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glaciers.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Glacier> {
        self.index.get(id).map(|&position| &self.glaciers[position])
    }

    /// Glaciers in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Glacier> {
        self.glaciers.iter()
    }

    // ========================================================================
    // INGESTION
    // ========================================================================

    /// Validates and inserts one glacier per row, in row order.
    ///
    /// Not transactional: rows inserted before a failing row stay in the
    /// catalog. Validation failures are tagged with the zero-based row.
    /// Returns the number of glaciers inserted.
    pub fn ingest_inventory(&mut self, records: &[InventoryRecord]) -> Result<usize> {
        if records.is_empty() {
            return Err(GlacierError::EmptyInput);
        }

        let mut inserted = 0;
        for (row, record) in records.iter().enumerate() {
            let glacier = glacier_from_record(record).map_err(|e| e.at_row(row))?;

            if self.index.contains_key(glacier.id()) {
                return Err(GlacierError::DuplicateKey {
                    id: glacier.id().to_string(),
                    row,
                });
            }

            self.index.insert(glacier.id().to_string(), self.glaciers.len());
            self.glaciers.push(glacier);
            inserted += 1;
        }

        Ok(inserted)
    }

    /// Applies one mass-balance reading per row.
    ///
    /// Rows with an empty balance field are skipped. Bounds of 9999/9999
    /// mark a full-year reading, anything else a partial one. Returns the
    /// number of readings applied (skipped rows not counted).
    pub fn ingest_measurements(&mut self, records: &[MeasurementRecord]) -> Result<usize> {
        if records.is_empty() {
            return Err(GlacierError::EmptyInput);
        }

        let mut applied = 0;
        for (row, record) in records.iter().enumerate() {
            if record.annual_balance.trim().is_empty() {
                continue;
            }

            let position = *self.index.get(record.id.as_str()).ok_or_else(|| {
                GlacierError::UnknownKey {
                    id: record.id.clone(),
                }
            })?;

            let year = parse_i32("year", &record.year).map_err(|e| e.at_row(row))?;
            let balance = parse_f64("balance", &record.annual_balance).map_err(|e| e.at_row(row))?;
            let lower = parse_i32("lower bound", &record.lower_bound).map_err(|e| e.at_row(row))?;
            let upper = parse_i32("upper bound", &record.upper_bound).map_err(|e| e.at_row(row))?;
            let partial = !(lower == 9999 && upper == 9999);

            self.glaciers[position]
                .add_measurement(year, balance, partial)
                .map_err(|e| e.at_row(row))?;
            applied += 1;
        }

        Ok(applied)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Names of the `n` glaciers closest to (latitude, longitude).
    ///
    /// Names come back in working-set order: arrival order while the set
    /// is filling, later replacements appended at the end. The set only
    /// evicts its farthest member (the earliest such member on ties) when
    /// the newcomer is strictly closer. The result is NOT distance-sorted.
    pub fn find_nearest(&self, latitude: f64, longitude: f64, n: usize) -> Result<Vec<String>> {
        geo::validate_latitude(latitude)?;
        geo::validate_longitude(longitude)?;
        if n > self.glaciers.len() {
            return Err(GlacierError::invalid_value(
                "n",
                format!(
                    "asked for {n} glaciers but the catalog holds {}",
                    self.glaciers.len()
                ),
            ));
        }
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut nearest: Vec<(&Glacier, f64)> = Vec::with_capacity(n);
        for glacier in &self.glaciers {
            let distance =
                geo::distance_km(latitude, longitude, glacier.latitude(), glacier.longitude())?;

            if nearest.len() < n {
                nearest.push((glacier, distance));
                continue;
            }

            let farthest = extreme_index(&nearest, true);
            if distance.total_cmp(&nearest[farthest].1) == Ordering::Less {
                nearest.remove(farthest);
                nearest.push((glacier, distance));
            }
        }

        Ok(nearest
            .into_iter()
            .map(|(glacier, _)| glacier.name().to_string())
            .collect())
    }

    /// Names (in catalog order) of glaciers whose classification code
    /// matches `pattern`: exactly three characters, each a digit or a `?`
    /// wildcard.
    pub fn filter_by_code(&self, pattern: &str) -> Result<Vec<String>> {
        if pattern.chars().count() != 3 {
            return Err(GlacierError::invalid_value(
                "pattern",
                format!("must be exactly 3 characters, got '{pattern}'"),
            ));
        }
        if let Some(bad) = pattern.chars().find(|c| !c.is_ascii_digit() && *c != '?') {
            return Err(GlacierError::invalid_value(
                "pattern",
                format!("may only contain digits and '?', got '{bad}'"),
            ));
        }

        // Expand wildcards to concrete codes: replace the first `?` of
        // every candidate with each digit until none remains.
        let mut candidates = vec![pattern.to_string()];
        while candidates.iter().any(|c| c.contains('?')) {
            let mut expanded = Vec::with_capacity(candidates.len() * 10);
            for candidate in &candidates {
                match candidate.find('?') {
                    Some(position) => {
                        for digit in '0'..='9' {
                            let mut concrete = candidate.clone();
                            concrete.replace_range(position..position + 1, &digit.to_string());
                            expanded.push(concrete);
                        }
                    }
                    None => expanded.push(candidate.clone()),
                }
            }
            candidates = expanded;
        }

        let codes: HashSet<u32> = candidates.iter().filter_map(|c| c.parse().ok()).collect();

        Ok(self
            .glaciers
            .iter()
            .filter(|g| codes.contains(&g.code()))
            .map(|g| g.name().to_string())
            .collect())
    }

    /// The `n` glaciers with the largest latest balance (smallest when
    /// `reverse` is set), sorted by that balance: descending normally,
    /// ascending when `reverse`.
    ///
    /// Only glaciers with at least one reading qualify; fewer qualifiers
    /// than `n` is an error, not a shorter result. The working set holds
    /// one slot per glacier, so equal balance values never drop a
    /// candidate, and the final sort is stable, leaving catalog order
    /// among equals.
    pub fn sort_by_latest_balance(&self, n: usize, reverse: bool) -> Result<Vec<&Glacier>> {
        let measured = self.glaciers.iter().filter(|g| g.has_measurements()).count();
        if measured == 0 {
            return Err(GlacierError::NoData);
        }
        if measured < n {
            return Err(GlacierError::InsufficientData {
                requested: n,
                available: measured,
            });
        }
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut ranked: Vec<(&Glacier, f64)> = Vec::with_capacity(n);
        for glacier in &self.glaciers {
            let Some((_, latest)) = glacier.latest() else {
                continue;
            };

            if ranked.len() < n {
                ranked.push((glacier, latest));
                continue;
            }

            // Evict the weakest member (earliest on ties) only when the
            // newcomer strictly beats it
            let weakest = extreme_index(&ranked, reverse);
            let beats = if reverse {
                latest.total_cmp(&ranked[weakest].1) == Ordering::Less
            } else {
                latest.total_cmp(&ranked[weakest].1) == Ordering::Greater
            };
            if beats {
                ranked.remove(weakest);
                ranked.push((glacier, latest));
            }
        }

        if reverse {
            ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        } else {
            ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        }

        Ok(ranked.into_iter().map(|(glacier, _)| glacier).collect())
    }

    /// Catalog-wide statistics.
    ///
    /// The earliest year falls back to the current year when no glacier
    /// has readings, but the shrunk percentage needs at least one
    /// measured glacier, so a catalog without measurements reports
    /// `DivideByZero`.
    pub fn summary(&self) -> Result<CatalogSummary> {
        let glacier_count = self.glaciers.len();

        let earliest_measurement_year = self
            .glaciers
            .iter()
            .filter_map(Glacier::earliest_year)
            .min()
            .unwrap_or_else(current_year);

        let latest_balances: Vec<f64> = self
            .glaciers
            .iter()
            .filter_map(|g| g.latest())
            .map(|(_, value)| value)
            .collect();
        if latest_balances.is_empty() {
            return Err(GlacierError::DivideByZero);
        }

        let shrunk = latest_balances.iter().filter(|value| **value < 0.0).count();
        let percent_shrunk =
            (shrunk as f64 / latest_balances.len() as f64 * 100.0).round() as u32;

        Ok(CatalogSummary {
            glacier_count,
            earliest_measurement_year,
            percent_shrunk,
        })
    }

    /// The strongest grower and the strongest shrinker as labeled series.
    ///
    /// A "grower" must actually have grown (latest balance > 0) and a
    /// "shrinker" must actually have shrunk (latest balance < 0).
    pub fn extremes(&self) -> Result<(BalanceSeries, BalanceSeries)> {
        let ranked = self.sort_by_latest_balance(1, false)?;
        let grower = ranked.first().ok_or(GlacierError::NoData)?;
        let (_, growth) = grower.latest().ok_or(GlacierError::NoData)?;
        if growth <= 0.0 {
            return Err(GlacierError::NoGrowth);
        }

        let ranked = self.sort_by_latest_balance(1, true)?;
        let shrinker = ranked.first().ok_or(GlacierError::NoData)?;
        let (_, shrinkage) = shrinker.latest().ok_or(GlacierError::NoData)?;
        if shrinkage >= 0.0 {
            return Err(GlacierError::NoShrinkage);
        }

        Ok((
            BalanceSeries::new(grower.name(), grower.series()),
            BalanceSeries::new(shrinker.name(), shrinker.series()),
        ))
    }
}

// ============================================================================
// SUMMARY REPORT
// ============================================================================

/// What `GlacierCatalog::summary` reports.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSummary {
    pub glacier_count: usize,

    /// Year of the oldest reading anywhere in the catalog; the current
    /// year when nothing has been measured yet.
    pub earliest_measurement_year: i32,

    /// Share of measured glaciers whose latest balance is negative,
    /// rounded half away from zero.
    pub percent_shrunk: u32,
}

impl fmt::Display for CatalogSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "This catalog holds {} glaciers.", self.glacier_count)?;
        writeln!(
            f,
            "The earliest measurement was taken in {}.",
            self.earliest_measurement_year
        )?;
        write!(
            f,
            "{}% of the measured glaciers shrank in their latest measurement.",
            self.percent_shrunk
        )
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Index of the entry with the largest (`find_max`) or smallest value.
/// Ties resolve to the earliest entry.
fn extreme_index(entries: &[(&Glacier, f64)], find_max: bool) -> usize {
    let mut extreme = 0;
    for (i, entry) in entries.iter().enumerate().skip(1) {
        let ordering = entry.1.total_cmp(&entries[extreme].1);
        let replace = if find_max {
            ordering == Ordering::Greater
        } else {
            ordering == Ordering::Less
        };
        if replace {
            extreme = i;
        }
    }
    extreme
}

fn glacier_from_record(record: &InventoryRecord) -> Result<Glacier> {
    let latitude = parse_f64("latitude", &record.latitude)?;
    let longitude = parse_f64("longitude", &record.longitude)?;
    let code = assemble_code(&record.primary_class, &record.form, &record.frontal_chars)?;

    Glacier::new(
        record.id.clone(),
        record.name.clone(),
        record.political_unit.clone(),
        latitude,
        longitude,
        code,
    )
}

fn parse_f64(field: &'static str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse()
        .map_err(|_| GlacierError::invalid_type(field, "a number", raw))
}

fn parse_i32(field: &'static str, raw: &str) -> Result<i32> {
    raw.trim()
        .parse()
        .map_err(|_| GlacierError::invalid_type(field, "an integer", raw))
}

fn code_digit(field: &'static str, raw: &str) -> Result<u32> {
    let trimmed = raw.trim();
    match trimmed.parse::<u32>() {
        Ok(digit) if digit <= 9 && trimmed.len() == 1 => Ok(digit),
        Ok(_) => Err(GlacierError::invalid_value(
            field,
            format!("must be a single digit, got '{raw}'"),
        )),
        Err(_) => Err(GlacierError::invalid_type(field, "a digit", raw)),
    }
}

/// The classification code is the concatenation of three one-digit
/// fields; the entity constructor enforces the 3-digit range.
fn assemble_code(primary_class: &str, form: &str, frontal_chars: &str) -> Result<u32> {
    let primary = code_digit("primary class", primary_class)?;
    let form = code_digit("form", form)?;
    let frontal = code_digit("frontal characteristics", frontal_chars)?;
    Ok(primary * 100 + form * 10 + frontal)
}
