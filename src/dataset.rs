//! Station dataset loading and cleaning
//!
//! The input is a headered CSV with one row per station. Only `lat` and `lon`
//! are required; every other column is optional. Cleaning follows a few
//! simple rules:
//!
//! - `lat`/`lon` are coerced to finite floats and rows failing coercion are
//!   dropped.
//! - The 24 hourly net-flow columns (`net_00` .. `net_23`) are coerced to
//!   floats with `0.0` substituted for blanks and garbage. A column missing
//!   from the header yields zeros for every row.
//! - Inventory and summary fields are kept as `Option<f64>`; consumers pick
//!   their own defaults.
//!
//! Retained rows keep their source order.

use crate::{Error, Result};
use log::{debug, info};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Number of hourly net-flow fields per station
pub const HOURS: usize = 24;

/// Canonical name of the hourly field for `hour` (`net_00` .. `net_23`)
pub fn hour_field(hour: usize) -> String {
    format!("net_{:02}", hour)
}

/// Canonical ordered list of the hourly field names
pub fn hour_fields() -> Vec<String> {
    (0..HOURS).map(hour_field).collect()
}

/// One cleaned row of the station dataset
#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    pub station_key: String,
    /// Human-readable station label
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Desired inventory level; drives marker color and size
    pub target_stock: Option<f64>,
    pub initial_stock: Option<f64>,
    pub rebal_qty: Option<f64>,
    /// Pre-aggregated mean of the hourly net flow, passed through as read
    pub mean_net: Option<f64>,
    /// Pre-aggregated standard deviation of the hourly net flow, passed through as read
    pub std_net: Option<f64>,
    /// Net flow (inflow minus outflow) per hour of day
    pub hourly_net: [f64; HOURS],
}

impl StationRecord {
    /// Target stock with missing values treated as zero
    pub fn target_or_zero(&self) -> f64 {
        self.target_stock.unwrap_or(0.0)
    }
}

/// The cleaned dataset plus bookkeeping about what was dropped
#[derive(Debug, Clone)]
pub struct Dataset {
    pub stations: Vec<StationRecord>,
    /// Ordered hourly field names the series were read from
    pub hour_fields: Vec<String>,
    /// Number of data rows in the source file
    pub source_rows: usize,
    /// Rows discarded because `lat` or `lon` did not coerce
    pub dropped: usize,
}

impl Dataset {
    /// Load and clean the CSV file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        let dataset = Self::from_reader(file)?;
        info!(
            "Loaded {} of {} rows from {} ({} dropped)",
            dataset.len(),
            dataset.source_rows,
            path.display(),
            dataset.dropped
        );
        Ok(dataset)
    }

    /// Parse and clean CSV data from any reader
    pub fn from_reader<R: Read>(rdr: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(rdr);

        let columns = Columns::resolve(reader.headers()?)?;
        let mut stations = Vec::new();
        let mut source_rows = 0usize;
        let mut dropped = 0usize;

        for result in reader.records() {
            let row = result?;
            source_rows += 1;
            match columns.clean_row(&row) {
                Some(station) => stations.push(station),
                None => {
                    debug!("Dropping row {} without usable lat/lon", source_rows);
                    dropped += 1;
                }
            }
        }

        Ok(Self {
            stations,
            hour_fields: hour_fields(),
            source_rows,
            dropped,
        })
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Arithmetic mean of all retained coordinates, `None` for an empty dataset
    pub fn mean_location(&self) -> Option<(f64, f64)> {
        if self.stations.is_empty() {
            return None;
        }
        let n = self.stations.len() as f64;
        let lat = self.stations.iter().map(|s| s.lat).sum::<f64>() / n;
        let lon = self.stations.iter().map(|s| s.lon).sum::<f64>() / n;
        Some((lat, lon))
    }
}

/// Coerce a raw cell to a finite float; blanks, garbage, NaN and infinities yield `None`
pub fn coerce_numeric(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Header positions of the fields the cleaner understands
struct Columns {
    station_key: Option<usize>,
    name: Option<usize>,
    lat: usize,
    lon: usize,
    target_stock: Option<usize>,
    initial_stock: Option<usize>,
    rebal_qty: Option<usize>,
    mean_net: Option<usize>,
    std_net: Option<usize>,
    hours: [Option<usize>; HOURS],
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let required = |name: &str| find(name).ok_or_else(|| Error::MissingColumn(name.to_string()));

        let mut hours = [None; HOURS];
        for (hour, slot) in hours.iter_mut().enumerate() {
            *slot = find(hour_field(hour).as_str());
            if slot.is_none() {
                debug!("Column {} absent; using zeros", hour_field(hour));
            }
        }

        Ok(Self {
            station_key: find("station_key"),
            name: find("name"),
            lat: required("lat")?,
            lon: required("lon")?,
            target_stock: find("target_stock"),
            initial_stock: find("initial_stock"),
            rebal_qty: find("rebal_qty"),
            mean_net: find("mean_net"),
            std_net: find("std_net"),
            hours,
        })
    }

    fn clean_row(&self, row: &csv::StringRecord) -> Option<StationRecord> {
        let text = |idx: Option<usize>| {
            idx.and_then(|i| row.get(i))
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };
        let number = |idx: Option<usize>| idx.and_then(|i| row.get(i)).and_then(coerce_numeric);

        let lat = number(Some(self.lat))?;
        let lon = number(Some(self.lon))?;

        let mut hourly_net = [0.0; HOURS];
        for (value, idx) in hourly_net.iter_mut().zip(self.hours.iter()) {
            *value = number(*idx).unwrap_or(0.0);
        }

        Some(StationRecord {
            station_key: text(self.station_key),
            name: text(self.name),
            lat,
            lon,
            target_stock: number(self.target_stock),
            initial_stock: number(self.initial_stock),
            rebal_qty: number(self.rebal_qty),
            mean_net: number(self.mean_net),
            std_net: number(self.std_net),
            hourly_net,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_fields_are_zero_padded() {
        let fields = hour_fields();
        assert_eq!(fields.len(), HOURS);
        assert_eq!(fields[0], "net_00");
        assert_eq!(fields[9], "net_09");
        assert_eq!(fields[23], "net_23");
    }

    #[test]
    fn coerce_numeric_rejects_garbage_and_non_finite() {
        assert_eq!(coerce_numeric(" 36.35 "), Some(36.35));
        assert_eq!(coerce_numeric("-2"), Some(-2.0));
        assert_eq!(coerce_numeric(""), None);
        assert_eq!(coerce_numeric("n/a"), None);
        assert_eq!(coerce_numeric("NaN"), None);
        assert_eq!(coerce_numeric("inf"), None);
    }

    #[test]
    fn missing_lat_column_is_an_error() {
        let csv = "station_key,name,lon\nA,Alpha,127.3\n";
        let err = Dataset::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MissingColumn(ref c) if c == "lat"));
    }

    #[test]
    fn hourly_values_are_coerced_in_place() {
        let csv = "lat,lon,net_00,net_01,net_02\n36.3,127.4,1.5,oops,\n";
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
        let series = ds.stations[0].hourly_net;
        assert_eq!(series[0], 1.5);
        assert_eq!(series[1], 0.0);
        assert_eq!(series[2], 0.0);
        assert!(series[3..].iter().all(|v| *v == 0.0));
    }

    #[test]
    fn mean_location_averages_coordinates() {
        let csv = "lat,lon\n36.0,127.0\n37.0,128.0\n";
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.mean_location(), Some((36.5, 127.5)));
    }

    #[test]
    fn mean_location_of_empty_dataset_is_none() {
        let ds = Dataset::from_reader("lat,lon\n".as_bytes()).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.mean_location(), None);
    }
}
