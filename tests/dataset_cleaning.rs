//! Integration tests for loading and cleaning the station CSV

use stationmap::dataset::{Dataset, HOURS};
use stationmap::Error;
use std::fs;

const HEADER_NO_HOURS: &str = "station_key,name,lat,lon,target_stock,initial_stock,rebal_qty,mean_net,std_net";

#[test]
fn non_numeric_coordinates_are_dropped() {
    let csv = format!(
        "{}\n{}\n{}\n{}\n{}\n",
        HEADER_NO_HOURS,
        "A,Alpha,36.35,127.38,5,3,2,0.5,1.0",
        "B,Bravo,not-a-lat,127.39,5,3,2,0.5,1.0",
        "C,Charlie,36.37,,5,3,2,0.5,1.0",
        "D,Delta,36.38,127.41,5,3,2,0.5,1.0"
    );
    let ds = Dataset::from_reader(csv.as_bytes()).unwrap();

    assert_eq!(ds.source_rows, 4);
    assert_eq!(ds.dropped, 2);
    assert_eq!(ds.len(), ds.source_rows - ds.dropped);
    let keys: Vec<&str> = ds.stations.iter().map(|s| s.station_key.as_str()).collect();
    assert_eq!(keys, vec!["A", "D"]);
    assert!(ds.stations.iter().all(|s| s.lat.is_finite() && s.lon.is_finite()));
}

#[test]
fn missing_hourly_columns_yield_zero_series() {
    let csv = format!("{}\nA,Alpha,36.35,127.38,5,3,2,0.5,1.0\n", HEADER_NO_HOURS);
    let ds = Dataset::from_reader(csv.as_bytes()).unwrap();

    assert_eq!(ds.hour_fields.len(), HOURS);
    assert_eq!(ds.stations[0].hourly_net, [0.0; HOURS]);
}

#[test]
fn partial_hourly_columns_are_read_in_hour_order() {
    // Columns deliberately out of order
    let csv = "lat,lon,net_23,net_00,net_12\n36.0,127.0,-3,1.5,2\n";
    let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
    let series = ds.stations[0].hourly_net;

    assert_eq!(series[0], 1.5);
    assert_eq!(series[12], 2.0);
    assert_eq!(series[23], -3.0);
    assert_eq!(series.iter().filter(|v| **v != 0.0).count(), 3);
}

#[test]
fn optional_fields_stay_missing() {
    let csv = "lat,lon,name,target_stock,mean_net\n36.0,127.0,,abc,\n";
    let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
    let station = &ds.stations[0];

    assert_eq!(station.name, "");
    assert_eq!(station.station_key, "");
    assert_eq!(station.target_stock, None);
    assert_eq!(station.target_or_zero(), 0.0);
    assert_eq!(station.mean_net, None);
    assert_eq!(station.initial_stock, None);
}

#[test]
fn short_rows_are_tolerated() {
    let csv = "station_key,lat,lon,target_stock\nA,36.0,127.0\n";
    let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
    assert_eq!(ds.len(), 1);
    assert_eq!(ds.stations[0].target_stock, None);
}

#[test]
fn load_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stations.csv");
    fs::write(&path, "lat,lon,target_stock\n36.1,127.2,4\n36.2,127.3,8\n").unwrap();

    let ds = Dataset::load(&path).unwrap();
    assert_eq!(ds.len(), 2);
    assert_eq!(ds.stations[1].target_stock, Some(8.0));
}

#[test]
fn load_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.csv");
    match Dataset::load(&path) {
        Err(Error::NotFound(p)) => assert_eq!(p, path),
        other => panic!("expected NotFound, got {:?}", other.map(|d| d.len())),
    }
}
