//! Sparkline output is a pure function of its input

use sha2::{Digest, Sha256};
use stationmap::chart::{render_sparkline, SparklineStyle};

fn digest(values: &[f64]) -> String {
    let png = render_sparkline(values, &SparklineStyle::default()).expect("render");
    hex::encode(Sha256::digest(&png))
}

fn morning_peak() -> Vec<f64> {
    (0..24).map(|h| if (7..=9).contains(&h) { -4.0 } else { 0.5 }).collect()
}

#[test]
fn identical_series_give_identical_images() {
    assert_eq!(digest(&morning_peak()), digest(&morning_peak()));
}

#[test]
fn rendering_other_stations_does_not_leak_state() {
    let before = digest(&morning_peak());
    for k in 0..5 {
        let noise: Vec<f64> = (0..24).map(|h| ((h * (k + 3)) % 7) as f64 - 3.0).collect();
        digest(&noise);
    }
    assert_eq!(digest(&morning_peak()), before);
}

#[test]
fn different_series_give_different_images() {
    let flat = vec![0.0; 24];
    assert_ne!(digest(&flat), digest(&morning_peak()));
}

#[test]
fn image_has_requested_dimensions() {
    let style = SparklineStyle::default();
    let png = render_sparkline(&morning_peak(), &style).unwrap();
    // IHDR width/height, big-endian, right after the 8-byte magic and chunk header
    let width = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
    let height = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
    assert_eq!((width, height), (style.width, style.height));
}
