use std::collections::{BTreeMap, BTreeSet};
use std::ffi::{CStr, CString};

// Import from the starcompare library
use starcompare::{compare_catalogs, compare_star, free_json, gmst_hours};
use serde::Deserialize;

// 2016-05-05 12:30:00 UTC
const EPOCH: i64 = 1462451400;
const RADIUS_M: f64 = 400_080_000.0;

const SIRIUS_RA_H: f64 = 6.0 + 45.0 / 60.0 + 8.9 / 3600.0;
const SIRIUS_DEC_DEG: f64 = -(16.0 + 42.0 / 60.0 + 58.0 / 3600.0);

const STARS_CSV: &str = "\
# name, ra (h m s), dec (d m s)
sirius,6,45,8.9,-16,42,58
polaris,2,31,49,89,15,51
nu_oct,21,41,28,-77,23,24
";

const LOCATIONS_CSV: &str = "\
# name, lat, lon
perth,-31.95,115.86
london,51.5074,-0.1278
rio,-22.9068,-43.1729
";

#[derive(Debug, Deserialize)]
struct AngleOut {
    degrees: f64,
    formatted: String,
}

#[derive(Debug, Deserialize)]
struct HorizontalOut {
    azimuth: AngleOut,
    altitude: AngleOut,
}

#[derive(Debug, Deserialize)]
struct Row {
    location: String,
    star: String,
    globe: HorizontalOut,
    flat: HorizontalOut,
    azimuth_difference_deg: f64,
    altitude_difference_deg: f64,
    details: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ReportOut {
    gmst: AngleOut,
    celestial_sphere_radius: f64,
    rows: Vec<Row>,
}

fn take_json(ptr: *mut std::ffi::c_char) -> String {
    assert!(!ptr.is_null(), "FFI should return non-null pointer");
    let json = unsafe { CStr::from_ptr(ptr).to_string_lossy().into_owned() };
    free_json(ptr);
    json
}

fn sirius_from(lat: f64, lon: f64, radius: f64) -> String {
    take_json(compare_star(SIRIUS_RA_H, SIRIUS_DEC_DEG, lat, lon, EPOCH, radius))
}

#[test]
fn test_compare_star_perth() {
    let json = sirius_from(-31.95, 115.86, RADIUS_M);
    println!("Comparison JSON: {}", json);

    let row: Row = serde_json::from_str(&json)
        .unwrap_or_else(|err| panic!("Expected valid JSON, got error: {err}\nPayload: {json}"));

    assert!((row.globe.azimuth.degrees - 267.57808365922153).abs() < 1e-7);
    assert!((row.globe.altitude.degrees - 28.963764933159602).abs() < 1e-7);
    assert!((row.flat.azimuth.degrees - row.globe.azimuth.degrees).abs() < 1e-7);
    assert!((row.flat.altitude.degrees - row.globe.altitude.degrees).abs() < 1e-7);
    assert!(row.azimuth_difference_deg.abs() < 1e-7);
    assert!(row.altitude_difference_deg.abs() < 1e-7);
    assert!(row.globe.azimuth.formatted.starts_with("267° 34' "));
    assert_eq!(row.star, "star");
    assert_eq!(row.location, "location");
    assert!(row.details.is_some(), "single-star comparisons are verbose");
}

#[derive(Debug, Deserialize)]
struct SchemaFixture {
    #[serde(rename = "version")]
    _version: u32,
    #[serde(rename = "description")]
    _description: String,
    row_keys: Vec<String>,
    field_types: BTreeMap<String, ExpectedType>,
    detail_keys: Vec<String>,
    required_non_empty: Vec<String>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum ExpectedType {
    String,
    Number,
    Object,
}

#[test]
fn comparison_schema_matches_fixture() {
    // Golden schema describing the JSON shape handed to the host UI.
    let fixture: SchemaFixture = serde_json::from_str(include_str!("fixtures/comparison_schema.json"))
        .expect("fixture JSON should parse");

    let stars = CString::new(STARS_CSV).unwrap();
    let locations = CString::new(LOCATIONS_CSV).unwrap();
    let json = take_json(compare_catalogs(stars.as_ptr(), locations.as_ptr(), EPOCH, RADIUS_M, true));

    let report: serde_json::Value = serde_json::from_str(&json)
        .unwrap_or_else(|err| panic!("Expected valid JSON, got error: {err}\nPayload: {json}"));
    let rows = report["rows"].as_array().expect("report must carry a rows array");
    assert_eq!(rows.len(), 9);

    let expected_key_set: BTreeSet<_> = fixture.row_keys.iter().cloned().collect();
    let expected_detail_keys: BTreeSet<_> = fixture.detail_keys.iter().cloned().collect();

    for row in rows {
        let obj = row.as_object().expect("each row should be a JSON object");

        let actual_keys: BTreeSet<_> = obj.keys().cloned().collect();
        assert_eq!(
            actual_keys, expected_key_set,
            "Row JSON keys diverged from golden schema (update tests/fixtures/comparison_schema.json if intentional)"
        );

        for (field, expected_type) in &fixture.field_types {
            let value = obj.get(field).unwrap_or_else(|| {
                panic!("Field '{field}' missing from row even though schema lists it");
            });

            match expected_type {
                ExpectedType::String => {
                    let s = value
                        .as_str()
                        .unwrap_or_else(|| panic!("Field '{field}' should be a string"));
                    if fixture.required_non_empty.iter().any(|f| f == field) {
                        assert!(!s.trim().is_empty(), "Field '{field}' should not be empty per schema fixture");
                    }
                }
                ExpectedType::Number => {
                    value.as_f64().unwrap_or_else(|| {
                        panic!("Field '{field}' should be a number, got {value}")
                    });
                }
                ExpectedType::Object => {
                    assert!(value.is_object(), "Field '{field}' should be an object, got {value}");
                }
            }
        }

        let detail_keys: BTreeSet<_> = obj["details"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(detail_keys, expected_detail_keys);
    }
}

#[test]
fn test_compare_catalogs_models_agree() {
    let stars = CString::new(STARS_CSV).unwrap();
    let locations = CString::new(LOCATIONS_CSV).unwrap();
    let json = take_json(compare_catalogs(stars.as_ptr(), locations.as_ptr(), EPOCH, RADIUS_M, false));

    let report: ReportOut = serde_json::from_str(&json).expect("Should return a valid report");
    assert!(report.gmst.formatted.starts_with("3h 25m 14."), "{}", report.gmst.formatted);
    assert_eq!(report.celestial_sphere_radius, RADIUS_M);

    let order: Vec<_> = report.rows.iter().map(|r| (r.location.as_str(), r.star.as_str())).collect();
    assert_eq!(order[0], ("perth", "sirius"));
    assert_eq!(order[3], ("london", "sirius"));
    assert_eq!(order[8], ("rio", "nu_oct"));

    for row in &report.rows {
        println!("{} / {}: globe {} {}, flat {} {}",
            row.location, row.star,
            row.globe.azimuth.formatted, row.globe.altitude.formatted,
            row.flat.azimuth.formatted, row.flat.altitude.formatted);

        assert!(row.details.is_none());
        for h in [&row.globe, &row.flat] {
            assert!(h.azimuth.degrees >= 0.0 && h.azimuth.degrees < 360.0, "Azimuth should be 0-360 degrees");
            assert!(h.altitude.degrees >= -90.0 && h.altitude.degrees <= 90.0, "Altitude should be -90-90 degrees");
        }
        assert!(row.azimuth_difference_deg.abs() < 1e-7);
        assert!(row.altitude_difference_deg.abs() < 1e-7);
    }
}

#[test]
fn test_compare_star_small_sphere_is_an_error() {
    let json = sirius_from(-31.95, 115.86, 30_000_000.0);
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let message = value["error"].as_str().expect("error payload expected");
    assert!(message.contains("30000000"), "{message}");
    assert!(message.contains("40008000"), "{message}");
}

#[test]
fn test_compare_star_at_minimum_radius() {
    let json = sirius_from(51.5074, -0.1278, 40_008_000.0);
    let row: Row = serde_json::from_str(&json).expect("minimum radius is valid");
    let details = row.details.unwrap();
    let hit = &details["sphere_intercept"];
    let r = (hit["x"].as_f64().unwrap().powi(2)
        + hit["y"].as_f64().unwrap().powi(2)
        + hit["z"].as_f64().unwrap().powi(2))
    .sqrt();
    assert!((r - 40_008_000.0).abs() < 1e-3);
}

#[test]
fn test_compare_star_north_pole() {
    // Extreme coordinates
    let json = sirius_from(90.0, 0.0, RADIUS_M);
    let row: Row = serde_json::from_str(&json).expect("Should return valid JSON even for edge cases");
    assert!((row.flat.altitude.degrees - row.globe.altitude.degrees).abs() < 1e-7);
    // from the pole a star's altitude is its declination
    assert!((row.globe.altitude.degrees - SIRIUS_DEC_DEG).abs() < 1e-6);
}

#[test]
fn test_compare_star_equator() {
    let json = sirius_from(0.0, 0.0, RADIUS_M);
    let row: Row = serde_json::from_str(&json).expect("Should return valid JSON");
    assert!(row.azimuth_difference_deg.abs() < 1e-7);
    assert!(row.altitude_difference_deg.abs() < 1e-7);
}

#[test]
fn test_compare_catalogs_errors() {
    let stars = CString::new(STARS_CSV).unwrap();
    let bad_locations = CString::new("perth,south,115.86\n").unwrap();

    let json = take_json(compare_catalogs(stars.as_ptr(), bad_locations.as_ptr(), EPOCH, RADIUS_M, false));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value["error"].as_str().unwrap().contains("line 1"));

    let json = take_json(compare_catalogs(std::ptr::null(), stars.as_ptr(), EPOCH, RADIUS_M, false));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value["error"].is_string());

    let json = take_json(compare_catalogs(stars.as_ptr(), stars.as_ptr(), i64::MAX, RADIUS_M, false));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value["error"].as_str().unwrap().contains("out of range"));
}

#[test]
fn test_gmst_hours() {
    // 2000-01-01 12:00:00 UTC
    assert!((gmst_hours(946_728_000) - 18.697374558).abs() < 1e-9);
    assert!((gmst_hours(EPOCH) - 3.420685470162425).abs() < 1e-6);
    assert!(gmst_hours(i64::MAX).is_nan());
}

#[test]
fn test_free_json_null_is_noop() {
    free_json(std::ptr::null_mut());
}
