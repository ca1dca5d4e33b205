//! Apparent star positions under a spherical-Earth model and a flat-disk model.
//!
//! The globe model solves the navigational triangle in closed form; the flat
//! model rotates a light ray into the observer's frame and optionally raycasts
//! it onto a celestial dome. [`compare`] runs both over catalogs of stars and
//! locations, and the C ABI below hands the results to a host UI as JSON.

use std::f64::consts::PI;
use std::ffi::{c_char, CStr, CString};
use std::sync::Once;

use log::{error, info};
use serde::Serialize;

pub mod angle;
pub mod catalog;
pub mod compare;
pub mod coords;
pub mod error;
pub mod flat;
pub mod globe;
pub mod sidereal;
pub mod vector;

pub use angle::{Angle, Hemisphere, Sign};
pub use compare::{CompareConfig, Comparison, Report};
pub use coords::{Location, StarCoord};
pub use error::{Error, Result};
pub use flat::{FlatLocation, FlatStar};
pub use globe::{GlobeStar, Horizontal, SkyModel};
pub use vector::Vector3;

// ---------- Constants ----------
/// Equator circumference used to calibrate the flat disk.
pub const EARTH_CIRCUMFERENCE_M: f64 = 40_008_000.0;
/// Smallest dome the flat disk can always reach.
pub const MIN_CELESTIAL_SPHERE_RADIUS_M: f64 = EARTH_CIRCUMFERENCE_M;
pub const DEFAULT_CELESTIAL_SPHERE_RADIUS_M: f64 = 10.0 * EARTH_CIRCUMFERENCE_M;

// ---------- C ABI ----------
#[no_mangle]
pub extern "C" fn free_json(ptr: *mut c_char) {
    if ptr.is_null() { return; }
    unsafe { let _ = CString::from_raw(ptr); }
}

static INIT_LOGGER: Once = Once::new();

#[cfg(target_os = "android")]
fn init_logger() {
    use android_logger::Config;
    use log::LevelFilter;
    INIT_LOGGER.call_once(|| {
        android_logger::init_once(
            Config::default()
                .with_max_level(LevelFilter::Debug)
                .with_tag("starcompare")
        );
    });
}

#[cfg(not(target_os = "android"))]
fn init_logger() {
    INIT_LOGGER.call_once(|| {
        // RUST_LOG overrides the default level
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
            .try_init();
    });
}

/// One star seen from one location, with full ray details.
///
/// Returns a JSON object (a [`Comparison`]) or `{"error": "..."}`.
/// The caller releases the string with [`free_json`].
#[no_mangle]
pub extern "C" fn compare_star(
    ra_hours: f64,
    dec_deg: f64,
    lat_deg: f64,
    lon_deg: f64,
    epoch_seconds: i64,
    sphere_radius_m: f64,
) -> *mut c_char {
    init_logger();
    info!("[compare_star] ra: {}h, dec: {}, lat: {}, lon: {}, epoch: {}, radius: {}",
        ra_hours, dec_deg, lat_deg, lon_deg, epoch_seconds, sphere_radius_m);

    let star = StarCoord::new(
        Angle::from_radians(ra_hours / 12.0 * PI),
        Angle::from_degrees(dec_deg),
    );
    let location = Location::from_degrees(lat_deg, lon_deg);

    let result = CompareConfig::at_unix(epoch_seconds)
        .and_then(|config| config.with_radius(sphere_radius_m))
        .map(|config| config.with_verbose(true))
        .and_then(|config| compare::compare_one("star", star, "location", location, &config));
    to_json("compare_star", result)
}

/// Every star in `stars_csv` from every location in `locations_csv`.
///
/// Returns a JSON [`Report`] or `{"error": "..."}`; free with [`free_json`].
#[no_mangle]
pub extern "C" fn compare_catalogs(
    stars_csv: *const c_char,
    locations_csv: *const c_char,
    epoch_seconds: i64,
    sphere_radius_m: f64,
    verbose: bool,
) -> *mut c_char {
    init_logger();

    let (Some(stars_csv), Some(locations_csv)) = (read_c_str(stars_csv), read_c_str(locations_csv)) else {
        error!("[compare_catalogs] null catalog pointer");
        return error_json("null catalog pointer");
    };

    let result = (|| {
        let stars = catalog::parse_stars(&stars_csv)?;
        let locations = catalog::parse_locations(&locations_csv)?;
        let config = CompareConfig::at_unix(epoch_seconds)?
            .with_radius(sphere_radius_m)?
            .with_verbose(verbose);
        compare::compare_all(&stars, &locations, &config)
    })();
    to_json("compare_catalogs", result)
}

/// GMST in hours for a unix timestamp, or NaN when it is out of range.
#[no_mangle]
pub extern "C" fn gmst_hours(epoch_seconds: i64) -> f64 {
    sidereal::gmst_at_unix(epoch_seconds)
        .map(Angle::hours)
        .unwrap_or(f64::NAN)
}

fn read_c_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() { return None; }
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

fn to_json<T: Serialize>(caller: &str, result: Result<T>) -> *mut c_char {
    match result.map(|value| serde_json::to_string(&value)) {
        Ok(Ok(json)) => into_raw(json),
        Ok(Err(e)) => {
            error!("[{}] Failed to serialize: {}", caller, e);
            error_json(&e.to_string())
        }
        Err(e) => {
            error!("[{}] {}", caller, e);
            error_json(&e.to_string())
        }
    }
}

fn error_json(message: &str) -> *mut c_char {
    into_raw(serde_json::json!({ "error": message }).to_string())
}

fn into_raw(json: String) -> *mut c_char {
    // serde_json escapes NUL, so this only fails on a broken invariant
    CString::new(json)
        .map(CString::into_raw)
        .unwrap_or(std::ptr::null_mut())
}
