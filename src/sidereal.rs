//! Greenwich Mean Sidereal Time from a UTC instant.

use std::f64::consts::PI;

use chrono::{DateTime, Utc};

use crate::angle::Angle;
use crate::error::{Error, Result};

/// 2000-01-01T12:00:00 UTC as unix seconds.
pub const J2000_UNIX_SECONDS: i64 = 946_728_000;

const SECONDS_PER_DAY: f64 = 86_400.0;

// GMST (hours) = GMST_AT_J2000_HOURS + GMST_HOURS_PER_DAY * days since J2000
const GMST_AT_J2000_HOURS: f64 = 18.697374558;
const GMST_HOURS_PER_DAY: f64 = 24.06570982441908;

/// Fractional days elapsed since the J2000 epoch (negative before it).
pub fn days_since_j2000(t: DateTime<Utc>) -> f64 {
    let whole_seconds = t.timestamp() - J2000_UNIX_SECONDS;
    let subsec = t.timestamp_subsec_nanos() as f64 / 1.0e9;
    (whole_seconds as f64 + subsec) / SECONDS_PER_DAY
}

/// GMST as an hour-angle in [0, 2π).
pub fn gmst(t: DateTime<Utc>) -> Angle {
    let hours = (GMST_AT_J2000_HOURS + GMST_HOURS_PER_DAY * days_since_j2000(t)).rem_euclid(24.0);
    // rem_euclid may round up to the modulus itself
    let hours = if hours >= 24.0 { 0.0 } else { hours };
    Angle::from_radians(hours / 12.0 * PI)
}

/// GMST for a unix timestamp in seconds.
pub fn gmst_at_unix(epoch_seconds: i64) -> Result<Angle> {
    DateTime::<Utc>::from_timestamp(epoch_seconds, 0)
        .map(gmst)
        .ok_or(Error::InvalidTimestamp(epoch_seconds))
}
