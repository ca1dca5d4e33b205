//! Radian-based angle value with sexagesimal constructors and formatted views.
//!
//! Every constructor converts to radians up front; the formatting methods are
//! pure projections of that single value.

use std::f64::consts::{PI, TAU};
use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ---------- Sexagesimal resolution ----------
// Formatted seconds are rounded to the nanosecond (of arc or of time) before the
// integer parts are extracted, so 30s never renders as 29.999999999s.
const NANOS_PER_SECOND: u64 = 1_000_000_000;
const NANOS_PER_MINUTE: u64 = 60 * NANOS_PER_SECOND;
const NANOS_PER_UNIT: u64 = 3600 * NANOS_PER_SECOND;

#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Angle {
    rad: f64,
}

/// Compass letter attached to a latitude or longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    N,
    S,
    E,
    W,
}

impl Hemisphere {
    pub fn is_negative(self) -> bool {
        matches!(self, Hemisphere::S | Hemisphere::W)
    }
}

impl FromStr for Hemisphere {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N" => Ok(Hemisphere::N),
            "S" => Ok(Hemisphere::S),
            "E" => Ok(Hemisphere::E),
            "W" => Ok(Hemisphere::W),
            _ => Err(Error::UnknownHemisphere(s.to_string())),
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Hemisphere::N => "N",
            Hemisphere::S => "S",
            Hemisphere::E => "E",
            Hemisphere::W => "W",
        };
        f.write_str(letter)
    }
}

/// Explicit direction of an hour angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sign {
    #[default]
    Plus,
    Minus,
}

impl Angle {
    pub const ZERO: Angle = Angle { rad: 0.0 };

    pub const fn from_radians(rad: f64) -> Self {
        Self { rad }
    }

    pub fn from_degrees(deg: f64) -> Self {
        Self { rad: deg.to_radians() }
    }

    /// Latitude or longitude given as degrees, minutes, seconds and a hemisphere.
    ///
    /// The sign may come from a negative `d` (including `-0.0`) or from an
    /// S/W hemisphere, but not from both: that combination is rejected with
    /// [`Error::ConflictingSign`] rather than silently cancelling out.
    pub fn from_latlon(d: f64, m: f64, s: f64, hemisphere: Hemisphere) -> Result<Self> {
        let degrees = signed_sexagesimal(d, m, s, hemisphere.is_negative(), || {
            format!("hemisphere {hemisphere}")
        })?;
        Ok(Self::from_degrees(degrees))
    }

    /// Hour angle from hours, minutes, seconds; 12h is π radians.
    pub fn from_hms(h: f64, m: f64, s: f64) -> Result<Self> {
        Self::from_hms_signed(h, m, s, Sign::Plus)
    }

    /// Same as [`Angle::from_hms`] with an explicit direction. A negative `h`
    /// together with [`Sign::Minus`] is a [`Error::ConflictingSign`].
    pub fn from_hms_signed(h: f64, m: f64, s: f64, direction: Sign) -> Result<Self> {
        let hours = signed_sexagesimal(h, m, s, direction == Sign::Minus, || {
            "negative direction".to_string()
        })?;
        Ok(Self::from_radians(hours * PI / 12.0))
    }

    pub fn rad(self) -> f64 {
        self.rad
    }

    pub fn deg(self) -> f64 {
        self.rad.to_degrees()
    }

    pub fn hours(self) -> f64 {
        self.rad / PI * 12.0
    }

    /// `D° M' S" N` or `... S`.
    pub fn lat(self) -> String {
        let hemisphere = if self.rad >= 0.0 { Hemisphere::N } else { Hemisphere::S };
        let parts = Sexagesimal::split(self.deg());
        format!("{}° {}' {}\" {}", parts.whole, parts.minutes, parts.seconds_text(), hemisphere)
    }

    /// `D° M' S" E` or `... W`.
    pub fn lon(self) -> String {
        let hemisphere = if self.rad >= 0.0 { Hemisphere::E } else { Hemisphere::W };
        let parts = Sexagesimal::split(self.deg());
        format!("{}° {}' {}\" {}", parts.whole, parts.minutes, parts.seconds_text(), hemisphere)
    }

    pub fn deg_min_sec(self) -> String {
        let parts = Sexagesimal::split(self.deg());
        format!(
            "{}{}° {}' {}\"",
            self.sign_prefix(),
            parts.whole,
            parts.minutes,
            parts.seconds_text()
        )
    }

    pub fn hour(self) -> String {
        let parts = Sexagesimal::split(self.hours());
        format!(
            "{}{}h {}m {}s",
            self.sign_prefix(),
            parts.whole,
            parts.minutes,
            parts.seconds_text()
        )
    }

    /// Same direction, reduced into [0, 2π).
    pub fn normalized(self) -> Self {
        Self::from_radians(wrap_tau(self.rad))
    }

    fn sign_prefix(self) -> &'static str {
        if self.rad >= 0.0 {
            ""
        } else {
            "-"
        }
    }
}

/// Reduces radians into [0, 2π). `rem_euclid` can round a tiny negative input
/// up to exactly 2π, which is folded back to zero.
pub(crate) fn wrap_tau(rad: f64) -> f64 {
    let wrapped = rad.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

fn signed_sexagesimal(
    first: f64,
    minutes: f64,
    seconds: f64,
    negative_indicator: bool,
    indicator: impl FnOnce() -> String,
) -> Result<f64> {
    let invalid = |reason| Error::InvalidSexagesimal {
        first,
        minutes,
        seconds,
        reason,
    };
    if !(first.is_finite() && minutes.is_finite() && seconds.is_finite()) {
        return Err(invalid("fields must be finite"));
    }
    if minutes < 0.0 || seconds < 0.0 {
        return Err(invalid("minutes and seconds must not be negative"));
    }

    let leading_negative = first.is_sign_negative();
    if leading_negative && negative_indicator {
        return Err(Error::ConflictingSign {
            value: first,
            indicator: indicator(),
        });
    }

    let magnitude = first.abs() + minutes / 60.0 + seconds / 3600.0;
    Ok(if leading_negative || negative_indicator {
        -magnitude
    } else {
        magnitude
    })
}

struct Sexagesimal {
    whole: u64,
    minutes: u64,
    seconds: f64,
}

impl Sexagesimal {
    /// Splits the absolute value of `units` (degrees or hours).
    fn split(units: f64) -> Self {
        // float -> int casts saturate, so huge angles cannot wrap around
        let nanos = (units.abs() * NANOS_PER_UNIT as f64).round() as u64;
        let remainder = nanos % NANOS_PER_UNIT;
        Self {
            whole: nanos / NANOS_PER_UNIT,
            minutes: remainder / NANOS_PER_MINUTE,
            seconds: (remainder % NANOS_PER_MINUTE) as f64 / NANOS_PER_SECOND as f64,
        }
    }

    /// Shortest round-trip digits; exponents below 1e-4 get two digits (`1e-09`).
    fn seconds_text(&self) -> String {
        let text = format!("{:?}", self.seconds);
        match text.split_once("e-") {
            Some((mantissa, exponent)) => format!("{mantissa}e-{exponent:0>2}"),
            None => text,
        }
    }
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, other: Angle) -> Angle {
        Angle::from_radians(self.rad + other.rad)
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, other: Angle) -> Angle {
        Angle::from_radians(self.rad - other.rad)
    }
}

impl Neg for Angle {
    type Output = Angle;

    fn neg(self) -> Angle {
        Angle::from_radians(-self.rad)
    }
}

impl From<Angle> for f64 {
    fn from(angle: Angle) -> f64 {
        angle.rad
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rad)
    }
}
