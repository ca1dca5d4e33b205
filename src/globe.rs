//! Spherical-Earth star position via celestial-navigation trigonometry.

use std::f64::consts::{PI, TAU};

use serde::Serialize;

use crate::angle::Angle;
use crate::coords::{Location, StarCoord};

/// Azimuth (clockwise from north, [0, 2π)) and altitude ([-π/2, π/2]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Horizontal {
    pub azimuth: Angle,
    pub altitude: Angle,
}

/// Anything that can place a star on an observer's horizon.
pub trait SkyModel {
    fn azimuth(&self, location: &Location, gmst: Angle) -> Angle;
    fn altitude(&self, location: &Location, gmst: Angle) -> Angle;

    fn horizontal(&self, location: &Location, gmst: Angle) -> Horizontal {
        Horizontal {
            azimuth: self.azimuth(location, gmst),
            altitude: self.altitude(location, gmst),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobeStar {
    coord: StarCoord,
}

impl GlobeStar {
    pub fn new(coord: StarCoord) -> Self {
        Self { coord }
    }

    pub fn coord(&self) -> StarCoord {
        self.coord
    }

    /// GMST + longitude - RA, not wrapped; only its sine and cosine are used.
    pub fn local_hour_angle(&self, location: &Location, gmst: Angle) -> Angle {
        gmst + location.lon() - self.coord.ra()
    }

    pub fn greenwich_hour_angle(&self, gmst: Angle) -> Angle {
        gmst - self.coord.ra()
    }

    pub fn local_sidereal_time(&self, location: &Location, gmst: Angle) -> Angle {
        gmst + location.lon()
    }
}

impl SkyModel for GlobeStar {
    fn altitude(&self, location: &Location, gmst: Angle) -> Angle {
        let lat = location.lat().rad();
        let dec = self.coord.dec().rad();
        let lha = self.local_hour_angle(location, gmst).rad();

        let sin_alt = lat.sin() * dec.sin() + lat.cos() * dec.cos() * lha.cos();
        Angle::from_radians(sin_alt.clamp(-1.0, 1.0).asin())
    }

    fn azimuth(&self, location: &Location, gmst: Angle) -> Angle {
        let lat = location.lat().rad();
        let dec = self.coord.dec().rad();
        let lha = self.local_hour_angle(location, gmst).rad();

        let den = lat.sin() * lha.cos() - dec.tan() * lat.cos();
        let sin_lha = lha.sin();

        // vertical case: the sign of sin(lha) alone picks east or west
        if den == 0.0 {
            return Angle::from_radians(if sin_lha == 0.0 {
                0.0
            } else if sin_lha > 0.0 {
                1.5 * PI
            } else {
                0.5 * PI
            });
        }

        // atan covers two quadrants; the sign of den selects the other two
        let mut azimuth = (sin_lha / den).atan();
        if den > 0.0 {
            azimuth += PI;
        }
        if azimuth < 0.0 {
            azimuth += TAU;
        }
        // a tiny negative atan plus 2π can round to exactly 2π
        Angle::from_radians(azimuth).normalized()
    }
}
