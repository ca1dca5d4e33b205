//! Two-angle spherical coordinates, tagged by what the angles mean.
//!
//! A terrestrial [`Location`] (latitude, longitude) and a celestial
//! [`StarCoord`] (declination, right ascension) share one layout but expose
//! role-specific accessors, so a star cannot be passed where an observer is
//! expected.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::angle::Angle;

/// Observer on the Earth's surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terrestrial;

/// Direction on the celestial sphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Celestial;

/// `polar` is the latitude-like angle, `azimuthal` the longitude-like one.
/// Ranges are not enforced: latitude/declination is expected in [-π/2, π/2]
/// and longitude in [-π, π].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct SphereCoord<Role> {
    polar: Angle,
    azimuthal: Angle,
    #[serde(skip)]
    role: PhantomData<Role>,
}

pub type Location = SphereCoord<Terrestrial>;
pub type StarCoord = SphereCoord<Celestial>;

impl<Role> SphereCoord<Role> {
    fn from_parts(polar: Angle, azimuthal: Angle) -> Self {
        Self {
            polar,
            azimuthal,
            role: PhantomData,
        }
    }
}

impl SphereCoord<Terrestrial> {
    pub fn new(lat: Angle, lon: Angle) -> Self {
        Self::from_parts(lat, lon)
    }

    pub fn from_degrees(lat_deg: f64, lon_deg: f64) -> Self {
        Self::new(Angle::from_degrees(lat_deg), Angle::from_degrees(lon_deg))
    }

    pub fn lat(&self) -> Angle {
        self.polar
    }

    pub fn lon(&self) -> Angle {
        self.azimuthal
    }
}

impl SphereCoord<Celestial> {
    pub fn new(ra: Angle, dec: Angle) -> Self {
        Self::from_parts(dec, ra)
    }

    pub fn ra(&self) -> Angle {
        self.azimuthal
    }

    pub fn dec(&self) -> Angle {
        self.polar
    }
}

impl fmt::Display for SphereCoord<Terrestrial> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.lat().lat(), self.lon().lon())
    }
}

impl fmt::Display for SphereCoord<Celestial> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.ra().hour(), self.dec().deg_min_sec())
    }
}
