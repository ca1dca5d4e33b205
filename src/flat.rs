//! Flat-disk star position via ray rotation and a celestial-dome raycast.
//!
//! Frame: the north pole sits at the origin with +Z up, the Greenwich meridian
//! (and the vernal equinox, for star rays) points along +Y.

use std::f64::consts::PI;

use log::{debug, warn};
use serde::Serialize;

use crate::angle::{wrap_tau, Angle};
use crate::coords::{Location, StarCoord};
use crate::error::{Error, Result};
use crate::globe::SkyModel;
use crate::vector::Vector3;
use crate::{EARTH_CIRCUMFERENCE_M, MIN_CELESTIAL_SPHERE_RADIUS_M};

/// Meters of disk radius per radian of latitude.
pub const METERS_PER_RADIAN_LAT: f64 = EARTH_CIRCUMFERENCE_M / 2.0 / PI;

/// A location projected onto the disk: latitude maps linearly to the radial
/// distance from the centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlatLocation {
    location: Location,
    radius: f64,
}

impl FlatLocation {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            radius: location.lat().rad() * METERS_PER_RADIAN_LAT,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Point on the disk plane (z = 0). Increasing longitude turns the point
    /// the same way the star rays spin.
    pub fn vector(&self) -> Vector3 {
        let lon = self.location.lon().rad();
        Vector3::new(self.radius * (-lon).sin(), self.radius * lon.cos(), 0.0)
    }
}

impl From<Location> for FlatLocation {
    fn from(location: Location) -> Self {
        Self::new(location)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatStar {
    coord: StarCoord,
}

impl FlatStar {
    pub fn new(coord: StarCoord) -> Self {
        Self { coord }
    }

    pub fn coord(&self) -> StarCoord {
        self.coord
    }

    /// Unit ray for the star's RA/Dec: tilt by declination first, then spin by
    /// right ascension.
    pub fn base_ray_direction(&self) -> Vector3 {
        Vector3::new(0.0, 1.0, 0.0)
            .rotate_x(self.coord.dec().rad())
            .rotate_z(self.coord.ra().rad())
    }

    /// Base ray turned into the observer's frame. Tilting about an axis that is
    /// itself rotated is done by un-spinning to the observer's meridian, tilting
    /// by the co-latitude about X, and spinning back.
    pub fn local_ray_direction(&self, location: &Location, gmst: Angle) -> Vector3 {
        let lst = self.local_sidereal_time(location, gmst).rad();
        self.base_ray_direction()
            .rotate_z(-lst)
            .rotate_x(PI / 2.0 - location.lat().rad())
            .rotate_z(lst)
    }

    pub fn local_sidereal_time(&self, location: &Location, gmst: Angle) -> Angle {
        gmst + location.lon()
    }

    /// Casts the local ray from the observer's disk point until it meets a
    /// dome of `sphere_radius` meters centred on the disk.
    pub fn sphere_intercept(
        &self,
        location: &FlatLocation,
        gmst: Angle,
        sphere_radius: f64,
    ) -> Result<Vector3> {
        let too_small = || Error::SphereTooSmall {
            radius: sphere_radius,
            minimum: MIN_CELESTIAL_SPHERE_RADIUS_M,
        };
        if !(sphere_radius >= MIN_CELESTIAL_SPHERE_RADIUS_M) {
            warn!("[sphere_intercept] rejected radius {} m", sphere_radius);
            return Err(too_small());
        }

        let d = self.local_ray_direction(location.location(), gmst);
        let o = location.vector();

        // |o + d*t|^2 = R^2  =>  a*t^2 + b*t + c = 0
        let a = d.dot(d);
        let b = 2.0 * o.dot(d);
        let c = o.dot(o) - sphere_radius * sphere_radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            warn!(
                "[sphere_intercept] no intersection: discriminant {} for radius {} m",
                discriminant, sphere_radius
            );
            return Err(too_small());
        }
        let root = discriminant.sqrt();

        // forward intersection only
        let mut t = (-b + root) / (2.0 * a);
        if t < 0.0 {
            t = (-b - root) / (2.0 * a);
        }
        debug!("[sphere_intercept] origin: {}, direction: {}, t: {:.3}", o, d, t);

        Ok(o + d * t)
    }
}

impl SkyModel for FlatStar {
    /// Elevation read straight off the ray's Z component.
    fn altitude(&self, location: &Location, gmst: Angle) -> Angle {
        let direction = self.local_ray_direction(location, gmst);
        let sin_alt = (direction.z / direction.length()).clamp(-1.0, 1.0);
        Angle::from_radians(sin_alt.asin())
    }

    fn azimuth(&self, location: &Location, gmst: Angle) -> Angle {
        let direction = self.local_ray_direction(location, gmst);

        let mut absolute_direction = if direction.x == 0.0 {
            if direction.y > 0.0 {
                PI / 2.0
            } else {
                -PI / 2.0
            }
        } else {
            (direction.y / direction.x).atan()
        };
        if direction.x < 0.0 {
            absolute_direction += PI;
        }

        // bearing relative to the observer's north
        let azimuth = gmst.rad() + location.lon().rad() - PI / 2.0 - absolute_direction;
        Angle::from_radians(wrap_tau(azimuth))
    }
}
