//! Side-by-side evaluation of the globe and flat models.

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::angle::Angle;
use crate::catalog::Catalog;
use crate::coords::{Location, StarCoord};
use crate::error::{Error, Result};
use crate::flat::{FlatLocation, FlatStar};
use crate::globe::{GlobeStar, Horizontal, SkyModel};
use crate::sidereal;
use crate::vector::Vector3;
use crate::{DEFAULT_CELESTIAL_SPHERE_RADIUS_M, MIN_CELESTIAL_SPHERE_RADIUS_M};

// ---------- Configuration ----------

/// Inputs shared by every row of a comparison run. There is no implicit "now":
/// callers pick the instant (or GMST) explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompareConfig {
    pub gmst: Angle,
    #[serde(default = "default_sphere_radius")]
    pub celestial_sphere_radius: f64,
    #[serde(default)]
    pub verbose: bool,
}

fn default_sphere_radius() -> f64 {
    DEFAULT_CELESTIAL_SPHERE_RADIUS_M
}

impl CompareConfig {
    pub fn new(gmst: Angle) -> Self {
        Self {
            gmst,
            celestial_sphere_radius: DEFAULT_CELESTIAL_SPHERE_RADIUS_M,
            verbose: false,
        }
    }

    pub fn at(t: DateTime<Utc>) -> Self {
        Self::new(sidereal::gmst(t))
    }

    pub fn at_unix(epoch_seconds: i64) -> Result<Self> {
        sidereal::gmst_at_unix(epoch_seconds).map(Self::new)
    }

    /// Reads the wall clock once.
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    pub fn with_radius(mut self, radius: f64) -> Result<Self> {
        self.celestial_sphere_radius = radius;
        self.validate()?;
        Ok(self)
    }

    /// Sets GMST directly from an hour-angle triple, skipping the clock.
    pub fn with_gmst_hms(mut self, h: f64, m: f64, s: f64) -> Result<Self> {
        self.gmst = Angle::from_hms(h, m, s)?;
        Ok(self)
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Needed after deserializing, since serde bypasses [`Self::with_radius`].
    pub fn validate(&self) -> Result<()> {
        if self.celestial_sphere_radius >= MIN_CELESTIAL_SPHERE_RADIUS_M {
            Ok(())
        } else {
            Err(Error::SphereTooSmall {
                radius: self.celestial_sphere_radius,
                minimum: MIN_CELESTIAL_SPHERE_RADIUS_M,
            })
        }
    }
}

// ---------- Output model ----------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AngleReport {
    pub degrees: f64,
    pub formatted: String,
}

impl AngleReport {
    fn dms(angle: Angle) -> Self {
        Self {
            degrees: angle.deg(),
            formatted: angle.deg_min_sec(),
        }
    }

    fn hms(angle: Angle) -> Self {
        Self {
            degrees: angle.deg(),
            formatted: angle.hour(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HorizontalReport {
    pub azimuth: AngleReport,
    pub altitude: AngleReport,
}

impl From<Horizontal> for HorizontalReport {
    fn from(h: Horizontal) -> Self {
        Self {
            azimuth: AngleReport::dms(h.azimuth),
            altitude: AngleReport::dms(h.altitude),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Details {
    pub location: String,
    pub ra: AngleReport,
    pub dec: AngleReport,
    pub local_hour_angle: AngleReport,
    pub local_sidereal_time: AngleReport,
    pub base_ray_direction: Vector3,
    pub local_ray_direction: Vector3,
    pub sphere_intercept: Vector3,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub location: String,
    pub star: String,
    pub globe: HorizontalReport,
    pub flat: HorizontalReport,
    /// flat minus globe, wrapped to (-180, 180]
    pub azimuth_difference_deg: f64,
    pub altitude_difference_deg: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub gmst: AngleReport,
    pub celestial_sphere_radius: f64,
    pub rows: Vec<Comparison>,
}

// ---------- Runs ----------

pub fn compare_one(
    star_name: &str,
    star: StarCoord,
    location_name: &str,
    location: Location,
    config: &CompareConfig,
) -> Result<Comparison> {
    let gmst = config.gmst;
    let globe_star = GlobeStar::new(star);
    let flat_star = FlatStar::new(star);

    let globe = globe_star.horizontal(&location, gmst);
    let flat = flat_star.horizontal(&location, gmst);

    let details = if config.verbose {
        let flat_location = FlatLocation::new(location);
        Some(Details {
            location: location.to_string(),
            ra: AngleReport::hms(star.ra()),
            dec: AngleReport::dms(star.dec()),
            local_hour_angle: AngleReport::hms(globe_star.local_hour_angle(&location, gmst)),
            local_sidereal_time: AngleReport::hms(globe_star.local_sidereal_time(&location, gmst)),
            base_ray_direction: flat_star.base_ray_direction(),
            local_ray_direction: flat_star.local_ray_direction(&location, gmst),
            sphere_intercept: flat_star.sphere_intercept(
                &flat_location,
                gmst,
                config.celestial_sphere_radius,
            )?,
        })
    } else {
        None
    };

    let comparison = Comparison {
        location: location_name.to_string(),
        star: star_name.to_string(),
        azimuth_difference_deg: wrap_half_turn(flat.azimuth.deg() - globe.azimuth.deg()),
        altitude_difference_deg: flat.altitude.deg() - globe.altitude.deg(),
        globe: globe.into(),
        flat: flat.into(),
        details,
    };
    debug!(
        "[compare_one] {} @ {}: az diff {:.3e} deg, alt diff {:.3e} deg",
        star_name, location_name, comparison.azimuth_difference_deg, comparison.altitude_difference_deg
    );
    Ok(comparison)
}

/// Every selected star from every selected location, location-major.
pub fn compare_all(
    stars: &Catalog<StarCoord>,
    locations: &Catalog<Location>,
    config: &CompareConfig,
) -> Result<Report> {
    config.validate()?;
    info!(
        "[compare_all] {} locations x {} stars, GMST {}",
        locations.len(),
        stars.len(),
        config.gmst.hour()
    );

    let mut rows = Vec::with_capacity(stars.len() * locations.len());
    for location in locations.iter() {
        for star in stars.iter() {
            rows.push(compare_one(&star.name, star.value, &location.name, location.value, config)?);
        }
    }

    Ok(Report {
        gmst: AngleReport::hms(config.gmst),
        celestial_sphere_radius: config.celestial_sphere_radius,
        rows,
    })
}

fn wrap_half_turn(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}
