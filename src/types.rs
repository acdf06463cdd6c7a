//! Core data types for sun-path calculations.

use crate::error::{Checked, check_latitude};
use crate::math::{
    TAU, degrees_to_radians, normalize_degrees_0_to_360, normalize_radians_0_to_tau,
    radians_to_degrees,
};
use crate::time::TimeInstant;
use crate::{Error, Result};
use glam::DVec3;

/// Observer location.
///
/// Longitude is positive east of Greenwich and the time zone is the offset
/// from UTC in hours, so Vienna is roughly `Location::new(48.21, 16.37, 1.0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    latitude: f64,
    longitude: f64,
    time_zone: f64,
}

impl Location {
    /// Creates a location from validated numbers.
    ///
    /// # Errors
    /// Returns `MissingLocation` if latitude is not finite.
    ///
    /// # Example
    /// ```
    /// # use sunpath::Location;
    /// let location = Location::new(95.0, 0.0, 0.0).unwrap();
    /// assert_eq!(location.value.latitude(), 90.0);
    /// assert!(location.warning.is_some());
    /// ```
    pub fn new(latitude: f64, longitude: f64, time_zone: f64) -> Result<Checked<Self>> {
        Self::from_input(Some(latitude), Some(longitude), Some(time_zone))
    }

    /// Creates a location from possibly missing user input.
    ///
    /// Latitude is clamped into -90..=90 with a warning. Longitude and time
    /// zone are only used together: if either is absent or not finite, both
    /// fall back to 0.
    ///
    /// # Errors
    /// Returns `MissingLocation` if latitude is absent or not finite.
    pub fn from_input(
        latitude: Option<f64>,
        longitude: Option<f64>,
        time_zone: Option<f64>,
    ) -> Result<Checked<Self>> {
        let latitude = check_latitude(latitude.ok_or(Error::MissingLocation)?)?;
        let (longitude, time_zone) = match (longitude, time_zone) {
            (Some(lon), Some(tz)) if lon.is_finite() && tz.is_finite() => (lon, tz),
            _ => (0.0, 0.0),
        };
        Ok(Checked {
            value: Self {
                latitude: latitude.value,
                longitude,
                time_zone,
            },
            warning: latitude.warning,
        })
    }

    /// Latitude in degrees (-90 to +90).
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees, positive east.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Offset from UTC in hours.
    #[must_use]
    pub const fn time_zone(&self) -> f64 {
        self.time_zone
    }

    /// Standard meridian of the time zone in degrees.
    #[must_use]
    pub fn standard_meridian(&self) -> f64 {
        15.0 * self.time_zone
    }
}

/// Direction of true north in the model's XY plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum North {
    /// Degrees clockwise from the +Y axis.
    Angle(f64),
    /// A vector pointing north; only its XY projection is used.
    Vector(DVec3),
}

impl Default for North {
    fn default() -> Self {
        Self::Angle(0.0)
    }
}

impl North {
    /// North angle in radians, clockwise from +Y, in [0, 2π).
    ///
    /// A vector without an XY component leaves north on the +Y axis.
    #[must_use]
    pub fn radians(&self) -> f64 {
        match *self {
            Self::Angle(degrees) if degrees.is_finite() => {
                normalize_radians_0_to_tau(degrees_to_radians(degrees))
            }
            Self::Vector(v) if v.x.is_finite() && v.y.is_finite() && (v.x != 0.0 || v.y != 0.0) => {
                normalize_radians_0_to_tau(v.x.atan2(v.y))
            }
            _ => 0.0,
        }
    }

    /// Unit vector pointing north in the XY plane.
    #[must_use]
    pub fn unit_vector(&self) -> DVec3 {
        let angle = self.radians();
        DVec3::new(angle.sin(), angle.cos(), 0.0)
    }
}

/// Sun position sampled at one instant.
///
/// Angles use the compass convention: azimuth 0 = north, increasing clockwise
/// (east = π/2), altitude 0 = horizon. Model axes are X east, Y north, Z up,
/// before the north rotation is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolarSample {
    pub(crate) instant: TimeInstant,
    pub(crate) altitude: f64,
    pub(crate) azimuth: f64,
    pub(crate) direction: DVec3,
    pub(crate) position: DVec3,
    pub(crate) hour_of_year: f64,
}

impl SolarSample {
    /// The sampled instant.
    #[must_use]
    pub const fn instant(&self) -> TimeInstant {
        self.instant
    }

    /// Altitude above the horizon in radians (negative below the horizon).
    #[must_use]
    pub const fn altitude(&self) -> f64 {
        self.altitude
    }

    /// Azimuth in radians in [0, 2π), clockwise from true north.
    #[must_use]
    pub const fn azimuth(&self) -> f64 {
        self.azimuth
    }

    /// Altitude in degrees.
    #[must_use]
    pub const fn altitude_degrees(&self) -> f64 {
        radians_to_degrees(self.altitude)
    }

    /// Azimuth in degrees in [0, 360).
    #[must_use]
    pub fn azimuth_degrees(&self) -> f64 {
        normalize_degrees_0_to_360(radians_to_degrees(self.azimuth))
    }

    /// Unit vector from the sun-path center towards the sun.
    #[must_use]
    pub const fn direction(&self) -> DVec3 {
        self.direction
    }

    /// Incoming sunlight direction (from the sun towards the center), as used
    /// for sunlight-hours analysis.
    #[must_use]
    pub fn sun_vector(&self) -> DVec3 {
        -self.direction
    }

    /// Sun position on the sun-path dome: `center + radius * direction`.
    #[must_use]
    pub const fn position(&self) -> DVec3 {
        self.position
    }

    /// Continuous one-based hour of the year.
    #[must_use]
    pub const fn hour_of_year(&self) -> f64 {
        self.hour_of_year
    }

    /// Whether the sun is on or above the horizon.
    #[must_use]
    pub fn is_sun_up(&self) -> bool {
        self.altitude >= 0.0
    }

    /// Zenith angle in radians.
    #[must_use]
    pub fn zenith(&self) -> f64 {
        TAU / 4.0 - self.altitude
    }
}
