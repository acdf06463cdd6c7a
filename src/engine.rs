//! Simplified solar position model for daylighting analysis.
//!
//! This follows the sun position formulas of the RADIANCE `gensky`/`sun.c`
//! program by Greg Ward: declination and equation of time are short sine
//! series in the day of the year of a non-leap year. Accuracy is a fraction of
//! a degree, which is plenty for sun-path diagrams and sunlight-hours studies
//! but not for astronomy. No refraction correction is applied.

#![allow(clippy::unreadable_literal)]
#![allow(clippy::suboptimal_flops)]

use crate::math::{PI, clamp_unit, degrees_to_radians, normalize_radians_0_to_tau};
use crate::time::TimeInstant;
use crate::types::{Location, North, SolarSample};
use glam::DVec3;

/// Solar declination in radians for a one-based day of the year.
#[must_use]
pub fn solar_declination(day_of_year: f64) -> f64 {
    0.4093 * ((2.0 * PI / 368.0) * (day_of_year - 81.0)).sin()
}

/// Equation of time in hours for a one-based day of the year.
#[must_use]
pub fn equation_of_time(day_of_year: f64) -> f64 {
    0.170 * ((4.0 * PI / 373.0) * (day_of_year - 80.0)).sin()
        - 0.129 * ((2.0 * PI / 355.0) * (day_of_year - 8.0)).sin()
}

/// Computes sun positions for one location, orientation and dome size.
///
/// # Example
/// ```
/// use glam::DVec3;
/// use sunpath::{Location, North, SolarPositionEngine, time::TimeInstant};
///
/// let location = Location::new(48.21, 16.37, 1.0).unwrap().value;
/// let engine = SolarPositionEngine::new(location, North::default(), DVec3::ZERO, 100.0);
/// let sample = engine.compute_at(TimeInstant::new(6, 21, 12.0));
///
/// assert!(sample.is_sun_up());
/// assert!(sample.altitude_degrees() > 60.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPositionEngine {
    location: Location,
    latitude: f64,
    /// Longitude minus the standard meridian, in radians.
    meridian_offset: f64,
    north: f64,
    center: DVec3,
    radius: f64,
}

impl SolarPositionEngine {
    /// Creates an engine.
    ///
    /// `radius` scales sun positions and path curves around `center`.
    #[must_use]
    pub fn new(location: Location, north: North, center: DVec3, radius: f64) -> Self {
        Self {
            location,
            latitude: degrees_to_radians(location.latitude()),
            meridian_offset: degrees_to_radians(
                location.longitude() - location.standard_meridian(),
            ),
            north: north.radians(),
            center,
            radius,
        }
    }

    /// The location this engine was built for.
    #[must_use]
    pub const fn location(&self) -> Location {
        self.location
    }

    /// North angle in radians, clockwise from +Y.
    #[must_use]
    pub const fn north(&self) -> f64 {
        self.north
    }

    /// Center of the sun-path dome.
    #[must_use]
    pub const fn center(&self) -> DVec3 {
        self.center
    }

    /// Radius of the sun-path dome.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Local apparent solar time in hours for a clock instant.
    #[must_use]
    pub fn solar_time(&self, instant: TimeInstant) -> f64 {
        let day = f64::from(instant.day_of_year());
        instant.hour() + equation_of_time(day) + 12.0 * self.meridian_offset / PI
    }

    /// Computes altitude and azimuth (radians) for an instant.
    #[must_use]
    pub fn altitude_azimuth(&self, instant: TimeInstant) -> (f64, f64) {
        let declination = solar_declination(f64::from(instant.day_of_year()));
        let hour_angle = PI * (self.solar_time(instant) - 12.0) / 12.0;

        let (s_phi, c_phi) = self.latitude.sin_cos();
        let (s_delta, c_delta) = declination.sin_cos();
        let (s_h, c_h) = hour_angle.sin_cos();

        let altitude = clamp_unit(s_phi * s_delta + c_phi * c_delta * c_h).asin();
        // atan2(0, 0) at the zenith or the poles resolves to north
        let azimuth = normalize_radians_0_to_tau(
            (-c_delta * s_h).atan2(s_delta * c_phi - c_delta * s_phi * c_h),
        );
        (altitude, azimuth)
    }

    /// Unit vector towards the sun for an altitude and azimuth, rotated by north.
    #[must_use]
    pub fn direction(&self, altitude: f64, azimuth: f64) -> DVec3 {
        let bearing = azimuth + self.north;
        let (s_alt, c_alt) = altitude.sin_cos();
        let (s_b, c_b) = bearing.sin_cos();
        DVec3::new(c_alt * s_b, c_alt * c_b, s_alt)
    }

    /// Point on the sun-path dome for a direction.
    #[must_use]
    pub fn point(&self, direction: DVec3) -> DVec3 {
        self.center + self.radius * direction
    }

    /// Computes the full sample for an instant.
    #[must_use]
    pub fn compute_at(&self, instant: TimeInstant) -> SolarSample {
        let (altitude, azimuth) = self.altitude_azimuth(instant);
        let direction = self.direction(altitude, azimuth);
        SolarSample {
            instant,
            altitude,
            azimuth,
            direction,
            position: self.point(direction),
            hour_of_year: instant.hour_of_year(),
        }
    }
}
