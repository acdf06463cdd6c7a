//! # Sun-Path Library
//!
//! Sun-path diagrams, sun vectors and conditional hourly-data selection for
//! architectural daylighting analysis.
//!
//! Given a location and a set of calendar moments, the library computes the
//! sun's altitude and azimuth, the matching direction and point on a sun-path
//! dome, the curves that trace the sun across a day or a year, and the values
//! of annual hourly datasets (temperature, radiation, ...) at each sun
//! position. A conditional statement such as `18<a<23 and b<80` restricts the
//! analysis to the hours where the datasets meet it.
//!
//! Sun positions use the simplified RADIANCE formulas (a fraction of a degree
//! accuracy, no refraction), which suits diagrams and sunlight-hours studies.
//! For astronomical accuracy use a full solar position algorithm instead.
//!
//! ## Feature Flags
//!
//! - `chrono` (default): conversions between [`time::TimeInstant`] and `chrono` date-times
//! - `serde`: `Serialize`/`Deserialize` for the data types and the whole [`SunPathOutput`]
//!
//! ## Quick Start
//!
//! ### Sun positions for one day
//! ```rust
//! use sunpath::{AnalysisWindow, SunPath, SunPathRequest};
//!
//! // Vienna on the summer solstice, every hour, with the daily arc
//! let request = SunPathRequest {
//!     window: AnalysisWindow::single_day(6, 21),
//!     daily_path: true,
//!     ..SunPathRequest::at(48.21, 16.37, 1.0)
//! };
//! let output = SunPath::compute(&request).unwrap();
//! let group = output.groups[0].as_ref().unwrap();
//!
//! for (label, altitude) in group.sample_labels.iter().zip(&group.altitudes) {
//!     println!("{label}: {altitude:.1}°");
//! }
//! println!("{} curves, {} sun up hours", group.path_curves.len(), group.sun_up_hours);
//! ```
//!
//! ### Selecting hours with a condition
//! ```rust
//! use sunpath::{AnalysisWindow, HourlySeries, SunPath, SunPathRequest};
//!
//! let temperature: Vec<f64> = (0..8760).map(|h| 10.0 + (h % 24) as f64).collect();
//! let request = SunPathRequest {
//!     window: AnalysisWindow::whole_year(),
//!     condition: Some("a > 25".to_string()),
//!     series: vec![HourlySeries::annual("Dry Bulb Temperature", "C", temperature)],
//!     annual_path: true,
//!     ..SunPathRequest::at(40.0, -105.0, -7.0)
//! };
//! let output = SunPath::compute(&request).unwrap();
//!
//! println!("{}", output.condition_label);
//! if let Some(selection) = output.selection {
//!     println!("{selection}");
//! }
//! ```
//!
//! ### Engine only
//! ```rust
//! use glam::DVec3;
//! use sunpath::{Location, North, SolarPositionEngine, time::TimeInstant};
//!
//! let location = Location::new(-33.87, 151.21, 10.0).unwrap().value;
//! let engine = SolarPositionEngine::new(location, North::Angle(15.0), DVec3::ZERO, 1.0);
//! let sample = engine.compute_at(TimeInstant::new(12, 21, 12.0));
//!
//! println!("altitude {:.2}°, azimuth {:.2}°", sample.altitude_degrees(), sample.azimuth_degrees());
//! ```
//!
//! ## Coordinate System
//!
//! - **Azimuth**: 0° = North, measured clockwise (0° to 360°)
//! - **Altitude**: 0° = horizon, 90° = directly overhead (-90° to +90°)
//! - **Model axes**: X east, Y north, Z up, with north rotated clockwise by [`North`]
//! - **Hour of year**: 1-based and continuous; 1 January 00:00 is hour 1

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery, clippy::cargo, clippy::all)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss, // Hours and indices are clamped non-negative before casting
    clippy::cargo_common_metadata,
    clippy::multiple_crate_versions, // Acceptable for dev-dependencies
    clippy::float_cmp, // Exact comparisons of canonical values in tests
)]

// Public API exports
pub use crate::condition::{Condition, ConditionMask};
pub use crate::engine::SolarPositionEngine;
pub use crate::error::{Checked, Error, Result};
pub use crate::path::{PathCurve, PathKind};
pub use crate::pipeline::{SelectionSummary, SunPath, SunPathGroup, SunPathOutput, SunPathRequest};
pub use crate::sampler::SampleSet;
pub use crate::series::HourlySeries;
pub use crate::time::{AnalysisWindow, TimeStep, WindowBound};
pub use crate::types::{Location, North, SolarSample};

// Algorithm modules
pub mod condition;
pub mod engine;
pub mod path;
pub mod pipeline;
pub mod sampler;
pub mod series;

// Core modules
pub mod error;
pub mod types;

// Internal modules
mod math;

// Public modules
pub mod time;
