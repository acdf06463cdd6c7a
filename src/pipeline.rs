//! One sun-path computation from request to output.
//!
//! [`SunPath`] is the context of a single call: it resolves the location,
//! time step and condition once, samples the window once, builds the curves
//! once, and then produces one [`SunPathGroup`] per overlay dataset. Groups
//! are independent: a dataset that fails leaves the others untouched.

use crate::condition::{self, Condition};
use crate::engine::SolarPositionEngine;
use crate::path::{self, BASE_CIRCLE_FACTOR, PathCurve};
use crate::sampler::{self, SampleSet};
use crate::series::HourlySeries;
use crate::time::{AnalysisWindow, TimeStep};
use crate::types::{Location, North};
use crate::{Error, Result};
use core::fmt;
use glam::DVec3;

/// Sun-path radius at scale 1.
pub const BASE_RADIUS: f64 = 200.0;

/// Sun marker radius relative to the sun-path radius at sun scale 1.
pub const MARKER_RADIUS_FACTOR: f64 = 0.007;

/// Distance between neighbouring dataset diagrams, in diagram widths.
pub const GROUP_SPACING: f64 = 1.5;

/// Everything a sun-path computation needs.
///
/// # Example
/// ```
/// use sunpath::{AnalysisWindow, SunPath, SunPathRequest};
///
/// let request = SunPathRequest {
///     window: AnalysisWindow::single_day(6, 21),
///     daily_path: true,
///     ..SunPathRequest::at(51.5, -0.1, 0.0)
/// };
/// let output = SunPath::compute(&request).unwrap();
/// let group = output.groups[0].as_ref().unwrap();
///
/// assert!(output.warnings.is_empty());
/// assert_eq!(group.positions.len(), group.altitudes.len());
/// assert!(!group.path_curves.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SunPathRequest {
    /// Latitude in degrees; required.
    pub latitude: Option<f64>,
    /// Longitude in degrees, positive east; used only together with `time_zone`.
    pub longitude: Option<f64>,
    /// Offset from UTC in hours; used only together with `longitude`.
    pub time_zone: Option<f64>,
    /// Direction of north in the model.
    pub north: North,
    /// Center of the diagram.
    pub center: DVec3,
    /// Diagram scale; the radius is 200 times this.
    pub path_scale: f64,
    /// Sun marker scale.
    pub sun_scale: f64,
    /// Requested steps per hour.
    pub time_step: f64,
    /// Instants to analyse.
    pub window: AnalysisWindow,
    /// Conditional statement over `series`, e.g. `18<a<23 and b<80`.
    pub condition: Option<String>,
    /// Annual hourly datasets, referenced by letter in `condition` and each
    /// overlaid on its own copy of the diagram.
    pub series: Vec<HourlySeries>,
    /// Draw the arc of the analysed day.
    pub daily_path: bool,
    /// Draw the annual diagram.
    pub annual_path: bool,
}

impl Default for SunPathRequest {
    fn default() -> Self {
        Self {
            latitude: None,
            longitude: None,
            time_zone: None,
            north: North::default(),
            center: DVec3::ZERO,
            path_scale: 1.0,
            sun_scale: 1.0,
            time_step: 1.0,
            window: AnalysisWindow::default(),
            condition: None,
            series: Vec::new(),
            daily_path: false,
            annual_path: false,
        }
    }
}

impl SunPathRequest {
    /// A default request for a location.
    #[must_use]
    pub fn at(latitude: f64, longitude: f64, time_zone: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            time_zone: Some(time_zone),
            ..Self::default()
        }
    }
}

/// Share of the sun-up time selected by the condition.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionSummary {
    /// Selected hours with the sun up.
    pub selected_hours: f64,
    /// Hours with the sun up in the window.
    pub sun_up_hours: f64,
    /// `selected_hours` as a percentage of `sun_up_hours`.
    pub percentage: f64,
}

impl SelectionSummary {
    fn new(samples: &SampleSet, step: TimeStep) -> Self {
        let steps = f64::from(step.steps_per_hour());
        let selected_hours = samples.len() as f64 / steps;
        let sun_up_hours = samples.sun_up_count() as f64 / steps;
        let percentage = if sun_up_hours > 0.0 {
            selected_hours / sun_up_hours * 100.0
        } else {
            0.0
        };
        Self {
            selected_hours,
            sun_up_hours,
            percentage,
        }
    }
}

impl fmt::Display for SelectionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} hours of total {:.1} sun up hours ({:.2}%).",
            self.selected_hours, self.sun_up_hours, self.percentage
        )
    }
}

/// Output for one overlay dataset, or for the whole computation when there is none.
///
/// Every per-sample vector has one entry per selected sample, in the same order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SunPathGroup {
    /// Zero-based position of the overlaid dataset.
    pub dataset: Option<usize>,
    /// Sun positions on this group's diagram.
    pub positions: Vec<DVec3>,
    /// Incoming sunlight vectors.
    pub vectors: Vec<DVec3>,
    /// Altitudes in degrees.
    pub altitudes: Vec<f64>,
    /// Azimuths in degrees, clockwise from north.
    pub azimuths: Vec<f64>,
    /// Sun-path curves of this group's diagram.
    pub path_curves: Vec<PathCurve>,
    /// Center of this group's diagram.
    pub center: DVec3,
    /// Radius of the sun markers.
    pub marker_radius: f64,
    /// Enumerated steps with the sun up, selected or not.
    pub sun_up_count: usize,
    /// `sun_up_count` in hours.
    pub sun_up_hours: f64,
    /// Dataset values interpolated at each sample; empty without a dataset.
    pub selected_values: Vec<f64>,
    /// Sample labels such as `21 JUN 12:00`, with a value line when a dataset is overlaid.
    pub sample_labels: Vec<String>,
}

/// Result of a sun-path computation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SunPathOutput {
    /// The location actually used.
    pub location: Location,
    /// The time step actually used.
    pub time_step: TimeStep,
    /// Sun-path radius.
    pub radius: f64,
    /// One entry per overlay dataset (or a single entry without datasets).
    pub groups: Vec<Result<SunPathGroup>>,
    /// Corrections and notices reported along the way.
    pub warnings: Vec<Error>,
    /// The condition with letters replaced by dataset names; empty without a condition.
    pub condition_label: String,
    /// Set when a condition filtered the samples.
    pub selection: Option<SelectionSummary>,
}

impl SunPathOutput {
    /// Groups that were computed successfully.
    pub fn successful_groups(&self) -> impl Iterator<Item = &SunPathGroup> {
        self.groups.iter().filter_map(|group| group.as_ref().ok())
    }

    /// Errors of the groups that failed.
    pub fn failures(&self) -> impl Iterator<Item = &Error> {
        self.groups.iter().filter_map(|group| group.as_ref().err())
    }
}

/// The resolved context of one computation.
#[derive(Debug, Clone)]
pub struct SunPath {
    engine: SolarPositionEngine,
    step: TimeStep,
    condition: Condition,
    marker_radius: f64,
    warnings: Vec<Error>,
}

impl SunPath {
    /// Resolves the request's location, time step and condition.
    ///
    /// # Errors
    /// - `MissingLocation` if no latitude is given;
    /// - any condition error (`MissingSeriesReference`, `InvalidSeriesShape`,
    ///   `ExpressionError`). A broken condition aborts the computation rather
    ///   than silently selecting everything.
    pub fn new(request: &SunPathRequest) -> Result<Self> {
        let mut warnings = Vec::new();
        let location = Location::from_input(request.latitude, request.longitude, request.time_zone)?
            .report(&mut warnings);
        let step = TimeStep::snap(request.time_step).report(&mut warnings);

        let condition = match request.condition.as_deref() {
            Some(statement) => condition::compile(statement, &request.series)?,
            None => Condition::unfiltered(),
        };

        let radius = BASE_RADIUS * scale(request.path_scale);
        let marker_radius = MARKER_RADIUS_FACTOR * scale(request.sun_scale) * radius;
        let engine = SolarPositionEngine::new(location, request.north, request.center, radius);

        Ok(Self {
            engine,
            step,
            condition,
            marker_radius,
            warnings,
        })
    }

    /// Computes a sun path in one call.
    ///
    /// # Errors
    /// See [`SunPath::new`]. Failures of single datasets are reported in
    /// their group instead.
    pub fn compute(request: &SunPathRequest) -> Result<SunPathOutput> {
        Ok(Self::new(request)?.run(request))
    }

    /// The position engine of this computation.
    #[must_use]
    pub const fn engine(&self) -> &SolarPositionEngine {
        &self.engine
    }

    /// The resolved time step.
    #[must_use]
    pub const fn time_step(&self) -> TimeStep {
        self.step
    }

    /// The compiled condition.
    #[must_use]
    pub const fn condition(&self) -> &Condition {
        &self.condition
    }

    /// Samples the window, traces the curves and builds the groups.
    #[must_use]
    pub fn run(&self, request: &SunPathRequest) -> SunPathOutput {
        let mut warnings = self.warnings.clone();
        let location = self.engine.location();
        log::info!(
            "computing sun path at latitude {}° longitude {}° (UTC{:+})",
            location.latitude(),
            location.longitude(),
            location.time_zone()
        );

        let samples = sampler::sample(
            &self.engine,
            &request.window,
            self.step,
            &self.condition.mask,
        );

        if !request.daily_path && !request.annual_path && request.series.is_empty() {
            log::warn!("{}", Error::NoPathRequested);
            warnings.push(Error::NoPathRequested);
        }
        let daily_day = if request.daily_path {
            samples.last_day()
        } else {
            None
        };
        let curves = path::build(&self.engine, daily_day, request.annual_path);

        let selection = self
            .condition
            .is_filtering()
            .then(|| SelectionSummary::new(&samples, self.step));

        let groups = if request.series.is_empty() {
            vec![Ok(self.group(&samples, &curves, None, DVec3::ZERO))]
        } else {
            let spacing = if curves.is_empty() {
                0.0
            } else {
                GROUP_SPACING * 2.0 * BASE_CIRCLE_FACTOR * self.engine.radius()
            };
            request
                .series
                .iter()
                .enumerate()
                .map(|(index, series)| {
                    let offset = DVec3::new(index as f64 * spacing, 0.0, 0.0);
                    self.dataset_group(&samples, &curves, index, series, offset)
                })
                .collect()
        };

        SunPathOutput {
            location,
            time_step: self.step,
            radius: self.engine.radius(),
            groups,
            warnings,
            condition_label: self.condition.label.clone(),
            selection,
        }
    }

    fn dataset_group(
        &self,
        samples: &SampleSet,
        curves: &[PathCurve],
        index: usize,
        series: &HourlySeries,
        offset: DVec3,
    ) -> Result<SunPathGroup> {
        let overlay = || -> Result<SunPathGroup> {
            series.validate_as(index)?;
            let values = samples
                .hours_of_year()
                .map(|hour| series.value_at_hour(hour))
                .collect::<Result<Vec<f64>>>()?;
            Ok(self.group(samples, curves, Some((index, series, values)), offset))
        };
        overlay().map_err(|err| {
            log::warn!("dataset {index} ({}) failed: {err}", series.name());
            err.in_dataset(index, series.name())
        })
    }

    fn group(
        &self,
        samples: &SampleSet,
        curves: &[PathCurve],
        dataset: Option<(usize, &HourlySeries, Vec<f64>)>,
        offset: DVec3,
    ) -> SunPathGroup {
        let samples_slice = samples.samples();
        let mut sample_labels: Vec<String> = samples_slice
            .iter()
            .map(|sample| sample.instant().to_string())
            .collect();

        let (dataset, selected_values) = match dataset {
            Some((index, series, values)) => {
                for (label, value) in sample_labels.iter_mut().zip(&values) {
                    label.push_str(&format!("\n{value:.2} {}", series.units()));
                }
                (Some(index), values)
            }
            None => (None, Vec::new()),
        };

        SunPathGroup {
            dataset,
            positions: samples_slice.iter().map(|s| s.position() + offset).collect(),
            vectors: samples_slice.iter().map(|s| s.sun_vector()).collect(),
            altitudes: samples_slice.iter().map(|s| s.altitude_degrees()).collect(),
            azimuths: samples_slice.iter().map(|s| s.azimuth_degrees()).collect(),
            path_curves: curves.iter().map(|curve| curve.translated(offset)).collect(),
            center: self.engine.center() + offset,
            marker_radius: self.marker_radius,
            sun_up_count: samples.sun_up_count(),
            sun_up_hours: samples.sun_up_count() as f64 / f64::from(self.step.steps_per_hour()),
            selected_values,
            sample_labels,
        }
    }
}

/// A usable scale factor: missing, zero or negative scales mean 1.
fn scale(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        1.0
    }
}
