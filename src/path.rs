//! Sun-path curves: daily arcs, the annual family and the base circle.
//!
//! Curves are polylines on the sun-path dome. Only the part above the horizon
//! is traced; a day whose sun crosses the horizon yields an open arc, while a
//! polar day yields a single closed loop.

use crate::engine::SolarPositionEngine;
use crate::math::TAU;
use crate::time::{TimeInstant, from_hour_of_year};
use glam::DVec3;

/// Samples per hour along a daily arc (five-minute steps).
pub const DAILY_STEPS_PER_HOUR: u32 = 12;

/// Day of the month of the annual reference days.
pub const REFERENCE_DAY: u32 = 21;

/// Days between samples along an hourly analemma.
pub const ANALEMMA_DAY_INTERVAL: u32 = 7;

/// Base circle radius relative to the sun-path radius.
pub const BASE_CIRCLE_FACTOR: f64 = 1.08;

const BASE_CIRCLE_SEGMENTS: u32 = 72;

/// What a curve traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathKind {
    /// The sun's arc across the analysed day.
    DailyArc {
        /// Month (1-12).
        month: u32,
        /// Day of the month.
        day: u32,
    },
    /// The arc of the reference day of a month in the annual diagram.
    AnnualArc {
        /// Month (1-12).
        month: u32,
    },
    /// The figure-eight traced by the sun at a fixed clock hour over the year.
    Analemma {
        /// Clock hour (0-23).
        hour: u32,
    },
    /// Horizon circle around the diagram.
    BaseCircle,
}

/// An ordered polyline on the sun-path dome.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathCurve {
    /// What the curve traces.
    pub kind: PathKind,
    /// Points in drawing order.
    pub points: Vec<DVec3>,
    /// Whether the last point connects back to the first.
    pub closed: bool,
}

impl PathCurve {
    /// Translates every point by `offset`.
    #[must_use]
    pub fn translated(&self, offset: DVec3) -> Self {
        Self {
            kind: self.kind,
            points: self.points.iter().map(|&point| point + offset).collect(),
            closed: self.closed,
        }
    }
}

/// Traces the arc of the sun across one day in five-minute steps.
///
/// Returns no curves if the sun never rises. A stretch of daylight that runs
/// through midnight is joined into one arc.
#[must_use]
pub fn daily_path(engine: &SolarPositionEngine, month: u32, day: u32) -> Vec<PathCurve> {
    let instant = TimeInstant::new(month, day, 0.0);
    let kind = PathKind::DailyArc {
        month: instant.month(),
        day: instant.day(),
    };
    let steps = 24 * DAILY_STEPS_PER_HOUR;
    let points: Vec<Option<DVec3>> = (0..steps)
        .map(|k| {
            let hour = f64::from(k) / f64::from(DAILY_STEPS_PER_HOUR);
            sun_up_point(engine, TimeInstant::new(instant.month(), instant.day(), hour))
        })
        .collect();
    traced_runs(kind, &points)
}

/// Builds the annual diagram: one arc per month on its reference day, then
/// one analemma per clock hour.
#[must_use]
pub fn annual_path(engine: &SolarPositionEngine) -> Vec<PathCurve> {
    let mut curves: Vec<PathCurve> = (1..=12)
        .flat_map(|month| {
            daily_path(engine, month, REFERENCE_DAY)
                .into_iter()
                .map(move |curve| PathCurve {
                    kind: PathKind::AnnualArc { month },
                    ..curve
                })
        })
        .collect();
    curves.extend((0..24).flat_map(|hour| analemma(engine, hour)));
    curves
}

/// Traces the sun at clock `hour` every seven days across the year.
///
/// The loop is closed when the sun is up on every sampled day; otherwise the
/// visible stretches are returned as separate open curves.
#[must_use]
pub fn analemma(engine: &SolarPositionEngine, hour: u32) -> Vec<PathCurve> {
    let hour = hour.min(23);
    let points: Vec<Option<DVec3>> = (1..=365)
        .step_by(ANALEMMA_DAY_INTERVAL as usize)
        .map(|day_of_year: u32| {
            let index = f64::from(day_of_year - 1) * 24.0 + f64::from(hour) + 1.0;
            sun_up_point(engine, from_hour_of_year(index))
        })
        .collect();
    traced_runs(PathKind::Analemma { hour }, &points)
}

/// Horizontal circle around the diagram at 1.08 times the sun-path radius.
#[must_use]
pub fn base_circle(engine: &SolarPositionEngine) -> PathCurve {
    let radius = BASE_CIRCLE_FACTOR * engine.radius();
    let points = (0..BASE_CIRCLE_SEGMENTS)
        .map(|k| {
            let angle = TAU * f64::from(k) / f64::from(BASE_CIRCLE_SEGMENTS);
            let (sin, cos) = angle.sin_cos();
            engine.center() + DVec3::new(radius * sin, radius * cos, 0.0)
        })
        .collect();
    PathCurve {
        kind: PathKind::BaseCircle,
        points,
        closed: true,
    }
}

/// Builds every requested curve.
///
/// `daily_day` is the (month, day) to trace a daily arc for. The base circle
/// is added whenever any path is requested, even if the sun never rises.
#[must_use]
pub fn build(
    engine: &SolarPositionEngine,
    daily_day: Option<(u32, u32)>,
    annual: bool,
) -> Vec<PathCurve> {
    let mut curves = Vec::new();
    if annual {
        curves.extend(annual_path(engine));
    }
    if let Some((month, day)) = daily_day {
        curves.extend(daily_path(engine, month, day));
    }
    if annual || daily_day.is_some() {
        curves.push(base_circle(engine));
    }
    curves
}

fn sun_up_point(engine: &SolarPositionEngine, instant: TimeInstant) -> Option<DVec3> {
    let sample = engine.compute_at(instant);
    sample.is_sun_up().then(|| sample.position())
}

/// Splits a cyclic sequence of optional points into polylines.
///
/// A sequence with every point present is one closed curve. Otherwise each
/// run of present points is an open curve, and a run touching both ends of
/// the sequence is joined across the seam. Runs of a single point are dropped.
fn traced_runs(kind: PathKind, points: &[Option<DVec3>]) -> Vec<PathCurve> {
    if points.is_empty() {
        return Vec::new();
    }
    if points.iter().all(Option::is_some) {
        return vec![PathCurve {
            kind,
            points: points.iter().flatten().copied().collect(),
            closed: true,
        }];
    }

    let mut runs: Vec<Vec<DVec3>> = Vec::new();
    let mut current: Vec<DVec3> = Vec::new();
    for point in points {
        match point {
            Some(point) => current.push(*point),
            None if !current.is_empty() => runs.push(core::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    let wraps = points[0].is_some() && points[points.len() - 1].is_some();
    if wraps && runs.len() > 1 {
        let head = runs.remove(0);
        if let Some(tail) = runs.last_mut() {
            tail.extend(head);
        }
    }

    runs.into_iter()
        .filter(|run| run.len() > 1)
        .map(|points| PathCurve {
            kind,
            points,
            closed: false,
        })
        .collect()
}
