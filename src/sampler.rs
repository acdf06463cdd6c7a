//! Drives the position engine across an analysis window.

use crate::condition::ConditionMask;
use crate::engine::SolarPositionEngine;
use crate::time::{AnalysisWindow, TimeInstant, TimeStep};
use crate::types::SolarSample;

/// Sun positions selected from an analysis window.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    samples: Vec<SolarSample>,
    sun_up_count: usize,
    last_instant: Option<TimeInstant>,
}

impl SampleSet {
    /// Samples with the sun up that pass the condition mask, in enumeration order.
    #[must_use]
    pub fn samples(&self) -> &[SolarSample] {
        &self.samples
    }

    /// Consumes the set, returning its samples.
    #[must_use]
    pub fn into_samples(self) -> Vec<SolarSample> {
        self.samples
    }

    /// Number of enumerated instants with the sun up, whether selected or not.
    ///
    /// This counts steps, not hours: divide by the steps per hour to get hours.
    #[must_use]
    pub const fn sun_up_count(&self) -> usize {
        self.sun_up_count
    }

    /// Number of selected samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no sample was selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Month and day of the last enumerated instant, or `None` for an empty window.
    ///
    /// This is the day a daily sun path is drawn for.
    #[must_use]
    pub fn last_day(&self) -> Option<(u32, u32)> {
        self.last_instant.map(|instant| (instant.month(), instant.day()))
    }

    /// Hours of the year of the selected samples.
    pub fn hours_of_year(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(SolarSample::hour_of_year)
    }
}

/// Computes the sun position for every instant of `window`.
///
/// Every instant with altitude ≥ 0 is counted as sun-up; of those, only the
/// ones whose nearest hour of the year is selected by `mask` are kept.
#[must_use]
pub fn sample(
    engine: &SolarPositionEngine,
    window: &AnalysisWindow,
    step: TimeStep,
    mask: &ConditionMask,
) -> SampleSet {
    let instants = window.instants(step);
    let mut samples = Vec::with_capacity(instants.len());
    let mut sun_up_count = 0;
    let mut last_instant = None;

    for instant in instants {
        last_instant = Some(instant);
        let sample = engine.compute_at(instant);
        if !sample.is_sun_up() {
            continue;
        }
        sun_up_count += 1;
        if mask.is_selected(sample.hour_of_year()) {
            samples.push(sample);
        }
    }

    log::debug!(
        "sampled {} sun positions ({sun_up_count} sun-up steps) at {} steps per hour",
        samples.len(),
        step.steps_per_hour()
    );

    SampleSet {
        samples,
        sun_up_count,
        last_instant,
    }
}
