//! Calendar model for sun-path analysis.
//!
//! All calendar arithmetic assumes a non-leap 365-day year of 8760 hours,
//! matching annual hourly datasets. Hours run from 0 (inclusive) to 24
//! (exclusive) and may be fractional when a time step subdivides the hour.

use crate::error::{Checked, Error};
use core::fmt;
use core::iter::FusedIterator;

/// Hours in a non-leap year.
pub const HOURS_PER_YEAR: usize = 8760;

/// Days in each month of a non-leap year.
const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Days elapsed before the first of each month.
const CUMULATIVE_DAYS: [u32; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Time steps per hour that divide an hour into whole minutes.
pub const VALID_TIME_STEPS: [u32; 12] = [1, 2, 3, 4, 5, 6, 10, 12, 15, 20, 30, 60];

/// Number of days in `month` (clamped into 1..=12) of a non-leap year.
#[must_use]
pub fn days_in_month(month: u32) -> u32 {
    DAYS_IN_MONTH[month_index(month)]
}

/// Three-letter upper-case abbreviation of `month` (clamped into 1..=12).
#[must_use]
pub fn month_abbreviation(month: u32) -> &'static str {
    MONTH_ABBREVIATIONS[month_index(month)]
}

fn month_index(month: u32) -> usize {
    canonicalize_month(i64::from(month)) as usize - 1
}

/// Clamps an hour into [0, 24).
///
/// Negative and non-finite hours become 0; hours of 24 or more wrap around.
#[must_use]
pub fn canonicalize_hour(hour: f64) -> f64 {
    if !hour.is_finite() || hour < 0.0 {
        0.0
    } else if hour >= 24.0 {
        hour % 24.0
    } else {
        hour
    }
}

/// Clamps a month into [1, 12].
#[must_use]
pub fn canonicalize_month(month: i64) -> u32 {
    month.clamp(1, 12) as u32
}

/// Clamps a day into [1, days in `month`].
#[must_use]
pub fn canonicalize_day(day: i64, month: u32) -> u32 {
    day.clamp(1, i64::from(days_in_month(month))) as u32
}

/// One-based day of the year for a canonical month and day.
#[must_use]
pub fn day_of_year(month: u32, day: u32) -> u32 {
    CUMULATIVE_DAYS[month_index(month)] + day
}

/// Maps a calendar instant to the continuous one-based hour of the year.
///
/// 1 January 00:00 is hour 1 and 31 December 23:00 is hour 8760.
#[must_use]
pub fn hour_of_year(month: u32, day: u32, hour: f64) -> f64 {
    f64::from(day_of_year(month, day) - 1) * 24.0 + hour + 1.0
}

/// Inverse of [`hour_of_year`].
///
/// Exact for integral indices in 1..=8760. Indices outside the year wrap around.
#[must_use]
pub fn from_hour_of_year(hour_of_year: f64) -> TimeInstant {
    let zero_based = (hour_of_year - 1.0).rem_euclid(HOURS_PER_YEAR as f64);
    let day_index = (zero_based / 24.0).floor();
    let hour = zero_based - day_index * 24.0;
    let mut day_of_year = day_index as u32 + 1;

    let mut month = 1;
    while month < 12 && day_of_year > DAYS_IN_MONTH[month as usize - 1] {
        day_of_year -= DAYS_IN_MONTH[month as usize - 1];
        month += 1;
    }
    TimeInstant::new(month, day_of_year, hour)
}

/// A canonical (month, day, hour) instant in a non-leap year.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeInstant {
    month: u32,
    day: u32,
    hour: f64,
}

impl TimeInstant {
    /// Creates an instant, canonicalizing each component.
    ///
    /// # Example
    /// ```
    /// # use sunpath::time::TimeInstant;
    /// let instant = TimeInstant::new(2, 31, 25.5);
    /// assert_eq!(instant.month(), 2);
    /// assert_eq!(instant.day(), 28);
    /// assert_eq!(instant.hour(), 1.5);
    /// ```
    #[must_use]
    pub fn new(month: u32, day: u32, hour: f64) -> Self {
        let month = canonicalize_month(i64::from(month));
        Self {
            month,
            day: canonicalize_day(i64::from(day), month),
            hour: canonicalize_hour(hour),
        }
    }

    /// Month (1-12).
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// Day of the month.
    #[must_use]
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Hour in [0, 24), possibly fractional.
    #[must_use]
    pub const fn hour(&self) -> f64 {
        self.hour
    }

    /// One-based day of the year.
    #[must_use]
    pub fn day_of_year(&self) -> u32 {
        day_of_year(self.month, self.day)
    }

    /// Continuous one-based hour of the year.
    #[must_use]
    pub fn hour_of_year(&self) -> f64 {
        hour_of_year(self.month, self.day, self.hour)
    }

    /// Converts to a `chrono` date-time in the given year.
    ///
    /// Returns `None` only if `year` is outside chrono's supported range.
    #[cfg(feature = "chrono")]
    #[must_use]
    pub fn to_naive_datetime(&self, year: i32) -> Option<chrono::NaiveDateTime> {
        let seconds = (self.hour * 3600.0).round() as u32;
        chrono::NaiveDate::from_ymd_opt(year, self.month, self.day)?
            .and_hms_opt(0, 0, 0)
            .map(|midnight| midnight + chrono::TimeDelta::seconds(i64::from(seconds)))
    }

    /// Creates an instant from any `chrono` date-time; 29 February folds onto 28 February.
    #[cfg(feature = "chrono")]
    #[must_use]
    pub fn from_datetime<T: chrono::Datelike + chrono::Timelike>(datetime: &T) -> Self {
        let hour = f64::from(datetime.hour())
            + f64::from(datetime.minute()) / 60.0
            + f64::from(datetime.second()) / 3600.0;
        Self::new(datetime.month(), datetime.day(), hour)
    }
}

impl fmt::Display for TimeInstant {
    /// Formats as `21 DEC 12:30`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = (self.hour * 60.0).round() as u32;
        write!(
            f,
            "{} {} {:02}:{:02}",
            self.day,
            month_abbreviation(self.month),
            minutes / 60,
            minutes % 60
        )
    }
}

/// Number of samples taken per hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeStep(u32);

impl Default for TimeStep {
    fn default() -> Self {
        Self(1)
    }
}

impl TimeStep {
    /// Resolves a requested number of steps per hour to one that divides 60.
    ///
    /// Requests that do not divide 60 snap to the nearest value in
    /// [`VALID_TIME_STEPS`] (ties go to the smaller step). Non-finite or
    /// non-positive requests fall back to 1; fractional requests are truncated.
    ///
    /// # Example
    /// ```
    /// # use sunpath::time::TimeStep;
    /// let step = TimeStep::snap(7.0);
    /// assert_eq!(step.value.steps_per_hour(), 6);
    /// assert!(step.warning.is_some());
    /// ```
    #[must_use]
    pub fn snap(requested: f64) -> Checked<Self> {
        if !requested.is_finite() || requested < 1.0 {
            return Checked::corrected(
                Self(1),
                Error::InvalidTimeStep {
                    requested,
                    resolved: 1,
                },
            );
        }

        let truncated = requested.trunc().min(f64::from(u32::MAX)) as u32;
        let resolved = if 60 % truncated == 0 {
            truncated
        } else {
            VALID_TIME_STEPS
                .iter()
                .copied()
                .min_by_key(|valid| valid.abs_diff(truncated))
                .unwrap_or(1)
        };

        if f64::from(resolved) == requested {
            Checked::ok(Self(resolved))
        } else {
            Checked::corrected(
                Self(resolved),
                Error::InvalidTimeStep {
                    requested,
                    resolved,
                },
            )
        }
    }

    /// Steps per hour.
    #[must_use]
    pub const fn steps_per_hour(&self) -> u32 {
        self.0
    }

    /// Length of one step in hours.
    #[must_use]
    pub fn hours(&self) -> f64 {
        1.0 / f64::from(self.0)
    }
}

/// A (month, day, hour) bound of a ranged analysis window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowBound {
    /// Month (1-12).
    pub month: u32,
    /// Day of the month.
    pub day: u32,
    /// Whole hour (0-23).
    pub hour: u32,
}

impl WindowBound {
    /// Creates a bound.
    #[must_use]
    pub const fn new(month: u32, day: u32, hour: u32) -> Self {
        Self { month, day, hour }
    }
}

/// The set of instants to analyse.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnalysisWindow {
    /// Cross product of months × days × hours, enumerated in that order.
    Explicit {
        /// Months (clamped into 1..=12).
        months: Vec<u32>,
        /// Days of the month (clamped per month).
        days: Vec<u32>,
        /// Hours (canonicalized into [0, 24)).
        hours: Vec<f64>,
    },
    /// Every day from `start` through `end` inclusive, each sampled from
    /// `start.hour` through `end.hour` inclusive.
    ///
    /// A start date after the end date wraps from December into January;
    /// a start hour after the end hour wraps across midnight.
    Range {
        /// First month, day and hour.
        start: WindowBound,
        /// Last month, day and hour.
        end: WindowBound,
    },
}

impl Default for AnalysisWindow {
    /// 21 December at noon.
    fn default() -> Self {
        Self::Explicit {
            months: vec![12],
            days: vec![21],
            hours: vec![12.0],
        }
    }
}

impl AnalysisWindow {
    /// A window covering every hour of the year.
    #[must_use]
    pub const fn whole_year() -> Self {
        Self::Range {
            start: WindowBound::new(1, 1, 0),
            end: WindowBound::new(12, 31, 23),
        }
    }

    /// A single day, every hour.
    #[must_use]
    pub fn single_day(month: u32, day: u32) -> Self {
        Self::Explicit {
            months: vec![month],
            days: vec![day],
            hours: (0..24).map(f64::from).collect(),
        }
    }

    /// Enumerates the instants of this window.
    ///
    /// The iterator is lazy and finite; calling this again restarts the
    /// enumeration from the beginning with an identical sequence.
    #[must_use]
    pub fn instants(&self, step: TimeStep) -> Instants {
        let (dates, base_hours) = match self {
            Self::Explicit {
                months,
                days,
                hours,
            } => {
                let dates = months
                    .iter()
                    .flat_map(|&month| {
                        let month = canonicalize_month(i64::from(month));
                        days.iter()
                            .map(move |&day| (month, canonicalize_day(i64::from(day), month)))
                    })
                    .collect();
                (dates, hours.clone())
            }
            Self::Range { start, end } => (range_dates(*start, *end), range_hours(*start, *end)),
        };

        let steps = step.steps_per_hour();
        let hours = base_hours
            .iter()
            .flat_map(|&hour| {
                (0..steps).map(move |k| canonicalize_hour(hour + f64::from(k) / f64::from(steps)))
            })
            .collect();

        Instants {
            dates,
            hours,
            date_index: 0,
            hour_index: 0,
        }
    }

    /// Distinct months touched by the window, in enumeration order.
    #[must_use]
    pub fn months(&self) -> Vec<u32> {
        let mut months: Vec<u32> = Vec::new();
        for (month, _) in self.instants(TimeStep::default()).dates {
            if !months.contains(&month) {
                months.push(month);
            }
        }
        months
    }
}

/// Dates from `start` to `end` inclusive, wrapping past 31 December.
fn range_dates(start: WindowBound, end: WindowBound) -> Vec<(u32, u32)> {
    let start_month = canonicalize_month(i64::from(start.month));
    let start_day = canonicalize_day(i64::from(start.day), start_month);
    let end_month = canonicalize_month(i64::from(end.month));
    let end_day = canonicalize_day(i64::from(end.day), end_month);

    let first = day_of_year(start_month, start_day);
    let last = day_of_year(end_month, end_day);
    let count = if last >= first {
        last - first + 1
    } else {
        365 - first + last + 1
    };

    (0..count)
        .map(|offset| {
            let instant = from_hour_of_year(f64::from((first - 1 + offset) % 365) * 24.0 + 1.0);
            (instant.month(), instant.day())
        })
        .collect()
}

/// Whole hours from `start.hour` to `end.hour` inclusive, wrapping past midnight.
fn range_hours(start: WindowBound, end: WindowBound) -> Vec<f64> {
    let first = start.hour.min(23);
    let last = end.hour.min(23);
    if first <= last {
        (first..=last).map(f64::from).collect()
    } else {
        (first..24).chain(0..=last).map(f64::from).collect()
    }
}

/// Iterator over the instants of an [`AnalysisWindow`]: dates outer, hours inner.
#[derive(Debug, Clone)]
pub struct Instants {
    dates: Vec<(u32, u32)>,
    hours: Vec<f64>,
    date_index: usize,
    hour_index: usize,
}

impl Iterator for Instants {
    type Item = TimeInstant;

    fn next(&mut self) -> Option<Self::Item> {
        if self.hours.is_empty() {
            return None;
        }
        let &(month, day) = self.dates.get(self.date_index)?;
        let hour = self.hours[self.hour_index];

        self.hour_index += 1;
        if self.hour_index == self.hours.len() {
            self.hour_index = 0;
            self.date_index += 1;
        }
        Some(TimeInstant { month, day, hour })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.hours.is_empty() || self.date_index >= self.dates.len() {
            0
        } else {
            (self.dates.len() - self.date_index) * self.hours.len() - self.hour_index
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Instants {}

impl FusedIterator for Instants {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_hour() {
        assert_eq!(canonicalize_hour(12.5), 12.5);
        assert_eq!(canonicalize_hour(-3.0), 0.0);
        assert_eq!(canonicalize_hour(24.0), 0.0);
        assert_eq!(canonicalize_hour(25.5), 1.5);
        assert_eq!(canonicalize_hour(f64::NAN), 0.0);
    }

    #[test]
    fn test_canonicalize_month_and_day() {
        assert_eq!(canonicalize_month(0), 1);
        assert_eq!(canonicalize_month(13), 12);
        assert_eq!(canonicalize_month(7), 7);

        assert_eq!(canonicalize_day(31, 2), 28);
        assert_eq!(canonicalize_day(0, 5), 1);
        assert_eq!(canonicalize_day(31, 4), 30);
        assert_eq!(canonicalize_day(31, 12), 31);
    }

    #[test]
    fn test_hour_of_year_bounds() {
        assert_eq!(hour_of_year(1, 1, 0.0), 1.0);
        assert_eq!(hour_of_year(1, 2, 0.0), 25.0);
        assert_eq!(hour_of_year(12, 31, 23.0), 8760.0);
        assert_eq!(hour_of_year(3, 21, 12.5), 1909.5);
    }

    #[test]
    fn test_hour_of_year_round_trip_whole_year() {
        for month in 1..=12 {
            for day in 1..=days_in_month(month) {
                for hour in 0..24 {
                    let index = hour_of_year(month, day, f64::from(hour));
                    let instant = from_hour_of_year(index);
                    assert_eq!(
                        (instant.month(), instant.day(), instant.hour()),
                        (month, day, f64::from(hour)),
                        "round trip failed for hour of year {index}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_from_hour_of_year_fractional_and_wrapping() {
        let instant = from_hour_of_year(1909.5);
        assert_eq!((instant.month(), instant.day()), (3, 21));
        assert!((instant.hour() - 12.5).abs() < 1e-9);

        let wrapped = from_hour_of_year(8761.0);
        assert_eq!((wrapped.month(), wrapped.day(), wrapped.hour()), (1, 1, 0.0));
    }

    #[test]
    fn test_time_step_snapping() {
        assert_eq!(TimeStep::snap(7.0).value.steps_per_hour(), 6);
        assert_eq!(TimeStep::snap(8.0).value.steps_per_hour(), 6);
        assert_eq!(TimeStep::snap(25.0).value.steps_per_hour(), 20);
        assert_eq!(TimeStep::snap(45.0).value.steps_per_hour(), 30);
        assert_eq!(TimeStep::snap(100.0).value.steps_per_hour(), 60);

        let exact = TimeStep::snap(4.0);
        assert_eq!(exact.value.steps_per_hour(), 4);
        assert!(exact.warning.is_none());

        let snapped = TimeStep::snap(7.0);
        assert_eq!(
            snapped.warning,
            Some(Error::InvalidTimeStep {
                requested: 7.0,
                resolved: 6
            })
        );

        assert_eq!(TimeStep::snap(0.0).value.steps_per_hour(), 1);
        assert_eq!(TimeStep::snap(-4.0).value.steps_per_hour(), 1);
        assert_eq!(TimeStep::snap(f64::NAN).value.steps_per_hour(), 1);

        let fractional = TimeStep::snap(4.5);
        assert_eq!(fractional.value.steps_per_hour(), 4);
        assert!(fractional.warning.is_some());
    }

    #[test]
    fn test_explicit_window_order() {
        let window = AnalysisWindow::Explicit {
            months: vec![6, 12],
            days: vec![1, 21],
            hours: vec![9.0, 15.0],
        };
        let labels: Vec<(u32, u32, f64)> = window
            .instants(TimeStep::default())
            .map(|i| (i.month(), i.day(), i.hour()))
            .collect();
        assert_eq!(
            labels,
            vec![
                (6, 1, 9.0),
                (6, 1, 15.0),
                (6, 21, 9.0),
                (6, 21, 15.0),
                (12, 1, 9.0),
                (12, 1, 15.0),
                (12, 21, 9.0),
                (12, 21, 15.0),
            ]
        );
    }

    #[test]
    fn test_sub_hour_steps() {
        let window = AnalysisWindow::Explicit {
            months: vec![3],
            days: vec![21],
            hours: vec![10.0, 11.0],
        };
        let step = TimeStep::snap(4.0).value;
        let hours: Vec<f64> = window.instants(step).map(|i| i.hour()).collect();
        assert_eq!(hours, vec![10.0, 10.25, 10.5, 10.75, 11.0, 11.25, 11.5, 11.75]);
    }

    #[test]
    fn test_sub_hour_steps_expand_only_listed_hours() {
        let window = AnalysisWindow::Explicit {
            months: vec![6],
            days: vec![21],
            hours: vec![9.0, 15.0],
        };
        let step = TimeStep::snap(2.0).value;
        let hours: Vec<f64> = window.instants(step).map(|i| i.hour()).collect();
        assert_eq!(hours, vec![9.0, 9.5, 15.0, 15.5]);
    }

    #[test]
    fn test_range_window_wraps_year() {
        let window = AnalysisWindow::Range {
            start: WindowBound::new(11, 1, 12),
            end: WindowBound::new(2, 28, 12),
        };
        assert_eq!(window.months(), vec![11, 12, 1, 2]);

        let instants: Vec<TimeInstant> = window.instants(TimeStep::default()).collect();
        assert_eq!(instants.len(), 30 + 31 + 31 + 28);
        assert_eq!((instants[0].month(), instants[0].day()), (11, 1));
        let last = instants[instants.len() - 1];
        assert_eq!((last.month(), last.day()), (2, 28));
    }

    #[test]
    fn test_range_window_hours_wrap_midnight() {
        let window = AnalysisWindow::Range {
            start: WindowBound::new(6, 21, 22),
            end: WindowBound::new(6, 21, 1),
        };
        let hours: Vec<f64> = window.instants(TimeStep::default()).map(|i| i.hour()).collect();
        assert_eq!(hours, vec![22.0, 23.0, 0.0, 1.0]);
    }

    #[test]
    fn test_whole_year_window() {
        let window = AnalysisWindow::whole_year();
        let instants = window.instants(TimeStep::default());
        assert_eq!(instants.len(), HOURS_PER_YEAR);
        let indices: Vec<f64> = instants.map(|i| i.hour_of_year()).collect();
        assert_eq!(indices.first(), Some(&1.0));
        assert_eq!(indices.last(), Some(&8760.0));
    }

    #[test]
    fn test_enumeration_is_restartable() {
        let window = AnalysisWindow::Range {
            start: WindowBound::new(11, 15, 6),
            end: WindowBound::new(1, 15, 18),
        };
        let step = TimeStep::snap(2.0).value;
        let first: Vec<TimeInstant> = window.instants(step).collect();
        let second: Vec<TimeInstant> = window.instants(step).collect();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_explicit_window_canonicalizes() {
        let window = AnalysisWindow::Explicit {
            months: vec![14],
            days: vec![40],
            hours: vec![24.0],
        };
        let instants: Vec<TimeInstant> = window.instants(TimeStep::default()).collect();
        assert_eq!(instants, vec![TimeInstant::new(12, 31, 0.0)]);
    }

    #[test]
    fn test_empty_hours_yield_nothing() {
        let window = AnalysisWindow::Explicit {
            months: vec![1],
            days: vec![1],
            hours: vec![],
        };
        assert_eq!(window.instants(TimeStep::default()).count(), 0);
    }

    #[test]
    fn test_instant_display() {
        assert_eq!(TimeInstant::new(12, 21, 12.0).to_string(), "21 DEC 12:00");
        assert_eq!(TimeInstant::new(3, 5, 9.5).to_string(), "5 MAR 09:30");
        assert_eq!(TimeInstant::new(7, 1, 6.25).to_string(), "1 JUL 06:15");
    }

    #[test]
    #[cfg(feature = "chrono")]
    fn test_chrono_conversions() {
        use chrono::{Datelike, NaiveDate, Timelike};

        let instant = TimeInstant::new(6, 21, 13.5);
        let datetime = instant.to_naive_datetime(2023).unwrap();
        assert_eq!(datetime.date(), NaiveDate::from_ymd_opt(2023, 6, 21).unwrap());
        assert_eq!((datetime.hour(), datetime.minute()), (13, 30));
        assert_eq!(TimeInstant::from_datetime(&datetime), instant);

        let leap_day = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let folded = TimeInstant::from_datetime(&leap_day);
        assert_eq!((folded.month(), folded.day(), folded.hour()), (2, 28, 8.0));
        assert_eq!(leap_day.year(), 2024);
    }
}
