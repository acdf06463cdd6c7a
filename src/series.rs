//! Annual hourly datasets and their interpolation onto sub-hourly samples.

use crate::math::lerp;
use crate::time::HOURS_PER_YEAR;
use crate::{Error, Result};

/// Sampling resolution declared in a series header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Resolution {
    /// One value per hour.
    Hourly,
    /// One value per day.
    Daily,
    /// One value per month.
    Monthly,
}

/// A (month, day, hour) coverage bound using the hourly-data header
/// convention, where hours run from 1 to 24.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoverageBound {
    /// Month (1-12).
    pub month: u32,
    /// Day of the month.
    pub day: u32,
    /// Hour ending (1-24).
    pub hour: u32,
}

impl CoverageBound {
    /// First hour of the year.
    pub const YEAR_START: Self = Self {
        month: 1,
        day: 1,
        hour: 1,
    };

    /// Last hour of the year.
    pub const YEAR_END: Self = Self {
        month: 12,
        day: 31,
        hour: 24,
    };
}

/// Metadata describing an hourly series.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeriesHeader {
    /// Location the data belongs to.
    pub location: String,
    /// Display name, e.g. "Dry Bulb Temperature".
    pub name: String,
    /// Units, e.g. "C".
    pub units: String,
    /// Declared resolution.
    pub resolution: Resolution,
    /// First covered hour.
    pub start: CoverageBound,
    /// Last covered hour.
    pub end: CoverageBound,
}

impl SeriesHeader {
    /// Header of a full-year hourly series.
    #[must_use]
    pub fn annual_hourly(name: impl Into<String>, units: impl Into<String>) -> Self {
        Self {
            location: String::new(),
            name: name.into(),
            units: units.into(),
            resolution: Resolution::Hourly,
            start: CoverageBound::YEAR_START,
            end: CoverageBound::YEAR_END,
        }
    }
}

/// A dataset with its header, normally one value per hour of a non-leap year.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HourlySeries {
    header: SeriesHeader,
    values: Vec<f64>,
}

impl HourlySeries {
    /// Creates a series with an arbitrary header. Call [`validate`](Self::validate)
    /// before relying on it being annual hourly data.
    #[must_use]
    pub const fn with_header(header: SeriesHeader, values: Vec<f64>) -> Self {
        Self { header, values }
    }

    /// Creates a full-year hourly series.
    ///
    /// # Example
    /// ```
    /// # use sunpath::HourlySeries;
    /// let series = HourlySeries::annual("Dry Bulb Temperature", "C", vec![20.0; 8760]);
    /// assert!(series.validate().is_ok());
    /// ```
    #[must_use]
    pub fn annual(name: impl Into<String>, units: impl Into<String>, values: Vec<f64>) -> Self {
        Self::with_header(SeriesHeader::annual_hourly(name, units), values)
    }

    /// Header metadata.
    #[must_use]
    pub const fn header(&self) -> &SeriesHeader {
        &self.header
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.header.name
    }

    /// Units.
    #[must_use]
    pub fn units(&self) -> &str {
        &self.header.units
    }

    /// Raw values, index 0 being 1 January 00:00-01:00.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Checks that this is full-year hourly data.
    ///
    /// # Errors
    /// Returns `InvalidSeriesShape` (with list number 0; callers that know the
    /// position use [`validate_as`](Self::validate_as)).
    pub fn validate(&self) -> Result<()> {
        self.validate_as(0)
    }

    /// Checks that this is full-year hourly data, reporting failures against
    /// the zero-based position `index` in the caller's list of series.
    ///
    /// # Errors
    /// Returns `InvalidSeriesShape` when the resolution is not hourly, the
    /// coverage is not the whole year, or there are not exactly 8760 values.
    pub fn validate_as(&self, index: usize) -> Result<()> {
        let reason = if self.header.resolution != Resolution::Hourly {
            format!("resolution is {:?}, expected hourly", self.header.resolution)
        } else if self.header.start != CoverageBound::YEAR_START
            || self.header.end != CoverageBound::YEAR_END
        {
            "coverage is not the whole year".to_string()
        } else if self.values.len() != HOURS_PER_YEAR {
            format!(
                "{} values, expected {HOURS_PER_YEAR}",
                self.values.len()
            )
        } else {
            return Ok(());
        };

        Err(Error::InvalidSeriesShape {
            list_number: index + 1,
            name: self.header.name.clone(),
            reason,
        })
    }

    /// Value at a continuous one-based hour of the year, interpolated linearly.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` when the hour falls outside the series.
    pub fn value_at_hour(&self, hour_of_year: f64) -> Result<f64> {
        interpolate(&self.values, hour_of_year - 1.0)
    }
}

/// Linearly interpolates `values` at a fractional zero-based index.
///
/// Integral indices return the stored value exactly.
///
/// # Errors
/// Returns `IndexOutOfRange` if either neighbouring index is outside the slice.
///
/// # Example
/// ```
/// # use sunpath::series::interpolate;
/// let values = [10.0, 20.0];
/// assert_eq!(interpolate(&values, 0.5).unwrap(), 15.0);
/// assert!(interpolate(&values, 1.5).is_err());
/// ```
pub fn interpolate(values: &[f64], index: f64) -> Result<f64> {
    let lower = index.floor();
    let upper = index.ceil();
    if !index.is_finite() || lower < 0.0 || upper >= values.len() as f64 {
        return Err(Error::index_out_of_range(index, values.len()));
    }

    let low = values[lower as usize];
    if lower == upper {
        return Ok(low);
    }
    Ok(lerp(low, values[upper as usize], index - lower))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Vec<f64> {
        (0..HOURS_PER_YEAR).map(|i| i as f64).collect()
    }

    #[test]
    fn test_interpolate_midpoint_and_exact() {
        let mut values = vec![0.0; HOURS_PER_YEAR];
        values[100] = 10.0;
        values[101] = 20.0;
        assert_eq!(interpolate(&values, 100.5).unwrap(), 15.0);
        assert_eq!(interpolate(&values, 100.0).unwrap(), 10.0);
        assert_eq!(interpolate(&values, 100.25).unwrap(), 12.5);
    }

    #[test]
    fn test_interpolate_bounds() {
        let values = ramp();
        assert_eq!(interpolate(&values, 0.0).unwrap(), 0.0);
        assert_eq!(interpolate(&values, 8759.0).unwrap(), 8759.0);
        assert_eq!(
            interpolate(&values, 8759.5),
            Err(Error::IndexOutOfRange {
                index: 8759.5,
                len: HOURS_PER_YEAR
            })
        );
        assert!(interpolate(&values, -0.5).is_err());
        assert!(interpolate(&values, f64::NAN).is_err());
        assert!(interpolate(&[], 0.0).is_err());
    }

    #[test]
    fn test_value_at_hour_is_one_based() {
        let series = HourlySeries::annual("Ramp", "-", ramp());
        assert_eq!(series.value_at_hour(1.0).unwrap(), 0.0);
        assert_eq!(series.value_at_hour(8760.0).unwrap(), 8759.0);
        assert_eq!(series.value_at_hour(101.5).unwrap(), 100.5);
        assert!(series.value_at_hour(8760.5).is_err());
    }

    #[test]
    fn test_validate_shape() {
        assert!(HourlySeries::annual("Ok", "C", ramp()).validate().is_ok());

        let short = HourlySeries::annual("Short", "C", vec![1.0; 24]);
        assert!(matches!(
            short.validate_as(2),
            Err(Error::InvalidSeriesShape { list_number: 3, ref name, .. }) if name == "Short"
        ));

        let mut header = SeriesHeader::annual_hourly("Daily", "C");
        header.resolution = Resolution::Daily;
        let daily = HourlySeries::with_header(header, ramp());
        assert_eq!(daily.header().resolution, Resolution::Daily);
        assert_eq!(daily.header().units, "C");
        assert!(daily.validate().is_err());

        let mut header = SeriesHeader::annual_hourly("Partial", "C");
        header.end = CoverageBound {
            month: 6,
            day: 30,
            hour: 24,
        };
        let partial = HourlySeries::with_header(header, ramp());
        assert!(partial.validate().is_err());
    }
}
