//! Error types for the sun-path library.
//!
//! Some variants are recoverable: the offending input is clamped or snapped
//! and the error travels alongside the result as a warning (see [`Checked`]).
//! The others abort the computation, or a single dataset, and come back as `Err`.

use thiserror::Error;

/// Result type alias for operations in this crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors and warnings that can occur while computing a sun path.
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    /// Latitude outside -90..=90 degrees. Recoverable: the value is clamped.
    #[error("invalid latitude {value}° (must be between -90° and +90°), clamped to {clamped}°")]
    InvalidLatitude {
        /// The latitude that was provided.
        value: f64,
        /// The latitude actually used.
        clamped: f64,
    },
    /// No latitude was supplied.
    #[error("missing location: please input a number for latitude")]
    MissingLocation,
    /// Time step that is not a positive integer divisor of 60. Recoverable: the value is snapped.
    #[error("invalid time step {requested} (must divide 60), time step is set to {resolved}")]
    InvalidTimeStep {
        /// The time step that was requested.
        requested: f64,
        /// The time step actually used.
        resolved: u32,
    },
    /// A condition references a letter with no matching series.
    #[error(
        "condition references list number {list_number} (letter '{letter}') which does not exist; number of lists is {list_count}"
    )]
    MissingSeriesReference {
        /// The letter used in the condition.
        letter: char,
        /// One-based list number the letter points to.
        list_number: usize,
        /// Number of lists supplied.
        list_count: usize,
    },
    /// A series is not a full-year hourly series.
    #[error("list number {list_number} ({name}) is not valid annual hourly data: {reason}")]
    InvalidSeriesShape {
        /// One-based list number of the series.
        list_number: usize,
        /// Display name of the series.
        name: String,
        /// What is wrong with it.
        reason: String,
    },
    /// The condition could not be parsed or evaluated.
    #[error("error in the conditional statement: {message}")]
    ExpressionError {
        /// Description of the failure.
        message: String,
    },
    /// An interpolation index fell outside the series.
    #[error("index {index} out of range for series of length {len}")]
    IndexOutOfRange {
        /// The fractional index requested.
        index: f64,
        /// Length of the series.
        len: usize,
    },
    /// Neither a daily nor an annual path was requested. Recoverable: no curves are drawn.
    #[error("no sun path requested: set the daily or annual sun path to true")]
    NoPathRequested,
    /// Processing of one overlay dataset failed.
    #[error("dataset {index} ({name}) failed: {source}")]
    Dataset {
        /// Zero-based position of the dataset.
        index: usize,
        /// Display name of the dataset.
        name: String,
        /// The underlying failure.
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Creates an expression error.
    #[must_use]
    pub fn expression(message: impl Into<String>) -> Self {
        Self::ExpressionError {
            message: message.into(),
        }
    }

    /// Creates an index out of range error.
    #[must_use]
    pub const fn index_out_of_range(index: f64, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Wraps this error as the failure of one overlay dataset.
    #[must_use]
    pub fn in_dataset(self, index: usize, name: impl Into<String>) -> Self {
        Self::Dataset {
            index,
            name: name.into(),
            source: Box::new(self),
        }
    }

    /// Whether the computation carried on after reporting this error.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidLatitude { .. } | Self::InvalidTimeStep { .. } | Self::NoPathRequested
        )
    }
}

/// A value that passed validation, possibly after being corrected.
#[derive(Debug, Clone, PartialEq)]
pub struct Checked<T> {
    /// The value to use.
    pub value: T,
    /// Set when the input had to be corrected.
    pub warning: Option<Error>,
}

impl<T> Checked<T> {
    /// A value that needed no correction.
    pub const fn ok(value: T) -> Self {
        Self {
            value,
            warning: None,
        }
    }

    /// A corrected value with the warning that describes the correction.
    pub const fn corrected(value: T, warning: Error) -> Self {
        Self {
            value,
            warning: Some(warning),
        }
    }

    /// Logs the warning, if any, moves it into `warnings`, and returns the value.
    pub fn report(self, warnings: &mut Vec<Error>) -> T {
        if let Some(warning) = self.warning {
            log::warn!("{warning}");
            warnings.push(warning);
        }
        self.value
    }
}

/// Clamps latitude into -90..=90 degrees.
///
/// # Errors
/// Returns `MissingLocation` if latitude is not a finite number.
pub fn check_latitude(latitude: f64) -> Result<Checked<f64>> {
    if !latitude.is_finite() {
        return Err(Error::MissingLocation);
    }
    if (-90.0..=90.0).contains(&latitude) {
        return Ok(Checked::ok(latitude));
    }
    let clamped = latitude.clamp(-90.0, 90.0);
    Ok(Checked::corrected(
        clamped,
        Error::InvalidLatitude {
            value: latitude,
            clamped,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latitude_validation() {
        assert_eq!(check_latitude(0.0).unwrap(), Checked::ok(0.0));
        assert_eq!(check_latitude(90.0).unwrap(), Checked::ok(90.0));
        assert_eq!(check_latitude(-90.0).unwrap(), Checked::ok(-90.0));

        let high = check_latitude(95.0).unwrap();
        assert_eq!(high.value, 90.0);
        assert!(matches!(
            high.warning,
            Some(Error::InvalidLatitude { value, clamped }) if value == 95.0 && clamped == 90.0
        ));

        let low = check_latitude(-120.0).unwrap();
        assert_eq!(low.value, -90.0);
        assert!(low.warning.is_some());

        assert_eq!(check_latitude(f64::NAN), Err(Error::MissingLocation));
        assert_eq!(check_latitude(f64::INFINITY), Err(Error::MissingLocation));
    }

    #[test]
    fn test_error_display() {
        let err = Error::InvalidLatitude {
            value: 95.0,
            clamped: 90.0,
        };
        assert_eq!(
            err.to_string(),
            "invalid latitude 95° (must be between -90° and +90°), clamped to 90°"
        );

        let err = Error::MissingSeriesReference {
            letter: 'c',
            list_number: 3,
            list_count: 2,
        };
        assert_eq!(
            err.to_string(),
            "condition references list number 3 (letter 'c') which does not exist; number of lists is 2"
        );

        let err = Error::index_out_of_range(8760.5, 8760).in_dataset(1, "Relative Humidity");
        assert_eq!(
            err.to_string(),
            "dataset 1 (Relative Humidity) failed: index 8760.5 out of range for series of length 8760"
        );
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(Error::NoPathRequested.is_recoverable());
        assert!(
            Error::InvalidTimeStep {
                requested: 7.0,
                resolved: 6
            }
            .is_recoverable()
        );
        assert!(!Error::MissingLocation.is_recoverable());
        assert!(!Error::expression("unexpected token").is_recoverable());
    }

    #[test]
    fn test_checked_report_collects_warning() {
        let mut warnings = Vec::new();
        let value = Checked::corrected(6_u32, Error::NoPathRequested).report(&mut warnings);
        assert_eq!(value, 6);
        assert_eq!(warnings, vec![Error::NoPathRequested]);

        let value = Checked::ok(1_u32).report(&mut warnings);
        assert_eq!(value, 1);
        assert_eq!(warnings.len(), 1);
    }
}
