//! Conditional statements over annual hourly data.
//!
//! A statement such as `18<a<23 and b<80` selects the hours of the year for
//! which the first series lies strictly between 18 and 23 and the second is
//! below 80. Letters refer to series by position: `a` is the first series,
//! `b` the second, and so on. The statement is parsed into an expression tree
//! and evaluated once per hour; it is never executed as code.

pub mod lexer;
pub mod parser;

use crate::series::HourlySeries;
use crate::time::HOURS_PER_YEAR;
use crate::{Error, Result};
use lexer::{Lexeme, Token, series_letter, tokenize};
use parser::Expr;

/// One inclusion flag per hour of the year.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionMask {
    hours: Vec<bool>,
}

impl Default for ConditionMask {
    fn default() -> Self {
        Self::all()
    }
}

impl ConditionMask {
    /// A mask that selects every hour.
    #[must_use]
    pub fn all() -> Self {
        Self {
            hours: vec![true; HOURS_PER_YEAR],
        }
    }

    /// Builds a mask from 8760 flags, index 0 being hour of the year 1.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` if `hours` does not have exactly 8760 entries.
    pub fn from_hours(hours: Vec<bool>) -> Result<Self> {
        if hours.len() != HOURS_PER_YEAR {
            return Err(Error::index_out_of_range(hours.len() as f64, HOURS_PER_YEAR));
        }
        Ok(Self { hours })
    }

    /// Whether the hour nearest to a continuous one-based hour of the year is selected.
    ///
    /// Rounding past hour 8760 wraps to hour 1.
    #[must_use]
    pub fn is_selected(&self, hour_of_year: f64) -> bool {
        if !hour_of_year.is_finite() {
            return false;
        }
        let rounded = hour_of_year.round() as i64;
        let index = (rounded - 1).rem_euclid(HOURS_PER_YEAR as i64) as usize;
        self.hours[index]
    }

    /// Number of selected hours.
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.hours.iter().filter(|&&selected| selected).count()
    }

    /// The flags, index 0 being hour of the year 1.
    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.hours
    }
}

/// A compiled conditional statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Selected hours.
    pub mask: ConditionMask,
    /// The statement with letters replaced by series names; empty when nothing is filtered.
    pub label: String,
}

impl Condition {
    /// A condition that selects everything.
    #[must_use]
    pub fn unfiltered() -> Self {
        Self {
            mask: ConditionMask::all(),
            label: String::new(),
        }
    }

    /// Whether this condition filters anything out.
    #[must_use]
    pub fn is_filtering(&self) -> bool {
        !self.label.is_empty()
    }
}

/// Compiles `statement` against `series` into a per-hour mask and a label.
///
/// An empty statement or an empty series list selects every hour.
///
/// # Errors
/// - `MissingSeriesReference` if a letter has no matching series;
/// - `InvalidSeriesShape` if a referenced series is not annual hourly data;
/// - `ExpressionError` if the statement does not parse or fails to evaluate
///   at any hour.
///
/// # Example
/// ```
/// # use sunpath::{HourlySeries, condition::compile};
/// let temperature = HourlySeries::annual("Temperature", "C", vec![20.0; 8760]);
/// let condition = compile("18<a<23", &[temperature]).unwrap();
/// assert_eq!(condition.mask.selected_count(), 8760);
/// assert_eq!(condition.label, "18 < Temperature < 23");
/// ```
pub fn compile(statement: &str, series: &[HourlySeries]) -> Result<Condition> {
    if statement.trim().is_empty() || series.is_empty() {
        return Ok(Condition::unfiltered());
    }
    log::info!("checking conditional statement '{statement}'");

    let lexemes = tokenize(statement)?;
    let referenced = referenced_series(&lexemes);

    if let Some(&missing) = referenced.iter().find(|&&index| index >= series.len()) {
        return Err(Error::MissingSeriesReference {
            letter: series_letter(missing),
            list_number: missing + 1,
            list_count: series.len(),
        });
    }
    for &index in &referenced {
        series[index].validate_as(index)?;
    }

    let expr = parser::parse(&lexemes)?;
    let mask = evaluate_mask(&expr, series)?;
    log::debug!(
        "conditional statement selects {} of {HOURS_PER_YEAR} hours",
        mask.selected_count()
    );

    Ok(Condition {
        mask,
        label: label(&lexemes, series),
    })
}

/// Indices of the series a statement refers to, ascending and without repeats.
fn referenced_series(lexemes: &[Lexeme<'_>]) -> Vec<usize> {
    let mut indices: Vec<usize> = lexemes
        .iter()
        .filter_map(|lexeme| match lexeme.token {
            Token::Series(index) => Some(index),
            _ => None,
        })
        .collect();
    indices.sort_unstable();
    indices.dedup();
    indices
}

fn evaluate_mask(expr: &Expr, series: &[HourlySeries]) -> Result<ConditionMask> {
    let hours = (0..HOURS_PER_YEAR)
        .map(|hour| {
            expr.is_satisfied(&|index| series[index].values()[hour])
                .map_err(|err| match err {
                    Error::ExpressionError { message } => {
                        Error::expression(format!("{message} at hour of year {}", hour + 1))
                    }
                    other => other,
                })
        })
        .collect::<Result<Vec<bool>>>()?;
    ConditionMask::from_hours(hours)
}

/// Statement text with letters replaced by series names, one line per `and`/`or` clause.
fn label(lexemes: &[Lexeme<'_>], series: &[HourlySeries]) -> String {
    let mut label = String::new();
    for (i, lexeme) in lexemes.iter().enumerate() {
        let text = match lexeme.token {
            Token::Series(index) => series[index].name(),
            _ => lexeme.text,
        };
        if i > 0 {
            label.push(if matches!(lexeme.token, Token::And | Token::Or) {
                '\n'
            } else {
                ' '
            });
        }
        label.push_str(text);
    }
    label
}
