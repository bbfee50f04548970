#![forbid(unsafe_code)]

//! Line-budget calculation.
//!
//! A budget is the height a candidate must stay strictly below:
//!
//! ```text
//! floor(line_height) * (rows + 1) + padding_top + padding_bottom
//! ```
//!
//! The extra row absorbs sub-pixel and line-box rounding, so a fit prefers
//! to under-trim. Heights are compared as `ceil(height) < budget`.
//!
//! `line_height` must be the line height a renderer actually produces.
//! A declared value can be zero or smaller than the glyph box, so
//! [`LineBudget::measure`] probes one line of placeholder text and takes
//! the larger of the probed and declared heights.
//!
//! # Example
//! ```
//! use lineclamp_fit::LineBudget;
//!
//! let budget = LineBudget::compute(20.7, 2, 4.0, 4.0);
//! assert_eq!(budget.max_height(), 68.0);
//! assert!(budget.fits(66.5));
//! assert!(!budget.fits(67.2));
//! ```

use tracing::debug_span;

use crate::error::OracleError;
use crate::oracle::{MeasurementOracle, ProbeScope};

/// Vertical metrics of the element being clamped.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxStyle {
    /// Declared line height, if the element has one.
    pub line_height: Option<f64>,
    pub padding_top: f64,
    pub padding_bottom: f64,
}

impl BoxStyle {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            line_height: None,
            padding_top: 0.0,
            padding_bottom: 0.0,
        }
    }

    #[must_use]
    pub const fn line_height(mut self, line_height: f64) -> Self {
        self.line_height = Some(line_height);
        self
    }

    #[must_use]
    pub const fn padding(mut self, top: f64, bottom: f64) -> Self {
        self.padding_top = top;
        self.padding_bottom = bottom;
        self
    }

    /// Build from computed CSS values such as `"21px"` or `"normal"`.
    #[must_use]
    pub fn from_css(line_height: &str, padding_top: &str, padding_bottom: &str) -> Self {
        let declared = parse_px(line_height);
        Self {
            line_height: (declared > 0.0).then_some(declared),
            padding_top: parse_px(padding_top),
            padding_bottom: parse_px(padding_bottom),
        }
    }
}

/// Leading unsigned decimal of a CSS length, `0.0` when there is none.
///
/// `"12.5px"` is `12.5`, `"normal"` is `0.0`, `"-4px"` is `0.0`.
#[must_use]
pub fn parse_px(value: &str) -> f64 {
    let value = value.trim_start();
    let int_end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let mut end = int_end;
    if value[int_end..].starts_with('.') {
        let frac = &value[int_end + 1..];
        end = int_end + 1 + frac.find(|c: char| !c.is_ascii_digit()).unwrap_or(frac.len());
    }
    value[..end].parse().unwrap_or(0.0)
}

/// Maximum height a fitting candidate must stay below.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct LineBudget {
    max_height: f64,
}

impl LineBudget {
    /// A budget of exactly `max_height`. Negative and NaN become zero.
    #[must_use]
    pub fn from_height(max_height: f64) -> Self {
        Self {
            max_height: max_height.max(0.0),
        }
    }

    /// Budget for `rows` lines of `line_height` plus vertical padding.
    #[must_use]
    pub fn compute(line_height: f64, rows: u32, padding_top: f64, padding_bottom: f64) -> Self {
        let lines = f64::from(rows) + 1.0;
        Self::from_height(line_height.floor() * lines + padding_top + padding_bottom)
    }

    /// Probe the real line height through `oracle` and compute the budget.
    pub fn measure<O>(oracle: &mut O, style: &BoxStyle, rows: u32) -> Result<Self, OracleError>
    where
        O: MeasurementOracle + ?Sized,
    {
        let _span = debug_span!("line_budget", rows).entered();
        let line_height = real_line_height(oracle, style)?;
        let budget = Self::compute(line_height, rows, style.padding_top, style.padding_bottom);
        tracing::debug!(line_height, budget = budget.max_height, "line budget computed");
        Ok(budget)
    }

    #[inline]
    #[must_use]
    pub const fn max_height(&self) -> f64 {
        self.max_height
    }

    /// Whether a rendered `height` stays strictly under the budget.
    #[inline]
    #[must_use]
    pub fn fits(&self, height: f64) -> bool {
        height.ceil() < self.max_height
    }
}

/// Larger of the probed single-line height and the declared line height.
///
/// The probe is acquired and released inside this call.
pub fn real_line_height<O>(oracle: &mut O, style: &BoxStyle) -> Result<f64, OracleError>
where
    O: MeasurementOracle + ?Sized,
{
    let probed = ProbeScope::acquire(oracle).line_height(style)?;
    let declared = style.line_height.unwrap_or(0.0);
    Ok(probed.max(declared))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::Candidate;

    struct FixedLine {
        probed: f64,
        clears: usize,
    }

    impl MeasurementOracle for FixedLine {
        fn render(&mut self, _candidate: &Candidate<'_>) -> Result<(), OracleError> {
            Ok(())
        }

        fn height(&self) -> Result<f64, OracleError> {
            Ok(0.0)
        }

        fn serialize(&self) -> Result<String, OracleError> {
            Ok(String::new())
        }

        fn clear(&mut self) {
            self.clears += 1;
        }

        fn line_height(&mut self, _style: &BoxStyle) -> Result<f64, OracleError> {
            if self.probed < 0.0 {
                return Err(OracleError::measure("detached"));
            }
            Ok(self.probed)
        }
    }

    #[test]
    fn compute_adds_slack_row() {
        let budget = LineBudget::compute(20.0, 2, 0.0, 0.0);
        assert_eq!(budget.max_height(), 60.0);
    }

    #[test]
    fn compute_floors_line_height_only() {
        let budget = LineBudget::compute(22.9, 1, 1.5, 2.5);
        assert_eq!(budget.max_height(), 22.0 * 2.0 + 4.0);
    }

    #[test]
    fn zero_rows_still_allows_one_line() {
        let budget = LineBudget::compute(18.0, 0, 0.0, 0.0);
        assert_eq!(budget.max_height(), 18.0);
    }

    #[test]
    fn fits_is_strict_after_ceil() {
        let budget = LineBudget::from_height(41.0);
        assert!(budget.fits(40.0));
        assert!(budget.fits(39.01));
        assert!(!budget.fits(40.01));
        assert!(!budget.fits(41.0));
    }

    #[test]
    fn negative_budget_clamps_to_zero() {
        let budget = LineBudget::from_height(-3.0);
        assert_eq!(budget.max_height(), 0.0);
        assert!(!budget.fits(0.0));
    }

    #[test]
    fn parse_px_values() {
        assert_eq!(parse_px("21px"), 21.0);
        assert_eq!(parse_px("12.5px"), 12.5);
        assert_eq!(parse_px(".5em"), 0.5);
        assert_eq!(parse_px("normal"), 0.0);
        assert_eq!(parse_px(""), 0.0);
        assert_eq!(parse_px("-4px"), 0.0);
        assert_eq!(parse_px("7."), 7.0);
    }

    #[test]
    fn from_css_treats_normal_as_undeclared() {
        let style = BoxStyle::from_css("normal", "4px", "6px");
        assert_eq!(style.line_height, None);
        assert_eq!(style.padding_top, 4.0);
        assert_eq!(style.padding_bottom, 6.0);
    }

    #[test]
    fn real_line_height_prefers_probe_when_larger() {
        let mut oracle = FixedLine {
            probed: 22.0,
            clears: 0,
        };
        let style = BoxStyle::new().line_height(0.0);
        assert_eq!(real_line_height(&mut oracle, &style).unwrap(), 22.0);
        assert_eq!(oracle.clears, 2);
    }

    #[test]
    fn real_line_height_prefers_declared_when_larger() {
        let mut oracle = FixedLine {
            probed: 18.0,
            clears: 0,
        };
        let style = BoxStyle::new().line_height(24.0);
        assert_eq!(real_line_height(&mut oracle, &style).unwrap(), 24.0);
    }

    #[test]
    fn measure_is_idempotent() {
        let mut oracle = FixedLine {
            probed: 19.6,
            clears: 0,
        };
        let style = BoxStyle::new().padding(2.0, 2.0);
        let a = LineBudget::measure(&mut oracle, &style, 3).unwrap();
        let b = LineBudget::measure(&mut oracle, &style, 3).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.max_height(), 19.0 * 4.0 + 4.0);
    }

    #[test]
    fn measure_propagates_oracle_failure() {
        let mut oracle = FixedLine {
            probed: -1.0,
            clears: 0,
        };
        let err = LineBudget::measure(&mut oracle, &BoxStyle::new(), 2).unwrap_err();
        assert_eq!(err.kind(), crate::error::OracleErrorKind::Measure);
        assert_eq!(oracle.clears, 2);
    }
}
