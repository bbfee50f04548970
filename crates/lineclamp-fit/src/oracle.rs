#![forbid(unsafe_code)]

//! Measurement oracle capability and the scoped probe that drives it.
//!
//! The fitting engine knows nothing about layout. It renders a
//! [`Candidate`] into an off-screen probe, asks for its height, and
//! repeats. A [`MeasurementOracle`] is whatever can answer that: a browser
//! layout engine behind FFI, a terminal cell grid ([`CellProbe`](crate::CellProbe)),
//! or a deterministic fake in tests.
//!
//! # Ownership
//!
//! The probe is a single scratch surface. [`ProbeScope`] holds `&mut` to
//! the oracle for the whole fit, so two fits can never interleave probe
//! mutations, and clears the probe on drop on every exit path.

use lineclamp_text::Node;
use tracing::trace;

use crate::budget::{BoxStyle, LineBudget};
use crate::error::OracleError;

/// What gets rendered into the probe: content, then an optional ellipsis
/// glyph, then the trailer.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'c> {
    pub content: &'c [Node<'c>],
    pub ellipsis: Option<&'c str>,
    pub trailer: &'c [Node<'c>],
}

impl<'c> Candidate<'c> {
    #[must_use]
    pub const fn new(
        content: &'c [Node<'c>],
        ellipsis: Option<&'c str>,
        trailer: &'c [Node<'c>],
    ) -> Self {
        Self {
            content,
            ellipsis,
            trailer,
        }
    }

    /// Markup for the whole candidate, as a probe serializes it.
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for node in self.content {
            node.write_markup(&mut out);
        }
        if let Some(ellipsis) = self.ellipsis {
            Node::ellipsis(ellipsis).write_markup(&mut out);
        }
        for node in self.trailer {
            node.write_markup(&mut out);
        }
        out
    }
}

/// Render-and-measure capability supplied by the host.
///
/// Implementations must keep the probe isolated from anything the user
/// sees. Calls are strictly sequential.
pub trait MeasurementOracle {
    /// Replace the probe's contents with `candidate`.
    fn render(&mut self, candidate: &Candidate<'_>) -> Result<(), OracleError>;

    /// Rendered height of the probe's current contents.
    fn height(&self) -> Result<f64, OracleError>;

    /// Serialized form of the probe's current contents.
    fn serialize(&self) -> Result<String, OracleError>;

    /// Empty the probe. Must be infallible and idempotent.
    fn clear(&mut self);

    /// Rendered height of one line of placeholder text laid out with `style`.
    fn line_height(&mut self, style: &BoxStyle) -> Result<f64, OracleError>;
}

impl<O: MeasurementOracle + ?Sized> MeasurementOracle for &mut O {
    fn render(&mut self, candidate: &Candidate<'_>) -> Result<(), OracleError> {
        (**self).render(candidate)
    }

    fn height(&self) -> Result<f64, OracleError> {
        (**self).height()
    }

    fn serialize(&self) -> Result<String, OracleError> {
        (**self).serialize()
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn line_height(&mut self, style: &BoxStyle) -> Result<f64, OracleError> {
        (**self).line_height(style)
    }
}

/// Exclusive, self-cleaning use of an oracle's probe.
pub struct ProbeScope<'o, O: MeasurementOracle + ?Sized> {
    oracle: &'o mut O,
    measurements: usize,
}

impl<'o, O: MeasurementOracle + ?Sized> ProbeScope<'o, O> {
    /// Take the probe. Any stale contents are cleared first.
    pub fn acquire(oracle: &'o mut O) -> Self {
        oracle.clear();
        Self {
            oracle,
            measurements: 0,
        }
    }

    /// Render `candidate` without measuring it.
    pub fn render(&mut self, candidate: &Candidate<'_>) -> Result<(), OracleError> {
        self.oracle.render(candidate)
    }

    /// Render `candidate` and return its height.
    pub fn measure(&mut self, candidate: &Candidate<'_>) -> Result<f64, OracleError> {
        self.oracle.render(candidate)?;
        let height = self.oracle.height()?;
        self.measurements += 1;
        Ok(height)
    }

    /// Render `candidate` and report whether it stays under `budget`.
    pub fn fits(&mut self, candidate: &Candidate<'_>, budget: LineBudget) -> Result<bool, OracleError> {
        let height = self.measure(candidate)?;
        let fits = budget.fits(height);
        trace!(
            height,
            budget = budget.max_height(),
            fits,
            measurement = self.measurements,
            "probe measured"
        );
        Ok(fits)
    }

    pub fn line_height(&mut self, style: &BoxStyle) -> Result<f64, OracleError> {
        self.measurements += 1;
        self.oracle.line_height(style)
    }

    pub fn serialize(&self) -> Result<String, OracleError> {
        self.oracle.serialize()
    }

    /// Height queries issued through this scope so far.
    #[must_use]
    pub const fn measurements(&self) -> usize {
        self.measurements
    }
}

impl<O: MeasurementOracle + ?Sized> Drop for ProbeScope<'_, O> {
    fn drop(&mut self) {
        self.oracle.clear();
    }
}
