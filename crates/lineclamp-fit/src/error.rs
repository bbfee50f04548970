#![forbid(unsafe_code)]

//! Error types.
//!
//! Overflow, exact fits and the degenerate nothing-fits case are ordinary
//! [`FitOutcome`](crate::FitOutcome)s. The only error is a measurement
//! oracle that cannot render or measure at all; it is surfaced as-is and
//! never retried.

use std::fmt;

/// Which oracle capability failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OracleErrorKind {
    Render,
    Measure,
    Serialize,
}

impl OracleErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Render => "render",
            Self::Measure => "measure",
            Self::Serialize => "serialize",
        }
    }
}

/// The host rendering environment failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleError {
    kind: OracleErrorKind,
    message: String,
}

impl OracleError {
    #[must_use]
    pub fn new(kind: OracleErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn render(message: impl Into<String>) -> Self {
        Self::new(OracleErrorKind::Render, message)
    }

    #[must_use]
    pub fn measure(message: impl Into<String>) -> Self {
        Self::new(OracleErrorKind::Measure, message)
    }

    #[must_use]
    pub fn serialize(message: impl Into<String>) -> Self {
        Self::new(OracleErrorKind::Serialize, message)
    }

    #[must_use]
    pub const fn kind(&self) -> OracleErrorKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "probe {} failed: {}", self.kind.as_str(), self.message)
    }
}

impl std::error::Error for OracleError {}

/// Fatal precondition failure of a fit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FitError {
    /// The measurement oracle could not render, measure or serialize.
    Oracle(OracleError),
}

impl fmt::Display for FitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Oracle(err) => write!(f, "measurement oracle unavailable: {err}"),
        }
    }
}

impl std::error::Error for FitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Oracle(err) => Some(err),
        }
    }
}

impl From<OracleError> for FitError {
    fn from(err: OracleError) -> Self {
        Self::Oracle(err)
    }
}
