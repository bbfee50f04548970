#![forbid(unsafe_code)]

//! Truncation fitting for line-clamped rich content.
//!
//! Given content, a row count and a [`MeasurementOracle`], find the longest
//! content prefix that renders within the rows, followed by an ellipsis and
//! a fixed trailer (such as an expand control).
//!
//! - [`LineBudget`] - height budget from a real line height and padding
//! - [`fit`] - whole-content check, then node scan with per-run binary search
//! - [`ProbeScope`] - exclusive, self-cleaning use of the oracle's probe
//! - [`CellProbe`] - a terminal cell-grid oracle
//!
//! # Example
//! ```
//! use lineclamp_fit::{BoxStyle, CellProbe, LineBudget, fit};
//! use lineclamp_text::{Atom, Content, Node};
//!
//! let mut probe = CellProbe::new(12, 1.0);
//! let budget = LineBudget::measure(&mut probe, &BoxStyle::new(), 1).unwrap();
//! assert_eq!(budget.max_height(), 2.0);
//!
//! let content = Content::raw("a fairly long sentence");
//! let trailer = [Node::opaque(Atom::new("a", "+"))];
//! let result = fit(&mut probe, &content, &trailer, budget, "...").unwrap();
//!
//! assert!(result.ellipsis);
//! assert_eq!(result.content.plain_text(), "a fair...");
//! assert_eq!(result.display_content().plain_text(), "a fair...+");
//! ```

pub mod budget;
pub mod cells;
pub mod engine;
pub mod error;
pub mod oracle;

pub use budget::{BoxStyle, LineBudget, parse_px, real_line_height};
pub use cells::CellProbe;
pub use engine::{FitOutcome, FitResult, fit};
pub use error::{FitError, OracleError, OracleErrorKind};
pub use oracle::{Candidate, MeasurementOracle, ProbeScope};
