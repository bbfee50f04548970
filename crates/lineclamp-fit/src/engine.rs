#![forbid(unsafe_code)]

//! Fitting search: the longest content prefix that renders under a budget.
//!
//! # Algorithm
//!
//! 1. **Whole-content check.** Render content + trailer. If it fits, return
//!    it untouched. This is the common case and costs one measurement.
//! 2. **Node scan.** Otherwise start from an empty prefix followed by the
//!    ellipsis and the full trailer, and add measurable nodes in order:
//!    - an atom is kept whole if the probe still fits, else the scan stops;
//!    - a text run is binary-searched over its grapheme count for the
//!      longest fitting prefix. A run that fits completely is kept and the
//!      scan continues; a shorter prefix is the cut and the scan stops.
//!
//!    A scan that runs out of nodes without a cut ends
//!    [`FitOutcome::Exhausted`]: the ellipsis and trailer alone overflow.
//!
//! The binary search narrows `[lo, hi]` until the bounds are adjacent, then
//! re-measures downward from `hi` to `lo` and keeps the first length that
//! fits. That scan absorbs renderers whose height is not quite monotonic
//! in text length at the boundary. Length 0 always "fits".
//!
//! # Cost
//!
//! `O(n log m)` measurements for `n` nodes of average length `m`. The loop
//! is iterative; stack depth does not grow with text length.
//!
//! # Invariants
//!
//! - `ellipsis == false` ⇒ `content` is the input and `text` its full
//!   serialization.
//! - `ellipsis == true` ⇒ `content` is a prefix of the input followed by a
//!   [`Node::Ellipsis`]. The prefix is strict unless the outcome is
//!   [`FitOutcome::Exhausted`].
//! - The trailer is returned unmodified in every result.
//! - The probe is cleared on every exit path, errors included.

use std::borrow::Cow;

use lineclamp_text::{Content, Node, grapheme_count, grapheme_prefix};
use smallvec::SmallVec;
use tracing::{debug, debug_span};

use crate::budget::LineBudget;
use crate::error::{FitError, OracleError};
use crate::oracle::{Candidate, MeasurementOracle, ProbeScope};

/// Terminal state of a fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FitOutcome {
    /// The whole content fits; nothing was truncated.
    Fits,
    /// A cut point was found; at least one node or grapheme was kept.
    CutFound,
    /// Not even the first node fits next to the ellipsis and trailer.
    NothingFits,
    /// Every node was accepted without a cut; the ellipsis and trailer
    /// alone push the content over budget. Nothing was omitted.
    Exhausted,
}

impl FitOutcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fits => "fits",
            Self::CutFound => "cut_found",
            Self::NothingFits => "nothing_fits",
            Self::Exhausted => "exhausted",
        }
    }
}

/// Result of a fit.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult<'a> {
    /// Original content, or the kept prefix followed by the ellipsis node.
    pub content: Content<'a>,
    /// Serialization of the probe's final state.
    pub text: String,
    /// Whether the content was truncated.
    pub ellipsis: bool,
    /// The trailer, always carried through unchanged.
    pub trailer: SmallVec<[Node<'a>; 2]>,
    /// Terminal state of the search.
    pub outcome: FitOutcome,
    /// Height measurements spent on this fit.
    pub measurements: usize,
}

impl<'a> FitResult<'a> {
    /// Kept nodes without the injected ellipsis.
    #[must_use]
    pub fn kept_nodes(&self) -> &[Node<'a>] {
        match self.content.nodes().split_last() {
            Some((Node::Ellipsis(_), kept)) if self.ellipsis => kept,
            _ => self.content.nodes(),
        }
    }

    /// Grapheme clusters kept across text runs.
    #[must_use]
    pub fn kept_graphemes(&self) -> usize {
        self.kept_nodes()
            .iter()
            .filter_map(Node::as_text)
            .map(grapheme_count)
            .sum()
    }

    /// Kept content, ellipsis and trailer, in display order.
    #[must_use]
    pub fn display_content(&self) -> Content<'a> {
        let mut content = self.content.clone();
        content.extend(self.trailer.iter().cloned());
        content
    }
}

/// Scan state shared by every probe of one fit.
struct Scan<'s, 'a> {
    ellipsis: &'s str,
    trailer: &'s [Node<'a>],
    budget: LineBudget,
    kept: Vec<Node<'a>>,
}

impl<'a> Scan<'_, 'a> {
    fn fits<O>(&self, probe: &mut ProbeScope<'_, O>) -> Result<bool, OracleError>
    where
        O: MeasurementOracle + ?Sized,
    {
        let candidate = Candidate::new(&self.kept, Some(self.ellipsis), self.trailer);
        probe.fits(&candidate, self.budget)
    }

    /// Longest fitting grapheme prefix of `text`, which has `len > 0` clusters.
    fn fitting_prefix<O>(
        &mut self,
        probe: &mut ProbeScope<'_, O>,
        text: &Cow<'a, str>,
        len: usize,
    ) -> Result<usize, OracleError>
    where
        O: MeasurementOracle + ?Sized,
    {
        self.kept.push(Node::Text(Cow::Borrowed("")));
        let result = self.search_prefix(probe, text, len);
        self.kept.pop();
        result
    }

    fn search_prefix<O>(
        &mut self,
        probe: &mut ProbeScope<'_, O>,
        text: &Cow<'a, str>,
        len: usize,
    ) -> Result<usize, OracleError>
    where
        O: MeasurementOracle + ?Sized,
    {
        let mut lo = 0;
        let mut hi = len;
        while lo + 1 < hi {
            let mid = lo + (hi - lo) / 2;
            if self.prefix_fits(probe, text, mid)? {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        for step in (lo..=hi).rev() {
            if step == 0 || self.prefix_fits(probe, text, step)? {
                return Ok(step);
            }
        }
        Ok(0)
    }

    fn prefix_fits<O>(
        &mut self,
        probe: &mut ProbeScope<'_, O>,
        text: &Cow<'a, str>,
        count: usize,
    ) -> Result<bool, OracleError>
    where
        O: MeasurementOracle + ?Sized,
    {
        if let Some(last) = self.kept.last_mut() {
            *last = Node::Text(cow_prefix(text, count));
        }
        self.fits(probe)
    }
}

/// Grapheme prefix that keeps borrowing when the source borrows.
fn cow_prefix<'a>(text: &Cow<'a, str>, count: usize) -> Cow<'a, str> {
    match text {
        Cow::Borrowed(s) => Cow::Borrowed(grapheme_prefix(s, count)),
        Cow::Owned(s) => Cow::Owned(grapheme_prefix(s, count).to_owned()),
    }
}

/// Fit `content` plus `trailer` under `budget`, truncating with `ellipsis`.
///
/// Overflow is never an error. The only failure is an oracle that cannot
/// render, measure or serialize.
///
/// # Example
/// ```
/// use lineclamp_fit::{CellProbe, FitOutcome, LineBudget, fit};
/// use lineclamp_text::Content;
///
/// // 10 columns, rows of height 1: two rows are allowed under 3.0
/// let mut probe = CellProbe::new(10, 1.0);
/// let content = Content::raw("the quick brown fox jumps");
/// let result = fit(&mut probe, &content, &[], LineBudget::from_height(3.0), "...").unwrap();
///
/// assert!(result.ellipsis);
/// assert_eq!(result.outcome, FitOutcome::CutFound);
/// assert_eq!(result.content.plain_text(), "the quick brown f...");
/// ```
pub fn fit<'a, O>(
    oracle: &mut O,
    content: &Content<'a>,
    trailer: &[Node<'a>],
    budget: LineBudget,
    ellipsis: &str,
) -> Result<FitResult<'a>, FitError>
where
    O: MeasurementOracle + ?Sized,
{
    let _span = debug_span!(
        "fit",
        nodes = content.len(),
        trailer = trailer.len(),
        budget = budget.max_height()
    )
    .entered();

    let mut probe = ProbeScope::acquire(oracle);

    let whole = Candidate::new(content.nodes(), None, trailer);
    if probe.fits(&whole, budget)? {
        let text = probe.serialize()?;
        debug!(
            outcome = FitOutcome::Fits.as_str(),
            measurements = probe.measurements(),
            "fit complete"
        );
        return Ok(FitResult {
            content: content.clone(),
            text,
            ellipsis: false,
            trailer: trailer.iter().cloned().collect(),
            outcome: FitOutcome::Fits,
            measurements: probe.measurements(),
        });
    }

    let mut scan = Scan {
        ellipsis,
        trailer,
        budget,
        kept: Vec::with_capacity(content.len()),
    };

    let mut cut = false;
    for node in content.measurable_nodes() {
        match node {
            Node::Text(text) => {
                let len = grapheme_count(text);
                if len == 0 {
                    continue;
                }
                let fitted = scan.fitting_prefix(&mut probe, text, len)?;
                if fitted == len {
                    scan.kept.push(node.clone());
                    continue;
                }
                if fitted > 0 {
                    scan.kept.push(Node::Text(cow_prefix(text, fitted)));
                }
                cut = true;
                break;
            }
            Node::Opaque(_) | Node::Ellipsis(_) => {
                scan.kept.push(node.clone());
                if scan.fits(&mut probe)? {
                    continue;
                }
                scan.kept.pop();
                cut = true;
                break;
            }
            Node::Marker => {}
        }
    }

    let outcome = match (cut, scan.kept.is_empty()) {
        (false, _) => FitOutcome::Exhausted,
        (true, true) => FitOutcome::NothingFits,
        (true, false) => FitOutcome::CutFound,
    };

    let final_candidate = Candidate::new(&scan.kept, Some(ellipsis), trailer);
    probe.render(&final_candidate)?;
    let text = probe.serialize()?;

    let measurements = probe.measurements();
    debug!(
        outcome = outcome.as_str(),
        kept_nodes = scan.kept.len(),
        measurements,
        "fit complete"
    );

    let mut kept = scan.kept;
    kept.push(Node::Ellipsis(Cow::Owned(ellipsis.to_owned())));

    Ok(FitResult {
        content: Content::from_nodes(kept),
        text,
        ellipsis: true,
        trailer: trailer.iter().cloned().collect(),
        outcome,
        measurements,
    })
}
