#![forbid(unsafe_code)]

//! Terminal cell-grid measurement oracle.
//!
//! [`CellProbe`] lays candidates out into a grid `columns` cells wide and
//! reports `rows * row_height`. It is a real renderer for terminal hosts and
//! a deterministic oracle for tests.
//!
//! Layout rules:
//! - text wraps at grapheme boundaries; a cluster never straddles rows
//! - wide glyphs (CJK, most emoji) take two cells
//! - `\n` forces a row break
//! - an atom renders as an unbreakable `[label]` box; a box wider than the
//!   grid gets a row of its own and is clipped
//! - markers render nothing
//!
//! # Example
//! ```
//! use lineclamp_fit::{Candidate, CellProbe, MeasurementOracle};
//! use lineclamp_text::Node;
//!
//! let mut probe = CellProbe::new(5, 2.0);
//! let content = [Node::text("hello world")];
//! probe.render(&Candidate::new(&content, None, &[])).unwrap();
//! assert_eq!(probe.lines(), ["hello", " worl", "d"]);
//! assert_eq!(probe.height().unwrap(), 6.0);
//! ```

use lineclamp_text::{Node, WidthCache, graphemes};

use crate::budget::BoxStyle;
use crate::error::OracleError;
use crate::oracle::{Candidate, MeasurementOracle};

/// Cell-grid oracle.
#[derive(Debug)]
pub struct CellProbe {
    columns: usize,
    row_height: f64,
    widths: WidthCache,
    lines: Vec<String>,
    markup: String,
    rendered: bool,
    renders: usize,
    fail_after: Option<usize>,
}

impl CellProbe {
    /// Grid `columns` cells wide (minimum 1) with rows `row_height` tall.
    #[must_use]
    pub fn new(columns: usize, row_height: f64) -> Self {
        Self {
            columns: columns.max(1),
            row_height,
            widths: WidthCache::default(),
            lines: Vec::new(),
            markup: String::new(),
            rendered: false,
            renders: 0,
            fail_after: None,
        }
    }

    /// Fail every render after the first `renders` succeed.
    #[must_use]
    pub fn fail_after(mut self, renders: usize) -> Self {
        self.fail_after = Some(renders);
        self
    }

    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Change the grid width (a host resize).
    pub fn set_columns(&mut self, columns: usize) {
        self.columns = columns.max(1);
    }

    /// Rows produced by the last render.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Renders performed since construction.
    #[must_use]
    pub const fn renders(&self) -> usize {
        self.renders
    }

    /// Whether the probe currently holds a rendered candidate.
    #[must_use]
    pub const fn is_rendered(&self) -> bool {
        self.rendered
    }

    #[must_use]
    pub fn width_cache(&self) -> &WidthCache {
        &self.widths
    }

    fn check_failure(&self) -> Result<(), OracleError> {
        match self.fail_after {
            Some(limit) if self.renders >= limit => Err(OracleError::render(format!(
                "cell grid unavailable after {limit} renders"
            ))),
            _ => Ok(()),
        }
    }
}

impl MeasurementOracle for CellProbe {
    fn render(&mut self, candidate: &Candidate<'_>) -> Result<(), OracleError> {
        self.check_failure()?;
        self.renders += 1;

        let mut flow = Flow::new(self.columns);
        for node in candidate.content {
            flow.push_node(node, &mut self.widths);
        }
        if let Some(e) = candidate.ellipsis {
            flow.push_text(e, &mut self.widths);
        }
        for node in candidate.trailer {
            flow.push_node(node, &mut self.widths);
        }
        self.lines = flow.finish();
        self.markup = candidate.serialize();
        self.rendered = true;
        Ok(())
    }

    fn height(&self) -> Result<f64, OracleError> {
        if !self.rendered {
            return Err(OracleError::measure("probe holds no rendered candidate"));
        }
        Ok(self.lines.len() as f64 * self.row_height)
    }

    fn serialize(&self) -> Result<String, OracleError> {
        if !self.rendered {
            return Err(OracleError::serialize("probe holds no rendered candidate"));
        }
        Ok(self.markup.clone())
    }

    fn clear(&mut self) {
        self.lines.clear();
        self.markup.clear();
        self.rendered = false;
    }

    fn line_height(&mut self, _style: &BoxStyle) -> Result<f64, OracleError> {
        self.check_failure()?;
        // Every grid row is one line box, whatever the declared style says.
        Ok(self.row_height)
    }
}

/// Row-filling state for one layout pass.
struct Flow {
    columns: usize,
    lines: Vec<String>,
    current: String,
    width: usize,
    open: bool,
}

impl Flow {
    fn new(columns: usize) -> Self {
        Self {
            columns,
            lines: Vec::new(),
            current: String::new(),
            width: 0,
            open: false,
        }
    }

    fn break_line(&mut self) {
        self.lines.push(std::mem::take(&mut self.current));
        self.width = 0;
    }

    fn push_node(&mut self, node: &Node<'_>, widths: &mut WidthCache) {
        match node {
            Node::Text(text) | Node::Ellipsis(text) => self.push_text(text, widths),
            Node::Opaque(atom) => {
                let width = widths.width(&atom.label) + 2;
                self.push_box(&format!("[{}]", atom.label), width);
            }
            Node::Marker => {}
        }
    }

    fn push_text(&mut self, text: &str, widths: &mut WidthCache) {
        for grapheme in graphemes(text) {
            if grapheme == "\n" || grapheme == "\r\n" {
                self.break_line();
                self.open = true;
                continue;
            }
            let width = widths.width(grapheme);
            if self.width + width > self.columns && self.width > 0 {
                self.break_line();
            }
            self.current.push_str(grapheme);
            self.width += width;
            self.open = true;
        }
    }

    fn push_box(&mut self, rendered: &str, width: usize) {
        if self.width + width > self.columns && self.width > 0 {
            self.break_line();
        }
        self.current.push_str(rendered);
        self.width += width;
        self.open = true;
        if self.width >= self.columns {
            self.break_line();
            self.open = false;
        }
    }

    fn finish(mut self) -> Vec<String> {
        if self.open {
            self.lines.push(self.current);
        }
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineclamp_text::Atom;

    fn rendered(probe: &mut CellProbe, content: &[Node<'_>], trailer: &[Node<'_>]) -> Vec<String> {
        probe
            .render(&Candidate::new(content, Some("..."), trailer))
            .unwrap();
        probe.lines().to_vec()
    }

    #[test]
    fn wraps_at_columns() {
        let mut probe = CellProbe::new(4, 1.0);
        probe
            .render(&Candidate::new(&[Node::text("abcdefghij")], None, &[]))
            .unwrap();
        assert_eq!(probe.lines(), ["abcd", "efgh", "ij"]);
        assert_eq!(probe.height().unwrap(), 3.0);
    }

    #[test]
    fn wide_glyphs_take_two_cells() {
        let mut probe = CellProbe::new(5, 1.0);
        probe
            .render(&Candidate::new(&[Node::text("测试测试")], None, &[]))
            .unwrap();
        assert_eq!(probe.lines(), ["测试", "测试"]);
    }

    #[test]
    fn newline_breaks_row() {
        let mut probe = CellProbe::new(10, 1.0);
        probe
            .render(&Candidate::new(&[Node::text("ab\ncd")], None, &[]))
            .unwrap();
        assert_eq!(probe.lines(), ["ab", "cd"]);
    }

    #[test]
    fn trailing_newline_opens_empty_row() {
        let mut probe = CellProbe::new(10, 1.0);
        probe
            .render(&Candidate::new(&[Node::text("ab\n")], None, &[]))
            .unwrap();
        assert_eq!(probe.lines(), ["ab", ""]);
    }

    #[test]
    fn atom_is_unbreakable() {
        let mut probe = CellProbe::new(8, 1.0);
        let content = [Node::text("abcde"), Node::opaque(Atom::new("a", "xyz"))];
        probe.render(&Candidate::new(&content, None, &[])).unwrap();
        assert_eq!(probe.lines(), ["abcde", "[xyz]"]);
    }

    #[test]
    fn oversized_atom_gets_own_row() {
        let mut probe = CellProbe::new(4, 1.0);
        let content = [
            Node::text("a"),
            Node::opaque(Atom::new("img", "picture")),
            Node::text("b"),
        ];
        probe.render(&Candidate::new(&content, None, &[])).unwrap();
        assert_eq!(probe.lines(), ["a", "[picture]", "b"]);
    }

    #[test]
    fn ellipsis_then_trailer() {
        let mut probe = CellProbe::new(20, 1.0);
        let lines = rendered(
            &mut probe,
            &[Node::text("abc")],
            &[Node::opaque(Atom::new("a", "Expand"))],
        );
        assert_eq!(lines, ["abc...[Expand]"]);
    }

    #[test]
    fn empty_candidate_has_no_rows() {
        let mut probe = CellProbe::new(20, 1.0);
        probe.render(&Candidate::new(&[], None, &[])).unwrap();
        assert!(probe.lines().is_empty());
        assert_eq!(probe.height().unwrap(), 0.0);
    }

    #[test]
    fn markers_render_nothing() {
        let mut probe = CellProbe::new(20, 1.0);
        probe
            .render(&Candidate::new(&[Node::Marker], None, &[]))
            .unwrap();
        assert!(probe.lines().is_empty());
    }

    #[test]
    fn height_requires_render() {
        let probe = CellProbe::new(20, 1.0);
        assert!(probe.height().is_err());
        assert!(probe.serialize().is_err());
    }

    #[test]
    fn clear_resets_probe() {
        let mut probe = CellProbe::new(20, 1.0);
        probe
            .render(&Candidate::new(&[Node::text("abc")], None, &[]))
            .unwrap();
        assert!(probe.is_rendered());
        probe.clear();
        assert!(!probe.is_rendered());
        assert!(probe.lines().is_empty());
    }

    #[test]
    fn serialize_reports_markup() {
        let mut probe = CellProbe::new(20, 1.0);
        probe
            .render(&Candidate::new(&[Node::text("a<b")], None, &[]))
            .unwrap();
        assert_eq!(probe.serialize().unwrap(), "a&lt;b");
    }

    #[test]
    fn line_height_is_one_row() {
        let mut probe = CellProbe::new(20, 16.0);
        assert_eq!(probe.line_height(&BoxStyle::new()).unwrap(), 16.0);
        assert_eq!(probe.line_height(&BoxStyle::new().line_height(0.0)).unwrap(), 16.0);
    }

    #[test]
    fn fail_after_limits_renders() {
        let mut probe = CellProbe::new(20, 1.0).fail_after(1);
        let content = [Node::text("abc")];
        assert!(probe.render(&Candidate::new(&content, None, &[])).is_ok());
        let err = probe
            .render(&Candidate::new(&content, None, &[]))
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::OracleErrorKind::Render);
    }

    #[test]
    fn widths_are_cached_across_renders() {
        let mut probe = CellProbe::new(20, 1.0);
        let content = [Node::text("éééé")];
        probe.render(&Candidate::new(&content, None, &[])).unwrap();
        probe.render(&Candidate::new(&content, None, &[])).unwrap();
        let stats = probe.width_cache().stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 7);
    }
}
