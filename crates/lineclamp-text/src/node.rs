#![forbid(unsafe_code)]

//! Content tree: the flat, ordered node sequence a fit operates on.
//!
//! A [`Content`] is a sequence of [`Node`]s. Text runs can be cut at any
//! grapheme boundary; [`Atom`]s (links, images, controls) are indivisible;
//! structural markers are carried through but never measured.
//!
//! # Example
//! ```
//! use lineclamp_text::{Atom, Content, Node};
//!
//! let content = Content::new()
//!     .with_text("see ")
//!     .with_atom(Atom::new("a", "docs"))
//!     .with_marker()
//!     .with_text(" for details");
//!
//! assert_eq!(content.plain_text(), "see docs for details");
//! assert_eq!(content.measurable_nodes().count(), 3);
//! assert_eq!(content.serialize(), "see <a>docs</a> for details");
//! ```

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::width::grapheme_count;

/// An indivisible inline element.
///
/// `label` is what a renderer shows. `title` is auxiliary text (a tooltip)
/// that is serialized as an attribute and never rendered inline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Atom<'a> {
    pub tag: Cow<'a, str>,
    pub label: Cow<'a, str>,
    pub title: Option<Cow<'a, str>>,
    /// Hidden from assistive technology (`aria-hidden`).
    pub hidden: bool,
}

impl<'a> Atom<'a> {
    #[must_use]
    pub fn new(tag: impl Into<Cow<'a, str>>, label: impl Into<Cow<'a, str>>) -> Self {
        Self {
            tag: tag.into(),
            label: label.into(),
            title: None,
            hidden: false,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<Cow<'a, str>>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    #[must_use]
    pub fn into_owned(self) -> Atom<'static> {
        Atom {
            tag: Cow::Owned(self.tag.into_owned()),
            label: Cow::Owned(self.label.into_owned()),
            title: self.title.map(|t| Cow::Owned(t.into_owned())),
            hidden: self.hidden,
        }
    }

    fn write_markup(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        if let Some(title) = &self.title {
            out.push_str(" title=\"");
            escape_into(title, out, true);
            out.push('"');
        }
        if self.hidden {
            out.push_str(" aria-hidden=\"true\"");
        }
        out.push('>');
        escape_into(&self.label, out, false);
        let _ = write!(out, "</{}>", self.tag);
    }
}

/// One unit of content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node<'a> {
    /// A text run, divisible at grapheme boundaries.
    Text(Cow<'a, str>),
    /// An atomic element: included or excluded whole.
    Opaque(Atom<'a>),
    /// Structural placeholder (e.g. a comment). Never measured.
    Marker,
    /// Ellipsis glyph injected by a truncating fit.
    Ellipsis(Cow<'a, str>),
}

impl<'a> Node<'a> {
    #[inline]
    #[must_use]
    pub fn text(s: impl Into<Cow<'a, str>>) -> Self {
        Self::Text(s.into())
    }

    #[inline]
    #[must_use]
    pub fn opaque(atom: Atom<'a>) -> Self {
        Self::Opaque(atom)
    }

    #[inline]
    #[must_use]
    pub fn ellipsis(s: impl Into<Cow<'a, str>>) -> Self {
        Self::Ellipsis(s.into())
    }

    /// Whether the node takes part in measurement.
    #[inline]
    #[must_use]
    pub const fn is_measurable(&self) -> bool {
        !matches!(self, Self::Marker)
    }

    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Text a reader sees for this node (atoms contribute their label).
    #[must_use]
    pub fn plain_text(&self) -> &str {
        match self {
            Self::Text(s) | Self::Ellipsis(s) => s.as_ref(),
            Self::Opaque(atom) => atom.label.as_ref(),
            Self::Marker => "",
        }
    }

    #[must_use]
    pub fn into_owned(self) -> Node<'static> {
        match self {
            Self::Text(s) => Node::Text(Cow::Owned(s.into_owned())),
            Self::Opaque(atom) => Node::Opaque(atom.into_owned()),
            Self::Marker => Node::Marker,
            Self::Ellipsis(s) => Node::Ellipsis(Cow::Owned(s.into_owned())),
        }
    }

    /// Append this node's markup to `out`.
    pub fn write_markup(&self, out: &mut String) {
        match self {
            Self::Text(s) => escape_into(s, out, false),
            Self::Opaque(atom) => atom.write_markup(out),
            Self::Marker => {}
            Self::Ellipsis(s) => {
                out.push_str("<span aria-hidden=\"true\">");
                escape_into(s, out, false);
                out.push_str("</span>");
            }
        }
    }
}

impl<'a> From<&'a str> for Node<'a> {
    fn from(s: &'a str) -> Self {
        Self::Text(Cow::Borrowed(s))
    }
}

impl From<String> for Node<'static> {
    fn from(s: String) -> Self {
        Self::Text(Cow::Owned(s))
    }
}

impl<'a> From<Atom<'a>> for Node<'a> {
    fn from(atom: Atom<'a>) -> Self {
        Self::Opaque(atom)
    }
}

/// An ordered sequence of nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Content<'a> {
    nodes: Vec<Node<'a>>,
}

impl<'a> Content<'a> {
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// A single text run.
    #[must_use]
    pub fn raw(text: impl Into<Cow<'a, str>>) -> Self {
        Self {
            nodes: vec![Node::Text(text.into())],
        }
    }

    #[must_use]
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node<'a>>) -> Self {
        Self {
            nodes: nodes.into_iter().collect(),
        }
    }

    pub fn push(&mut self, node: impl Into<Node<'a>>) {
        self.nodes.push(node.into());
    }

    pub fn extend(&mut self, nodes: impl IntoIterator<Item = Node<'a>>) {
        self.nodes.extend(nodes);
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<Cow<'a, str>>) -> Self {
        self.nodes.push(Node::Text(text.into()));
        self
    }

    #[must_use]
    pub fn with_atom(mut self, atom: Atom<'a>) -> Self {
        self.nodes.push(Node::Opaque(atom));
        self
    }

    #[must_use]
    pub fn with_marker(mut self) -> Self {
        self.nodes.push(Node::Marker);
        self
    }

    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[Node<'a>] {
        &self.nodes
    }

    #[must_use]
    pub fn into_nodes(self) -> Vec<Node<'a>> {
        self.nodes
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node<'a>> {
        self.nodes.iter()
    }

    /// Nodes that take part in measurement (markers filtered out).
    pub fn measurable_nodes(&self) -> impl Iterator<Item = &Node<'a>> {
        self.nodes.iter().filter(|n| n.is_measurable())
    }

    /// Markup serialization, in the form a probe reports it.
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.write_markup(&mut out);
        }
        out
    }

    /// Visible text with no markup.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.nodes.iter().map(Node::plain_text).collect()
    }

    /// Total grapheme clusters across text runs.
    #[must_use]
    pub fn text_graphemes(&self) -> usize {
        self.nodes
            .iter()
            .filter_map(Node::as_text)
            .map(grapheme_count)
            .sum()
    }

    /// Whether `self` reads as a prefix of `original`. Not strict: content
    /// is a prefix of itself. See [`Content::is_strict_prefix_of`].
    ///
    /// Markers, empty text runs and injected ellipsis nodes are ignored on
    /// both sides. Every
    /// kept node must equal its counterpart, except the last kept node which
    /// may be a text run that `original`'s run starts with.
    #[must_use]
    pub fn is_prefix_of(&self, original: &Content<'_>) -> bool {
        let kept: Vec<&Node<'a>> = self
            .measurable_nodes()
            .filter(|n| counts_for_prefix(n))
            .collect();
        let source: Vec<&Node<'_>> = original
            .measurable_nodes()
            .filter(|n| counts_for_prefix(n))
            .collect();

        if kept.len() > source.len() {
            return false;
        }

        let last = kept.len().saturating_sub(1);
        kept.iter().zip(&source).enumerate().all(|(idx, (k, s))| {
            if nodes_equal(k, s) {
                return true;
            }
            match (k, s) {
                (Node::Text(cut), Node::Text(full)) if idx == last => full.starts_with(&**cut),
                _ => false,
            }
        })
    }

    /// Whether `self` is a prefix of `original` that omits something
    /// visible. Equal content, or content differing only in markers and
    /// empty runs, is not a strict prefix.
    #[must_use]
    pub fn is_strict_prefix_of(&self, original: &Content<'_>) -> bool {
        self.is_prefix_of(original) && !original.is_prefix_of(self)
    }

    #[must_use]
    pub fn into_owned(self) -> Content<'static> {
        Content {
            nodes: self.nodes.into_iter().map(Node::into_owned).collect(),
        }
    }
}

/// Ellipses and empty runs carry no content of their own.
fn counts_for_prefix(node: &Node<'_>) -> bool {
    match node {
        Node::Ellipsis(_) => false,
        Node::Text(text) => !text.is_empty(),
        _ => true,
    }
}

fn nodes_equal(a: &Node<'_>, b: &Node<'_>) -> bool {
    match (a, b) {
        (Node::Text(x), Node::Text(y)) => x == y,
        (Node::Opaque(x), Node::Opaque(y)) => x == y,
        (Node::Marker, Node::Marker) => true,
        (Node::Ellipsis(x), Node::Ellipsis(y)) => x == y,
        _ => false,
    }
}

impl<'a> From<&'a str> for Content<'a> {
    fn from(s: &'a str) -> Self {
        Self::raw(s)
    }
}

impl From<String> for Content<'static> {
    fn from(s: String) -> Self {
        Self::raw(s)
    }
}

impl<'a> FromIterator<Node<'a>> for Content<'a> {
    fn from_iter<I: IntoIterator<Item = Node<'a>>>(iter: I) -> Self {
        Self::from_nodes(iter)
    }
}

impl<'a> IntoIterator for Content<'a> {
    type Item = Node<'a>;
    type IntoIter = std::vec::IntoIter<Node<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'c, 'a> IntoIterator for &'c Content<'a> {
    type Item = &'c Node<'a>;
    type IntoIter = std::slice::Iter<'c, Node<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

fn escape_into(text: &str, out: &mut String, attribute: bool) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
