#![forbid(unsafe_code)]

//! Line-clamp ellipsis controller.
//!
//! [`Ellipsis`] owns a block of content and keeps a measured truncation of
//! it in sync with the rows it may occupy. Hosts forward lifecycle events
//! (mount, content and row changes, resizes) and call
//! [`Ellipsis::on_frame`] once per frame. Refits are coalesced so a resize
//! burst costs a single fit.
//!
//! A sync is skipped when clamping is off (`rows == 0`), after the user
//! expanded the block, before mount, or when the host renderer can clamp
//! natively. Measurement always reserves room for the suffix and the
//! expand control, so showing the control never pushes content past the
//! last row.
//!
//! # Example
//! ```
//! use lineclamp_fit::{BoxStyle, CellProbe};
//! use lineclamp_widgets::{Ellipsis, EllipsisConfig};
//!
//! let config = EllipsisConfig::new().rows(1).expandable(true).expand_label("+");
//! let mut block = Ellipsis::new("a fairly long sentence", config);
//! let mut probe = CellProbe::new(12, 1.0);
//!
//! block.mount();
//! block.on_frame(&mut probe, &BoxStyle::new()).unwrap();
//!
//! assert!(block.is_ellipsis());
//! assert_eq!(block.render().plain_text(), "a fair...+");
//!
//! block.expand();
//! assert_eq!(block.render().plain_text(), "a fairly long sentence");
//! ```

use std::fmt;

use lineclamp_fit::{BoxStyle, FitError, LineBudget, MeasurementOracle, fit};
use lineclamp_text::{Atom, Content, Node};

use crate::config::EllipsisConfig;
use crate::native::NativeClamp;
use crate::refit::{RefitReason, RefitTrigger};

/// The last accepted measurement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClampState {
    /// Kept prefix, without the ellipsis.
    pub kept: Content<'static>,
    /// Probe serialization of the accepted fit.
    pub text: String,
    /// Whether the accepted fit truncated the content.
    pub ellipsis: bool,
}

type EllipsisCallback = Box<dyn FnMut(bool)>;
type ExpandCallback = Box<dyn FnMut()>;

/// A clamped block of content.
pub struct Ellipsis {
    config: EllipsisConfig,
    native: NativeClamp,
    content: Content<'static>,
    state: ClampState,
    expanded: bool,
    mounted: bool,
    refit: RefitTrigger,
    on_ellipsis: Option<EllipsisCallback>,
    on_expand: Option<ExpandCallback>,
}

impl fmt::Debug for Ellipsis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ellipsis")
            .field("config", &self.config)
            .field("native", &self.native)
            .field("content", &self.content)
            .field("state", &self.state)
            .field("expanded", &self.expanded)
            .field("mounted", &self.mounted)
            .field("refit", &self.refit)
            .finish_non_exhaustive()
    }
}

impl Ellipsis {
    #[must_use]
    pub fn new(content: impl Into<Content<'static>>, config: EllipsisConfig) -> Self {
        Self {
            config,
            native: NativeClamp::empty(),
            content: content.into(),
            state: ClampState::default(),
            expanded: false,
            mounted: false,
            refit: RefitTrigger::new(),
            on_ellipsis: None,
            on_expand: None,
        }
    }

    /// Declare what the host renderer clamps natively.
    #[must_use]
    pub fn native(mut self, native: NativeClamp) -> Self {
        self.native = native;
        self
    }

    /// Called with the new flag whenever truncation turns on or off.
    #[must_use]
    pub fn on_ellipsis(mut self, callback: impl FnMut(bool) + 'static) -> Self {
        self.on_ellipsis = Some(Box::new(callback));
        self
    }

    /// Called once when the user expands the block.
    #[must_use]
    pub fn on_expand(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_expand = Some(Box::new(callback));
        self
    }

    // --- Lifecycle -------------------------------------------------------

    /// Attach to the host. Schedules the first fit.
    pub fn mount(&mut self) {
        self.mounted = true;
        self.schedule(RefitReason::Mount);
    }

    /// Detach from the host and drop any pending refit.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.refit.cancel();
    }

    pub fn set_content(&mut self, content: impl Into<Content<'static>>) {
        let content = content.into();
        if content == self.content {
            return;
        }
        self.content = content;
        self.schedule(RefitReason::ContentChanged);
    }

    pub fn set_rows(&mut self, rows: u32) {
        if rows == self.config.rows {
            return;
        }
        self.config.rows = rows;
        self.schedule(RefitReason::RowsChanged);
    }

    /// The host box changed size.
    pub fn resize(&mut self) {
        self.schedule(RefitReason::Resized);
    }

    fn schedule(&mut self, reason: RefitReason) {
        if self.mounted && !self.can_use_native() {
            self.refit.request(reason);
        }
    }

    /// Run the refit due this frame, if any.
    ///
    /// Returns the reason of the refit that ran.
    pub fn on_frame<O>(
        &mut self,
        oracle: &mut O,
        style: &BoxStyle,
    ) -> Result<Option<RefitReason>, FitError>
    where
        O: MeasurementOracle + ?Sized,
    {
        let Some(reason) = self.refit.take_due() else {
            return Ok(None);
        };
        #[cfg(feature = "tracing")]
        tracing::trace!(reason = reason.as_str(), "refit due");
        self.sync(oracle, style)?;
        Ok(Some(reason))
    }

    /// Measure now and accept the result if it differs from the current one.
    ///
    /// Returns whether the accepted state changed.
    pub fn sync<O>(&mut self, oracle: &mut O, style: &BoxStyle) -> Result<bool, FitError>
    where
        O: MeasurementOracle + ?Sized,
    {
        let rows = self.config.rows;
        if rows == 0 || self.expanded || !self.mounted || self.can_use_native() {
            return Ok(false);
        }

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("ellipsis_sync", rows, nodes = self.content.len()).entered();

        let budget = LineBudget::measure(oracle, style, rows)?;
        let trailer = self.measure_trailer();
        let result = fit(oracle, &self.content, &trailer, budget, &self.config.ellipsis)?;

        if result.text == self.state.text && result.ellipsis == self.state.ellipsis {
            return Ok(false);
        }

        let flipped = result.ellipsis != self.state.ellipsis;
        self.state = ClampState {
            kept: Content::from_nodes(result.kept_nodes().to_vec()),
            text: result.text,
            ellipsis: result.ellipsis,
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(ellipsis = self.state.ellipsis, flipped, "clamp state updated");

        if flipped && let Some(callback) = self.on_ellipsis.as_mut() {
            callback(self.state.ellipsis);
        }
        Ok(true)
    }

    /// Show the full content from now on.
    pub fn expand(&mut self) {
        if self.expanded {
            return;
        }
        self.expanded = true;
        self.refit.cancel();
        if let Some(callback) = self.on_expand.as_mut() {
            callback();
        }
    }

    // --- Output ----------------------------------------------------------

    /// Content to display.
    ///
    /// Truncated: the kept prefix, a hidden ellipsis span titled with the
    /// remaining text, the suffix, then the expand control when enabled.
    /// Otherwise: the full content followed by the suffix.
    #[must_use]
    pub fn render(&self) -> Content<'static> {
        if !self.is_ellipsis() {
            let mut out = self.content.clone();
            self.push_suffix(&mut out);
            return out;
        }

        let mut out = self.state.kept.clone();
        out.push(
            Atom::new("span", self.config.ellipsis.clone())
                .with_title(self.rest_text())
                .hidden(true),
        );
        self.push_suffix(&mut out);
        if self.config.expandable {
            out.push(self.expand_control());
        }
        out
    }

    fn push_suffix(&self, out: &mut Content<'static>) {
        if !self.config.suffix.is_empty() {
            out.push(Node::text(self.config.suffix.clone()));
        }
    }

    fn expand_control(&self) -> Node<'static> {
        Node::opaque(Atom::new("a", self.config.expand_label.clone()))
    }

    /// Suffix and expand control, always reserved while measuring.
    fn measure_trailer(&self) -> Vec<Node<'static>> {
        let mut trailer = Vec::with_capacity(2);
        if !self.config.suffix.is_empty() {
            trailer.push(Node::text(self.config.suffix.clone()));
        }
        trailer.push(self.expand_control());
        trailer
    }

    /// Plain text cut off by the accepted fit.
    fn rest_text(&self) -> String {
        let full = self.content.plain_text();
        let kept = self.state.kept.plain_text();
        match full.strip_prefix(kept.as_str()) {
            Some(rest) => rest.to_owned(),
            None => full,
        }
    }

    // --- Accessors -------------------------------------------------------

    /// Whether the displayed content is currently truncated.
    #[must_use]
    pub fn is_ellipsis(&self) -> bool {
        self.state.ellipsis && !self.expanded && self.config.rows > 0 && !self.can_use_native()
    }

    #[must_use]
    pub const fn is_expanded(&self) -> bool {
        self.expanded
    }

    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Whether the host clamps natively, skipping measurement.
    #[must_use]
    pub fn can_use_native(&self) -> bool {
        self.native.can_clamp(self.config.rows, self.config.expandable)
    }

    #[must_use]
    pub const fn config(&self) -> &EllipsisConfig {
        &self.config
    }

    #[must_use]
    pub const fn content(&self) -> &Content<'static> {
        &self.content
    }

    #[must_use]
    pub const fn state(&self) -> &ClampState {
        &self.state
    }

    #[must_use]
    pub const fn refit(&self) -> &RefitTrigger {
        &self.refit
    }
}
