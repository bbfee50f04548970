#![forbid(unsafe_code)]

//! Tracing integration tests.
//!
//! Fit spans (always on):
//!   cargo test -p lineclamp-widgets --test tracing_tests
//!
//! Controller spans:
//!   cargo test -p lineclamp-widgets --features tracing --test tracing_tests

use std::sync::{Arc, Mutex};

use lineclamp_fit::{BoxStyle, CellProbe};
use lineclamp_widgets::{Ellipsis, EllipsisConfig};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedSpan {
    name: String,
    parent_name: Option<String>,
}

struct SpanCapture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
}

impl<S> tracing_subscriber::Layer<S> for SpanCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let parent_name = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span_ref| span_ref.name().to_string());

        self.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            parent_name,
        });
    }
}

fn with_captured_spans<F>(f: F) -> Vec<CapturedSpan>
where
    F: FnOnce(),
{
    let spans = Arc::new(Mutex::new(Vec::new()));
    let layer = SpanCapture {
        spans: Arc::clone(&spans),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let captured = spans.lock().unwrap().clone();
    captured
}

fn run_one_refit() {
    let mut block = Ellipsis::new(
        "the quick brown fox jumps over the lazy dog",
        EllipsisConfig::new().rows(2),
    );
    block.mount();
    let mut probe = CellProbe::new(16, 1.0);
    block.on_frame(&mut probe, &BoxStyle::new()).unwrap();
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn refit_emits_budget_and_fit_spans() {
    let spans = with_captured_spans(run_one_refit);
    let names: Vec<&str> = spans.iter().map(|s| s.name.as_str()).collect();

    let budget = names.iter().position(|n| *n == "line_budget");
    let fit = names.iter().position(|n| *n == "fit");
    assert!(budget.is_some(), "missing line_budget span: {names:?}");
    assert!(fit.is_some(), "missing fit span: {names:?}");
    assert!(budget < fit, "budget must be measured before fitting");
}

#[test]
fn idle_frame_emits_nothing() {
    let spans = with_captured_spans(|| {
        let mut block = Ellipsis::new("text", EllipsisConfig::new());
        let mut probe = CellProbe::new(16, 1.0);
        block.on_frame(&mut probe, &BoxStyle::new()).unwrap();
    });
    assert!(spans.is_empty(), "{spans:?}");
}

#[test]
#[cfg(feature = "tracing")]
fn fit_nests_under_sync_span() {
    let spans = with_captured_spans(run_one_refit);

    assert!(spans.iter().any(|s| s.name == "ellipsis_sync"));
    for span in spans.iter().filter(|s| s.name == "fit" || s.name == "line_budget") {
        assert_eq!(span.parent_name.as_deref(), Some("ellipsis_sync"), "{span:?}");
    }
}

#[test]
#[cfg(not(feature = "tracing"))]
fn controller_spans_compiled_out() {
    let spans = with_captured_spans(run_one_refit);
    assert!(spans.iter().all(|s| s.name != "ellipsis_sync"));
    assert!(spans.iter().all(|s| s.parent_name.is_none()), "{spans:?}");
}
