//! Custom tracing layers for the folio shell
//!
//! [`ViewContextLayer`] attaches the active [`ViewContextGuard`] to every new
//! span, and [`jsonl_layer`] builds the JSON lines formatter used for both
//! console and file output.

use tracing::{Span, Subscriber, span};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::format::{Format, Json, JsonFields};
use tracing_subscriber::{
    layer::{Context, Layer},
    registry::LookupSpan,
};

use crate::config::JsonlConfig;
use crate::context::{ViewContextData, ViewContextGuard};

/// Layer that stores the active view context on each new span
#[derive(Debug, Default)]
pub struct ViewContextLayer;

impl ViewContextLayer {
    pub fn new() -> Self {
        Self
    }
}

/// Extension data stored on spans
#[derive(Debug, Clone)]
pub struct ViewContextExtension {
    pub data: ViewContextData,
}

impl<S> Layer<S> for ViewContextLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_new_span(&self, _attrs: &span::Attributes<'_>, id: &span::Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        // Inherit from the parent span when the guard was set on another thread
        let data = ViewContextGuard::current().or_else(|| {
            span.parent().and_then(|parent| {
                parent
                    .extensions()
                    .get::<ViewContextExtension>()
                    .map(|ext| ext.data.clone())
            })
        });
        if let Some(data) = data {
            span.extensions_mut().insert(ViewContextExtension { data });
        }
    }
}

/// Open a span that records the active view context as fields
///
/// JSON output lists span fields, so events inside this span carry
/// `view` and `session_id` in every line.
pub fn view_span() -> Span {
    match ViewContextGuard::current() {
        Some(ctx) => tracing::info_span!(
            "view",
            view = %ctx.view,
            session_id = %ctx.session_id
        ),
        None => tracing::info_span!("view"),
    }
}

/// JSON lines formatting layer writing to `writer`
pub fn jsonl_layer<S, W>(
    writer: W,
    config: &JsonlConfig,
) -> tracing_subscriber::fmt::Layer<S, JsonFields, Format<Json>, W>
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
    W: for<'writer> MakeWriter<'writer> + 'static,
{
    tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(config.current_span)
        .with_span_list(config.span_list)
        .flatten_event(config.flatten_fields)
        .with_file(config.source_location)
        .with_line_number(config.source_location)
        .with_thread_ids(config.threads)
        .with_thread_names(config.threads)
        .with_writer(writer)
}
