//! Bridge from process-wide tracing events to the dispatcher.

use std::cell::Cell;

use serde_json::Value;
use tracing::field::{Field, Visit};
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::layer::{Context as LayerContext, Layer};

use crate::context::{CallSite, RequestContext};
use crate::dispatcher::Dispatcher;
use crate::logger::{Context, Level};

const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

thread_local! {
    static FORWARDING: Cell<bool> = const { Cell::new(false) };
}

/// Forwards `WARN` and `ERROR` events of other crates to a dispatcher.
///
/// Installed automatically when `install_error_handler` is set and no global
/// subscriber exists yet; hosts with their own subscriber can add it to
/// their stack.
#[derive(Debug, Clone)]
pub struct DispatchLayer {
    dispatcher: Dispatcher,
}

impl DispatchLayer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

/// Whether an event belongs to the forwarded set.
pub fn forwards(metadata: &Metadata<'_>) -> bool {
    *metadata.level() <= tracing::Level::WARN && !metadata.target().starts_with(OWN_TARGET)
}

impl<S: Subscriber> Layer<S> for DispatchLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: LayerContext<'_, S>) {
        let metadata = event.metadata();
        if !forwards(metadata) || FORWARDING.with(Cell::get) {
            return;
        }
        FORWARDING.with(|f| f.set(true));

        let mut fields = FieldVisitor::default();
        event.record(&mut fields);
        fields
            .context
            .insert("target".to_string(), Value::from(metadata.target()));

        let site = CallSite::from_parts(metadata.file(), metadata.line());
        let request = RequestContext::current();
        self.dispatcher.log_with(
            Level::from(metadata.level()),
            fields.message.as_deref().unwrap_or_default(),
            Value::Object(fields.context),
            &site,
            request.as_ref(),
        );

        FORWARDING.with(|f| f.set(false));
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    context: Context,
}

impl FieldVisitor {
    fn put(&mut self, field: &Field, value: Value) {
        self.context.insert(field.name().to_string(), value);
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let text = format!("{value:?}");
        if field.name() == "message" {
            self.message = Some(text);
        } else {
            self.put(field, Value::from(text));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.put(field, Value::from(value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.put(field, Value::from(value));
    }
}
