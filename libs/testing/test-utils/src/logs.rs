use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// One recorded event.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: String,
    pub fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// `tracing` layer that records every event emitted on one target.
///
/// [`install`](Self::install) makes it the thread-local default subscriber, which covers
/// everything polled by a current-thread `#[tokio::test]` runtime.
#[derive(Clone)]
pub struct LogCapture {
    target: &'static str,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl LogCapture {
    pub fn for_target(target: &'static str) -> Self {
        Self {
            target,
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Installs the capture for the current thread until the guard drops.
    pub fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::set_default(subscriber)
    }

    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target() != self.target {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let captured = CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.fields.remove("message").unwrap_or_default(),
            fields: visitor.fields,
        };

        if let Ok(mut events) = self.events.lock() {
            events.push(captured);
        }
    }
}

#[derive(Default)]
struct FieldVisitor {
    fields: BTreeMap<String, String>,
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.fields
            .insert(field.name().to_string(), format!("{value:?}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captures_only_its_target() {
        let capture = LogCapture::for_target("timing");
        let _guard = capture.install();

        tracing::info!(target: "timing", elapsed_ms = 3u64, signature = "A::b", "took {} ms", 3);
        tracing::info!(target: "other", "ignored");

        let events = capture.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, Level::INFO);
        assert_eq!(events[0].message, "took 3 ms");
        assert_eq!(events[0].field("elapsed_ms"), Some("3"));
        assert_eq!(events[0].field("signature"), Some("A::b"));
    }

    #[test]
    fn test_clear() {
        let capture = LogCapture::for_target("timing");
        let _guard = capture.install();

        tracing::warn!(target: "timing", "one");
        assert!(!capture.is_empty());
        capture.clear();
        assert!(capture.is_empty());
    }
}
