// tests/tracing_sink_tests.rs - TracingSink through a capturing subscriber
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use logwhen::{field, filter_with_logs, SinkLevel, TracingSink};

#[derive(Clone, Debug)]
struct CapturedEvent {
    level: Level,
    target: String,
    fields: HashMap<String, String>,
}

struct FieldVisitor {
    fields: HashMap<String, String>,
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.fields
            .insert(field.name().to_string(), format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields
            .insert(field.name().to_string(), value.to_string());
    }
}

#[derive(Clone, Default)]
struct CaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CaptureLayer {
    fn sink_events(&self) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.target == "logwhen::sink")
            .cloned()
            .collect()
    }
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor {
            fields: HashMap::new(),
        };
        event.record(&mut visitor);

        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            fields: visitor.fields,
        });
    }
}

#[test]
fn test_tracing_sink_emits_rendered_message() {
    println!("=== Testing TracingSink event fields ===");

    let layer = CaptureLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    tracing::subscriber::with_default(subscriber, || {
        let sink = TracingSink::new("orders", SinkLevel::Warn);
        let kept: Vec<i32> = filter_with_logs(vec![50, 150, 300], |n: &i32| *n < 200)
            .log_when(|n: &i32| *n > 100, "large order: {}", [field(|n: &i32| *n)])
            .build(Some(sink))
            .unwrap()
            .collect();
        assert_eq!(kept, vec![50, 150]);
    });

    let events = layer.sink_events();
    assert_eq!(events.len(), 2);

    assert_eq!(events[0].level, Level::WARN);
    assert_eq!(events[0].fields["message"], "large order: 150");
    assert_eq!(events[0].fields["sink"], "orders");
    assert_eq!(events[0].fields["template"], "large order: {}");
    assert_eq!(events[1].fields["message"], "large order: 300");
    println!("✓ Two warn events with sink and template fields");
}

#[test]
fn test_tracing_sink_levels() {
    let layer = CaptureLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    tracing::subscriber::with_default(subscriber, || {
        for level in [
            SinkLevel::Trace,
            SinkLevel::Debug,
            SinkLevel::Info,
            SinkLevel::Warn,
            SinkLevel::Error,
        ] {
            let _: Vec<i32> = filter_with_logs(vec![1], |_: &i32| true)
                .log_when(|_: &i32| true, "at {}", [field(move |_: &i32| level.to_string())])
                .build(Some(TracingSink::new("levels", level)))
                .unwrap()
                .collect();
        }
    });

    let levels: Vec<Level> = layer.sink_events().iter().map(|e| e.level).collect();
    assert_eq!(
        levels,
        vec![Level::TRACE, Level::DEBUG, Level::INFO, Level::WARN, Level::ERROR]
    );
    assert_eq!(layer.sink_events()[2].fields["message"], "at info");
}
