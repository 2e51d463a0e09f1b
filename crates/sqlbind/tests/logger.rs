//! Bind diagnostics, through both the tracing observer and a custom one.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex},
};

use sqlbind::{BindEvent, BindObserver, LevelFilter, NopObserver, Options, ParameterKind};
use time::macros::datetime;
use tracing::{
    Event, Level, Metadata, Subscriber, dispatcher,
    field::{Field, Visit},
    span::{Attributes, Id, Record},
};

#[derive(Clone, Default)]
struct CapturingSubscriber {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

#[derive(Clone, Debug)]
struct CapturedEvent {
    level: Level,
    target: String,
    fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or_default()
    }
}

impl CapturingSubscriber {
    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }
}

struct FieldVisitor<'a> {
    fields: &'a mut HashMap<String, String>,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields
            .insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.fields
            .insert(field.name().to_string(), format!("{value:?}"));
    }
}

impl Subscriber for CapturingSubscriber {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _attrs: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let mut fields = HashMap::new();
        let mut visitor = FieldVisitor {
            fields: &mut fields,
        };
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            fields,
        });
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

fn capture(options: Options, f: impl FnOnce(Options) -> anyhow::Result<()>) -> Vec<CapturedEvent> {
    let subscriber = CapturingSubscriber::default();
    let dispatch = dispatcher::Dispatch::new(subscriber.clone());
    let guard = dispatcher::set_default(&dispatch);
    f(options).unwrap();
    drop(guard);
    subscriber
        .events()
        .into_iter()
        .filter(|e| e.target == "bind")
        .collect()
}

#[test]
fn logs_binds_when_debug_is_set() {
    let events = capture(Options::new().debug(true), |options| {
        let conn = options.open()?;
        let stmt = conn.prepare("SELECT ?, ?, ?")?;
        stmt.bind_floating_point(0, f64::NAN, false)?;
        stmt.bind_text(1, "ignored", true)?;
        stmt.bind_date_time(2, datetime!(2024 - 3 - 5 13:45:07.5), false)?;
        stmt.reset();
        Ok(())
    });

    let summaries: Vec<_> = events.iter().map(|e| e.field("summary")).collect();
    assert_eq!(
        summaries,
        vec![
            "prepared statement",
            "bind parameter",
            "bind parameter",
            "bind parameter",
            "reset statement",
        ]
    );
    assert!(events.iter().all(|e| e.level == Level::DEBUG));

    assert_eq!(events[0].field("db.statement"), "SELECT ?, ?, ?");

    let nan = &events[1];
    assert_eq!(nan.field("index"), "0");
    assert_eq!(nan.field("kind"), "floating_point");
    assert_eq!(nan.field("is_null"), "false");
    assert_eq!(nan.field("value"), "NaN");

    let null = &events[2];
    assert_eq!(null.field("kind"), "text");
    assert_eq!(null.field("is_null"), "true");
    assert_eq!(null.field("value"), "NULL");

    assert_eq!(events[3].field("kind"), "date_time");
}

#[test]
fn logs_nothing_without_debug() {
    let events = capture(Options::new(), |options| {
        let conn = options.open()?;
        let stmt = conn.prepare("SELECT ?")?;
        stmt.bind_integral(0, 1, false)?;
        stmt.reset();
        Ok(())
    });
    assert!(events.is_empty());
}

#[test]
fn logs_at_configured_level() {
    let events = capture(
        Options::new().debug(true).log_binds(LevelFilter::Info),
        |options| {
            let conn = options.open()?;
            let stmt = conn.prepare("SELECT ?")?;
            stmt.bind_boolean(0, true, false)?;
            Ok(())
        },
    );
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.level == Level::INFO));
    assert_eq!(events[1].field("kind"), "boolean");

    let events = capture(
        Options::new().debug(true).log_binds(LevelFilter::Off),
        |options| {
            let conn = options.open()?;
            let stmt = conn.prepare("SELECT ?")?;
            stmt.bind_boolean(0, true, false)?;
            Ok(())
        },
    );
    assert!(events.is_empty());
}

#[test]
fn nop_observer_swallows_diagnostics() {
    let options = Options::new()
        .debug(true)
        .observer(Arc::new(NopObserver));
    let events = capture(options, |options| {
        let conn = options.open()?;
        let stmt = conn.prepare("SELECT ?")?;
        assert!(stmt.debug());
        stmt.bind_floating_point(0, f64::INFINITY, false)?;
        assert_eq!(sqlbind_test::first_value(&stmt)?.text()?, "Inf");
        stmt.reset();
        Ok(())
    });
    assert!(events.is_empty());
}

#[derive(Debug, Default)]
struct Recorder {
    calls: Mutex<Vec<String>>,
}

impl Recorder {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl BindObserver for Recorder {
    fn prepared(&self, sql: &str) {
        self.calls.lock().unwrap().push(format!("prepared {sql}"));
    }

    fn reset(&self, _sql: &str) {
        self.calls.lock().unwrap().push("reset".to_string());
    }

    fn bind(&self, event: &BindEvent<'_>) {
        let value = match event.value {
            Some(v) if !event.is_null => v.to_string(),
            _ => "null".to_string(),
        };
        self.calls
            .lock()
            .unwrap()
            .push(format!("bind {} {} {}", event.index, event.kind, value));
    }
}

#[test]
fn calls_a_custom_observer_only_while_debugging() -> anyhow::Result<()> {
    let recorder = Arc::new(Recorder::default());
    let conn = Options::new().observer(recorder.clone()).open()?;

    let stmt = conn.prepare("SELECT ?")?;
    stmt.bind_integral(0, 1, false)?;
    assert!(recorder.calls().is_empty());

    stmt.set_debug(true);
    stmt.bind_integral(0, 2, false)?;
    stmt.bind_null(0, ParameterKind::Blob)?;
    stmt.bind_blob(0, &[1, 2, 3], false)?;
    stmt.reset();

    stmt.set_debug(false);
    stmt.bind_integral(0, 3, false)?;

    assert_eq!(
        recorder.calls(),
        vec![
            "bind 0 integral 2",
            "bind 0 blob null",
            "bind 0 blob <3 bytes>",
            "reset",
        ]
    );

    Ok(())
}

#[test]
fn reports_prepares_on_debug_connections() -> anyhow::Result<()> {
    let recorder = Arc::new(Recorder::default());
    let conn = Options::new()
        .debug(true)
        .observer(recorder.clone())
        .open()?;

    let stmt = conn.prepare("SELECT ?")?;
    // failed binds are still reported
    assert!(stmt.bind_text(3, "out of range", false).is_err());

    assert_eq!(
        recorder.calls(),
        vec!["prepared SELECT ?", "bind 3 text out of range"]
    );

    Ok(())
}
