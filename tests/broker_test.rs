use cookiebus::accessor::{CookieAccessor, MemoryAccessor};
use cookiebus::base::error::CookieError;
use cookiebus::broker::{CookieBroker, CookieValue};
use cookiebus::codec::CookieOptions;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<(CookieValue, CookieValue)>>>;

fn recorder(log: &Log) -> impl Fn(&CookieValue, &CookieValue) + Send + Sync + 'static {
    let log = Arc::clone(log);
    move |new, old| log.lock().unwrap().push((new.clone(), old.clone()))
}

#[test]
fn test_string_round_trip_identity() {
    let broker = CookieBroker::in_memory();
    broker
        .set("msg", CookieValue::text("hello world"), &CookieOptions::default())
        .unwrap();

    let value = broker.get("msg", CookieValue::Absent).unwrap();
    assert_eq!(value, CookieValue::text("hello world"));
}

#[test]
fn test_structured_round_trip() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        theme: String,
        font_size: u32,
        labels: Vec<String>,
    }

    let broker = CookieBroker::in_memory();
    let prefs = Prefs {
        theme: "dark".into(),
        font_size: 14,
        labels: vec!["a".into(), "b".into()],
    };
    broker.set_as("prefs", &prefs, &CookieOptions::default()).unwrap();

    assert!(broker.raw("prefs").unwrap().starts_with("json:"));
    let read: Prefs = broker
        .get_as(
            "prefs",
            Prefs {
                theme: String::new(),
                font_size: 0,
                labels: vec![],
            },
        )
        .unwrap();
    assert_eq!(read, prefs);
}

#[test]
fn test_absent_returns_default_unchanged() {
    let broker = CookieBroker::in_memory();
    assert_eq!(
        broker.get("never-written", CookieValue::text("fallback")).unwrap(),
        CookieValue::text("fallback")
    );
    assert_eq!(broker.get_as("never-written", 7_i32).unwrap(), 7);
}

#[test]
fn test_remove_deletes_and_reads_default() {
    let broker = CookieBroker::in_memory();
    let options = CookieOptions::default();
    broker.set("session", CookieValue::text("abc"), &options).unwrap();
    broker.remove("session", &options).unwrap();

    assert_eq!(broker.raw("session"), None);
    assert_eq!(
        broker.get("session", CookieValue::text("gone")).unwrap(),
        CookieValue::text("gone")
    );
}

#[test]
fn test_subscriber_fires_once_per_set() {
    let broker = CookieBroker::in_memory();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let _sub = broker.subscribe("theme", recorder(&log));

    let options = CookieOptions::default();
    broker.set("theme", CookieValue::text("dark"), &options).unwrap();
    broker.set("theme", CookieValue::text("light"), &options).unwrap();

    let log = log.lock().unwrap();
    assert_eq!(
        log.as_slice(),
        [
            (CookieValue::text("dark"), CookieValue::Absent),
            (CookieValue::text("light"), CookieValue::text("dark")),
        ]
    );
}

#[test]
fn test_external_accessor_write_notifies() {
    let broker = CookieBroker::in_memory();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let _sub = broker.subscribe("theme", recorder(&log));

    // Unrelated code writing straight through the accessor, bypassing set.
    broker.accessor().write("theme=dark");

    assert_eq!(
        log.lock().unwrap().as_slice(),
        [(CookieValue::text("dark"), CookieValue::Absent)]
    );
}

#[test]
fn test_cancel_stops_notifications() {
    let broker = CookieBroker::in_memory();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let sub = broker.subscribe("theme", recorder(&log));

    let options = CookieOptions::default();
    broker.set("theme", CookieValue::text("dark"), &options).unwrap();
    sub.cancel();
    broker.set("theme", CookieValue::text("light"), &options).unwrap();

    assert_eq!(log.lock().unwrap().len(), 1);
}

#[test]
fn test_detach_keeps_subscription_alive() {
    let broker = CookieBroker::in_memory();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    broker.subscribe("theme", recorder(&log)).detach();

    broker
        .set("theme", CookieValue::text("dark"), &CookieOptions::default())
        .unwrap();
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[test]
fn test_two_subscribers_notified_in_subscription_order() {
    let broker = CookieBroker::in_memory();
    let order: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

    let first = Arc::clone(&order);
    let _a = broker.subscribe("theme", move |_, _| first.lock().unwrap().push("first"));
    let second = Arc::clone(&order);
    let _b = broker.subscribe("theme", move |_, _| second.lock().unwrap().push("second"));

    broker
        .set("theme", CookieValue::text("dark"), &CookieOptions::default())
        .unwrap();
    assert_eq!(order.lock().unwrap().as_slice(), ["first", "second"]);
}

#[test]
fn test_disabled_cookies_degrade_without_notifications() {
    let broker = CookieBroker::new(Arc::new(MemoryAccessor::disabled()));
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let _sub = broker.subscribe("theme", recorder(&log));

    let options = CookieOptions::default();
    broker.set("theme", CookieValue::text("dark"), &options).unwrap();

    // Reads and writes still work; nobody is ever notified.
    assert_eq!(
        broker.get("theme", CookieValue::Absent).unwrap(),
        CookieValue::text("dark")
    );
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_claimed_write_path_degrades_without_notifications() {
    let accessor = Arc::new(MemoryAccessor::new());
    // Another party got to the write path first.
    assert!(accessor.try_hook_writes(Arc::new(|raw, port| port.write_raw(raw))));

    let broker = CookieBroker::new(accessor);
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let _sub = broker.subscribe("theme", recorder(&log));

    broker
        .set("theme", CookieValue::text("dark"), &CookieOptions::default())
        .unwrap();
    assert_eq!(
        broker.get("theme", CookieValue::Absent).unwrap(),
        CookieValue::text("dark")
    );
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_number_and_string_store_differently() {
    let broker = CookieBroker::in_memory();
    let options = CookieOptions::default();

    broker.set_as("age", &20_i64, &options).unwrap();
    assert_eq!(broker.raw("age").as_deref(), Some("json:20"));
    assert_eq!(broker.get_as("age", 0_i64).unwrap(), 20);

    // The stringly twin stores without the prefix and stays a string.
    broker.set("age", CookieValue::text("21"), &options).unwrap();
    assert_eq!(broker.raw("age").as_deref(), Some("21"));
    assert_eq!(
        broker.get("age", CookieValue::Absent).unwrap(),
        CookieValue::text("21")
    );
    assert!(matches!(
        broker.get_as::<i64>("age", 0),
        Err(CookieError::Decode { .. })
    ));
}

#[test]
fn test_removal_notifies_with_absent_new_value() {
    let broker = CookieBroker::in_memory();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let _sub = broker.subscribe("session", recorder(&log));

    let options = CookieOptions::default();
    broker.set("session", CookieValue::text("abc"), &options).unwrap();
    broker.remove("session", &options).unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[1], (CookieValue::Absent, CookieValue::text("abc")));
}

#[test]
fn test_rewrite_of_same_value_still_notifies() {
    let broker = CookieBroker::in_memory();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let _sub = broker.subscribe("theme", recorder(&log));

    let options = CookieOptions::default();
    broker.set("theme", CookieValue::text("dark"), &options).unwrap();
    broker.set("theme", CookieValue::text("dark"), &options).unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[1], (CookieValue::text("dark"), CookieValue::text("dark")));
}

#[test]
fn test_non_cookie_shaped_write_passes_through_silently() {
    let broker = CookieBroker::in_memory();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let _sub = broker.subscribe("theme", recorder(&log));

    broker.accessor().write("junk");

    assert!(log.lock().unwrap().is_empty());
    assert_eq!(broker.accessor().read(), "");
}

#[test]
fn test_corrupt_structured_value_surfaces_on_get() {
    let broker = CookieBroker::in_memory();
    broker.accessor().write("session=json:{oops");

    assert!(matches!(
        broker.get("session", CookieValue::Absent),
        Err(CookieError::Corrupt { .. })
    ));
    // Not defaulted away either.
    assert!(broker.get("session", CookieValue::text("fallback")).is_err());
}

#[test]
fn test_corrupt_stored_value_delivered_as_text_in_notifications() {
    let broker = CookieBroker::in_memory();
    broker.accessor().write("session=json:{oops");

    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let _sub = broker.subscribe("session", recorder(&log));

    // The interceptor has no caller to hand an error to, so the corrupt
    // old value arrives as plain text instead of aborting the write.
    broker
        .set("session", CookieValue::text("fixed"), &CookieOptions::default())
        .unwrap();

    assert_eq!(
        log.lock().unwrap().as_slice(),
        [(CookieValue::text("fixed"), CookieValue::text("json:{oops"))]
    );
}

#[test]
fn test_subscriber_may_write_reentrantly() {
    let broker = Arc::new(CookieBroker::in_memory());
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let _echo = broker.subscribe("echo", recorder(&log));

    let chained = Arc::clone(&broker);
    let _sub = broker.subscribe("source", move |new, _| {
        chained
            .set("echo", new.clone(), &CookieOptions::default())
            .unwrap();
    });

    broker
        .set("source", CookieValue::text("ping"), &CookieOptions::default())
        .unwrap();
    assert_eq!(
        log.lock().unwrap().as_slice(),
        [(CookieValue::text("ping"), CookieValue::Absent)]
    );
}

#[test]
fn test_names_needing_encoding_notify_under_wire_spelling() {
    let broker = CookieBroker::in_memory();
    let decoded: Log = Arc::new(Mutex::new(Vec::new()));
    let _a = broker.subscribe("my name", recorder(&decoded));
    let wire: Log = Arc::new(Mutex::new(Vec::new()));
    let _b = broker.subscribe("my%20name", recorder(&wire));

    broker
        .set("my name", CookieValue::text("v"), &CookieOptions::default())
        .unwrap();

    // Dispatch uses the name as serialized on the wire, so only the encoded
    // spelling hears about the write, and value lookup misses.
    assert!(decoded.lock().unwrap().is_empty());
    assert_eq!(
        wire.lock().unwrap().as_slice(),
        [(CookieValue::Absent, CookieValue::Absent)]
    );
}

#[test]
fn test_debug_logging_does_not_change_behavior() {
    let broker = CookieBroker::in_memory();
    broker.set_debug_logging(true);
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let _sub = broker.subscribe("theme", recorder(&log));

    broker
        .set("theme", CookieValue::text("dark"), &CookieOptions::default())
        .unwrap();
    broker.set_debug_logging(false);

    assert_eq!(log.lock().unwrap().len(), 1);
}
