use dotstat::prelude::*;
use dotstat::{Client, NopMetricSink, SharedConnection, StatsdConnection, Timer};
use std::sync::Arc;

mod utils;
use utils::RecordingConnection;

fn new_nop_connection() -> SharedConnection {
    StatsdConnection::builder(NopMetricSink).build().unwrap().shared()
}

#[test]
fn test_client_name_drops_empty_parts() {
    let client = Client::from_parts(["a", "", "b"], new_nop_connection());
    assert_eq!("a.b", client.name());
}

#[test]
fn test_client_name_never_has_stray_separators() {
    let cases: &[(&[&str], &str)] = &[
        (&["", "a"], "a"),
        (&["a", ""], "a"),
        (&["a", "", "", "b", ""], "a.b"),
        (&["app", "web", "request"], "app.web.request"),
    ];

    for (parts, expected) in cases {
        let client = Client::from_parts(parts.iter(), new_nop_connection());
        assert_eq!(*expected, client.name());
    }
}

#[test]
fn test_get_client_without_name_keeps_parent_name() {
    let client = Client::new("app", new_nop_connection());
    assert_eq!(client.name(), client.get_client(None).name());
}

#[test]
fn test_get_client_with_name_appends() {
    let client = Client::new("app", new_nop_connection());
    assert_eq!("app.module.function", client.get_client(Some("module")).get_client(Some("function")).name());
}

#[test]
fn test_get_client_passes_same_connection() {
    let recording = RecordingConnection::new();
    let connection: SharedConnection = recording.clone();
    let client = Client::new("app", connection);

    let sub = client.get_client(Some("sub"));
    let timer: Timer = sub.get_client_as(Some("timer"));

    assert!(Arc::ptr_eq(client.connection(), sub.connection()));
    assert!(Arc::ptr_eq(client.connection(), timer.connection()));

    timer.send("", 0.001_f64).unwrap();
    assert_eq!(1, recording.sent().len());
    assert!(recording.sent()[0].contains_key("app.sub.timer"));
}

#[test]
fn test_get_client_as_timer_from_client() {
    let client = Client::new("app", new_nop_connection());
    let timer: Timer = client.get_client_as(None);
    assert_eq!("app", timer.name());
    assert!(timer.start_time().is_none());
}

#[test]
fn test_display_includes_connection() {
    let recording = RecordingConnection::new();
    let client = Client::new("app", recording);
    assert_eq!("<Client:app@<RecordingConnection>>", client.to_string());
}
