use dotstat::{Connection, MetricResult, Payload, SharedConnection, StatsdConnection, SpyMetricSink, Timer};
use crossbeam_channel::Receiver;
use std::fmt;
use std::sync::{Arc, Mutex};

/// `Connection` that keeps every payload it is given.
#[derive(Debug, Default)]
pub struct RecordingConnection {
    sent: Mutex<Vec<Payload>>,
}

#[allow(dead_code)]
impl RecordingConnection {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sent(&self) -> Vec<Payload> {
        self.sent.lock().unwrap().clone()
    }

    /// Every sent entry as `(name, value in milliseconds)`.
    pub fn timings(&self) -> Vec<(String, f64)> {
        self.sent()
            .into_iter()
            .flat_map(|p| p.into_iter())
            .map(|(name, value)| {
                let ms = value.trim_end_matches("|ms").parse().unwrap();
                (name, ms)
            })
            .collect()
    }
}

impl Connection for RecordingConnection {
    fn send(&self, data: &Payload) -> MetricResult<bool> {
        self.sent.lock().unwrap().push(data.clone());
        Ok(true)
    }
}

impl fmt::Display for RecordingConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<RecordingConnection>")
    }
}

#[allow(dead_code)]
pub fn new_recording_timer(name: &str) -> (Arc<RecordingConnection>, Timer) {
    let recording = RecordingConnection::new();
    let connection: SharedConnection = recording.clone();
    (recording, Timer::new(name, connection))
}

#[allow(dead_code)]
pub fn new_spy_timer(name: &str) -> (Receiver<Vec<u8>>, Timer) {
    let (rx, sink) = SpyMetricSink::new();
    let connection = StatsdConnection::builder(sink).build().unwrap();
    (rx, Timer::new(name, connection.shared()))
}
