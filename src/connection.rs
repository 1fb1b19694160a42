// dotstat - Namespaced Statsd timers for Rust
//
// Copyright 2026 The dotstat Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::BTreeMap;
use std::fmt;
use std::net::{SocketAddr, UdpSocket};
use std::panic::RefUnwindSafe;
use std::sync::Arc;

use log::{debug, warn};

use crate::config::{ConnectionConfig, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SAMPLE_RATE};
use crate::sampler::Sampler;
use crate::sinks::{get_addr, MetricSink, SinkStats, UdpMetricSink};
use crate::types::{ErrorKind, MetricError, MetricResult};

/// Fully qualified metric names mapped to pre-formatted values, e.g.
/// `"app.request.total" => "12.34560000|ms"`.
pub type Payload = BTreeMap<String, String>;

/// Connection shared by every client derived from a common root.
pub type SharedConnection = Arc<dyn Connection + Send + Sync + RefUnwindSafe>;

/// Boundary between clients and the network.
///
/// Clients never format protocol lines or touch sockets themselves. They
/// build a `Payload` and hand it to `.send()`, which decides how (and
/// whether) it is transmitted.
///
/// The returned flag is `true` when the payload was written and `false` when
/// the connection chose to drop it (sampling, disabled, or a swallowed
/// transmission failure). Errors are only returned by connections whose
/// policy is to propagate failures.
///
/// Implementations must also be `Display`; clients include that rendering
/// in their own diagnostics.
pub trait Connection: fmt::Display {
    fn send(&self, data: &Payload) -> MetricResult<bool>;
}

/// Format each payload entry as a `name:value` Statsd line, appending the
/// sample rate to the value when it is below one. Only pass a rate below one
/// for payloads that were actually sampled at that rate.
pub(crate) fn format_lines(data: &Payload, sample_rate: f32) -> Vec<String> {
    data.iter()
        .map(|(name, value)| {
            if sample_rate < 1.0 {
                format!("{}:{}|@{:?}", name, value, sample_rate)
            } else {
                format!("{}:{}", name, value)
            }
        })
        .collect()
}

/// Unspecified local address on an ephemeral port, in the family of `target`.
fn local_addr_for(target: &SocketAddr) -> SocketAddr {
    match target {
        SocketAddr::V4(_) => SocketAddr::from(([0, 0, 0, 0], 0)),
        SocketAddr::V6(_) => SocketAddr::from(([0u16; 8], 0)),
    }
}

/// `Connection` that writes Statsd lines to a `MetricSink`.
///
/// Every entry of a payload is emitted as its own line (one UDP datagram
/// when using `UdpMetricSink`). Sampling is decided once per payload. If the
/// sink fails, the failure is logged and the remaining entries are dropped;
/// the error never reaches the caller. The sink is flushed after every
/// payload that was written.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use dotstat::{Connection, NopMetricSink, Payload, StatsdConnection};
///
/// let connection = StatsdConnection::builder(NopMetricSink)
///     .with_host("metrics.example.com")
///     .build()
///     .unwrap();
///
/// assert_eq!("<Connection[metrics.example.com:8125] P(1.0)>", connection.to_string());
///
/// let mut data = Payload::new();
/// data.insert("app.total".to_string(), "1.00000000|ms".to_string());
/// assert!(connection.send(&data).unwrap());
/// ```
pub struct StatsdConnection {
    host: String,
    port: u16,
    sample_rate: f32,
    disabled: bool,
    sampler: Sampler,
    sink: Box<dyn MetricSink + Send + Sync + RefUnwindSafe>,
}

impl StatsdConnection {
    /// Create a builder that will write through the given sink.
    ///
    /// The host and port set on the builder are only used for diagnostics
    /// since the sink already knows where to write.
    pub fn builder<T>(sink: T) -> StatsdConnectionBuilder
    where
        T: MetricSink + Send + Sync + RefUnwindSafe + 'static,
    {
        StatsdConnectionBuilder::new(sink)
    }

    /// Create a connection sending over UDP to the server named in `config`.
    ///
    /// The host is resolved first, preferring IPv4 addresses, and a local
    /// socket of the same address family is bound to an ephemeral port and
    /// put in non-blocking mode so that sending a timing never stalls the
    /// caller.
    ///
    /// # Failures
    ///
    /// This method may fail if:
    ///
    /// * The local socket cannot be bound or configured.
    /// * The host cannot be resolved.
    /// * The sample rate is outside of `(0, 1]`.
    pub fn from_config(config: &ConnectionConfig) -> MetricResult<Self> {
        let addr = get_addr((config.host.as_str(), config.port))?;
        let socket = UdpSocket::bind(local_addr_for(&addr))?;
        socket.set_nonblocking(true)?;
        let sink = UdpMetricSink::from(addr, socket)?;

        StatsdConnection::builder(sink)
            .with_host(config.host.as_str())
            .with_port(config.port)
            .with_sample_rate(config.sample_rate)
            .with_disabled(config.disabled)
            .build()
    }

    /// Wrap this connection so that it can be shared between clients.
    pub fn shared(self) -> SharedConnection {
        Arc::new(self)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// I/O telemetry of the underlying sink.
    pub fn stats(&self) -> SinkStats {
        self.sink.stats()
    }
}

impl Connection for StatsdConnection {
    fn send(&self, data: &Payload) -> MetricResult<bool> {
        if self.disabled {
            return Ok(false);
        }

        let lines = match self.sampler.sample(data) {
            Some(data) => format_lines(data, self.sampler.rate()),
            None => return Ok(false),
        };

        for (i, line) in lines.iter().enumerate() {
            match self.sink.emit(line) {
                Ok(n) => debug!("Wrote {} bytes to sink", n),
                Err(err) => {
                    warn!("Dropping {} metric(s) after error writing to sink: {}", lines.len() - i, err);
                    return Ok(false);
                }
            }
        }

        if let Err(err) = self.sink.flush() {
            warn!("Error flushing sink: {}", err);
            return Ok(false);
        }

        Ok(true)
    }
}

impl fmt::Display for StatsdConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Connection[{}:{}] P({:?})>", self.host, self.port, self.sample_rate)
    }
}

impl fmt::Debug for StatsdConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StatsdConnection {{ host: {:?}, port: {}, sample_rate: {:?}, disabled: {}, sink: ... }}",
            self.host, self.port, self.sample_rate, self.disabled,
        )
    }
}

/// Builder for creating and customizing `StatsdConnection` instances.
///
/// Instances of the builder should be created by calling the `::builder()`
/// method on the `StatsdConnection` struct.
#[must_use]
pub struct StatsdConnectionBuilder {
    host: String,
    port: u16,
    sample_rate: f32,
    disabled: bool,
    sink: Box<dyn MetricSink + Send + Sync + RefUnwindSafe>,
}

impl StatsdConnectionBuilder {
    // Set the required fields and defaults for optional fields
    fn new<T>(sink: T) -> Self
    where
        T: MetricSink + Send + Sync + RefUnwindSafe + 'static,
    {
        StatsdConnectionBuilder {
            // required
            sink: Box::new(sink),

            // optional with defaults
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            sample_rate: DEFAULT_SAMPLE_RATE,
            disabled: false,
        }
    }

    /// Host reported in diagnostics.
    pub fn with_host<H>(mut self, host: H) -> Self
    where
        H: ToString,
    {
        self.host = host.to_string();
        self
    }

    /// Port reported in diagnostics.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Fraction of payloads to keep. Values below one are appended to each
    /// line as `|@<rate>` so the server can scale them back up.
    ///
    /// Note that payloads are only dropped at random when the `sample-rate`
    /// feature is enabled. Without it every payload is kept and lines are
    /// sent without a rate.
    pub fn with_sample_rate(mut self, rate: f32) -> Self {
        self.sample_rate = rate;
        self
    }

    /// Drop every payload without writing anything.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Construct a new `StatsdConnection` based on current settings.
    ///
    /// # Failures
    ///
    /// Returns an `InvalidInput` error if the sample rate is outside of `(0, 1]`.
    pub fn build(self) -> MetricResult<StatsdConnection> {
        if !(self.sample_rate > 0.0 && self.sample_rate <= 1.0) {
            return Err(MetricError::from((
                ErrorKind::InvalidInput,
                "Sample rate must be between 0.0 and 1.0",
            )));
        }

        Ok(StatsdConnection {
            host: self.host,
            port: self.port,
            sample_rate: self.sample_rate,
            disabled: self.disabled,
            sampler: Sampler::new(self.sample_rate),
            sink: self.sink,
        })
    }
}
