// dotstat - Namespaced Statsd timers for Rust
//
// Copyright 2026 The dotstat Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Namespaced Statsd timers for Rust!
//!
//! dotstat sends timing metrics to a Statsd server over UDP using clients
//! arranged in a hierarchy of dotted names.
//!
//! ## Features
//!
//! * Clients that derive sub-clients sharing one connection, e.g. an
//!   application level client producing per-module and per-function clients.
//! * Timers with start, lap (`intermediate`), and stop measurements.
//! * Wrapping functions so every call is timed, including calls that return
//!   an error or panic.
//! * Support for alternate backends via the `MetricSink` trait, or entirely
//!   different transports via the `Connection` trait.
//!
//! ## Install
//!
//! To make use of `dotstat` in your project, add it as a dependency in your `Cargo.toml` file.
//!
//! ```toml
//! [dependencies]
//! dotstat = "x.y.z"
//! ```
//!
//! Enable the `sample-rate` feature to randomly drop sends when the
//! connection is configured with a sample rate below one. Without it every
//! send is kept and lines carry no `|@<rate>` suffix.
//!
//! ## Usage
//!
//! ### Simple Use
//!
//! Create a timer that will write to some imaginary metrics server, start
//! it, and stop it. The total is sent under `<name>.total`.
//!
//! ```rust,no_run
//! use dotstat::{ConnectionConfig, Timer};
//!
//! let config = ConnectionConfig {
//!     host: "metrics.example.com".to_string(),
//!     ..ConnectionConfig::default()
//! };
//!
//! let mut timer = Timer::from_config("my.app.startup", &config).unwrap();
//! timer.start().unwrap();
//! // do something
//! timer.stop().unwrap();
//! ```
//!
//! ### Sharing a Connection
//!
//! Build the connection once at the start of your application and derive
//! everything else from a root client. Derived clients append their name to
//! the name of their parent and share its connection.
//!
//! ```rust,no_run
//! use dotstat::prelude::*;
//! use dotstat::{Client, ConnectionConfig, StatsdConnection, Timer};
//!
//! let config = ConnectionConfig::from_env().unwrap();
//! let connection = StatsdConnection::from_config(&config).unwrap().shared();
//!
//! let app = Client::new("my.app", connection);
//! let db: Client = app.get_client(Some("db"));
//!
//! // Sent as "my.app.db.query.parse" and then "my.app.db.query.total"
//! let mut timer: Timer = db.get_client_as(Some("query"));
//! timer.start().unwrap();
//! timer.intermediate("parse").unwrap();
//! timer.stop().unwrap();
//! ```
//!
//! ### Timing Functions
//!
//! Wrapped functions derive a fresh sub-timer for every call so they can be
//! shared between threads freely.
//!
//! ```rust
//! use dotstat::{decorate, NopMetricSink, StatsdConnection, Timer};
//!
//! let connection = StatsdConnection::builder(NopMetricSink).build().unwrap().shared();
//! let timer = Timer::new("my.app", connection);
//!
//! fn load_user(id: u64) -> Result<String, String> {
//!     Err(format!("no user {}", id))
//! }
//!
//! // Sent as "my.app.load_user", even though the call fails
//! let load_user = decorate!(timer, load_user);
//! assert!(load_user(7).is_err());
//!
//! // Sent as "my.app.render"
//! let page = timer.time("render", || "<html></html>".to_string());
//! ```
//!
//! ### Custom Metric Sinks
//!
//! The `StatsdConnection` writes each formatted line through an
//! implementation of the `MetricSink` trait.
//!
//! ```rust
//! use std::io;
//! use dotstat::{MetricSink, StatsdConnection, Timer};
//!
//! pub struct MyMetricSink;
//!
//! impl MetricSink for MyMetricSink {
//!     fn emit(&self, metric: &str) -> io::Result<usize> {
//!         // Your custom metric sink implementation goes here!
//!         Ok(0)
//!     }
//! }
//!
//! let connection = StatsdConnection::builder(MyMetricSink).build().unwrap().shared();
//! let timer = Timer::new("my.prefix", connection);
//! timer.send("warmup", 0.5_f64).unwrap();
//! ```
//!
//! Besides `UdpMetricSink`, the crate ships `NopMetricSink` for disabling
//! output, `SpyMetricSink` for checking the exact lines written in tests,
//! and `LoggingMetricSink` for writing each line through the `log` crate
//! (target `metrics`) during local development.
//!
//! ```rust
//! use dotstat::{LoggingMetricSink, StatsdConnection, Timer};
//!
//! let sink = LoggingMetricSink::new(log::Level::Debug);
//! let connection = StatsdConnection::builder(sink).build().unwrap().shared();
//!
//! // logged as "my.prefix.warmup:500.00000000|ms"
//! let timer = Timer::new("my.prefix", connection);
//! timer.send("warmup", 0.5_f64).unwrap();
//! ```

#![forbid(unsafe_code)]

pub use self::client::{Client, Namespaced};

pub use self::config::{ConnectionConfig, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SAMPLE_RATE};

pub use self::connection::{Connection, Payload, SharedConnection, StatsdConnection, StatsdConnectionBuilder};

pub use self::sinks::{LoggingMetricSink, MetricSink, NopMetricSink, SinkStats, SpyMetricSink, UdpMetricSink};

pub use self::timer::{Timer, TimerGuard, ToTimerDelta, DEFAULT_STOP_NAME};

pub use self::types::{ErrorKind, MetricError, MetricResult};

mod client;
pub mod config;
mod connection;
mod macros;
pub mod name;
pub mod prelude;
mod sampler;
mod sinks;
mod timer;
mod types;
