// dotstat - Namespaced Statsd timers for Rust
//
// Copyright 2026 The dotstat Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;
use std::sync::Arc;

use crate::config::ConnectionConfig;
use crate::connection::{Payload, SharedConnection, StatsdConnection};
use crate::name;
use crate::types::MetricResult;

/// Construction and derivation of namespaced clients.
///
/// Anything that owns a dotted name and a shared connection can implement
/// this trait by providing `with_connection` (build an instance from an
/// already joined name) and the two accessors. Derivation then comes for
/// free: `get_client` produces another instance of the same type while
/// `get_client_as` produces an instance of any other `Namespaced` type,
/// both sharing the parent's connection.
///
/// # Example
///
/// ```
/// use dotstat::prelude::*;
/// use dotstat::{Client, NopMetricSink, StatsdConnection, Timer};
///
/// let connection = StatsdConnection::builder(NopMetricSink).build().unwrap().shared();
/// let app = Client::new("app", connection);
///
/// let db: Client = app.get_client(Some("db"));
/// let queries: Timer = db.get_client_as(Some("queries"));
///
/// assert_eq!("app.db", db.name());
/// assert_eq!("app.db.queries", queries.name());
/// ```
pub trait Namespaced: Sized {
    /// Build an instance from an already joined `name`.
    fn with_connection(name: String, connection: SharedConnection) -> Self;

    /// The dotted name every metric sent from this client is prefixed by.
    fn name(&self) -> &str;

    /// The connection shared with the parent and any derived clients.
    fn connection(&self) -> &SharedConnection;

    /// Derive a client of the same type with `name` appended to this
    /// client's name. Passing `None` (or an empty name) clones the name.
    fn get_client(&self, name: Option<&str>) -> Self {
        self.get_client_as(name)
    }

    /// Derive a client of type `T` with `name` appended to this client's
    /// name, sharing this client's connection.
    fn get_client_as<T>(&self, name: Option<&str>) -> T
    where
        T: Namespaced,
    {
        let derived = name::join([self.name(), name.unwrap_or_default()]);
        T::with_connection(derived, Arc::clone(self.connection()))
    }

    /// Hand a payload of fully qualified names and formatted values to the
    /// connection, returning whatever the connection reports.
    fn send_payload(&self, data: &Payload) -> MetricResult<bool> {
        self.connection().send(data)
    }
}

/// The base namespaced handle bound to a connection.
///
/// A `Client` only knows how to compose names and derive sub-clients; the
/// metric kinds built on top of it (such as `Timer`) format values and send
/// them through `Namespaced::send_payload`.
///
/// Cloning a client is cheap: the name is copied and the connection is
/// shared.
///
/// # Example
///
/// ```
/// use dotstat::prelude::*;
/// use dotstat::{Client, NopMetricSink, StatsdConnection};
///
/// let connection = StatsdConnection::builder(NopMetricSink).build().unwrap().shared();
/// let client = Client::new("test", connection);
///
/// assert_eq!("<Client:test@<Connection[localhost:8125] P(1.0)>>", client.to_string());
/// assert_eq!(
///     "<Client:test.spam@<Connection[localhost:8125] P(1.0)>>",
///     client.get_client(Some("spam")).to_string(),
/// );
/// ```
#[derive(Clone)]
pub struct Client {
    name: String,
    connection: SharedConnection,
}

impl Client {
    /// Create a client with a single name part.
    pub fn new<N>(name: N, connection: SharedConnection) -> Self
    where
        N: fmt::Display,
    {
        Self::from_parts([name], connection)
    }

    /// Create a client whose name is the dot-joined, non-empty parts.
    pub fn from_parts<I>(parts: I, connection: SharedConnection) -> Self
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        Client {
            name: name::join(parts),
            connection,
        }
    }

    /// Create a client that owns a new default UDP connection built from
    /// `config`. Clients derived from it share that connection.
    ///
    /// # Failures
    ///
    /// Fails for the same reasons as `StatsdConnection::from_config`.
    pub fn from_config<N>(name: N, config: &ConnectionConfig) -> MetricResult<Self>
    where
        N: fmt::Display,
    {
        let connection = StatsdConnection::from_config(config)?;
        Ok(Self::new(name, connection.shared()))
    }
}

impl Namespaced for Client {
    fn with_connection(name: String, connection: SharedConnection) -> Self {
        Client { name, connection }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn connection(&self) -> &SharedConnection {
        &self.connection
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Client:{}@{}>", self.name, self.connection)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Client {{ name: {:?}, connection: {} }}", self.name, self.connection)
    }
}
