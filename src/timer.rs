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
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::client::{Client, Namespaced};
use crate::config::ConnectionConfig;
use crate::connection::{Payload, SharedConnection};
use crate::name;
use crate::types::{ErrorKind, MetricError, MetricResult};

/// Sub-name `Timer::stop` reports the total under.
pub const DEFAULT_STOP_NAME: &str = "total";

/// Conversion trait for the elapsed time values a `Timer` can send.
///
/// `Duration` values are used as-is and `f64` values are interpreted as a
/// number of seconds. Both are converted to fractional milliseconds.
pub trait ToTimerDelta {
    fn try_to_millis(self) -> MetricResult<f64>;
}

impl ToTimerDelta for Duration {
    fn try_to_millis(self) -> MetricResult<f64> {
        Ok(self.as_secs_f64() * 1000.0)
    }
}

impl ToTimerDelta for f64 {
    fn try_to_millis(self) -> MetricResult<f64> {
        if self.is_finite() {
            Ok(self * 1000.0)
        } else {
            Err(MetricError::from((ErrorKind::InvalidInput, "Timer delta must be finite")))
        }
    }
}

fn format_millis(ms: f64) -> String {
    format!("{:.8}|ms", ms)
}

/// Client that measures elapsed time and reports it in milliseconds.
///
/// A timer moves through three states: idle, running (after `.start()`),
/// and stopped (after `.stop()`). Each transition can only happen once per
/// instance, so a new timer should be derived for every unit of work. While
/// running, `.intermediate()` reports the time since the previous start or
/// intermediate call (lap timing), while `.stop()` always reports the time
/// since the original start.
///
/// # Example
///
/// ```
/// use dotstat::prelude::*;
/// use dotstat::{NopMetricSink, StatsdConnection, Timer};
///
/// let connection = StatsdConnection::builder(NopMetricSink).build().unwrap().shared();
/// let mut timer = Timer::new("app.request", connection);
///
/// timer.start().unwrap();
/// // parse the request...
/// timer.intermediate("parse").unwrap();
/// // handle it...
/// timer.intermediate("handle").unwrap();
/// // sent as "app.request.total"
/// timer.stop().unwrap();
/// ```
pub struct Timer {
    client: Client,
    start: Option<Instant>,
    last: Option<Instant>,
    stop: Option<Instant>,
}

impl Timer {
    /// Create an idle timer with a single name part.
    pub fn new<N>(name: N, connection: SharedConnection) -> Self
    where
        N: fmt::Display,
    {
        Self::from_client(Client::new(name, connection))
    }

    /// Create an idle timer that owns a new default UDP connection built
    /// from `config`.
    pub fn from_config<N>(name: N, config: &ConnectionConfig) -> MetricResult<Self>
    where
        N: fmt::Display,
    {
        Ok(Self::from_client(Client::from_config(name, config)?))
    }

    /// Create an idle timer using the name and connection of `client`.
    pub fn from_client(client: Client) -> Self {
        Timer {
            client,
            start: None,
            last: None,
            stop: None,
        }
    }

    /// Start the timer. This can only be done once per instance.
    pub fn start(&mut self) -> MetricResult<()> {
        if self.start.is_some() {
            return Err(MetricError::from((
                ErrorKind::AlreadyStarted,
                "Unable to start, the timer is already running",
            )));
        }

        let now = Instant::now();
        self.start = Some(now);
        self.last = Some(now);
        Ok(())
    }

    /// Send the time since the last call to `.start()` or `.intermediate()`
    /// under `subname`, then begin a new lap.
    pub fn intermediate(&mut self, subname: &str) -> MetricResult<bool> {
        if self.stop.is_some() {
            return Err(already_stopped());
        }

        let last = self.last.ok_or_else(not_started)?;
        let now = Instant::now();
        let res = self.send(subname, now.duration_since(last));
        self.last = Some(now);
        res
    }

    /// Stop the timer and send the time since `.start()` under `total`.
    pub fn stop(&mut self) -> MetricResult<bool> {
        self.stop_with_name(DEFAULT_STOP_NAME)
    }

    /// Stop the timer and send the time since `.start()` under `subname`.
    ///
    /// An empty `subname` sends under the name of the timer itself.
    pub fn stop_with_name(&mut self, subname: &str) -> MetricResult<bool> {
        if self.stop.is_some() {
            return Err(already_stopped());
        }

        let start = self.start.ok_or_else(not_started)?;
        let now = Instant::now();
        self.stop = Some(now);
        self.send(subname, now.duration_since(start))
    }

    /// Send `delta` in milliseconds under this timer's name joined with
    /// `subname`, independent of the timer's state.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use dotstat::{NopMetricSink, StatsdConnection, Timer};
    ///
    /// let connection = StatsdConnection::builder(NopMetricSink).build().unwrap().shared();
    /// let timer = Timer::new("app", connection);
    ///
    /// // "app.cache:12.34560000|ms"
    /// timer.send("cache", 0.012_345_6_f64).unwrap();
    /// // "app:250.00000000|ms"
    /// timer.send("", Duration::from_millis(250)).unwrap();
    /// ```
    pub fn send<T>(&self, subname: &str, delta: T) -> MetricResult<bool>
    where
        T: ToTimerDelta,
    {
        let ms = delta.try_to_millis()?;
        let name = name::join([self.client.name(), subname]);
        info!("{}: {:.8}ms", name, ms);

        let mut data = Payload::new();
        data.insert(name, format_millis(ms));
        self.client.send_payload(&data)
    }

    /// Time a single call of `function` under `name`, sending the
    /// measurement even if `function` panics.
    ///
    /// # Example
    ///
    /// ```
    /// use dotstat::{NopMetricSink, StatsdConnection, Timer};
    ///
    /// let connection = StatsdConnection::builder(NopMetricSink).build().unwrap().shared();
    /// let timer = Timer::new("app", connection);
    ///
    /// // sent as "app.load_config"
    /// let answer = timer.time("load_config", || 6 * 7);
    /// assert_eq!(42, answer);
    /// ```
    pub fn time<F, R>(&self, name: &str, function: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = self.guard(name);
        function()
    }

    /// Derive and start a sub-timer named `name` that is stopped, and its
    /// measurement sent, when the returned guard goes out of scope.
    pub fn guard(&self, name: &str) -> TimerGuard {
        TimerGuard::new(self.get_client(Some(name)))
    }

    /// Wrap `function` so that every call is timed under `name`.
    ///
    /// Each call derives a fresh sub-timer, so concurrent calls never share
    /// timer state. The wrapped function's return value (including any
    /// `Err`) and panics pass through unchanged. Failures to send the
    /// measurement are logged rather than returned.
    ///
    /// Functions taking several arguments can be wrapped by accepting a
    /// tuple. See the `decorate!` macro for using the function's own name.
    ///
    /// # Example
    ///
    /// ```
    /// use dotstat::{NopMetricSink, StatsdConnection, Timer};
    ///
    /// let connection = StatsdConnection::builder(NopMetricSink).build().unwrap().shared();
    /// let timer = Timer::new("app", connection);
    ///
    /// // every call sent as "app.my_timer"
    /// let add = timer.decorate("my_timer", |(a, b): (i32, i32)| a + b);
    /// assert_eq!(5, add((2, 3)));
    /// ```
    pub fn decorate<N, F, A, R>(&self, name: N, function: F) -> impl Fn(A) -> R
    where
        N: Into<String>,
        F: Fn(A) -> R,
    {
        let parent = self.client.clone();
        let name = name.into();

        move |args| {
            let _guard = TimerGuard::new(parent.get_client_as(Some(name.as_str())));
            function(args)
        }
    }

    /// When `.start()` was called, if it has been.
    pub fn start_time(&self) -> Option<Instant> {
        self.start
    }

    /// When the current lap began, if the timer has been started.
    pub fn last_time(&self) -> Option<Instant> {
        self.last
    }

    /// When `.stop()` was called, if it has been.
    pub fn stop_time(&self) -> Option<Instant> {
        self.stop
    }

    /// Started and not yet stopped.
    pub fn is_running(&self) -> bool {
        self.start.is_some() && self.stop.is_none()
    }
}

fn already_stopped() -> MetricError {
    MetricError::from((ErrorKind::AlreadyStopped, "Unable to stop, the timer is already stopped"))
}

fn not_started() -> MetricError {
    MetricError::from((ErrorKind::NotStarted, "The timer has not been started"))
}

impl Namespaced for Timer {
    fn with_connection(name: String, connection: SharedConnection) -> Self {
        Self::from_client(Client::with_connection(name, connection))
    }

    fn name(&self) -> &str {
        self.client.name()
    }

    fn connection(&self) -> &SharedConnection {
        self.client.connection()
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Timer:{}@{}>", self.client.name(), self.client.connection())
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Timer {{ client: {:?}, start: {:?}, last: {:?}, stop: {:?} }}",
            self.client, self.start, self.last, self.stop,
        )
    }
}

/// A running timer that is stopped when dropped.
///
/// The measurement is sent under the timer's own name (no `total` suffix)
/// on every exit path of the enclosing scope, including unwinding. Send
/// failures during drop are logged since they cannot be returned; call
/// `.finish()` to observe them instead.
///
/// # Example
///
/// ```
/// use dotstat::{NopMetricSink, StatsdConnection, Timer};
///
/// let connection = StatsdConnection::builder(NopMetricSink).build().unwrap().shared();
/// let timer = Timer::new("app", connection);
///
/// {
///     let mut guard = timer.guard("import");
///     // read the file...
///     guard.intermediate("read").unwrap();
///     // "app.import" is sent here
/// }
/// ```
#[must_use = "the timer is stopped as soon as the guard is dropped"]
pub struct TimerGuard {
    timer: Timer,
}

impl TimerGuard {
    fn new(mut timer: Timer) -> Self {
        let now = Instant::now();
        timer.start = Some(now);
        timer.last = Some(now);
        TimerGuard { timer }
    }

    /// The running timer held by this guard.
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// See `Timer::intermediate`.
    pub fn intermediate(&mut self, subname: &str) -> MetricResult<bool> {
        self.timer.intermediate(subname)
    }

    /// Stop the timer now and return the result of sending it.
    pub fn finish(mut self) -> MetricResult<bool> {
        self.timer.stop_with_name("")
    }
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        if self.timer.stop.is_some() {
            return;
        }

        if let Err(err) = self.timer.stop_with_name("") {
            warn!("Unable to send timing for {}: {}", self.timer.name(), err);
        }
    }
}

impl fmt::Debug for TimerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimerGuard {{ timer: {:?} }}", self.timer)
    }
}

#[cfg(test)]
mod tests {
    use super::{format_millis, Timer, ToTimerDelta};
    use crate::client::Namespaced;
    use crate::connection::StatsdConnection;
    use crate::sinks::{NopMetricSink, SpyMetricSink};
    use crate::types::ErrorKind;
    use crossbeam_channel::Receiver;
    use std::time::Duration;

    fn new_spy_timer(name: &str) -> (Receiver<Vec<u8>>, Timer) {
        let (rx, sink) = SpyMetricSink::new();
        let connection = StatsdConnection::builder(sink).build().unwrap();
        (rx, Timer::new(name, connection.shared()))
    }

    fn recv_line(rx: &Receiver<Vec<u8>>) -> String {
        String::from_utf8(rx.recv().unwrap()).unwrap()
    }

    #[test]
    fn test_format_millis() {
        assert_eq!("12.34560000|ms", format_millis(12.3456));
        assert_eq!("0.00000000|ms", format_millis(0.0));
    }

    #[test]
    fn test_duration_to_millis() {
        assert_eq!(1500.0, Duration::from_millis(1500).try_to_millis().unwrap());
    }

    #[test]
    fn test_f64_to_millis() {
        assert_eq!(250.0, 0.25_f64.try_to_millis().unwrap());
    }

    #[test]
    fn test_f64_not_finite() {
        assert_eq!(ErrorKind::InvalidInput, f64::NAN.try_to_millis().unwrap_err().kind());
        assert_eq!(ErrorKind::InvalidInput, f64::INFINITY.try_to_millis().unwrap_err().kind());
    }

    #[test]
    fn test_send_with_subname() {
        let (rx, timer) = new_spy_timer("app");
        assert!(timer.send("cache", 0.012_345_6_f64).unwrap());
        assert_eq!("app.cache:12.34560000|ms", recv_line(&rx));
    }

    #[test]
    fn test_send_empty_subname() {
        let (rx, timer) = new_spy_timer("app");
        timer.send("", Duration::from_millis(3)).unwrap();
        assert_eq!("app:3.00000000|ms", recv_line(&rx));
    }

    #[test]
    fn test_start_twice() {
        let (_rx, mut timer) = new_spy_timer("app");
        timer.start().unwrap();
        assert_eq!(ErrorKind::AlreadyStarted, timer.start().unwrap_err().kind());
    }

    #[test]
    fn test_stop_twice() {
        let (_rx, mut timer) = new_spy_timer("app");
        timer.start().unwrap();
        timer.stop().unwrap();
        assert_eq!(ErrorKind::AlreadyStopped, timer.stop().unwrap_err().kind());
    }

    #[test]
    fn test_stop_without_start() {
        let (rx, mut timer) = new_spy_timer("app");
        assert_eq!(ErrorKind::NotStarted, timer.stop().unwrap_err().kind());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_intermediate_without_start() {
        let (_rx, mut timer) = new_spy_timer("app");
        assert_eq!(ErrorKind::NotStarted, timer.intermediate("lap").unwrap_err().kind());
    }

    #[test]
    fn test_intermediate_after_stop() {
        let (_rx, mut timer) = new_spy_timer("app");
        timer.start().unwrap();
        timer.stop().unwrap();
        assert_eq!(ErrorKind::AlreadyStopped, timer.intermediate("lap").unwrap_err().kind());
    }

    #[test]
    fn test_stop_sends_total_since_start() {
        let (rx, mut timer) = new_spy_timer("app");
        timer.start().unwrap();
        timer.intermediate("lap").unwrap();
        timer.stop().unwrap();

        let _lap = recv_line(&rx);
        let elapsed = timer.stop_time().unwrap() - timer.start_time().unwrap();
        let expected = format!("app.total:{}", format_millis(elapsed.as_secs_f64() * 1000.0));
        assert_eq!(expected, recv_line(&rx));
    }

    #[test]
    fn test_intermediate_advances_last() {
        let (_rx, mut timer) = new_spy_timer("app");
        timer.start().unwrap();
        let first = timer.last_time().unwrap();
        timer.intermediate("lap").unwrap();

        assert!(timer.last_time().unwrap() >= first);
        assert_eq!(first, timer.start_time().unwrap());
    }

    #[test]
    fn test_is_running() {
        let (_rx, mut timer) = new_spy_timer("app");
        assert!(!timer.is_running());
        timer.start().unwrap();
        assert!(timer.is_running());
        timer.stop().unwrap();
        assert!(!timer.is_running());
    }

    #[test]
    fn test_guard_sends_on_drop() {
        let (rx, timer) = new_spy_timer("app");
        {
            let guard = timer.guard("import");
            assert!(guard.timer().is_running());
        }

        assert!(recv_line(&rx).starts_with("app.import:"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_guard_finish_sends_once() {
        let (rx, timer) = new_spy_timer("app");
        let guard = timer.guard("import");
        assert!(guard.finish().unwrap());

        assert!(recv_line(&rx).starts_with("app.import:"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_time_returns_value() {
        let (rx, timer) = new_spy_timer("app");
        assert_eq!(42, timer.time("answer", || 42));
        assert!(recv_line(&rx).starts_with("app.answer:"));
    }

    #[test]
    fn test_get_client_is_idle_timer() {
        let (_rx, mut timer) = new_spy_timer("app");
        timer.start().unwrap();

        let sub = timer.get_client(Some("sub"));
        assert_eq!("app.sub", sub.name());
        assert!(sub.start_time().is_none());
    }

    #[test]
    fn test_display() {
        let connection = StatsdConnection::builder(NopMetricSink).build().unwrap();
        let timer = Timer::new("app", connection.shared());
        assert_eq!("<Timer:app@<Connection[localhost:8125] P(1.0)>>", timer.to_string());
    }
}
