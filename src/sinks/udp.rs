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
use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use crate::sinks::core::{MetricSink, SinkStats, SocketStats};
use crate::types::{ErrorKind, MetricError, MetricResult};

/// Attempt to convert anything implementing the `ToSocketAddrs` trait
/// into a concrete `SocketAddr` instance, returning an `InvalidInput`
/// error if the address could not be parsed.
///
/// When a name resolves to several addresses, the first IPv4 address is
/// preferred over IPv6 ones.
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn get_addr<A: ToSocketAddrs>(addr: A) -> MetricResult<SocketAddr> {
    let mut first = None;

    for candidate in addr.to_socket_addrs()? {
        if candidate.is_ipv4() {
            return Ok(candidate);
        }
        first.get_or_insert(candidate);
    }

    first.ok_or_else(|| MetricError::from((ErrorKind::InvalidInput, "No socket addresses yielded")))
}

/// Implementation of a `MetricSink` that emits metrics over UDP.
///
/// Each line is sent as its own datagram to the Statsd server when the
/// `.emit()` method is called, in the thread of the caller. Bytes and packets
/// sent or dropped are counted and exposed through `.stats()`.
pub struct UdpMetricSink {
    addr: SocketAddr,
    socket: UdpSocket,
    stats: SocketStats,
}

impl UdpMetricSink {
    /// Construct a new `UdpMetricSink` instance.
    ///
    /// The address should be the address of the remote metric server to
    /// emit metrics to over UDP. The socket should already be bound to a
    /// local address with any desired configuration applied (blocking vs
    /// non-blocking, timeouts, etc.).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::net::UdpSocket;
    /// use dotstat::{UdpMetricSink, DEFAULT_PORT};
    ///
    /// let socket = UdpSocket::bind("0.0.0.0:0").unwrap();
    /// let host = ("metrics.example.com", DEFAULT_PORT);
    /// let sink = UdpMetricSink::from(host, socket);
    /// ```
    ///
    /// # Failures
    ///
    /// This method may fail if:
    ///
    /// * It is unable to resolve the hostname of the metric server.
    /// * The host address is otherwise unable to be parsed
    pub fn from<A>(to_addr: A, socket: UdpSocket) -> MetricResult<UdpMetricSink>
    where
        A: ToSocketAddrs,
    {
        let addr = get_addr(to_addr)?;
        let stats = SocketStats::default();
        Ok(UdpMetricSink { addr, socket, stats })
    }

    /// Address datagrams are sent to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl MetricSink for UdpMetricSink {
    fn emit(&self, metric: &str) -> io::Result<usize> {
        self.stats
            .update(self.socket.send_to(metric.as_bytes(), self.addr), metric.len())
    }

    fn stats(&self) -> SinkStats {
        (&self.stats).into()
    }
}

impl fmt::Debug for UdpMetricSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UdpMetricSink {{ addr: {}, socket: ..., stats: {:?} }}", self.addr, self.stats())
    }
}

#[cfg(test)]
mod tests {
    use super::{get_addr, MetricSink, UdpMetricSink};
    use std::net::{SocketAddr, UdpSocket};

    #[test]
    fn test_get_addr_bad_address() {
        let res = get_addr("asdf");
        assert!(res.is_err());
    }

    #[test]
    fn test_get_addr_valid_address() {
        let res = get_addr("127.0.0.1:8125");
        assert!(res.is_ok());
    }

    #[test]
    fn test_get_addr_keeps_ipv6_only_address() {
        let addr = get_addr(("::1", 8125)).unwrap();
        assert!(addr.is_ipv6());
    }

    #[test]
    fn test_get_addr_prefers_ipv4() {
        let addrs: Vec<SocketAddr> = vec!["[::1]:8125".parse().unwrap(), "127.0.0.1:8125".parse().unwrap()];
        let addr = get_addr(&addrs[..]).unwrap();
        assert_eq!("127.0.0.1:8125".parse::<SocketAddr>().unwrap(), addr);
    }

    #[test]
    fn test_udp_metric_sink() {
        let socket = UdpSocket::bind("0.0.0.0:0").unwrap();
        let sink = UdpMetricSink::from("127.0.0.1:8125", socket).unwrap();
        assert_eq!(17, sink.emit("buz:1.00000000|ms").unwrap());

        let stats = sink.stats();
        assert_eq!(1, stats.packets_sent);
        assert_eq!(17, stats.bytes_sent);
    }

    #[test]
    fn test_non_blocking_udp_metric_sink() {
        let socket = UdpSocket::bind("0.0.0.0:0").unwrap();
        socket.set_nonblocking(true).unwrap();
        let sink = UdpMetricSink::from("127.0.0.1:8125", socket).unwrap();
        assert_eq!(17, sink.emit("baz:2.50000000|ms").unwrap());
    }
}
