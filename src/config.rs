// dotstat - Namespaced Statsd timers for Rust
//
// Copyright 2026 The dotstat Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Explicit configuration for the default Statsd connection.
//!
//! Nothing in this crate reads configuration implicitly. Applications build a
//! `ConnectionConfig` at their composition root, either by hand, from the
//! defaults, or from the environment, and pass it to
//! `StatsdConnection::from_config` or `Client::from_config`.

use std::env;

use crate::types::{ErrorKind, MetricError, MetricResult};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8125;
pub const DEFAULT_SAMPLE_RATE: f32 = 1.0;

pub const ENV_HOST: &str = "STATSD_HOST";
pub const ENV_PORT: &str = "STATSD_PORT";
pub const ENV_SAMPLE_RATE: &str = "STATSD_SAMPLE_RATE";
pub const ENV_DISABLED: &str = "STATSD_DISABLED";

/// Settings for a `StatsdConnection` writing over UDP.
///
/// # Example
///
/// ```
/// use dotstat::ConnectionConfig;
///
/// let config = ConnectionConfig {
///     host: "metrics.example.com".to_string(),
///     sample_rate: 0.5,
///     ..ConnectionConfig::default()
/// };
///
/// assert_eq!(8125, config.port);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionConfig {
    /// Host name or address of the Statsd server
    pub host: String,
    /// UDP port of the Statsd server
    pub port: u16,
    /// Fraction of sends that are kept, in `(0, 1]`
    pub sample_rate: f32,
    /// When set, every send is dropped without touching the network
    pub disabled: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectionConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            sample_rate: DEFAULT_SAMPLE_RATE,
            disabled: false,
        }
    }
}

impl ConnectionConfig {
    /// Build a configuration from the `STATSD_HOST`, `STATSD_PORT`,
    /// `STATSD_SAMPLE_RATE`, and `STATSD_DISABLED` environment variables.
    /// Variables that are not set keep their default value.
    ///
    /// # Failures
    ///
    /// Returns an `InvalidInput` error if a variable is set to something
    /// that cannot be parsed.
    pub fn from_env() -> MetricResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> MetricResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConnectionConfig::default();

        if let Some(host) = lookup(ENV_HOST) {
            config.host = host;
        }

        if let Some(port) = lookup(ENV_PORT) {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| MetricError::from((ErrorKind::InvalidInput, "STATSD_PORT is not a valid port")))?;
        }

        if let Some(rate) = lookup(ENV_SAMPLE_RATE) {
            config.sample_rate = rate.trim().parse().map_err(|_| {
                MetricError::from((ErrorKind::InvalidInput, "STATSD_SAMPLE_RATE is not a number"))
            })?;
        }

        if let Some(disabled) = lookup(ENV_DISABLED) {
            config.disabled = parse_flag(&disabled)?;
        }

        Ok(config)
    }
}

fn parse_flag(val: &str) -> MetricResult<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(MetricError::from((
            ErrorKind::InvalidInput,
            "STATSD_DISABLED is not a boolean",
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::{ConnectionConfig, DEFAULT_HOST, DEFAULT_PORT};
    use crate::types::ErrorKind;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConnectionConfig::default();
        assert_eq!(DEFAULT_HOST, config.host);
        assert_eq!(DEFAULT_PORT, config.port);
        assert_eq!(1.0, config.sample_rate);
        assert!(!config.disabled);
    }

    #[test]
    fn test_from_lookup_empty() {
        let config = ConnectionConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(ConnectionConfig::default(), config);
    }

    #[test]
    fn test_from_lookup_all_set() {
        let config = ConnectionConfig::from_lookup(lookup_from(&[
            ("STATSD_HOST", "metrics.internal"),
            ("STATSD_PORT", " 9125 "),
            ("STATSD_SAMPLE_RATE", "0.25"),
            ("STATSD_DISABLED", "True"),
        ]))
        .unwrap();

        assert_eq!("metrics.internal", config.host);
        assert_eq!(9125, config.port);
        assert_eq!(0.25, config.sample_rate);
        assert!(config.disabled);
    }

    #[test]
    fn test_from_lookup_bad_port() {
        let res = ConnectionConfig::from_lookup(lookup_from(&[("STATSD_PORT", "eighty")]));
        assert_eq!(ErrorKind::InvalidInput, res.unwrap_err().kind());
    }

    #[test]
    fn test_from_lookup_bad_sample_rate() {
        let res = ConnectionConfig::from_lookup(lookup_from(&[("STATSD_SAMPLE_RATE", "most")]));
        assert_eq!(ErrorKind::InvalidInput, res.unwrap_err().kind());
    }

    #[test]
    fn test_from_lookup_bad_flag() {
        let res = ConnectionConfig::from_lookup(lookup_from(&[("STATSD_DISABLED", "maybe")]));
        assert_eq!(ErrorKind::InvalidInput, res.unwrap_err().kind());
    }

    #[test]
    fn test_from_lookup_false_flag() {
        let config = ConnectionConfig::from_lookup(lookup_from(&[("STATSD_DISABLED", "0")])).unwrap();
        assert!(!config.disabled);
    }
}
