// dotstat - Namespaced Statsd timers for Rust
//
// Copyright 2026 The dotstat Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Export commonly used parts of dotstat for easy glob imports
//!
//! # Example
//!
//! ```
//! use dotstat::prelude::*;
//! use dotstat::{Client, NopMetricSink, StatsdConnection};
//!
//! let connection = StatsdConnection::builder(NopMetricSink).build().unwrap().shared();
//! let client = Client::new("some.prefix", connection);
//!
//! assert_eq!("some.prefix.db", client.get_client(Some("db")).name());
//! ```

pub use crate::client::Namespaced;
pub use crate::connection::Connection;
pub use crate::sinks::MetricSink;
pub use crate::timer::ToTimerDelta;
