// dotstat - Namespaced Statsd timers for Rust
//
// Copyright 2026 The dotstat Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Composition of dotted metric names.
//!
//! Every boundary that produces a metric name (constructing a client,
//! deriving a sub-client, sending a timing) goes through `join` so that
//! empty parts never leave stray separators behind.

use std::fmt::{Display, Write};

/// Separator placed between the parts of a metric name.
pub const SEPARATOR: char = '.';

/// Join the non-empty string forms of `parts` with `.`, in order.
///
/// # Example
///
/// ```
/// use dotstat::name;
///
/// assert_eq!("a.b", name::join(["a", "", "b"]));
/// assert_eq!("app.7", name::join(["app".to_string(), 7.to_string()]));
/// assert_eq!("", name::join(Vec::<&str>::new()));
/// ```
pub fn join<I>(parts: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let mut out = String::new();
    let mut part = String::new();

    for item in parts {
        part.clear();
        // Writing to a String cannot fail
        let _ = write!(part, "{}", item);
        if part.is_empty() {
            continue;
        }

        if !out.is_empty() {
            out.push(SEPARATOR);
        }
        out.push_str(&part);
    }

    out
}
