// dotstat - Namespaced Statsd timers for Rust
//
// Copyright 2026 The dotstat Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/// Wrap a function so that every call is timed by a sub-timer of `$timer`.
///
/// With two arguments the function's own identifier is used as the metric
/// name; for a path such as `handlers::login` that is the last segment
/// (`login`). With three, the given name is used instead. Either way the metric
/// is sent under `<timer name>.<name>` with no further suffix.
///
/// The wrapped function takes a single argument; use `()` for functions
/// without arguments and a tuple for functions with several.
///
/// # Examples
///
/// ```
/// use dotstat::{decorate, NopMetricSink, StatsdConnection, Timer};
///
/// let connection = StatsdConnection::builder(NopMetricSink).build().unwrap().shared();
/// let timer = Timer::new("application_name", connection);
///
/// fn some_function(n: u64) -> u64 {
///     n * 2
/// }
///
/// // "application_name.some_function"
/// let timed = decorate!(timer, some_function);
/// assert_eq!(4, timed(2));
///
/// // "application_name.my_timer"
/// let named = decorate!(timer, "my_timer", some_function);
/// assert_eq!(6, named(3));
/// ```
#[macro_export]
macro_rules! decorate {
    ($timer:expr, $function:path) => {
        $timer.decorate(
            stringify!($function).rsplit(':').next().unwrap_or("").trim(),
            $function,
        )
    };

    ($timer:expr, $name:expr, $function:expr) => {
        $timer.decorate($name, $function)
    };
}
