// dotstat - Namespaced Statsd timers for Rust
//
// Copyright 2026 The dotstat Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Random sampling of payloads for connections with a rate below one.
//!
//! Sampling only happens when the `sample-rate` feature is enabled. Without
//! it a `Sampler` keeps every payload and reports a rate of one, so the
//! server never scales up counts that were not actually sampled.

/// Fraction of payloads kept by a connection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Sampler {
    rate: f32,
}

impl Sampler {
    /// Sampler for a connection configured with `rate`, which must already
    /// be validated to be in `(0, 1]`.
    pub(crate) fn new(rate: f32) -> Self {
        if cfg!(feature = "sample-rate") {
            Sampler { rate }
        } else {
            Self::keep_all()
        }
    }

    /// Sampler that keeps everything and reports no rate.
    pub(crate) fn keep_all() -> Self {
        Sampler { rate: 1.0 }
    }

    /// The rate actually applied, and therefore the one kept lines should
    /// be annotated with.
    pub(crate) fn rate(&self) -> f32 {
        self.rate
    }

    pub(crate) fn sample<T>(&self, item: T) -> Option<T> {
        if self.rate >= 1.0 || roll(self.rate) {
            Some(item)
        } else {
            None
        }
    }
}

#[cfg(feature = "sample-rate")]
fn roll(rate: f32) -> bool {
    use rand::Rng;
    rand::thread_rng().gen_bool(rate.into())
}

#[cfg(not(feature = "sample-rate"))]
fn roll(_rate: f32) -> bool {
    true
}
