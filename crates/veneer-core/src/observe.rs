//! Ready-made decorators and strategies for observing calls

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::decorate::Decorate;
use crate::dispatch::{CallError, CallResult, Callable};
use crate::invocation::Invocation;
use crate::strategy::Strategy;

/// Decorator that narrates the call lifecycle through `tracing`
///
/// Argument values are logged at debug level only; method identity and
/// outcome go out at info and warn.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceDecorator;

impl Decorate for TraceDecorator {
    fn on_calling(&self, invocation: &Invocation) {
        debug!(args = ?invocation.args(), "call arguments");
        info!(call = %invocation, "method calling");
    }

    fn on_called(&self, invocation: &Invocation, _result: &Value) {
        info!(call = %invocation, "method returned");
    }

    fn on_threw(&self, invocation: &Invocation, error: &CallError) {
        warn!(call = %invocation, %error, "method threw");
    }
}

/// Decorator that measures wall-clock time per call
///
/// Start instants are keyed by invocation id, so overlapping calls to
/// the same method pair up correctly. A completion with no matching
/// start is ignored.
///
/// A call whose future is dropped mid-flight (a caller-side timeout or
/// `select!`) never reaches a completion hook, so its entry stays in the
/// table. Long-running hosts should reclaim those entries periodically
/// with [`drain_stale`](Self::drain_stale) or [`clear`](Self::clear).
#[derive(Debug, Default)]
pub struct CallTimer {
    inflight: Mutex<HashMap<Uuid, Instant>>,
}

impl CallTimer {
    /// Create a new timer with nothing in flight
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of calls started but not yet finished
    pub fn inflight(&self) -> usize {
        self.inflight.lock().len()
    }

    /// Drop entries that have been in flight for at least `max_age`
    ///
    /// Cancelled calls leave their start entries behind; draining on a
    /// schedule keeps the table bounded. Returns how many entries were
    /// dropped.
    pub fn drain_stale(&self, max_age: Duration) -> usize {
        let mut inflight = self.inflight.lock();
        let before = inflight.len();
        inflight.retain(|_, started| started.elapsed() < max_age);
        let dropped = before - inflight.len();
        if dropped > 0 {
            debug!(dropped, "stale timing entries dropped");
        }
        dropped
    }

    /// Forget every in-flight entry
    pub fn clear(&self) {
        self.inflight.lock().clear();
    }
}

impl Decorate for CallTimer {
    fn on_calling(&self, invocation: &Invocation) {
        self.inflight.lock().insert(invocation.id(), Instant::now());
        debug!(call = %invocation, "timing started");
    }

    fn on_called(&self, invocation: &Invocation, _result: &Value) {
        if let Some(started) = self.inflight.lock().remove(&invocation.id()) {
            info!(
                call = %invocation,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "method completed"
            );
        }
    }

    fn on_threw(&self, invocation: &Invocation, error: &CallError) {
        if let Some(started) = self.inflight.lock().remove(&invocation.id()) {
            warn!(
                call = %invocation,
                elapsed_ms = started.elapsed().as_millis() as u64,
                %error,
                "method failed"
            );
        }
    }
}

/// Strategy that forwards to the target and logs the elapsed time
///
/// Bound per method, this replaces the lifecycle hooks for that method
/// with a single timed span around the real call. The target's result or
/// error passes through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimingStrategy;

#[async_trait]
impl Strategy for TimingStrategy {
    async fn execute(&self, target: &dyn Callable, invocation: &Invocation) -> CallResult {
        debug!(call = %invocation, "timing started");
        let started = Instant::now();
        let result = target
            .call(&invocation.method().method, invocation.args().to_vec())
            .await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => info!(call = %invocation, elapsed_ms, "method completed"),
            Err(error) => warn!(call = %invocation, elapsed_ms, %error, "method failed"),
        }

        result
    }
}
