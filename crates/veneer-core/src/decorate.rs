//! Lifecycle decorators observing calls at the proxy boundary

use std::fmt;
use std::sync::Arc;

use crate::dispatch::CallError;
use crate::invocation::Invocation;
use serde_json::Value;

/// Observer attached to every call a proxy forwards
///
/// For each forwarded call the proxy fires `on_calling` before the target
/// runs, then exactly one of `on_called` or `on_threw` after it. Hooks run
/// inline on the calling task and see argument and result values, but
/// cannot change them, suppress the call, or swallow the error. A hook
/// that panics unwinds through the proxy like any other panic.
pub trait Decorate: Send + Sync {
    /// Called before the target method runs
    fn on_calling(&self, invocation: &Invocation) {
        let _ = invocation;
    }

    /// Called after the target method returned successfully
    fn on_called(&self, invocation: &Invocation, result: &Value) {
        let _ = (invocation, result);
    }

    /// Called after the target method raised an error
    fn on_threw(&self, invocation: &Invocation, error: &CallError) {
        let _ = (invocation, error);
    }
}

/// Decorator that observes nothing
///
/// Useful when a proxy exists only for its strategy table.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDecorator;

impl Decorate for NoopDecorator {}

type CallingFn = dyn Fn(&Invocation) + Send + Sync;
type CalledFn = dyn Fn(&Invocation, &Value) + Send + Sync;
type ThrewFn = dyn Fn(&Invocation, &CallError) + Send + Sync;

/// Decorator assembled from plain closures
///
/// Stages left unset stay silent.
pub struct FnDecorator {
    on_calling: Option<Arc<CallingFn>>,
    on_called: Option<Arc<CalledFn>>,
    on_threw: Option<Arc<ThrewFn>>,
}

impl FnDecorator {
    /// Create a decorator with no stages set
    pub fn new() -> Self {
        Self {
            on_calling: None,
            on_called: None,
            on_threw: None,
        }
    }

    /// Set the closure to run before each call
    pub fn when_calling<F>(mut self, f: F) -> Self
    where
        F: Fn(&Invocation) + Send + Sync + 'static,
    {
        self.on_calling = Some(Arc::new(f));
        self
    }

    /// Set the closure to run after each successful call
    pub fn when_called<F>(mut self, f: F) -> Self
    where
        F: Fn(&Invocation, &Value) + Send + Sync + 'static,
    {
        self.on_called = Some(Arc::new(f));
        self
    }

    /// Set the closure to run after each failed call
    pub fn when_threw<F>(mut self, f: F) -> Self
    where
        F: Fn(&Invocation, &CallError) + Send + Sync + 'static,
    {
        self.on_threw = Some(Arc::new(f));
        self
    }
}

impl Decorate for FnDecorator {
    fn on_calling(&self, invocation: &Invocation) {
        if let Some(f) = &self.on_calling {
            f(invocation);
        }
    }

    fn on_called(&self, invocation: &Invocation, result: &Value) {
        if let Some(f) = &self.on_called {
            f(invocation, result);
        }
    }

    fn on_threw(&self, invocation: &Invocation, error: &CallError) {
        if let Some(f) = &self.on_threw {
            f(invocation, error);
        }
    }
}

impl Default for FnDecorator {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for FnDecorator {
    fn clone(&self) -> Self {
        Self {
            on_calling: self.on_calling.as_ref().map(Arc::clone),
            on_called: self.on_called.as_ref().map(Arc::clone),
            on_threw: self.on_threw.as_ref().map(Arc::clone),
        }
    }
}

impl fmt::Debug for FnDecorator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnDecorator")
            .field("on_calling", &self.on_calling.is_some())
            .field("on_called", &self.on_called.is_some())
            .field("on_threw", &self.on_threw.is_some())
            .finish()
    }
}
