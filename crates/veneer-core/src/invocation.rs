//! A single intercepted call moving through the engine

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use crate::contract::MethodId;

/// One call captured at the proxy boundary
///
/// Arguments travel as a slice of JSON values in declaration order. The
/// slice is empty for zero-parameter methods, never absent: hooks and
/// strategies can always index it without a presence check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invocation {
    id: Uuid,
    method: MethodId,
    args: Vec<Value>,
}

impl Invocation {
    /// Capture a new invocation with a fresh id
    pub fn new(method: MethodId, args: Vec<Value>) -> Self {
        Self {
            id: Uuid::new_v4(),
            method,
            args,
        }
    }

    /// Unique identifier for this call
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Identity of the method being called
    pub fn method(&self) -> &MethodId {
        &self.method
    }

    /// Arguments in declaration order, empty for zero-parameter methods
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Number of arguments carried by this call
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Get a typed argument by position
    pub fn arg<T>(&self, index: usize) -> Option<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        self.args
            .get(index)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Split into method identity and arguments, dropping the id
    pub fn into_parts(self) -> (MethodId, Vec<Value>) {
        (self.method, self.args)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({} args) [{}]",
            self.method,
            self.args.len(),
            self.id
        )
    }
}
