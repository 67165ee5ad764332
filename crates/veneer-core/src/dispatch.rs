//! The dynamic call seam between proxies, targets, and strategies

use crate::contract::ContractDescriptor;
use async_trait::async_trait;
use serde_json::Value;

/// Boxed error raised by a target implementation
///
/// Target failures cross the seam as trait objects and come back out
/// unchanged: [`CallError::recover`] downcasts to the concrete type on
/// the caller's side, so the caller sees the same error value the target
/// raised.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result of a dynamic call
pub type CallResult = Result<Value, CallError>;

/// Error type for dynamic dispatch
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// The contract declares no method by this name
    #[error("Contract '{contract}' declares no method '{method}'")]
    UnknownMethod { contract: String, method: String },

    /// The argument count does not match the method's declared arity
    #[error("Method '{method}' expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        method: String,
        expected: usize,
        actual: usize,
    },

    /// An argument could not be converted to the declared parameter type
    #[error("Invalid argument '{param}' for '{method}': {reason}")]
    InvalidArgument {
        method: String,
        param: String,
        reason: String,
    },

    /// The return value could not be converted back to the declared type
    #[error("Invalid return value from '{method}': {reason}")]
    InvalidReturn { method: String, reason: String },

    /// The target raised an error; carried verbatim
    #[error("Method '{method}' failed: {source}")]
    Target {
        method: String,
        #[source]
        source: BoxError,
    },
}

impl CallError {
    /// Create a new unknown method error
    pub fn unknown_method(contract: impl Into<String>, method: impl Into<String>) -> Self {
        Self::UnknownMethod {
            contract: contract.into(),
            method: method.into(),
        }
    }

    /// Create a new arity mismatch error
    pub fn arity_mismatch(method: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ArityMismatch {
            method: method.into(),
            expected,
            actual,
        }
    }

    /// Create a new invalid argument error
    pub fn invalid_argument(
        method: impl Into<String>,
        param: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            method: method.into(),
            param: param.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid return error
    pub fn invalid_return(method: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidReturn {
            method: method.into(),
            reason: reason.into(),
        }
    }

    /// Wrap an error raised by the target
    ///
    /// Pass the error value itself, not a box. Boxing happens here, and
    /// [`recover`](Self::recover) undoes exactly one level of it.
    pub fn target(method: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Target {
            method: method.into(),
            source: source.into(),
        }
    }

    /// Name of the method the error belongs to
    pub fn method(&self) -> &str {
        match self {
            Self::UnknownMethod { method, .. }
            | Self::ArityMismatch { method, .. }
            | Self::InvalidArgument { method, .. }
            | Self::InvalidReturn { method, .. }
            | Self::Target { method, .. } => method,
        }
    }

    /// Whether this error was raised by the target itself
    pub fn is_target(&self) -> bool {
        matches!(self, Self::Target { .. })
    }

    /// Borrow the target-raised error, if any
    pub fn target_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Target { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }

    /// Recover the caller-facing error type
    ///
    /// If the target raised an `E`, the very same value comes back out.
    /// Anything else, engine guards included, is wrapped through
    /// `E::from(CallError)`.
    pub fn recover<E>(self) -> E
    where
        E: std::error::Error + From<CallError> + Send + Sync + 'static,
    {
        match self {
            Self::Target { method, source } => match source.downcast::<E>() {
                Ok(err) => *err,
                Err(source) => E::from(Self::Target { method, source }),
            },
            other => E::from(other),
        }
    }
}

/// Dynamic entry point through which contract methods are invoked
///
/// A `Callable` is anything a proxy can forward to: a dispatch adapter
/// over a concrete service, a strategy's substitute target, or another
/// proxy. Arguments are positional JSON values; a zero-parameter method
/// receives an empty vector, never a missing one.
#[async_trait]
pub trait Callable: Send + Sync {
    /// Describe the contract this callable satisfies
    fn contract(&self) -> &ContractDescriptor;

    /// Invoke a contract method with positional arguments
    async fn call(&self, method: &str, args: Vec<Value>) -> CallResult;
}
