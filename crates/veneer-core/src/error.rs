//! Error types for proxy construction

use thiserror::Error;

/// Result type alias for proxy construction
pub type ProxyResult<T> = Result<T, ProxyError>;

/// Errors raised while assembling a proxy
///
/// Everything here surfaces at build time, before the first call goes
/// through. Failures raised during a call are [`CallError`](crate::CallError).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    /// The contract does not have a shape the engine can stand in for
    #[error("Contract '{contract}' cannot be proxied: {reason}")]
    UnsupportedContract { contract: String, reason: String },

    /// No target was supplied
    #[error("Proxy requires a target to forward calls to")]
    MissingTarget,

    /// No decorator was supplied
    #[error("Proxy requires a decorator to observe calls")]
    MissingDecorator,

    /// A strategy was bound to a method the contract does not declare
    #[error("Strategy bound to unknown method '{method}' on contract '{contract}'")]
    UnknownStrategyMethod { contract: String, method: String },
}

impl ProxyError {
    /// Create a new unsupported contract error
    pub fn unsupported_contract(contract: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedContract {
            contract: contract.into(),
            reason: reason.into(),
        }
    }

    /// Create a new unknown strategy method error
    pub fn unknown_strategy_method(contract: impl Into<String>, method: impl Into<String>) -> Self {
        Self::UnknownStrategyMethod {
            contract: contract.into(),
            method: method.into(),
        }
    }
}
