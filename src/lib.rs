//! Veneer
//!
//! Transparent interception and decoration for service contracts. This
//! crate is a thin facade over [`veneer_core`], which holds the engine;
//! see that crate for the full API.

// Re-export commonly used types
pub use veneer_core::{
    BoxError, CallError, CallResult, CallTimer, Callable, ContractDescriptor, ContractShape,
    Decorate, FnDecorator, Invocation, MethodDescriptor, MethodId, NoopDecorator, Proxy,
    ProxyBuilder, ProxyError, ProxyResult, Strategy, StrategyRegistry, TimingStrategy,
    TraceDecorator, Value, from_value, to_value,
};

// The contract! macro and the module of the same name
pub use veneer_core::contract;
