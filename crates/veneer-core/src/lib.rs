//! Veneer Core Library
//!
//! This crate implements the interception engine: proxies that stand in
//! for a service contract, forward every call to a wrapped target, and
//! let collaborators observe or replace calls without the caller
//! noticing.
//!
//! Three pieces cooperate:
//!
//! - [`Proxy`] fronts a [`Callable`] target and satisfies the same
//!   contract, so callers (and other proxies) cannot tell them apart.
//! - A [`Decorate`] collaborator sees each call's lifecycle: `on_calling`
//!   before the target runs, then exactly one of `on_called` or
//!   `on_threw` after it. Results and errors pass through verbatim.
//! - A [`Strategy`] bound to a single method through the proxy's
//!   registration table replaces the default path entirely; no hooks
//!   fire for that method.
//!
//! The [`contract!`] macro generates the typed surface around the engine:
//! the contract trait, a dispatch adapter for targets, and a typed client
//! for callers.
//!
//! The engine is runtime agnostic. It never spawns tasks, sleeps, or
//! imposes timeouts; hooks run inline on the calling task, and a call
//! costs one capture of its arguments plus whatever the hooks do.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use veneer_core::{CallError, Proxy, TraceDecorator, contract};
//!
//! contract! {
//!     pub trait Greeter {
//!         async fn say_hello(&self, name: String) -> Result<String, GreetError>;
//!     }
//!     dispatch: GreeterDispatch;
//!     client: GreeterClient;
//! }
//!
//! #[derive(Debug, thiserror::Error)]
//! pub enum GreetError {
//!     #[error("a name is required")]
//!     MissingName,
//!     #[error(transparent)]
//!     Call(#[from] CallError),
//! }
//!
//! struct HelloService;
//!
//! #[async_trait::async_trait]
//! impl Greeter for HelloService {
//!     async fn say_hello(&self, name: String) -> Result<String, GreetError> {
//!         if name.is_empty() {
//!             return Err(GreetError::MissingName);
//!         }
//!         Ok(format!("Hello, {name}!"))
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let target = Arc::new(GreeterDispatch::new(HelloService));
//! let proxy = Proxy::create(target, Arc::new(TraceDecorator))?;
//! let greeter = GreeterClient::new(Arc::new(proxy));
//!
//! assert_eq!(greeter.say_hello("John".into()).await?, "Hello, John!");
//! # Ok(())
//! # }
//! ```

pub mod contract;
pub mod decorate;
pub mod dispatch;
pub mod error;
pub mod invocation;
mod macros;
pub mod observe;
mod pipeline;
pub mod proxy;
pub mod strategy;

// Re-export commonly used types
pub use contract::{ContractDescriptor, ContractShape, MethodDescriptor, MethodId};
pub use decorate::{Decorate, FnDecorator, NoopDecorator};
pub use dispatch::{BoxError, CallError, CallResult, Callable};
pub use error::{ProxyError, ProxyResult};
pub use invocation::Invocation;
pub use observe::{CallTimer, TimingStrategy, TraceDecorator};
pub use proxy::{Proxy, ProxyBuilder};
pub use strategy::{Strategy, StrategyRegistry};

// JSON values are the argument currency of the dynamic surface; generated
// code and hand-written callables agree on these through the re-export.
pub use serde_json::{Value, from_value, to_value};
