//! Proxy construction and call-time dispatch

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::contract::{ContractDescriptor, MethodId};
use crate::decorate::Decorate;
use crate::dispatch::{CallError, CallResult, Callable};
use crate::error::{ProxyError, ProxyResult};
use crate::invocation::Invocation;
use crate::pipeline::Pipeline;
use crate::strategy::{Strategy, StrategyRegistry};

/// A stand-in that satisfies the same contract as its target
///
/// Every call entering the proxy is checked against the contract, captured
/// as an [`Invocation`], and run through the forwarding path: either the
/// strategy bound to that method, or the default path that brackets the
/// target with the decorator's lifecycle hooks.
///
/// The proxy holds no interior state and adds no synchronization; it is as
/// concurrent as its target and decorator. Since a proxy is itself a
/// [`Callable`] advertising the same contract, proxies nest.
pub struct Proxy {
    target: Arc<dyn Callable>,
    decorator: Arc<dyn Decorate>,
    strategies: StrategyRegistry,
    contract: ContractDescriptor,
}

impl Proxy {
    /// Wrap a target so every call is observed by the decorator
    ///
    /// Fails when the target's contract is not interface-shaped. The
    /// answer is final: retrying with the same contract fails the same
    /// way.
    pub fn create(target: Arc<dyn Callable>, decorator: Arc<dyn Decorate>) -> ProxyResult<Self> {
        ProxyBuilder::new()
            .with_target(target)
            .with_decorator(decorator)
            .build()
    }

    /// Start building a proxy with strategies
    pub fn builder() -> ProxyBuilder {
        ProxyBuilder::new()
    }

    /// The wrapped target
    pub fn target(&self) -> &Arc<dyn Callable> {
        &self.target
    }

    /// The attached decorator
    pub fn decorator(&self) -> &Arc<dyn Decorate> {
        &self.decorator
    }

    /// The strategy table, frozen at build time
    pub fn strategies(&self) -> &StrategyRegistry {
        &self.strategies
    }
}

#[async_trait]
impl Callable for Proxy {
    fn contract(&self) -> &ContractDescriptor {
        &self.contract
    }

    async fn call(&self, method: &str, args: Vec<Value>) -> CallResult {
        // Guard the dynamic surface before anything observable happens;
        // a call that never matches the contract fires no hooks.
        let Some(descriptor) = self.contract.method(method) else {
            return Err(CallError::unknown_method(&self.contract.name, method));
        };
        if args.len() != descriptor.arity() {
            return Err(CallError::arity_mismatch(
                method,
                descriptor.arity(),
                args.len(),
            ));
        }

        let invocation = Invocation::new(MethodId::new(&self.contract.name, method), args);
        Pipeline::new(
            self.target.as_ref(),
            self.decorator.as_ref(),
            self.strategies.resolve(method),
        )
        .run(invocation)
        .await
    }
}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("contract", &self.contract.name)
            .field("strategies", &self.strategies.methods())
            .finish()
    }
}

/// Builder for proxies that carry per-method strategies
#[derive(Default)]
pub struct ProxyBuilder {
    target: Option<Arc<dyn Callable>>,
    decorator: Option<Arc<dyn Decorate>>,
    strategies: StrategyRegistry,
}

impl ProxyBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target to forward calls to
    pub fn with_target(mut self, target: Arc<dyn Callable>) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the decorator observing the default path
    pub fn with_decorator(mut self, decorator: Arc<dyn Decorate>) -> Self {
        self.decorator = Some(decorator);
        self
    }

    /// Bind a strategy to one of the contract's methods
    ///
    /// Binding the same method twice keeps the later strategy.
    pub fn with_strategy(mut self, method: impl Into<String>, strategy: Arc<dyn Strategy>) -> Self {
        self.strategies.bind(method, strategy);
        self
    }

    /// Assemble the proxy
    ///
    /// Validates that a target and a decorator were supplied, that the
    /// target's contract can be fronted, and that every bound strategy
    /// names a declared method.
    pub fn build(self) -> ProxyResult<Proxy> {
        let target = self.target.ok_or(ProxyError::MissingTarget)?;
        let decorator = self.decorator.ok_or(ProxyError::MissingDecorator)?;

        let contract = target.contract().clone();
        contract.ensure_proxyable()?;

        for method in self.strategies.methods() {
            if !contract.declares(method) {
                return Err(ProxyError::unknown_strategy_method(&contract.name, method));
            }
        }

        debug!(
            contract = %contract,
            strategies = self.strategies.len(),
            "proxy assembled"
        );

        Ok(Proxy {
            target,
            decorator,
            strategies: self.strategies,
            contract,
        })
    }
}

impl fmt::Debug for ProxyBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyBuilder")
            .field("target", &self.target.is_some())
            .field("decorator", &self.decorator.is_some())
            .field("strategies", &self.strategies.methods())
            .finish()
    }
}
