//! Per-method call strategies and their registration table

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::dispatch::{CallResult, Callable};
use crate::invocation::Invocation;

/// A replacement for the default forwarding path of a single method
///
/// When a strategy is bound to a method, the proxy hands it the target
/// and the captured invocation and steps aside: no lifecycle hooks fire,
/// and whatever the strategy returns is what the caller sees. The
/// strategy decides whether the target runs at all.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Execute the call in place of the default path
    async fn execute(&self, target: &dyn Callable, invocation: &Invocation) -> CallResult;
}

/// Table binding method names to strategies
///
/// Populated while a proxy is built, frozen afterwards. Binding the same
/// method twice replaces the earlier strategy.
#[derive(Default)]
pub struct StrategyRegistry {
    entries: HashMap<String, Arc<dyn Strategy>>,
}

impl StrategyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a strategy to a method name
    pub fn bind(&mut self, method: impl Into<String>, strategy: Arc<dyn Strategy>) {
        self.entries.insert(method.into(), strategy);
    }

    /// Look up the strategy bound to a method, if any
    pub fn resolve(&self, method: &str) -> Option<&Arc<dyn Strategy>> {
        self.entries.get(method)
    }

    /// Method names with a bound strategy, sorted
    pub fn methods(&self) -> Vec<&str> {
        let mut methods: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        methods.sort_unstable();
        methods
    }

    /// Number of bound strategies
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no strategies are bound
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove all bindings
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("methods", &self.methods())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{ContractDescriptor, ContractShape, MethodId};
    use crate::dispatch::CallError;
    use serde_json::{Value, json};

    struct Canned(Value);

    #[async_trait]
    impl Strategy for Canned {
        async fn execute(&self, _target: &dyn Callable, _invocation: &Invocation) -> CallResult {
            Ok(self.0.clone())
        }
    }

    struct Forwarding;

    #[async_trait]
    impl Strategy for Forwarding {
        async fn execute(&self, target: &dyn Callable, invocation: &Invocation) -> CallResult {
            target
                .call(&invocation.method().method, invocation.args().to_vec())
                .await
        }
    }

    struct Upper {
        contract: ContractDescriptor,
    }

    #[async_trait]
    impl Callable for Upper {
        fn contract(&self) -> &ContractDescriptor {
            &self.contract
        }

        async fn call(&self, method: &str, args: Vec<Value>) -> CallResult {
            match method {
                "shout" => {
                    let word = args[0].as_str().unwrap_or_default();
                    Ok(json!(word.to_uppercase()))
                }
                other => Err(CallError::unknown_method("Upper", other)),
            }
        }
    }

    fn upper() -> Upper {
        Upper {
            contract: ContractDescriptor::new("Upper", ContractShape::Interface)
                .with_method("shout", &["word"]),
        }
    }

    #[test]
    fn test_bind_and_resolve() {
        let mut registry = StrategyRegistry::new();
        assert!(registry.is_empty());

        registry.bind("say_hello", Arc::new(Canned(json!("hi"))));
        assert_eq!(registry.len(), 1);
        assert!(registry.resolve("say_hello").is_some());
        assert!(registry.resolve("wave").is_none());
    }

    #[test]
    fn test_rebinding_replaces() {
        let mut registry = StrategyRegistry::new();
        registry.bind("say_hello", Arc::new(Canned(json!("first"))));
        registry.bind("say_hello", Arc::new(Canned(json!("second"))));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_methods_are_sorted() {
        let mut registry = StrategyRegistry::new();
        registry.bind("wave", Arc::new(Canned(Value::Null)));
        registry.bind("say_hello", Arc::new(Canned(Value::Null)));
        assert_eq!(registry.methods(), vec!["say_hello", "wave"]);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_canned_strategy_skips_the_target() {
        let target = upper();
        let invocation = Invocation::new(MethodId::new("Upper", "shout"), vec![json!("quiet")]);

        let strategy = Canned(json!("override"));
        let result = strategy.execute(&target, &invocation).await.unwrap();
        assert_eq!(result, json!("override"));
    }

    #[tokio::test]
    async fn test_forwarding_strategy_reaches_the_target() {
        let target = upper();
        let invocation = Invocation::new(MethodId::new("Upper", "shout"), vec![json!("quiet")]);

        let result = Forwarding.execute(&target, &invocation).await.unwrap();
        assert_eq!(result, json!("QUIET"));
    }
}
