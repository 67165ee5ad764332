//! The forwarding path a proxy runs for each call

use std::sync::Arc;

use tracing::debug;

use crate::decorate::Decorate;
use crate::dispatch::{CallResult, Callable};
use crate::invocation::Invocation;
use crate::strategy::Strategy;

/// One call's journey from the proxy boundary to the target and back
///
/// A bound strategy takes the whole call and no hooks fire. Otherwise the
/// default path brackets the target: `on_calling` first, then the target,
/// then exactly one of `on_called` or `on_threw`, and the target's result
/// or error goes back to the caller untouched.
pub(crate) struct Pipeline<'a> {
    target: &'a dyn Callable,
    decorator: &'a dyn Decorate,
    strategy: Option<&'a Arc<dyn Strategy>>,
}

impl<'a> Pipeline<'a> {
    pub(crate) fn new(
        target: &'a dyn Callable,
        decorator: &'a dyn Decorate,
        strategy: Option<&'a Arc<dyn Strategy>>,
    ) -> Self {
        Self {
            target,
            decorator,
            strategy,
        }
    }

    pub(crate) async fn run(&self, invocation: Invocation) -> CallResult {
        if let Some(strategy) = self.strategy {
            debug!(call = %invocation, "dispatching through bound strategy");
            return strategy.execute(self.target, &invocation).await;
        }

        self.decorator.on_calling(&invocation);
        debug!(call = %invocation, "forwarding to target");

        let result = self
            .target
            .call(&invocation.method().method, invocation.args().to_vec())
            .await;

        match &result {
            Ok(value) => {
                debug!(call = %invocation, "target returned");
                self.decorator.on_called(&invocation, value);
            }
            Err(error) => {
                debug!(call = %invocation, %error, "target raised");
                self.decorator.on_threw(&invocation, error);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{ContractDescriptor, ContractShape, MethodId};
    use crate::dispatch::CallError;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::{Value, json};

    #[derive(Debug, thiserror::Error)]
    enum GreetError {
        #[error("a name is required")]
        MissingName,
    }

    type Log = Arc<Mutex<Vec<String>>>;

    struct GreetTarget {
        contract: ContractDescriptor,
        log: Log,
    }

    impl GreetTarget {
        fn new(log: Log) -> Self {
            Self {
                contract: ContractDescriptor::new("Greeter", ContractShape::Interface)
                    .with_method("say_hello", &["name"]),
                log,
            }
        }
    }

    #[async_trait]
    impl Callable for GreetTarget {
        fn contract(&self) -> &ContractDescriptor {
            &self.contract
        }

        async fn call(&self, method: &str, args: Vec<Value>) -> CallResult {
            self.log.lock().push(format!("target {method}"));
            let name = args[0].as_str().unwrap_or_default();
            if name.is_empty() {
                return Err(CallError::target(method, GreetError::MissingName));
            }
            Ok(json!(format!("Hello, {name}!")))
        }
    }

    struct Recorder {
        log: Log,
    }

    impl Decorate for Recorder {
        fn on_calling(&self, invocation: &Invocation) {
            self.log
                .lock()
                .push(format!("on_calling {}", invocation.method().method));
        }

        fn on_called(&self, invocation: &Invocation, result: &Value) {
            self.log
                .lock()
                .push(format!("on_called {} -> {result}", invocation.method().method));
        }

        fn on_threw(&self, invocation: &Invocation, _error: &CallError) {
            self.log
                .lock()
                .push(format!("on_threw {}", invocation.method().method));
        }
    }

    struct Canned;

    #[async_trait]
    impl Strategy for Canned {
        async fn execute(&self, _target: &dyn Callable, _invocation: &Invocation) -> CallResult {
            Ok(json!("from strategy"))
        }
    }

    fn say_hello(name: &str) -> Invocation {
        Invocation::new(MethodId::new("Greeter", "say_hello"), vec![json!(name)])
    }

    #[tokio::test]
    async fn test_default_path_brackets_the_target() {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let target = GreetTarget::new(Arc::clone(&log));
        let recorder = Recorder {
            log: Arc::clone(&log),
        };

        let pipeline = Pipeline::new(&target, &recorder, None);
        let result = pipeline.run(say_hello("John")).await.unwrap();

        assert_eq!(result, json!("Hello, John!"));
        assert_eq!(
            *log.lock(),
            vec![
                "on_calling say_hello".to_string(),
                "target say_hello".to_string(),
                "on_called say_hello -> \"Hello, John!\"".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_fires_on_threw_and_reraises_verbatim() {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let target = GreetTarget::new(Arc::clone(&log));
        let recorder = Recorder {
            log: Arc::clone(&log),
        };

        let pipeline = Pipeline::new(&target, &recorder, None);
        let err = pipeline.run(say_hello("")).await.unwrap_err();

        // The caller sees the exact error the target raised.
        match &err {
            CallError::Target { source, .. } => {
                assert!(matches!(
                    source.downcast_ref::<GreetError>(),
                    Some(GreetError::MissingName)
                ));
            }
            other => panic!("expected target error, got {other:?}"),
        }

        assert_eq!(
            *log.lock(),
            vec![
                "on_calling say_hello".to_string(),
                "target say_hello".to_string(),
                "on_threw say_hello".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_bound_strategy_silences_hooks_and_target() {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let target = GreetTarget::new(Arc::clone(&log));
        let recorder = Recorder {
            log: Arc::clone(&log),
        };
        let strategy: Arc<dyn Strategy> = Arc::new(Canned);

        let pipeline = Pipeline::new(&target, &recorder, Some(&strategy));
        let result = pipeline.run(say_hello("John")).await.unwrap();

        assert_eq!(result, json!("from strategy"));
        assert!(log.lock().is_empty());
    }
}
