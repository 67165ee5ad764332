//! Example of wrapping a service in a lifecycle-observing proxy

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use veneer_core::{CallError, FnDecorator, Proxy, contract};

contract! {
    /// A small greeting service.
    pub trait Greeter {
        async fn say_hello(&self, name: String) -> Result<String, GreetError>;
        async fn wave(&self) -> Result<String, GreetError>;
    }
    dispatch: GreeterDispatch;
    client: GreeterClient;
}

#[derive(Debug, thiserror::Error)]
pub enum GreetError {
    #[error("a name is required")]
    MissingName,
    #[error(transparent)]
    Call(#[from] CallError),
}

/// The real implementation the proxy forwards to
struct HelloService;

#[async_trait::async_trait]
impl Greeter for HelloService {
    async fn say_hello(&self, name: String) -> Result<String, GreetError> {
        if name.is_empty() {
            return Err(GreetError::MissingName);
        }
        // Simulate a service that takes a moment to answer.
        tokio::time::sleep(Duration::from_millis(250)).await;
        Ok(format!("Hello, {name}!"))
    }

    async fn wave(&self) -> Result<String, GreetError> {
        Ok("o/".to_string())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("👋 Greetings Example");
    println!("====================");

    let decorator = FnDecorator::new()
        .when_calling(|inv| println!("   -> calling {}", inv.method()))
        .when_called(|inv, result| println!("   <- {} returned {result}", inv.method()))
        .when_threw(|inv, error| println!("   <- {} threw: {error}", inv.method()));

    let target = Arc::new(GreeterDispatch::new(HelloService));
    let proxy = Proxy::create(target, Arc::new(decorator))?;
    let greeter = GreeterClient::new(Arc::new(proxy));

    println!("\n🟢 Greeting John...");
    let greeting = greeter.say_hello("John".to_string()).await?;
    println!("✅ {greeting}");

    println!("\n🔴 Greeting nobody...");
    match greeter.say_hello(String::new()).await {
        Ok(_) => println!("❓ unexpected success"),
        Err(err) => println!("❌ {err}"),
    }

    println!("\n🟢 Waving...");
    println!("✅ {}", greeter.wave().await?);

    println!("\n🎉 Greetings example completed!");
    Ok(())
}
