//! Example of timing calls with a per-method strategy

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use veneer_core::{CallError, CallTimer, Decorate, Proxy, TimingStrategy, contract};

contract! {
    /// Background jobs worth timing.
    pub trait Worker {
        async fn do_work(&self) -> Result<u64, WorkError>;
        async fn quick_check(&self) -> Result<bool, WorkError>;
    }
    dispatch: WorkerDispatch;
    client: WorkerClient;
}

#[derive(Debug, thiserror::Error)]
pub enum WorkError {
    #[error(transparent)]
    Call(#[from] CallError),
}

struct BatchWorker;

#[async_trait::async_trait]
impl Worker for BatchWorker {
    async fn do_work(&self) -> Result<u64, WorkError> {
        tokio::time::sleep(Duration::from_millis(400)).await;
        Ok(42)
    }

    async fn quick_check(&self) -> Result<bool, WorkError> {
        Ok(true)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("⏱️ Performance Logging Example");
    println!("==============================");

    let timer = Arc::new(CallTimer::new());
    let proxy = Proxy::builder()
        .with_target(Arc::new(WorkerDispatch::new(BatchWorker)))
        .with_decorator(Arc::clone(&timer) as Arc<dyn Decorate>)
        .with_strategy("do_work", Arc::new(TimingStrategy))
        .build()?;
    let worker = WorkerClient::new(Arc::new(proxy));

    println!("\n🔄 do_work goes through the timing strategy, no lifecycle hooks...");
    let answer = worker.do_work().await?;
    println!("✅ result: {answer}");

    println!("\n🔄 quick_check takes the default path, observed by CallTimer...");
    let healthy = worker.quick_check().await?;
    println!("✅ healthy: {healthy}");
    println!("   timers still in flight: {}", timer.inflight());

    println!("\n🎉 Performance logging example completed!");
    Ok(())
}
