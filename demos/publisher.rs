//! # Publisher demo
//!
//! Offers event `0x8888` (eventgroup `0x2222`) of service `[4321.1111]` and
//! publishes a payload growing from 1 to 9 bytes every cycle, until Ctrl-C.
//!
//! Runs against the in-process [`LoopbackMiddleware`], which reports
//! registration as soon as the coordinator starts.
//!
//! ```text
//! cargo run --example publisher --features logging -- --cycle 500
//! RUST_LOG=servicevisor=debug cargo run --example publisher --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use servicevisor::{
    Binding, Coordinator, CoordinatorConfig, EventId, EventSpec, EventgroupId, LogWriter,
    LoopbackMiddleware, ServiceInstance, SizeRamp, Subscribe,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const SERVICE: ServiceInstance = ServiceInstance::new(0x4321, 0x1111);
const EVENTGROUP: EventgroupId = EventgroupId(0x2222);
const EVENT: EventId = EventId(0x8888);

#[derive(Parser, Debug)]
#[command(about = "Periodic event publisher")]
struct Args {
    /// Publication cycle in milliseconds.
    #[arg(long, default_value_t = 1000)]
    cycle: u64,

    /// Offer the event over TCP instead of UDP.
    #[arg(long)]
    tcp: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let cfg = CoordinatorConfig {
        cycle_interval: Duration::from_millis(args.cycle),
        use_reliable_transport: args.tcp,
        ..CoordinatorConfig::default()
    };
    let middleware = Arc::new(LoopbackMiddleware::new("publisher_example"));
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];

    let coord = Coordinator::builder(
        cfg,
        middleware.clone(),
        Binding::provider(SERVICE, EventSpec::event(EVENT).in_group(EVENTGROUP)),
    )
    .with_source(SizeRamp::default())
    .with_subscribers(subs)
    .build();

    coord.init()?;

    let runner = Arc::clone(&coord);
    let events = tokio::spawn(async move { runner.start().await });

    tokio::signal::ctrl_c().await?;
    info!("interrupted, stopping");
    coord.stop().await;
    events.await??;

    info!(notifications = middleware.notifications().len(), "done");
    Ok(())
}
