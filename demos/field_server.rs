//! # Field server demo
//!
//! Offers field `0x9999` (eventgroup `0x0022`) of service `[5678.1234]`.
//! The field value alternates every 5 cycles between ten `0x00` bytes and
//! five `0x11` bytes.
//!
//! ```text
//! cargo run --example field_server --features logging -- --cycle 200
//! ```

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use servicevisor::{
    Binding, Coordinator, CoordinatorConfig, EventId, EventSpec, EventgroupId, LogWriter,
    LoopbackMiddleware, ServiceInstance, Subscribe, ToggleEvery,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const SERVICE: ServiceInstance = ServiceInstance::new(0x5678, 0x1234);
const EVENTGROUP: EventgroupId = EventgroupId(0x0022);
const EVENT: EventId = EventId(0x9999);

#[derive(Parser, Debug)]
#[command(about = "Field server with an alternating value")]
struct Args {
    /// Publication cycle in milliseconds.
    #[arg(long, default_value_t = 1000)]
    cycle: u64,

    /// Number of cycles between two value switches.
    #[arg(long, default_value_t = 5)]
    period: u32,

    /// Offer the field over TCP instead of UDP.
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
    let middleware = Arc::new(LoopbackMiddleware::new("field_server"));
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];

    let coord = Coordinator::builder(
        cfg,
        middleware.clone(),
        Binding::provider(SERVICE, EventSpec::field(EVENT).in_group(EVENTGROUP)),
    )
    .with_source(ToggleEvery::new(args.period, vec![0x00; 10], vec![0x11; 5]))
    .with_subscribers(subs)
    .build();

    coord.init()?;

    let runner = Arc::clone(&coord);
    let events = tokio::spawn(async move { runner.start().await });

    tokio::signal::ctrl_c().await?;
    info!("interrupted, stopping");
    coord.stop().await;
    events.await??;

    info!(
        notifications = middleware.notifications().len(),
        last_len = coord.current_payload().len(),
        "done"
    );
    Ok(())
}
