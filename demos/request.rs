//! # Request client demo
//!
//! Requests service `[1234.5678]` and, once it is reported available, sends
//! a 10-byte request to method `0x0421` every cycle.
//!
//! The loopback middleware has no remote side, so the demo announces the
//! service after `--appear-after` milliseconds and withdraws it again
//! after `--vanish-after` (0 = never). It echoes every request back as a
//! response, which the log writer reports as `response received`.
//!
//! ```text
//! cargo run --example request --features logging -- --cycle 500 --vanish-after 5000
//! ```

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use servicevisor::{
    Binding, Coordinator, CoordinatorConfig, FixedPayload, LogWriter, LoopbackMiddleware,
    MethodId, ServiceInstance, Subscribe,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const SERVICE: ServiceInstance = ServiceInstance::new(0x1234, 0x5678);
const METHOD: MethodId = MethodId(0x0421);

#[derive(Parser, Debug)]
#[command(about = "Periodic request client")]
struct Args {
    /// Request cycle in milliseconds.
    #[arg(long, default_value_t = 1000)]
    cycle: u64,

    /// Send requests over UDP instead of TCP.
    #[arg(long)]
    udp: bool,

    /// Delay before the simulated service becomes available, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    appear_after: u64,

    /// Delay before the simulated service disappears again, in milliseconds.
    #[arg(long, default_value_t = 0)]
    vanish_after: u64,
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
        use_reliable_transport: !args.udp,
        ..CoordinatorConfig::default()
    };
    let middleware = Arc::new(LoopbackMiddleware::new("client_sample").echo_responses());
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];

    let coord = Coordinator::builder(cfg, middleware.clone(), Binding::consumer(SERVICE, METHOD))
        .with_source(FixedPayload::counting(10))
        .with_subscribers(subs)
        .build();

    coord.init()?;

    let runner = Arc::clone(&coord);
    let events = tokio::spawn(async move { runner.start().await });

    let remote = middleware.clone();
    let (appear, vanish) = (args.appear_after, args.vanish_after);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(appear)).await;
        remote.set_available(SERVICE, true);
        if vanish > 0 {
            tokio::time::sleep(Duration::from_millis(vanish)).await;
            remote.set_available(SERVICE, false);
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("interrupted, stopping");
    coord.stop().await;
    events.await??;

    info!(requests = middleware.sent().len(), "done");
    Ok(())
}
