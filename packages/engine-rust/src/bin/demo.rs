//! Runs the instrumented calculator and order services once and prints a
//! summary of what they returned.

use clap::Parser;
use interpose::service::{run_demo, DemoArgs, DemoConfig};
use interpose::telemetry::init_tracing;

#[derive(Debug, Parser)]
#[command(name = "interpose-demo", version, about)]
struct Cli {
    #[command(flatten)]
    demo: DemoArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = DemoConfig::from(cli.demo);
    init_tracing(&config.telemetry)?;

    let report = run_demo(&config).await?;

    println!("sum: {}", report.sum);
    println!("processed: {}", report.processed);
    println!("order: {}", report.order);
    println!("batch: {:?}", report.batch);
    println!("division by zero handled: {}", report.division_handled);
    println!("Demo completed.");
    Ok(())
}
