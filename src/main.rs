use clap::Parser;
use docnav::cli::{Cli, run};
use docnav::tracing::{LogFormat, init};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for results.
    init(if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Compact
    });

    run(&cli).await.inspect_err(|e| {
        tracing::error!("docnav failed: {:#}", e);
    })
}
