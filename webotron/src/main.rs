use anyhow::Result;
use clap::Parser;
use webotron::cli::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment (AWS_* variables may live in .env)
    dotenvy::dotenv().ok();

    // Logs go to stderr so listing output on stdout stays clean.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    tracing::info!("CLI application startup: tracing initialised, environment loaded");

    let cli = Cli::parse();
    let result = run(cli).await;
    match &result {
        Ok(_) => tracing::info!("CLI completed successfully"),
        Err(e) => tracing::error!(error = %e, "CLI exited with error"),
    }
    result
}
