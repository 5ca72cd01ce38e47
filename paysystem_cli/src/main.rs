//! Entry point for the `paysystem` binary.

use paysystem_cli::run_cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run_cli().await
}
