use anyhow::Result;

use guardian::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
