use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    deskmate::cli::run().await
}
