#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = scorebook_rust::run().await {
        eprintln!("scorebook-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
