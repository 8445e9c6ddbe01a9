#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = uniport_rust::run().await {
        eprintln!("uniport-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
