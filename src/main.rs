#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = courseflow_rust::run().await {
        eprintln!("courseflow-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
