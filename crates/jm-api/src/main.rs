#[tokio::main]
async fn main() {
    if let Err(err) = jm_api::run().await {
        tracing::error!(error = %err, "jm-api failed");
        eprintln!("jm-api failed: {err}");
        std::process::exit(1);
    }
}
