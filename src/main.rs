//! Runs the Shelf API server with settings from the environment.

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let settings = shelf_api::load_from_env();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shelf_api=info")),
        )
        .init();

    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    if let Err(e) = shelf_api::start(&settings).await {
        tracing::error!(error = %e, "server stopped");
        std::process::exit(1);
    }
}
