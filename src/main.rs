use tracing::error;
use tracing_subscriber::{fmt as tfmt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    if let Err(error) = news_relay::run().await {
        error!(error = %error, "News relay failed to start");
        std::process::exit(1);
    }
}
