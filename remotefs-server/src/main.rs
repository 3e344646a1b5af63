//! Binary entry point: installs structured logging and serves forever.
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    if let Err(e) = remotefs_server::run() {
        tracing::error!(error = %e, "remotefs-server exited");
        std::process::exit(1);
    }
}
