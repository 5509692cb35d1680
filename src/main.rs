/*
 * Flock Background
 *
 * Runs a flocking simulation as a decorative animated background. Each boid
 * follows separation, alignment and cohesion with others of its color group,
 * plus a slow wander. The world wraps at every edge.
 *
 * Parameters come from a TOML file (`--config`) or one of the built-in
 * presets, with a few command-line overrides on top. Logging goes through
 * tracing; set RUST_LOG to override the default level.
 */

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flock_background::app;
use flock_background::cli::Cli;
use flock_background::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Some(path) = &cli.config {
        info!(path = %path.display(), "loading configuration");
    }
    let params = match cli.load_params() {
        Ok(params) => params,
        Err(err) => {
            error!(%err, "invalid configuration");
            return Err(err);
        }
    };

    if !params.enabled {
        info!("flock disabled, nothing to show");
        return Ok(());
    }

    app::run();
    Ok(())
}
