use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use calculator_engine::api::{AppState, create_router};
use calculator_engine::config::ConfigLoader;
use calculator_engine::logging::{LogFormat, init_logger};

#[derive(Debug, Parser)]
#[command(name = "calculator-engine")]
#[command(about = "Serve the calculator catalog over HTTP", version)]
struct Args {
    /// Directory containing site.yaml and calculators/
    #[arg(long, env = "CALC_CONFIG_DIR", default_value = "./config")]
    config_dir: PathBuf,

    /// Address to listen on
    #[arg(long, env = "CALC_BIND", default_value = "0.0.0.0:3000")]
    bind: String,

    /// Log output format: compact or json
    #[arg(long, default_value = "compact")]
    log_format: LogFormat,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logger(args.verbose, args.log_format);

    let config = match ConfigLoader::load(&args.config_dir) {
        Ok(config) => config,
        Err(e) => {
            error!(config_dir = %args.config_dir.display(), error = %e, "Failed to load catalog");
            return Err(e.into());
        }
    };
    info!(
        calculators = config.calculators().len(),
        locales = config.site().locales.len(),
        "Catalog loaded"
    );

    let app = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    info!(bind = %args.bind, "Listening");

    axum::serve(listener, app).await?;
    Ok(())
}
