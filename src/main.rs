use bizgen_core::cli::{self, Cli, Commands};
use bizgen_core::config::{Config, LogFormat};
use bizgen_core::error::AppError;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt}; // for .with() on registry

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ Invalid configuration: {:#}", e);
            std::process::exit(2);
        }
    };

    // Setup logging
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }

    if let Err(e) = run(cli, &config).await {
        let app_error = e.downcast_ref::<AppError>();
        let code = app_error.map(AppError::exit_code).unwrap_or(1);
        let operational = app_error.map(AppError::is_operational).unwrap_or(false);
        tracing::error!(error = %e, exit_code = code, operational, "Command failed");
        eprintln!("✗ {:#}", e);
        std::process::exit(code);
    }
}

async fn run(cli: Cli, config: &Config) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Populate { count, rescore }) => {
            cli::handle_populate(config, count, rescore).await
        }
        Some(Commands::Export { count, output }) => cli::handle_export(config, count, output),
        Some(Commands::Screen { input, csv }) => cli::handle_screen(input, csv),
        Some(Commands::Config) => cli::handle_config_validate(config),
        None => cli::handle_populate(config, None, false).await,
    }
}
