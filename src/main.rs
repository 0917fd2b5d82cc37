//! Classwatch CLI entry point.

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use classwatch::cli::{Cli, Commands};
use classwatch::domain::models::LoggingConfig;
use classwatch::infrastructure::config::ConfigLoader;

/// Initialize tracing: stderr always, plus daily-rolling JSON files
/// when a log directory is configured. The guard must stay alive for
/// the file writer to flush.
fn init_tracing(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    match logging.dir.as_deref() {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "classwatch.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            let file_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking_file)
                .with_ansi(false);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr_layer)
                .with(file_layer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr_layer)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() {
    // Logging settings ride the same layered config as everything
    // else; before `init` has run (or when the config is broken) fall
    // back to defaults and let the command surface the real error.
    let logging = ConfigLoader::load().map(|c| c.logging).unwrap_or_default();
    let _guard = init_tracing(&logging);

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init(args) => classwatch::cli::commands::init::execute(args, cli.json).await,
        Commands::Account(args) => classwatch::cli::commands::account::execute(args, cli.json).await,
        Commands::Filter(args) => classwatch::cli::commands::filter::execute(args, cli.json).await,
        Commands::Catalog(args) => classwatch::cli::commands::catalog::execute(args, cli.json).await,
        Commands::Calendar(args) => {
            classwatch::cli::commands::calendar::execute(args, cli.json).await
        }
        Commands::Check(args) => classwatch::cli::commands::check::execute(args, cli.json).await,
        Commands::Run(args) => classwatch::cli::commands::run::execute(args, cli.json).await,
    };

    if let Err(err) = result {
        classwatch::cli::handle_error(&err, cli.json);
    }
}
