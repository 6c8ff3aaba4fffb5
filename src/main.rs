use clap::Parser;
use mockingjay::MockingjayServerBuilder;
use std::{path::PathBuf, process::ExitCode};
use tracing_subscriber::EnvFilter;

/// Holds command line parameters provided by the user.
#[derive(Parser, Debug)]
#[command(version, about)]
struct CommandLineParameters {
    /// Port the fake server listens on.
    #[arg(short, long, env = "MOCKINGJAY_PORT", default_value_t = 9090)]
    port: u16,
    /// YAML/JSON file, or directory of files, with the fake endpoints to serve.
    #[arg(short, long, env = "MOCKINGJAY_CONFIG")]
    config: Option<PathBuf>,
    /// Listen on all interfaces instead of loopback only.
    #[arg(short, long, env = "MOCKINGJAY_EXPOSE")]
    expose: bool,
    /// Log one line per served request.
    #[arg(long, env = "MOCKINGJAY_PRINT_ACCESS_LOG")]
    print_access_log: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mockingjay=info")),
        )
        .init();

    let params = CommandLineParameters::parse();

    tracing::info!(
        "Starting {} server V{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let server = match MockingjayServerBuilder::new()
        .port(params.port)
        .expose(params.expose)
        .print_access_log(params.print_access_log)
        .config_file_option(params.config)
        .build()
    {
        Ok(server) => server,
        Err(err) => {
            tracing::error!("cannot configure server: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("cannot listen for shutdown signal: {}", err);
            std::future::pending::<()>().await;
        }
    };

    match server.start_with_signals(None, shutdown).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("server error: {}", err);
            ExitCode::FAILURE
        }
    }
}
