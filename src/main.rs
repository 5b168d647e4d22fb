//! weather-mcp-server: MCP server exposing WeatherAPI lookups as tools
//!
//! Serves the weather tools over HTTP (default) or stdin/stdout.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use weather_mcp_server::config::{self, Config};
use weather_mcp_server::mcp::{Dispatcher, HttpServer, LineTransport, StdioServer};
use weather_mcp_server::shutdown::shutdown_signal;
use weather_mcp_server::weather::{build_registry, WeatherClient};

/// Transport to serve requests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    /// JSON bodies over HTTP.
    Http,
    /// Newline-delimited JSON on stdin/stdout.
    Stdio,
}

/// MCP server exposing WeatherAPI lookups as tools.
///
/// Requires `WEATHER_API_KEY` in the environment.
#[derive(Parser, Debug)]
#[command(name = "weather-mcp-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Transport to serve on
    #[arg(short, long, value_enum, default_value_t = Transport::Http)]
    transport: Transport,

    /// HTTP port (overrides PORT and the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN,
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber. Logs go to stderr so stdout stays
/// free for the stdio transport.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs the selected transport until it ends or a shutdown signal arrives.
async fn serve(transport: Transport, dispatcher: Arc<Dispatcher>, port: u16) -> Result<(), String> {
    match transport {
        Transport::Http => HttpServer::new(dispatcher, port)
            .run_with_shutdown(shutdown_signal())
            .await
            .map_err(|e| e.to_string()),
        Transport::Stdio => {
            info!("Serving on stdin/stdout");
            StdioServer::new(LineTransport::stdio(), dispatcher)
                .run_with_shutdown(shutdown_signal())
                .await
                .map_err(|e| e.to_string())
        }
    }
}

/// Entry point for the weather-mcp-server.
fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration
    let config_path = args.config.as_deref();
    let mut cfg: Config = match config::load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            if config_path.is_none() {
                eprintln!("\nSet {} to your WeatherAPI key.", config::API_KEY_VAR);
                if let Some(default_path) = config::default_config_path() {
                    eprintln!("Optional settings are read from: {}", default_path.display());
                }
            }
            return ExitCode::FAILURE;
        }
    };
    if let Some(port) = args.port {
        cfg.port = port;
    }

    // Initialise logging
    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    let client = match WeatherClient::new(&cfg) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!(error = %e, "Failed to create WeatherAPI client");
            return ExitCode::FAILURE;
        }
    };

    let registry = match build_registry(client) {
        Ok(registry) => Arc::new(registry),
        Err(e) => {
            error!(error = %e, "Failed to register tools");
            return ExitCode::FAILURE;
        }
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        transport = ?args.transport,
        port = cfg.port,
        api_key = %cfg.masked_api_key(),
        base_url = %cfg.base_url,
        "Starting weather-mcp-server"
    );
    info!(tools = ?registry.names().collect::<Vec<_>>(), "Tools registered");

    let dispatcher = Arc::new(Dispatcher::new(registry));

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to create Tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(serve(args.transport, dispatcher, cfg.port)) {
        Ok(()) => {
            info!("Server shut down gracefully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}
