//! Todo service entry point.

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use devtasks::api::{create_router, AppState};
use devtasks::config::Config;
use devtasks::metrics;
use devtasks::store::MemoryStore;
use devtasks::utils::shutdown_signal;

/// Todo list HTTP service.
#[derive(Parser, Debug)]
#[command(name = "devtasks")]
#[command(about = "Todo list HTTP service backed by an in-memory store")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// Interface address to bind (overrides HOST).
    #[arg(long, global = true)]
    host: Option<String>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long, global = true)]
    port: Option<u16>,

    /// Directory of static assets (overrides STATIC_DIR).
    #[arg(long, global = true)]
    static_dir: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the todo API and static assets (default).
    Serve,

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    let config = load_config(&args)?;

    // Initialize logging
    let filter = if config.verbose {
        EnvFilter::new("devtasks=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_new(&config.rust_log).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(&config),
        Some(Command::Serve) | None => cmd_serve(config).await,
    }
}

/// Load configuration from the environment and apply CLI overrides.
///
/// Runs before logging is initialized, so failures surface through the
/// returned error only.
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = Config::load()?;

    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(static_dir) = &args.static_dir {
        config.static_dir = static_dir.clone();
    }
    config.verbose |= args.verbose;

    Ok(config)
}

/// Check configuration validity.
fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("DEVTASKS - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    if let Err(e) = config.validate() {
        println!("FAILED");
        println!("  Error: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed"));
    }
    println!("OK");

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Listen Address: {}", config.socket_addr()?);
    println!("  Static Directory: {}", config.static_dir);
    println!(
        "  Metrics: {}",
        if config.metrics_enabled { "Enabled" } else { "Disabled" }
    );
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Serve the todo API until a shutdown signal arrives.
async fn cmd_serve(config: Config) -> anyhow::Result<()> {
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    let mut app_state = AppState::new(MemoryStore::shared());
    if config.metrics_enabled {
        let handle = metrics::install_prometheus()?;
        app_state = app_state.with_metrics(handle);
        info!("Prometheus metrics available at /metrics");
    }

    if !std::path::Path::new(&config.static_dir).is_dir() {
        warn!("Static directory {} not found; non-API paths will 404", config.static_dir);
    }

    let router = create_router(app_state, &config.static_dir);

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!("Server starting on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
