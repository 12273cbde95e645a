use clap::Parser;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use color_eyre::eyre::{WrapErr, eyre};
use tracing_subscriber::EnvFilter;

use bidstack::{
    app::App,
    config::{Config, ConfigLoader, ConfigValidator, LoggingConfig},
    data::HttpGateway,
    globals,
};

#[derive(Parser)]
#[command(name = "bidstack")]
#[command(about = "Search, select, delete and export public procurement bid notices", long_about = None)]
struct Cli {
    /// Path to the YAML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Validate config and exit (don't run TUI)
    #[arg(long)]
    validate: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Log to a file; the terminal belongs to the UI.
/// `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) -> color_eyre::Result<PathBuf> {
    let path = logging.resolved_file();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .map_err(|e| eyre!("Invalid log level '{}': {}", logging.level, e))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();

    Ok(path)
}

fn print_summary(config: &Config) {
    println!("\nConfig Summary:");
    println!("  App: {}", config.app.name);
    println!("  API: {} (timeout {})", config.api.base_url, config.api.timeout);
    println!("  Search window: {} days", config.search.default_days);
    println!(
        "  Export: {}",
        config
            .export
            .resolved_directory()
            .join(&config.export.filename)
            .display()
    );
    println!("  Log file: {}", config.logging.resolved_file().display());
    println!();
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    match &cli.config {
        Some(path) => println!("Loading config from: {:?}", path),
        None => println!("No config file given, using defaults"),
    }
    let config = match ConfigLoader::load(cli.config.as_deref()) {
        Ok(cfg) => {
            println!("✓ Config loaded successfully");
            cfg
        }
        Err(e) => {
            eprintln!("✗ Failed to load config: {}", e);
            eprintln!("\nError details: {:?}", e);
            std::process::exit(1);
        }
    };

    println!("Validating config...");
    if let Err(e) = ConfigValidator::validate(&config) {
        eprintln!("✗ Config validation failed: {}", e);
        eprintln!("\nFull error chain:");
        for cause in e.chain() {
            eprintln!("  - {}", cause);
        }
        std::process::exit(1);
    }
    println!("✓ Config is valid");

    if cli.verbose {
        print_summary(&config);
    }

    if cli.validate {
        println!("\n✓ Configuration is valid!");
        return Ok(());
    }

    let log_path = init_logging(&config.logging)?;
    println!("Logging to {}", log_path.display());
    tracing::info!(base_url = %config.api.base_url, "starting");

    globals::init_http_client(config.api.timeout())
        .map_err(|e| eyre!("Failed to initialize HTTP client: {}", e))?;
    let gateway = Arc::new(HttpGateway::new(&config.api));

    println!("Starting TUI...\n");
    let terminal = ratatui::init();
    let app = App::new(config, gateway).map_err(|e| eyre!("{}", e))?;
    let result = app.run(terminal).await.map_err(|e| eyre!("{}", e));
    ratatui::restore();
    result
}
