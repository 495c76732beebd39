//! Doorwatch - Raspberry Pi Door Sensor Monitor Binary
//!
//! A standalone binary that samples a reed switch on a GPIO pin and serves
//! its state over a minimal web interface.

use clap::{Args, Parser, Subcommand};
use doorwatch::{
    start_web_server, Sampler, SensorConfig, StateReading, StateStore, WebConfig,
    DEFAULT_POLL_INTERVAL_SECS, DEFAULT_WEB_PORT,
};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "doorwatch")]
#[command(about = "🚪 Doorwatch - Raspberry Pi Door Sensor Monitor")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Austin Couch")]
#[command(long_about = "Monitors a door reed switch on a GPIO pin and serves its state over HTTP")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// BCM number of the sensor input pin
    #[arg(long)]
    pin: u8,

    /// Poll interval in seconds
    #[arg(short, long, default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    interval: f64,

    /// Two-character 0/1 LED pattern applied when the sensor reads open
    #[arg(long)]
    open_leds: Option<String>,

    /// Two-character 0/1 LED pattern applied when the sensor reads closed
    #[arg(long)]
    closed_leds: Option<String>,

    /// Label reported for the open state
    #[arg(long, default_value = "open")]
    open_label: String,

    /// Label reported for the closed state
    #[arg(long, default_value = "closed")]
    closed_label: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the sampler and web server (default)
    Serve(ServeArgs),

    /// Print state changes to the terminal without serving HTTP
    Watch,
}

#[derive(Args)]
struct ServeArgs {
    /// Web server bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Web server port
    #[arg(short, long, default_value_t = DEFAULT_WEB_PORT)]
    port: u16,

    /// Disable CORS headers
    #[arg(long)]
    no_cors: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging
    init_logging(&cli)?;

    // Print banner
    print_banner();

    // Reject bad LED patterns and intervals before anything starts
    let config = sensor_config(&cli)?;

    match &cli.command {
        Some(Commands::Serve(args)) => {
            serve_command(config, args).await?;
        }
        Some(Commands::Watch) => {
            watch_command(config).await?;
        }
        None => {
            // Default to serve command
            let serve_args = ServeArgs {
                host: "0.0.0.0".to_string(),
                port: DEFAULT_WEB_PORT,
                no_cors: false,
            };
            serve_command(config, &serve_args).await?;
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

fn print_banner() {
    println!("🚪 Doorwatch - Raspberry Pi Door Sensor Monitor");
    println!("   Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
}

fn sensor_config(cli: &Cli) -> doorwatch::Result<SensorConfig> {
    let open_pattern = cli.open_leds.as_deref().map(str::parse).transpose()?;
    let closed_pattern = cli.closed_leds.as_deref().map(str::parse).transpose()?;

    Ok(SensorConfig::new(cli.pin)
        .with_poll_interval_secs(cli.interval)?
        .with_open_pattern(open_pattern)
        .with_closed_pattern(closed_pattern)
        .with_labels(cli.open_label.as_str(), cli.closed_label.as_str()))
}

async fn serve_command(config: SensorConfig, args: &ServeArgs) -> anyhow::Result<()> {
    info!("Starting doorwatch monitor...");

    let store = Arc::new(StateStore::new(&config));
    let sampler = Sampler::spawn(config, store.clone())?;
    info!("Sampler started");

    let web_config = WebConfig::new(&args.host, args.port).with_cors(!args.no_cors);

    info!("Web server configuration:");
    info!("  - Bind address: {}", web_config.bind_address());
    info!("  - CORS enabled: {}", web_config.enable_cors);

    start_web_server(web_config, store).await?;

    // Returns after ctrl-c; stop and join the sampler before exiting.
    drop(sampler);

    Ok(())
}

async fn watch_command(config: SensorConfig) -> anyhow::Result<()> {
    let interval = config.poll_interval;
    let store = Arc::new(StateStore::new(&config));
    let sampler = Sampler::spawn(config, store.clone())?;

    println!("Watching sensor (ctrl-c to exit)");

    let mut shown: Option<StateReading> = None;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = tokio::time::sleep(interval) => {
                let reading = store.read();
                if shown.as_ref() != Some(&reading) {
                    print_reading(&reading);
                    shown = Some(reading);
                }
            }
        }
    }

    drop(sampler);

    Ok(())
}

fn print_reading(reading: &StateReading) {
    let since = reading
        .ts
        .and_then(|ts| chrono::DateTime::from_timestamp(ts as i64, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());

    println!(
        "{} (since {})",
        reading.state.as_deref().unwrap_or("None"),
        since
    );
}
