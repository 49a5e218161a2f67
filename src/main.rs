//! sensorlink - Serial Sensor Sampling Console
//!
//! Standalone binary driving the sensor board from a terminal and hosting the
//! reading ingestion API.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use sensorlink::{
    device::{describe_port, list_ports},
    run_console, Command, ControlState, ControlSurface, DeviceHandle, DeviceLink, ReadingStore,
    ReportFormat, RunConfig, SerialConfig, WebConfig, DEFAULT_BAUD_RATE, DEFAULT_INTERVAL_SECS,
    DEFAULT_TOTAL_MINUTES, DEFAULT_WEB_PORT,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "sensorlink")]
#[command(about = "Serial sensor sampling console and reading ingestion API")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = "Controls a serial-connected sensor board, runs timed temperature \
measurement series with spreadsheet reports, and stores readings pushed over HTTP")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu for the sensor board
    Shell(ShellArgs),

    /// Send a single command and print the reply
    Send(SendArgs),

    /// Read the temperature once
    Measure(DeviceArgs),

    /// Run one interval measurement series and write the report
    Sample(ShellArgs),

    /// Start the reading ingestion API
    Serve(ServeArgs),

    /// List serial ports
    ListPorts,
}

#[derive(Args)]
struct DeviceArgs {
    /// Serial port the board is attached to
    #[arg(long, env = "SENSORLINK_PORT", default_value = "/dev/ttyACM0")]
    port: String,

    /// Serial baud rate
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    baud: u32,

    /// Use a simulated board instead of a serial port
    #[arg(long)]
    simulate: bool,
}

#[derive(Args)]
struct ShellArgs {
    #[command(flatten)]
    device: DeviceArgs,

    /// Total sampling time in minutes
    #[arg(long, default_value_t = DEFAULT_TOTAL_MINUTES)]
    minutes: u32,

    /// Seconds between measurements
    #[arg(long, default_value_t = DEFAULT_INTERVAL_SECS)]
    interval: u32,

    /// Directory receiving report files
    #[arg(long, default_value = ".")]
    report_dir: PathBuf,

    /// Report format: xlsx or csv
    #[arg(long, default_value = "xlsx")]
    format: ReportFormat,
}

#[derive(Args)]
struct SendArgs {
    #[command(flatten)]
    device: DeviceArgs,

    /// Command name (e.g. led-on, read-temperature) or wire string (e.g. modo1)
    command: Command,
}

#[derive(Args)]
struct ServeArgs {
    /// Web server bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Web server port
    #[arg(short, long, default_value_t = DEFAULT_WEB_PORT)]
    port: u16,

    /// Shared secret required in the x-api-key header
    #[arg(long, env = "SENSORLINK_API_KEY")]
    api_key: Option<String>,

    /// Disable CORS headers
    #[arg(long)]
    no_cors: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging
    init_logging(&cli)?;

    match cli.command {
        Commands::Shell(args) => shell_command(args).await,
        Commands::Send(args) => send_command(args).await,
        Commands::Measure(args) => measure_command(args).await,
        Commands::Sample(args) => sample_command(args).await,
        Commands::Serve(args) => serve_command(args).await,
        Commands::ListPorts => list_ports_command(),
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let filter = log_filter(log_level(cli), std::env::var(EnvFilter::DEFAULT_ENV).ok());

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

fn log_level(cli: &Cli) -> Level {
    if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    }
}

// RUST_LOG wins over the command line flags when it holds valid directives.
fn log_filter(level: Level, directives: Option<String>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(level.as_str().to_ascii_lowercase()))
}

async fn connect(args: &DeviceArgs) -> anyhow::Result<DeviceHandle> {
    let config = SerialConfig::new(&args.port).with_baud_rate(args.baud);
    DeviceHandle::connect(&config, args.simulate)
        .await
        .with_context(|| format!("Failed to open serial port {}", args.port))
}

fn surface_for(
    link: DeviceHandle,
    args: &ShellArgs,
) -> ControlSurface<DeviceHandle, std::io::Stdout> {
    let state = ControlState::new(RunConfig::new(args.minutes, args.interval));
    ControlSurface::new(link, std::io::stdout())
        .with_state(state)
        .with_report_dir(&args.report_dir)
        .with_report_format(args.format)
        .with_interrupt_watch(true)
}

async fn shell_command(args: ShellArgs) -> anyhow::Result<()> {
    let link = connect(&args.device).await?;
    let mut surface = surface_for(link, &args);

    info!("Starting interactive console");
    run_console(&mut surface, BufReader::new(tokio::io::stdin())).await?;

    Ok(())
}

async fn send_command(args: SendArgs) -> anyhow::Result<()> {
    let mut link = connect(&args.device).await?;
    let reply = link.send(args.command).await?;
    println!("{}: {}", args.command.label(), reply);
    Ok(())
}

async fn measure_command(args: DeviceArgs) -> anyhow::Result<()> {
    let mut link = connect(&args).await?;
    let reply = link.send(Command::ReadTemperature).await?;
    println!("Temperature: {} °C", reply);
    Ok(())
}

async fn sample_command(args: ShellArgs) -> anyhow::Result<()> {
    let link = connect(&args.device).await?;
    let mut surface = surface_for(link, &args);
    surface.interval_run().await?;
    Ok(())
}

async fn serve_command(args: ServeArgs) -> anyhow::Result<()> {
    let config = WebConfig::new(&args.host, args.port)
        .with_cors(!args.no_cors)
        .with_api_key(args.api_key);

    info!("Web server configuration:");
    info!("  - Bind address: {}", config.bind_address());
    info!("  - CORS enabled: {}", config.enable_cors);
    info!("  - API key required: {}", config.api_key.is_some());

    sensorlink::start_web_server(config, Arc::new(ReadingStore::new())).await?;
    Ok(())
}

fn list_ports_command() -> anyhow::Result<()> {
    let ports = list_ports()?;

    println!("Available serial ports:");
    if ports.is_empty() {
        println!("  (none)");
    }
    for port in &ports {
        println!("  {}", describe_port(port));
    }

    Ok(())
}
