use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use std::path::PathBuf;
use wx_station::{CsvLogSink, Station, StationConfig};
use wx_station_core::BoxedSink;
use wx_station_displayers::build_display;
use wx_station_sources::{build_sensor, BACKENDS};
use wx_station_types::SensorConfig;

/// wx-station - temperature and humidity station with display, CSV log and web page
#[derive(Parser, Debug, Clone)]
#[command(name = "wx-station")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file to load instead of the per-user one
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Port for the web status page (overrides the config file)
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,

    /// CSV log file (overrides the config file)
    #[arg(long = "data-file", value_name = "FILE")]
    data_file: Option<PathBuf>,

    /// Use the simulated sensor instead of real hardware
    #[arg(short = 's', long = "simulate")]
    simulate: bool,

    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,

    /// Print the effective configuration as JSON and exit
    #[arg(long = "print-config")]
    print_config: bool,

    /// Write the effective configuration to the config file and exit
    #[arg(long = "save-config")]
    save_config: bool,

    /// List available sensor backends
    #[arg(short = 'l', long = "list-sensors")]
    list_sensors: bool,
}

fn main() {
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info
    // Level 2: debug
    // Level 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    warn!("Starting wx-station v{}", env!("CARGO_PKG_VERSION"));

    // Handle --list-sensors option (list backends and exit)
    if cli.list_sensors {
        list_sensor_backends();
        return;
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            std::process::exit(2);
        }
    };

    if cli.print_config {
        match serde_json::to_string_pretty(&config) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize config: {}", e);
                std::process::exit(2);
            }
        }
        return;
    }

    if cli.save_config {
        if let Err(e) = save_config(&cli, &config) {
            eprintln!("Failed to save config: {:#}", e);
            std::process::exit(2);
        }
        return;
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    match runtime.block_on(run(config)) {
        Ok(()) => warn!("wx-station stopped"),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Fatal error: {:#}", e);
            eprintln!("Hardware resources released. Exiting.");
            std::process::exit(1);
        }
    }
}

/// List available sensor backends to stdout
fn list_sensor_backends() {
    println!("Available sensor backends ({}):", BACKENDS.len());
    for (id, name) in BACKENDS {
        println!("  {:<10} {}", id, name);
    }
}

/// Save to the explicit config path, else the per-user one
fn save_config(cli: &Cli, config: &StationConfig) -> Result<()> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => StationConfig::config_path()?,
    };
    config.save_to_path(&path)?;
    println!("Configuration written to {}", path.display());
    Ok(())
}

/// Config file (explicit or per-user) with CLI overrides applied
fn load_config(cli: &Cli) -> Result<StationConfig> {
    let mut config = match &cli.config {
        Some(path) => StationConfig::load_from_path(path)?,
        None => StationConfig::load()?,
    };

    if let Some(port) = cli.port {
        config.web_port = port;
    }
    if let Some(data_file) = &cli.data_file {
        config.data_file = data_file.clone();
    }
    if cli.simulate {
        config.sensor = SensorConfig::simulated();
    }

    config.validate()?;
    Ok(config)
}

async fn run(config: StationConfig) -> Result<()> {
    let timezone = config.tz()?;
    let data_file = config.data_file.clone();
    let sensor = build_sensor(&config.sensor);
    let display = build_display(&config.display.backend, timezone);

    info!(
        "Station at {:?}: sensor={}, port={}, log every {}s",
        config.location,
        config.sensor.backend_name(),
        config.web_port,
        config.log_interval_secs
    );

    let station = Station::new(config)?;
    let running = station
        .start(sensor, display, move || {
            CsvLogSink::open(data_file).map(|sink| Box::new(sink) as BoxedSink)
        })
        .await
        .context("station failed to start")?;
    warn!("Web page available on port {}", running.local_addr().port());

    let shutdown = running.shutdown_handle();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupt received, shutting down");
                shutdown.trigger();
            }
            Err(e) => error!("Unable to listen for Ctrl-C: {}", e),
        }
    });

    running.wait().await?;
    Ok(())
}
