//! CLI entry point for the headway rater.
//!
//! Provides subcommands for estimating wait times along a whole route,
//! checking a single stop, and listing the configured stations.

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use headway_rater::analyzers::analyzer::{analyze_all, analyze_station};
use headway_rater::chart::{Metric, write_bar_chart};
use headway_rater::config::{self, Config, Direction, Station, TimeField};
use headway_rater::infra::mbta::MbtaClient;
use headway_rater::output::{append_records, print_json, print_summaries};
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "headway_rater")]
#[command(about = "Estimate transit wait times from live arrival predictions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RouteArgs {
    /// Route to query
    #[arg(short, long, default_value = config::DEFAULT_ROUTE_ID)]
    route: String,

    /// Direction of travel (0 or 1)
    #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    direction: u8,

    /// JSON file listing stations; defaults to the Green Line B stops
    #[arg(short, long)]
    stations: Option<String>,

    /// Prediction attribute read as the vehicle's time at the stop
    #[arg(long, value_enum, default_value_t = TimeFieldArg::Arrival)]
    time_field: TimeFieldArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum TimeFieldArg {
    Arrival,
    Departure,
}

#[derive(Clone, Copy, ValueEnum)]
enum MetricArg {
    Mean,
    Median,
    StdDev,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize wait times at every station and chart them
    Run {
        #[command(flatten)]
        route: RouteArgs,

        /// Pause between API requests, in milliseconds
        #[arg(long, default_value_t = 1500)]
        delay_ms: u64,

        /// SVG file to write the bar chart to
        #[arg(short, long, default_value = "mean_wait_times_bar.svg")]
        chart: String,

        /// Statistic to chart
        #[arg(short, long, value_enum, default_value_t = MetricArg::Mean)]
        metric: MetricArg,

        /// Chart title
        #[arg(long)]
        title: Option<String>,

        /// CSV file to append results to
        #[arg(long)]
        csv: Option<String>,

        /// Also log all summaries as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Summarize wait times at a single stop
    Station {
        /// Stop id, e.g. place-pktrm
        #[arg(value_name = "STOP_ID")]
        stop_id: String,

        #[command(flatten)]
        route: RouteArgs,
    },
    /// List the configured stations
    ListStations {
        /// JSON file listing stations; defaults to the Green Line B stops
        #[arg(short, long)]
        stations: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/headway_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("headway_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            route,
            delay_ms,
            chart,
            metric,
            title,
            csv,
            json,
        } => {
            let config = build_config(&route)?.with_request_delay(Duration::from_millis(delay_ms));
            let client = MbtaClient::from_config(&config)?;

            info!(
                route_id = %config.route_id,
                direction_id = config.direction.id(),
                stations = config.stations.len(),
                "Starting station run"
            );
            let summaries = analyze_all(&client, &config).await;

            print_summaries(&summaries);

            if json {
                print_json(&summaries)?;
            }
            if let Some(path) = csv {
                append_records(&path, &summaries)?;
            }

            let metric = match metric {
                MetricArg::Mean => Metric::Mean,
                MetricArg::Median => Metric::Median,
                MetricArg::StdDev => Metric::StdDev,
            };
            let title = title.unwrap_or_else(|| {
                format!("{} at {} Stations", metric.label(), config.route_id)
            });
            if !write_bar_chart(&chart, &summaries, metric, &title)? {
                println!("Cannot plot: No stations had valid wait time data.");
            }
        }
        Commands::Station { stop_id, route } => {
            let config = build_config(&route)?;
            let station = config
                .stations
                .iter()
                .find(|s| s.id == stop_id)
                .cloned()
                .unwrap_or_else(|| Station::new(&stop_id, &stop_id));
            let client = MbtaClient::from_config(&config)?;

            let summary = analyze_station(&client, &config, &station).await;

            print_summaries(std::slice::from_ref(&summary));
        }
        Commands::ListStations { stations } => {
            let stations = load_station_list(stations.as_deref())?;

            info!(total = stations.len(), "Station list loaded");

            for station in &stations {
                info!(station_id = %station.id, station = %station.name, "Station");
            }
        }
    }

    Ok(())
}

/// Combines environment settings with command-line route arguments.
fn build_config(args: &RouteArgs) -> Result<Config> {
    let time_field = match args.time_field {
        TimeFieldArg::Arrival => TimeField::Arrival,
        TimeFieldArg::Departure => TimeField::Departure,
    };

    Ok(Config::from_env()
        .with_route(&args.route)
        .with_direction(Direction::try_from(args.direction)?)
        .with_stations(load_station_list(args.stations.as_deref())?)
        .with_time_field(time_field))
}

fn load_station_list(path: Option<&str>) -> Result<Vec<Station>> {
    match path {
        Some(path) => config::load_stations(path),
        None => Ok(config::green_line_b()),
    }
}
