use clap::Parser;
use pairscope::analytics::Interval;
use pairscope::commands::{run_analyze, run_ingest, AnalyzeConfig};
use tracing_subscriber::EnvFilter;

// --- CLI Argument Parsing ---
#[derive(Parser)]
#[command(author, version, about = "Statistical-arbitrage analytics for pairs trading", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Set the verbosity level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    verbose: String,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Capture the live trade feed into the tick store
    Ingest {
        /// Instruments to subscribe to (e.g. "btcusdt,ethusdt")
        #[arg(short, long, default_value = "btcusdt,ethusdt")]
        instruments: String,
        /// Directory holding the tick store
        #[arg(long, default_value = "data")]
        data_dir: String,
    },
    /// Run the pair analytics pipeline over stored ticks
    Analyze {
        /// First leg (regressed on the second leg)
        #[arg(long, default_value = "btcusdt")]
        instrument_a: String,
        /// Second leg
        #[arg(long, default_value = "ethusdt")]
        instrument_b: String,
        /// Resample interval: 1s, 1m or 5m
        #[arg(short, long, default_value = "1m")]
        timeframe: String,
        /// Rolling window in bars (10-200)
        #[arg(short, long, default_value_t = 30)]
        window: usize,
        /// Z-score entry/alert threshold (1.0-3.0)
        #[arg(long, default_value_t = 2.0)]
        entry: f64,
        /// Z-score exit threshold (0 <= exit < entry)
        #[arg(long, default_value_t = 0.5)]
        exit: f64,
        /// Directory holding the tick store
        #[arg(long, default_value = "data")]
        data_dir: String,
        /// Write the analytics table (spread, zscore, correlation) as CSV
        #[arg(long)]
        export: Option<String>,
        /// Re-run every N seconds instead of once
        #[arg(long)]
        watch: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.verbose)),
        )
        .init();

    match cli.command {
        Commands::Ingest {
            instruments,
            data_dir,
        } => {
            let instruments: Vec<String> = instruments
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
            run_ingest(instruments, &data_dir).await?;
        }
        Commands::Analyze {
            instrument_a,
            instrument_b,
            timeframe,
            window,
            entry,
            exit,
            data_dir,
            export,
            watch,
        } => {
            let interval: Interval = timeframe.parse()?;
            let config = AnalyzeConfig {
                instrument_a,
                instrument_b,
                interval,
                window,
                entry_threshold: entry,
                exit_threshold: exit,
                data_dir,
                export_path: export,
                watch_secs: watch,
            };
            run_analyze(config).await?;
        }
    }

    Ok(())
}
