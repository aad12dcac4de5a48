//! Stimsync CLI - Batch synchrony analysis over a directory of recordings
//!
//! Processes every recording file in a directory in date order, writes one
//! figure document per chart under the output directory, and prints the
//! whole-session synchrony value of each session to stdout.

use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use stimsync::{JsonChartSink, SessionBatcher, WindowConfig, STIMSYNC_VERSION};

/// Stimsync - Stimulation-aligned spike synchrony analysis
#[derive(Parser)]
#[command(name = "stimsync")]
#[command(version = STIMSYNC_VERSION)]
#[command(about = "Analyze spike synchrony around stimulation events", long_about = None)]
struct Cli {
    /// Directory containing recording files (<label>_<DD-Mon-YYYY>.json)
    recording_dir: PathBuf,

    /// Window start relative to stimulation onset, in seconds (negative = before)
    #[arg(long, default_value_t = -1.2, allow_hyphen_values = true)]
    pre_stimulus: f64,

    /// Start of the displayed profile range, in seconds
    #[arg(long, default_value_t = -0.7, allow_hyphen_values = true)]
    plot_start: f64,

    /// End of the displayed profile range, in seconds
    #[arg(long, default_value_t = 1.4, allow_hyphen_values = true)]
    post_stimulus: f64,

    /// Window end used for extraction, in seconds
    #[arg(long, default_value_t = 1.9, allow_hyphen_values = true)]
    full_post_stimulus: f64,

    /// Directory for emitted figure documents
    #[arg(long, default_value = "figures")]
    out_dir: PathBuf,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), stimsync::AnalysisError> {
    info!(version = STIMSYNC_VERSION, "stimsync starting");

    let config = WindowConfig {
        pre_stimulus_s: cli.pre_stimulus,
        plot_start_s: cli.plot_start,
        post_stimulus_s: cli.post_stimulus,
        full_post_stimulus_s: cli.full_post_stimulus,
    };

    let sink = JsonChartSink::new(&cli.out_dir)?;
    let mut batcher = SessionBatcher::new(config, Box::new(sink))?;
    batcher.process_directory(&cli.recording_dir)?;

    for result in batcher.results() {
        println!("{}  {:.6}", result.session_name, result.session_scalar_sync);
    }

    Ok(())
}

/// Initialize logging based on CLI options
fn init_logging(cli: &Cli) {
    use tracing_subscriber::EnvFilter;

    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else {
        let default_level = match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_writer(io::stderr)
        .init();
}
