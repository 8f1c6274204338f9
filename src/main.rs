use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use spc_capability::series::{csv_files, load_csv};
use spc_capability::{
    report, BatchAnalyzer, ChartSettings, ControlChartSource, SpecLimits, DEFAULT_COLUMN,
};
use tracing_subscriber::EnvFilter;

/// Process capability report for every CSV file in a directory
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing the CSV files
    dir: PathBuf,

    /// Target value (informational)
    #[arg(long, allow_hyphen_values = true)]
    target: String,

    /// Lower specification limit
    #[arg(long, allow_hyphen_values = true)]
    lsl: String,

    /// Upper specification limit
    #[arg(long, allow_hyphen_values = true)]
    usl: String,

    /// Column holding the sample values
    #[arg(long, default_value = DEFAULT_COLUMN)]
    column: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Number of histogram bins
    #[arg(long, default_value_t = 20)]
    bins: usize,

    /// Plot the observed samples on the control chart instead of resampling
    #[arg(long)]
    observed_control_chart: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let spec = SpecLimits::parse(&args.target, &args.lsl, &args.usl)?;

    let control_source = if args.observed_control_chart {
        ControlChartSource::Observed
    } else {
        ControlChartSource::Resampled
    };
    let analyzer = BatchAnalyzer::new(spec)?
        .with_column(args.column.as_str())
        .with_chart_settings(ChartSettings {
            histogram_bins: args.bins,
            control_source,
            ..ChartSettings::default()
        });

    let files = csv_files(&args.dir)
        .with_context(|| format!("cannot read directory {}", args.dir.display()))?;
    tracing::info!(dir = %args.dir.display(), files = files.len(), "loading sources");
    let sources = files.iter().map(|path| load_csv(path));
    let result = analyzer.analyze(sources);

    match args.format {
        Format::Text => print!("{}", report::render_text(&result)),
        Format::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    Ok(())
}
