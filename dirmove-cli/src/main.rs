//! Dirmove CLI: compute +DM/-DM from a bar file or synthetic data.
//!
//! Commands:
//! - `compute`: load bars, resolve options (config file, then flags), write
//!   both columns as CSV, JSON or Parquet

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use polars::prelude::ParquetWriter;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dirmove_core::data::{generate_synthetic_bars, load_bars_csv};
use dirmove_core::{
    dm_bars, Bar, DmConfig, DmResult, OutputFormat, RawDmParams, SeriesIndex, WilderSumBackend,
};

const DEFAULT_SEED: u64 = 42;

#[derive(Parser, Debug)]
#[command(
    name = "dirmove",
    version,
    about = "Dirmove CLI: Directional Movement (+DM/-DM) over daily bars"
)]
struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. info, debug, dirmove_core=debug).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute +DM/-DM and write both columns.
    Compute(ComputeArgs),
}

#[derive(Args, Debug, Default)]
struct ComputeArgs {
    /// CSV file with date,open,high,low,close[,volume] rows.
    #[arg(long, conflicts_with = "synthetic")]
    input: Option<PathBuf>,

    /// Generate this many synthetic bars instead of reading a file.
    #[arg(long)]
    synthetic: Option<usize>,

    /// Seed for synthetic bars.
    #[arg(long, requires = "synthetic")]
    seed: Option<u64>,

    /// TOML config with [dm] and [output] tables.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Smoothing window.
    #[arg(long, allow_negative_numbers = true)]
    length: Option<i64>,

    /// Moving average: sma, ema, rma, wma, dema, tema, hma.
    #[arg(long)]
    mamode: Option<String>,

    /// Differencing lag.
    #[arg(long, allow_negative_numbers = true)]
    drift: Option<i64>,

    /// Shift applied to the finished columns.
    #[arg(long, allow_negative_numbers = true)]
    offset: Option<i64>,

    /// Prefer the running-sum native backend.
    #[arg(long, conflicts_with = "no_native")]
    native: bool,

    /// Always use the internal pipeline.
    #[arg(long)]
    no_native: bool,

    /// Replace undefined values with this number.
    #[arg(long, allow_negative_numbers = true)]
    fillna: Option<f64>,

    /// Propagate values into gaps: ffill or bfill.
    #[arg(long)]
    fill_method: Option<String>,

    /// Output format. Defaults to the config file value, then csv.
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Output file. CSV and JSON go to stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,
}

impl ComputeArgs {
    /// Options given as flags, layered over the config file.
    fn overrides(&self) -> RawDmParams {
        let mut raw = RawDmParams::new();
        if let Some(v) = self.length {
            raw = raw.length(v);
        }
        if let Some(v) = &self.mamode {
            raw = raw.mamode(v.as_str());
        }
        if let Some(v) = self.drift {
            raw = raw.drift(v);
        }
        if let Some(v) = self.offset {
            raw = raw.offset(v);
        }
        if self.native {
            raw = raw.talib(true);
        } else if self.no_native {
            raw = raw.talib(false);
        }
        if let Some(v) = self.fillna {
            raw = raw.fillna(v);
        }
        if let Some(v) = &self.fill_method {
            raw = raw.fill_method(v.as_str());
        }
        raw
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Commands::Compute(args) => run_compute(&args),
    }
}

fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run_compute(args: &ComputeArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => DmConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DmConfig::default(),
    };

    let params = config.dm.clone().merged_with(args.overrides()).normalize();
    let format = args.format.unwrap_or(config.output.format);
    debug!(?params, %format, "resolved options");

    let bars = load_input(args)?;
    let result = dm_bars(&bars, &params, Some(&WilderSumBackend))
        .context("bars do not form aligned high/low series")?;

    match format {
        OutputFormat::Csv => {
            let mut out = open_output(args.output.as_deref())?;
            write_csv(&result, &mut out, config.output.precision)?;
            out.flush()?;
        }
        OutputFormat::Json => {
            let mut out = open_output(args.output.as_deref())?;
            serde_json::to_writer_pretty(&mut out, &result).context("writing JSON")?;
            writeln!(out)?;
            out.flush()?;
        }
        OutputFormat::Parquet => {
            let Some(path) = args.output.as_deref() else {
                bail!("parquet output requires --output");
            };
            write_parquet(&result, path)?;
        }
    }

    info!(
        name = %result.name(),
        source = result.source(),
        rows = result.len(),
        %format,
        "directional movement written"
    );
    Ok(())
}

fn load_input(args: &ComputeArgs) -> Result<Vec<Bar>> {
    match (&args.input, args.synthetic) {
        (Some(path), _) => {
            load_bars_csv(path).with_context(|| format!("loading bars from {}", path.display()))
        }
        (None, Some(count)) => {
            let start = NaiveDate::from_ymd_opt(2020, 1, 1).context("invalid start date")?;
            let seed = args.seed.unwrap_or(DEFAULT_SEED);
            Ok(generate_synthetic_bars("SYNTH", start, count, seed))
        }
        (None, None) => bail!("one of --input or --synthetic is required"),
    }
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

/// Index column first, then both value columns. Undefined values are empty cells.
fn write_csv<W: Write>(result: &DmResult, out: W, precision: usize) -> Result<()> {
    let index_header = match result.index() {
        SeriesIndex::Dates(_) => "date",
        SeriesIndex::Positional(_) => "index",
    };
    let cell = |v: Option<f64>| v.map(|x| format!("{x:.precision$}")).unwrap_or_default();

    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record([
        index_header.to_string(),
        result.plus_key(),
        result.minus_key(),
    ])?;
    for (i, (plus, minus)) in result.plus().iter().zip(result.minus()).enumerate() {
        wtr.write_record([result.index().label(i), cell(*plus), cell(*minus)])?;
    }
    wtr.flush().context("writing CSV")?;
    Ok(())
}

fn write_parquet(result: &DmResult, path: &Path) -> Result<()> {
    let mut df = result.to_dataframe().context("building DataFrame")?;
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    ParquetWriter::new(file)
        .finish(&mut df)
        .with_context(|| format!("writing parquet {}", path.display()))?;
    Ok(())
}
