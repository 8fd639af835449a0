//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{run_backtest, BacktestConfig, BacktestResult, FactorWeights};
use crate::domain::config_validation::{parse_optional_date, validate_config};
use crate::domain::error::RiskPremiaError;
use crate::domain::factor::{FactorComparison, FactorKind, FactorParams};
use crate::domain::metrics::StrategyMetrics;
use crate::domain::noise::{clean, CleaningMethod, NoiseConfig, DEFAULT_WINDOW};
use crate::domain::ohlcv::{CleanedPriceTable, PriceTable};
use crate::domain::series::Series;
use crate::domain::validation::validate;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "riskpremia", about = "Crypto factor research pipeline")]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the cleaned price table as CSV
    Clean {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        method: Option<String>,
        #[arg(short, long)]
        window: Option<usize>,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compute a factor on the raw and cleaned series
    Factor {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long, value_enum)]
        kind: FactorArg,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run the momentum / low-volatility combined backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the date range and row counts for a symbol
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorArg {
    Momentum,
    LowVol,
    MarketPremium,
    Nvt,
}

impl FactorArg {
    pub fn kind(self, params: &FactorParams) -> FactorKind {
        match self {
            FactorArg::Momentum => params.momentum(),
            FactorArg::LowVol => params.low_volatility(),
            FactorArg::MarketPremium => params.market_risk_premium(),
            FactorArg::Nvt => params.nvt_ratio(),
        }
    }
}

/// Where and what to load.
#[derive(Debug, Clone, PartialEq)]
pub struct DataConfig {
    pub dir: PathBuf,
    pub symbol: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Installs the stderr subscriber. `--verbose` wins over `RUST_LOG`.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Clean {
            config,
            method,
            window,
            symbol,
            output,
        } => run_clean(&config, method.as_deref(), window, symbol.as_deref(), output.as_ref()),
        Command::Factor {
            config,
            kind,
            symbol,
            output,
        } => run_factor(&config, kind, symbol.as_deref(), output.as_ref()),
        Command::Backtest {
            config,
            symbol,
            output,
        } => run_backtest_command(&config, symbol.as_deref(), output.as_ref()),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
    }
}

fn fail(err: &RiskPremiaError) -> ExitCode {
    tracing::error!("{err}");
    err.into()
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, RiskPremiaError> {
    tracing::info!("loading config from {}", path.display());
    FileConfigAdapter::from_file(path).map_err(|e| RiskPremiaError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn load_validated_config(path: &PathBuf) -> Result<FileConfigAdapter, RiskPremiaError> {
    let adapter = load_config(path)?;
    validate_config(&adapter)?;
    Ok(adapter)
}

pub fn build_data_config(
    adapter: &dyn ConfigPort,
    symbol_override: Option<&str>,
) -> Result<DataConfig, RiskPremiaError> {
    let dir = adapter
        .get_non_empty("data", "dir")
        .ok_or_else(|| RiskPremiaError::ConfigMissing {
            section: "data".into(),
            key: "dir".into(),
        })?;
    let symbol = match symbol_override {
        Some(s) => s.trim().to_string(),
        None => adapter
            .get_non_empty("data", "symbol")
            .ok_or_else(|| RiskPremiaError::ConfigMissing {
                section: "data".into(),
                key: "symbol".into(),
            })?,
    };

    Ok(DataConfig {
        dir: PathBuf::from(dir),
        symbol,
        start_date: parse_optional_date(adapter, "start_date")?,
        end_date: parse_optional_date(adapter, "end_date")?,
    })
}

/// Method and window from `[noise]`, overridden by the CLI when given.
pub fn build_noise_config(
    adapter: &dyn ConfigPort,
    method_override: Option<&str>,
    window_override: Option<usize>,
) -> Result<NoiseConfig, RiskPremiaError> {
    let tag = method_override
        .map(str::to_string)
        .or_else(|| adapter.get_non_empty("noise", "method"));
    let method = match tag {
        Some(tag) => tag.parse::<CleaningMethod>()?,
        None => CleaningMethod::None,
    };
    let window = match window_override {
        Some(w) => w,
        None => positive(adapter.get_int("noise", "window", DEFAULT_WINDOW as i64)),
    };
    Ok(NoiseConfig { method, window })
}

pub fn build_factor_params(adapter: &dyn ConfigPort) -> FactorParams {
    let defaults = FactorParams::default();
    FactorParams {
        momentum_lookback: positive(adapter.get_int(
            "factors",
            "momentum_lookback",
            defaults.momentum_lookback as i64,
        )),
        low_vol_window: positive(adapter.get_int(
            "factors",
            "low_vol_window",
            defaults.low_vol_window as i64,
        )),
        nvt_volume_window: positive(adapter.get_int(
            "factors",
            "nvt_volume_window",
            defaults.nvt_volume_window as i64,
        )),
        risk_free: adapter.get_double("factors", "risk_free", defaults.risk_free),
    }
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> BacktestConfig {
    let defaults = FactorWeights::default();
    BacktestConfig {
        weights: FactorWeights {
            a: adapter.get_double("backtest", "weight_a", defaults.a),
            b: adapter.get_double("backtest", "weight_b", defaults.b),
        },
        risk_free_rate: adapter.get_double("backtest", "risk_free_rate", 0.0),
    }
}

fn positive(value: i64) -> usize {
    value.max(1) as usize
}

/// Fetches and validates the configured symbol.
pub fn load_table(
    data_port: &dyn DataPort,
    data: &DataConfig,
) -> Result<PriceTable, RiskPremiaError> {
    let raw = data_port.fetch_table(&data.symbol, data.start_date, data.end_date)?;
    let table = validate(&raw)?;
    tracing::info!(
        symbol = %data.symbol,
        rows = table.len(),
        dropped = raw.rows.len().saturating_sub(table.len()),
        "validated price table"
    );
    Ok(table)
}

pub fn run_clean_pipeline(
    data_port: &dyn DataPort,
    data: &DataConfig,
    noise: NoiseConfig,
    report: &mut dyn ReportPort,
) -> Result<CleanedPriceTable, RiskPremiaError> {
    let table = load_table(data_port, data)?;
    tracing::info!(method = %noise.method, window = noise.window, "cleaning");
    let cleaned = clean(&table, noise.method, noise.window);
    report.write_table(&cleaned)?;
    Ok(cleaned)
}

pub fn run_factor_pipeline(
    data_port: &dyn DataPort,
    data: &DataConfig,
    noise: NoiseConfig,
    kind: FactorKind,
    report: &mut dyn ReportPort,
) -> Result<FactorComparison, RiskPremiaError> {
    let raw = load_table(data_port, data)?;
    let cleaned = clean(&raw, noise.method, noise.window);

    let comparison = FactorComparison::compute(kind, &raw, &cleaned);
    if comparison.cleaned.is_empty() {
        tracing::warn!(%kind, rows = raw.len(), "factor produced no values");
    }

    let last = |s: &Series| s.cumulative_sum().points.last().map(|p| p.value).unwrap_or(0.0);
    tracing::info!(
        %kind,
        method = %noise.method,
        raw_days = comparison.raw.len(),
        cleaned_days = comparison.cleaned.len(),
        raw_cumulative = last(&comparison.raw),
        cleaned_cumulative = last(&comparison.cleaned),
        "factor computed"
    );

    report.write_comparison(&comparison)?;
    Ok(comparison)
}

pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    data: &DataConfig,
    noise: NoiseConfig,
    params: &FactorParams,
    bt_config: &BacktestConfig,
    report: &mut dyn ReportPort,
) -> Result<(BacktestResult, StrategyMetrics), RiskPremiaError> {
    let raw = load_table(data_port, data)?;
    let cleaned = clean(&raw, noise.method, noise.window);
    let close = cleaned.close();

    let factor_a = params.momentum().compute(&cleaned, &raw);
    let factor_b = params.low_volatility().compute(&cleaned, &raw);

    tracing::info!(
        a = %params.momentum(),
        b = %params.low_volatility(),
        weight_a = bt_config.weights.a,
        weight_b = bt_config.weights.b,
        "running backtest"
    );

    let result = run_backtest(&close, &factor_a, &factor_b, bt_config.weights);
    if result.returns.is_empty() {
        tracing::warn!("no overlapping factor dates, strategy has no returns");
    }
    let metrics = StrategyMetrics::compute(&result.returns, bt_config.risk_free_rate);

    report.write_backtest(&result)?;
    Ok((result, metrics))
}

/// Runs `f` against an in-memory CSV report, then writes it to `output`
/// or stdout. Nothing is written when `f` fails.
fn with_report<T, F>(output: Option<&PathBuf>, f: F) -> Result<T, RiskPremiaError>
where
    F: FnOnce(&mut dyn ReportPort) -> Result<T, RiskPremiaError>,
{
    let mut report = CsvReportAdapter::new(Vec::new());
    let value = f(&mut report)?;
    let bytes = report.finish()?;

    match output {
        Some(path) => {
            fs::write(path, &bytes)?;
            tracing::info!("output written to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
    }
    Ok(value)
}

fn run_clean(
    config_path: &PathBuf,
    method: Option<&str>,
    window: Option<usize>,
    symbol: Option<&str>,
    output: Option<&PathBuf>,
) -> ExitCode {
    match clean_command(config_path, method, window, symbol, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

pub fn clean_command(
    config_path: &PathBuf,
    method: Option<&str>,
    window: Option<usize>,
    symbol: Option<&str>,
    output: Option<&PathBuf>,
) -> Result<(), RiskPremiaError> {
    let adapter = load_validated_config(config_path)?;
    let data = build_data_config(&adapter, symbol)?;
    let noise = build_noise_config(&adapter, method, window)?;
    let data_port = CsvAdapter::new(data.dir.clone());

    with_report(output, |report| {
        run_clean_pipeline(&data_port, &data, noise, report)
    })?;
    Ok(())
}

fn run_factor(
    config_path: &PathBuf,
    kind: FactorArg,
    symbol: Option<&str>,
    output: Option<&PathBuf>,
) -> ExitCode {
    match factor_command(config_path, kind, symbol, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

pub fn factor_command(
    config_path: &PathBuf,
    kind: FactorArg,
    symbol: Option<&str>,
    output: Option<&PathBuf>,
) -> Result<(), RiskPremiaError> {
    let adapter = load_validated_config(config_path)?;
    let data = build_data_config(&adapter, symbol)?;
    let noise = build_noise_config(&adapter, None, None)?;
    let kind = kind.kind(&build_factor_params(&adapter));
    let data_port = CsvAdapter::new(data.dir.clone());

    with_report(output, |report| {
        run_factor_pipeline(&data_port, &data, noise, kind, report)
    })?;
    Ok(())
}

fn run_backtest_command(
    config_path: &PathBuf,
    symbol: Option<&str>,
    output: Option<&PathBuf>,
) -> ExitCode {
    match backtest_command(config_path, symbol, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

pub fn backtest_command(
    config_path: &PathBuf,
    symbol: Option<&str>,
    output: Option<&PathBuf>,
) -> Result<(), RiskPremiaError> {
    let adapter = load_validated_config(config_path)?;
    let data = build_data_config(&adapter, symbol)?;
    let noise = build_noise_config(&adapter, None, None)?;
    let params = build_factor_params(&adapter);
    let bt_config = build_backtest_config(&adapter);
    let data_port = CsvAdapter::new(data.dir.clone());

    let (_, metrics) = with_report(output, |report| {
        run_backtest_pipeline(&data_port, &data, noise, &params, &bt_config, report)
    })?;
    print_metrics(&data.symbol, &metrics);
    Ok(())
}

fn print_metrics(symbol: &str, metrics: &StrategyMetrics) {
    eprintln!("\n=== {} Strategy Results ===", symbol);
    eprintln!("Days:             {}", metrics.periods);
    eprintln!("Total Return:     {:.2}%", metrics.total_return * 100.0);
    eprintln!(
        "Annualized:       {:.2}%",
        metrics.annualized_return * 100.0
    );
    eprintln!(
        "Volatility:       {:.2}%",
        metrics.annualized_volatility * 100.0
    );
    eprintln!("Sharpe Ratio:     {:.2}", metrics.sharpe_ratio);
    eprintln!("Sortino Ratio:    {:.2}", metrics.sortino_ratio);
    eprintln!("Max Drawdown:     -{:.1}%", metrics.max_drawdown * 100.0);
    eprintln!("Max DD Duration:  {} days", metrics.max_drawdown_duration);
    eprintln!("Hit Rate:         {:.1}%", metrics.hit_rate * 100.0);
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    match load_validated_config(config_path) {
        Ok(_) => {
            eprintln!("Configuration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_list_symbols(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };
    let dir = match adapter.get_non_empty("data", "dir") {
        Some(d) => d,
        None => {
            return fail(&RiskPremiaError::ConfigMissing {
                section: "data".into(),
                key: "dir".into(),
            });
        }
    };

    let symbols = match CsvAdapter::new(PathBuf::from(&dir)).list_symbols() {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    if symbols.is_empty() {
        tracing::warn!("no symbols found in {}", dir);
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        tracing::info!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}

fn run_info(config_path: &PathBuf, symbol: Option<&str>) -> ExitCode {
    match info_command(config_path, symbol) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

pub fn info_command(config_path: &PathBuf, symbol: Option<&str>) -> Result<(), RiskPremiaError> {
    let adapter = load_config(config_path)?;
    let data = build_data_config(&adapter, symbol)?;
    let data_port = CsvAdapter::new(data.dir.clone());
    let raw = data_port.fetch_table(&data.symbol, data.start_date, data.end_date)?;
    let table = validate(&raw)?;

    if let (Some(first), Some(last)) = (table.first_date(), table.last_date()) {
        println!(
            "{}: {} rows ({} complete), {} to {}",
            data.symbol,
            raw.rows.len(),
            table.len(),
            first,
            last
        );
    }
    Ok(())
}
