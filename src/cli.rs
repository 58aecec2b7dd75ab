//! CLI definition and dispatch.
//!
//! Status and progress lines go to stderr; data (trade ledgers, signal
//! lists, registry dumps) goes to stdout so it can be piped.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::adapters::csv_adapter::CsvDataAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::bar::{resample_weekly, PriceBar, SamplingPeriod};
use crate::domain::error::BarsightError;
use crate::domain::pattern::scan_signals;
use crate::domain::preset::{self, ParamSource, PRESET_TABLE_VERSION};
use crate::domain::signal::Signal;
use crate::domain::simulator::{simulate, BacktestResult, SimConfig};
use crate::domain::strategy::{StrategyId, StrategyParams};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "barsight", about = "Chart signal scanner and strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a strategy backtest over a price CSV
    Backtest {
        /// Price CSV (date,open,high,low,close,volume)
        #[arg(short, long)]
        data: PathBuf,
        /// Strategy id (see `strategies`)
        #[arg(short, long)]
        strategy: Option<String>,
        /// Sampling period: daily or weekly
        #[arg(short, long)]
        period: Option<String>,
        /// Initial capital
        #[arg(long)]
        capital: Option<f64>,
        /// Ignore tuned presets and use the declared defaults
        #[arg(long)]
        defaults: bool,
        /// Parameter override (repeatable)
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,
        /// INI config with a [backtest] section
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Write CSV report files to this path
        #[arg(short, long)]
        report: Option<PathBuf>,
    },
    /// Scan a price CSV for chart signals
    Signals {
        #[arg(short, long)]
        data: PathBuf,
        /// Sampling period: daily or weekly
        #[arg(short, long)]
        period: Option<String>,
    },
    /// List registered strategies, parameters and tuned presets
    Strategies,
    /// Show bar count and date range of a price CSV
    Info {
        #[arg(short, long)]
        data: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            data,
            strategy,
            period,
            capital,
            defaults,
            set,
            config,
            report,
        } => run_backtest(
            &data,
            strategy.as_deref(),
            period.as_deref(),
            capital,
            defaults,
            &set,
            config.as_ref(),
            report.as_ref(),
        ),
        Command::Signals { data, period } => run_signals(&data, period.as_deref()),
        Command::Strategies => run_strategies(),
        Command::Info { data } => run_info(&data),
    }
}

fn report_error(err: &BarsightError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, BarsightError> {
    FileConfigAdapter::from_file(path).map_err(|e| BarsightError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Parse `name=value` pairs from repeated `--set` flags.
pub fn parse_set_pairs(pairs: &[String], strategy: StrategyId) -> Result<Vec<(String, f64)>, BarsightError> {
    pairs
        .iter()
        .map(|pair| {
            let (name, value) = pair.split_once('=').ok_or_else(|| BarsightError::InvalidParam {
                strategy: strategy.to_string(),
                name: pair.clone(),
                reason: "expected name=value".into(),
            })?;
            let value: f64 = value.trim().parse().map_err(|_| BarsightError::InvalidParam {
                strategy: strategy.to_string(),
                name: name.to_string(),
                reason: format!("'{}' is not a number", value.trim()),
            })?;
            Ok((name.trim().to_string(), value))
        })
        .collect()
}

fn parse_period(s: &str) -> Result<SamplingPeriod, BarsightError> {
    s.parse()
        .map_err(|_| BarsightError::UnknownPeriod { name: s.to_string() })
}

/// Symbol (file stem) and bars for a price CSV, resampled when weekly.
pub fn load_bars(data: &Path, period: SamplingPeriod) -> Result<(String, Vec<PriceBar>), BarsightError> {
    let symbol = data
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| BarsightError::Data {
            reason: format!("{} has no file name", data.display()),
        })?;
    let base = data.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();

    let adapter = CsvDataAdapter::new(base);
    let bars = adapter.fetch_bars(&symbol, chrono::NaiveDate::MIN, chrono::NaiveDate::MAX)?;
    if bars.is_empty() {
        return Err(BarsightError::NoData { symbol });
    }

    let bars = match period {
        SamplingPeriod::Daily => bars,
        SamplingPeriod::Weekly => resample_weekly(&bars),
    };
    Ok((symbol, bars))
}

/// Merge parameter layers: preset (or defaults), then INI `param.<name>`
/// entries, then `--set` overrides.
pub fn build_params(
    strategy: StrategyId,
    period: SamplingPeriod,
    source: ParamSource,
    config: Option<&FileConfigAdapter>,
    set: &[String],
) -> Result<StrategyParams, BarsightError> {
    let mut params = preset::resolve_params(strategy, period, source);
    if let Some(adapter) = config {
        for (name, value) in adapter.param_overrides("backtest") {
            params.set(&name, value);
        }
    }
    for (name, value) in parse_set_pairs(set, strategy)? {
        params.set(&name, value);
    }
    strategy.validate_params(&params)?;
    Ok(params)
}

#[allow(clippy::too_many_arguments)]
fn run_backtest(
    data: &Path,
    strategy_flag: Option<&str>,
    period_flag: Option<&str>,
    capital_flag: Option<f64>,
    defaults: bool,
    set: &[String],
    config_path: Option<&PathBuf>,
    report_path: Option<&PathBuf>,
) -> ExitCode {
    // Stage 1: config file, if any
    let config = match config_path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            match load_config(path) {
                Ok(adapter) => Some(adapter),
                Err(e) => return report_error(&e),
            }
        }
        None => None,
    };
    let cfg = config.as_ref();

    // Stage 2: resolve strategy, period, capital (flags override config)
    let strategy_name = strategy_flag
        .map(str::to_string)
        .or_else(|| cfg.and_then(|c| c.get_string("backtest", "strategy")));
    let Some(strategy_name) = strategy_name else {
        let err = BarsightError::ConfigMissing {
            section: "backtest".into(),
            key: "strategy".into(),
        };
        return report_error(&err);
    };
    let strategy: StrategyId = match strategy_name.parse() {
        Ok(id) => id,
        Err(e) => return report_error(&e),
    };

    let period_name = period_flag
        .map(str::to_string)
        .or_else(|| cfg.and_then(|c| c.get_string("backtest", "period")));
    let period = match period_name.as_deref().map(parse_period).transpose() {
        Ok(p) => p.unwrap_or(SamplingPeriod::Daily),
        Err(e) => return report_error(&e),
    };

    let capital = capital_flag
        .unwrap_or_else(|| cfg.map_or(100_000.0, |c| c.get_double("backtest", "capital", 100_000.0)));

    // Stage 3: parameters
    let source = if defaults { ParamSource::Defaults } else { ParamSource::Tuned };
    let params = match build_params(strategy, period, source, cfg, set) {
        Ok(p) => p,
        Err(e) => return report_error(&e),
    };

    let def = strategy.def();
    eprintln!("Strategy: {} ({})", def.name, strategy);
    for spec in def.params {
        eprintln!("  {} = {}", spec.name, strategy.resolve(&params, spec.name));
    }

    // Stage 4: bars
    eprintln!("Loading bars from {}", data.display());
    let (symbol, bars) = match load_bars(data, period) {
        Ok(loaded) => loaded,
        Err(e) => return report_error(&e),
    };
    eprintln!("{symbol}: {} {period} bars", bars.len());

    // Stage 5: run
    let actions = strategy.compute(&bars, &params);
    let sim_config = SimConfig {
        initial_capital: capital,
        mode: strategy.exec_mode(&params),
    };
    let result = simulate(&bars, &actions, &sim_config);

    print_trades(&result);
    print_summary(&result);

    // Stage 6: report
    if let Some(path) = report_path {
        let writer = CsvReportAdapter::new();
        if let Err(e) = writer.write(&result, def, &path.display().to_string()) {
            return report_error(&e);
        }
        eprintln!("Report written to {}", path.display());
    }

    ExitCode::SUCCESS
}

fn print_trades(result: &BacktestResult) {
    for trade in &result.trades {
        println!(
            "{} {:>4} {:>10.2} x {:<6} = {:>12.2}  ({})",
            trade.date, trade.side, trade.price, trade.shares, trade.value, trade.reason,
        );
    }
}

fn print_summary(result: &BacktestResult) {
    let stats = &result.stats;
    eprintln!("\n=== Backtest Results ===");
    eprintln!("Initial Capital:  {:.2}", result.initial_capital);
    eprintln!("Final Equity:     {:.2}", result.final_equity);
    eprintln!("Total Return:     {:.2}%", stats.total_return_pct);
    eprintln!("Trades:           {} ({} round trips)", stats.trade_count, stats.round_trips);
    eprintln!("Win Rate:         {:.1}%", stats.win_rate * 100.0);
    eprintln!("Profit Factor:    {:.2}", stats.profit_factor);
    eprintln!("Avg Win / Loss:   {:.2} / {:.2}", stats.avg_win, stats.avg_loss);
    eprintln!(
        "Max Drawdown:     -{:.1}% ({:.2})",
        stats.max_drawdown_pct, stats.max_drawdown_abs
    );
    eprintln!("Sharpe Ratio:     {:.2}", stats.sharpe_ratio);
}

fn run_signals(data: &Path, period_flag: Option<&str>) -> ExitCode {
    let period = match period_flag.map(parse_period).transpose() {
        Ok(p) => p.unwrap_or(SamplingPeriod::Daily),
        Err(e) => return report_error(&e),
    };

    eprintln!("Loading bars from {}", data.display());
    let (symbol, bars) = match load_bars(data, period) {
        Ok(loaded) => loaded,
        Err(e) => return report_error(&e),
    };
    eprintln!("{symbol}: scanning {} {period} bars", bars.len());

    let signals = scan_signals(&bars);
    for signal in &signals {
        print_signal(signal);
    }
    eprintln!("{} signals found", signals.len());
    ExitCode::SUCCESS
}

fn print_signal(signal: &Signal) {
    println!(
        "{} [{}] {:.2}  {}",
        signal.date, signal.kind, signal.price, signal.description,
    );
    if let Some(cup) = &signal.cup {
        println!(
            "    cup: {} bars, depth {:.1}%, rims {:.2}/{:.2}, bottom {:.2}, handle {} bars ({:.1}% pullback)",
            cup.cup_bars,
            cup.depth_pct,
            cup.left_rim_price,
            cup.right_rim_price,
            cup.bottom_price,
            cup.handle_bars,
            cup.handle_pullback_pct,
        );
    }
}

fn run_strategies() -> ExitCode {
    println!("Registered strategies (preset table v{PRESET_TABLE_VERSION}):");
    for id in StrategyId::ALL {
        let def = id.def();
        println!("\n{id} — {} [{}]", def.name, def.mode);
        println!("  {}", def.description);
        for spec in def.params {
            println!(
                "  {} = {} (range {}..={})",
                spec.name, spec.default, spec.min, spec.max
            );
        }
        for period in [SamplingPeriod::Daily, SamplingPeriod::Weekly] {
            if let Some(entry) = preset::preset(id, period) {
                let tuned: Vec<String> = entry
                    .params
                    .iter()
                    .map(|(name, value)| format!("{name}={value}"))
                    .collect();
                println!(
                    "  tuned ({period}): {} [win rate {:.0}%, return {:.1}%, {} trades]",
                    tuned.join(", "),
                    entry.win_rate * 100.0,
                    entry.return_pct,
                    entry.trades,
                );
            }
        }
    }
    ExitCode::SUCCESS
}

fn run_info(data: &Path) -> ExitCode {
    let symbol = match data.file_stem() {
        Some(stem) => stem.to_string_lossy().into_owned(),
        None => {
            let err = BarsightError::Data {
                reason: format!("{} has no file name", data.display()),
            };
            return report_error(&err);
        }
    };
    let base = data.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
    let adapter = CsvDataAdapter::new(base);

    match adapter.data_range(&symbol) {
        Ok(Some((first, last, count))) => {
            println!("{symbol}: {count} bars, {first} to {last}");
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{symbol}: no data found");
            ExitCode::from(5)
        }
        Err(e) => report_error(&e),
    }
}
