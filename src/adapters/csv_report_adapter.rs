//! CSV report adapter implementing ReportPort.
//!
//! Writes three files per run: the trade ledger at the requested path, the
//! equity curve at `<stem>_equity.csv`, and a one-row summary (strategy plus
//! headline stats) at `<stem>_summary.csv`.

use std::path::{Path, PathBuf};

use crate::domain::error::BarsightError;
use crate::domain::simulator::BacktestResult;
use crate::domain::strategy::StrategyDef;
use crate::ports::report_port::ReportPort;

fn csv_err(err: csv::Error) -> BarsightError {
    BarsightError::Io(err.into())
}

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    fn companion_path(path: &Path, suffix: &str) -> PathBuf {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report".to_string());
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| "csv".to_string());
        path.with_file_name(format!("{stem}_{suffix}.{ext}"))
    }

    fn write_trades(result: &BacktestResult, path: &Path) -> Result<(), BarsightError> {
        let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
        writer
            .write_record(["date", "side", "price", "shares", "value", "reason"])
            .map_err(csv_err)?;
        for trade in &result.trades {
            writer.write_record([
                trade.date.format("%Y-%m-%d").to_string(),
                trade.side.to_string(),
                format!("{:.2}", trade.price),
                trade.shares.to_string(),
                format!("{:.2}", trade.value),
                trade.reason.clone(),
            ]).map_err(csv_err)?;
        }
        writer.flush().map_err(BarsightError::Io)?;
        Ok(())
    }

    fn write_equity(result: &BacktestResult, path: &Path) -> Result<(), BarsightError> {
        let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
        writer
            .write_record(["date", "equity", "cash", "position_value", "drawdown_pct"])
            .map_err(csv_err)?;
        for point in &result.equity {
            writer.write_record([
                point.date.format("%Y-%m-%d").to_string(),
                format!("{:.2}", point.equity),
                format!("{:.2}", point.cash),
                format!("{:.2}", point.position_value),
                format!("{:.4}", point.drawdown * 100.0),
            ]).map_err(csv_err)?;
        }
        writer.flush().map_err(BarsightError::Io)?;
        Ok(())
    }

    fn write_summary(
        result: &BacktestResult,
        strategy: &StrategyDef,
        path: &Path,
    ) -> Result<(), BarsightError> {
        let stats = &result.stats;
        let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
        writer.write_record([
            "strategy",
            "initial_capital",
            "final_equity",
            "total_return_pct",
            "trades",
            "round_trips",
            "win_rate_pct",
            "profit_factor",
            "max_drawdown_pct",
            "sharpe_ratio",
        ]).map_err(csv_err)?;
        writer.write_record([
            strategy.id.to_string(),
            format!("{:.2}", result.initial_capital),
            format!("{:.2}", result.final_equity),
            format!("{:.2}", stats.total_return_pct),
            stats.trade_count.to_string(),
            stats.round_trips.to_string(),
            format!("{:.2}", stats.win_rate * 100.0),
            format!("{:.4}", stats.profit_factor),
            format!("{:.2}", stats.max_drawdown_pct),
            format!("{:.4}", stats.sharpe_ratio),
        ]).map_err(csv_err)?;
        writer.flush().map_err(BarsightError::Io)?;
        Ok(())
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        strategy: &StrategyDef,
        output_path: &str,
    ) -> Result<(), BarsightError> {
        let path = Path::new(output_path);
        Self::write_trades(result, path)?;
        Self::write_equity(result, &Self::companion_path(path, "equity"))?;
        Self::write_summary(result, strategy, &Self::companion_path(path, "summary"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::BacktestStats;
    use crate::domain::simulator::{EquityPoint, Trade, TradeSide};
    use crate::domain::strategy::StrategyId;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn sample_result() -> BacktestResult {
        let trades = vec![
            Trade {
                date: date(4),
                side: TradeSide::Buy,
                price: 100.0,
                shares: 100,
                value: 10_000.0,
                reason: "buy signal".into(),
            },
            Trade {
                date: date(11),
                side: TradeSide::Sell,
                price: 110.0,
                shares: 100,
                value: 11_000.0,
                reason: "sell signal".into(),
            },
        ];
        let equity = vec![
            EquityPoint {
                date: date(4),
                equity: 10_000.0,
                cash: 0.0,
                position_value: 10_000.0,
                drawdown: 0.0,
            },
            EquityPoint {
                date: date(11),
                equity: 11_000.0,
                cash: 11_000.0,
                position_value: 0.0,
                drawdown: 0.0,
            },
        ];
        let stats = BacktestStats::compute(10_000.0, &trades, &equity);
        BacktestResult {
            trades,
            equity,
            stats,
            initial_capital: 10_000.0,
            final_equity: 11_000.0,
        }
    }

    #[test]
    fn companion_path_inserts_suffix() {
        let path = CsvReportAdapter::companion_path(Path::new("out/run.csv"), "equity");
        assert_eq!(path, PathBuf::from("out/run_equity.csv"));
    }

    #[test]
    fn writes_all_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.csv");
        let adapter = CsvReportAdapter::new();
        let result = sample_result();
        let strategy = StrategyId::SmaCross.def();

        adapter
            .write(&result, strategy, out.to_str().unwrap())
            .unwrap();

        let trades = std::fs::read_to_string(&out).unwrap();
        assert!(trades.starts_with("date,side,price,shares,value,reason"));
        assert!(trades.contains("2024-03-04,buy,100.00,100,10000.00,buy signal"));

        let equity = std::fs::read_to_string(dir.path().join("report_equity.csv")).unwrap();
        assert_eq!(equity.lines().count(), 3);

        let summary = std::fs::read_to_string(dir.path().join("report_summary.csv")).unwrap();
        assert!(summary.contains("sma-cross"));
        assert!(summary.contains("10.00"));
    }

    #[test]
    fn empty_result_writes_headers_only() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("empty.csv");
        let result = BacktestResult {
            trades: Vec::new(),
            equity: Vec::new(),
            stats: BacktestStats::neutral(),
            initial_capital: 10_000.0,
            final_equity: 10_000.0,
        };

        CsvReportAdapter::new()
            .write(&result, StrategyId::MonthlyAmount.def(), out.to_str().unwrap())
            .unwrap();

        let trades = std::fs::read_to_string(&out).unwrap();
        assert_eq!(trades.lines().count(), 1);
    }
}
