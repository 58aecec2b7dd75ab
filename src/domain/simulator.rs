//! Backtest simulator: a deterministic paper-trading walk over a bar series
//! and its per-bar action stream.
//!
//! All-in-out: a buy while flat converts all cash into whole shares at the
//! bar's close; a sell while holding liquidates everything. Mismatched
//! signals (buy while holding, sell while flat) are no-ops.
//! Fixed-amount: every buy spends up to the configured amount (or whatever
//! cash remains); nothing is ever sold.
//!
//! Every bar appends one equity point marking the open position to market
//! at the close. The simulator holds no state after returning.

use chrono::NaiveDate;

use crate::domain::bar::PriceBar;
use crate::domain::metrics::BacktestStats;
use crate::domain::strategy::{Action, ExecMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TradeSide {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "buy"),
            TradeSide::Sell => write!(f, "sell"),
        }
    }
}

/// One ledger entry. Append-only; produced only by the simulator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trade {
    pub date: NaiveDate,
    pub side: TradeSide,
    pub price: f64,
    pub shares: i64,
    pub value: f64,
    pub reason: String,
}

/// One mark-to-market point per input bar.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
    pub cash: f64,
    pub position_value: f64,
    /// Fraction below the running equity peak.
    pub drawdown: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BacktestResult {
    pub trades: Vec<Trade>,
    pub equity: Vec<EquityPoint>,
    pub stats: BacktestStats,
    pub initial_capital: f64,
    pub final_equity: f64,
}

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub initial_capital: f64,
    pub mode: ExecMode,
}

/// Walk the series. An empty input yields a zeroed result, never an error.
pub fn simulate(bars: &[PriceBar], actions: &[Action], config: &SimConfig) -> BacktestResult {
    let mut cash = config.initial_capital;
    let mut shares: i64 = 0;
    let mut peak = f64::NEG_INFINITY;

    let mut trades: Vec<Trade> = Vec::new();
    let mut equity_curve: Vec<EquityPoint> = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let action = actions.get(i).copied().unwrap_or(Action::Hold);
        let price = bar.close;

        match (config.mode, action) {
            (ExecMode::AllInOut, Action::Buy) if shares == 0 && price > 0.0 => {
                let quantity = (cash / price).floor() as i64;
                if quantity > 0 {
                    let cost = quantity as f64 * price;
                    cash -= cost;
                    shares = quantity;
                    trades.push(Trade {
                        date: bar.date,
                        side: TradeSide::Buy,
                        price,
                        shares: quantity,
                        value: cost,
                        reason: "buy signal".into(),
                    });
                }
            }
            (ExecMode::AllInOut, Action::Sell) if shares > 0 => {
                let proceeds = shares as f64 * price;
                cash += proceeds;
                trades.push(Trade {
                    date: bar.date,
                    side: TradeSide::Sell,
                    price,
                    shares,
                    value: proceeds,
                    reason: "sell signal".into(),
                });
                shares = 0;
            }
            (ExecMode::FixedAmount { amount }, Action::Buy) if price > 0.0 => {
                let budget = amount.min(cash);
                let quantity = (budget / price).floor() as i64;
                if quantity > 0 {
                    let cost = quantity as f64 * price;
                    cash -= cost;
                    shares += quantity;
                    trades.push(Trade {
                        date: bar.date,
                        side: TradeSide::Buy,
                        price,
                        shares: quantity,
                        value: cost,
                        reason: "fixed-amount buy".into(),
                    });
                }
            }
            _ => {}
        }

        let position_value = shares as f64 * price;
        let equity = cash + position_value;
        peak = peak.max(equity);
        let drawdown = if peak > 0.0 { (peak - equity) / peak } else { 0.0 };

        equity_curve.push(EquityPoint {
            date: bar.date,
            equity,
            cash,
            position_value,
            drawdown,
        });
    }

    let final_equity = equity_curve
        .last()
        .map(|p| p.equity)
        .unwrap_or(config.initial_capital);
    let stats = BacktestStats::compute(config.initial_capital, &trades, &equity_curve);

    BacktestResult {
        trades,
        equity: equity_curve,
        stats,
        initial_capital: config.initial_capital,
        final_equity,
    }
}
