//! Aggregate statistics derived from a completed backtest walk.

use crate::domain::simulator::{EquityPoint, Trade, TradeSide};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BacktestStats {
    pub total_return: f64,
    pub total_return_pct: f64,
    pub trade_count: usize,
    pub round_trips: usize,
    /// Fraction of buy→sell pairs with a positive price-based profit.
    pub win_rate: f64,
    pub max_drawdown_pct: f64,
    pub max_drawdown_abs: f64,
    /// Gross profit / gross loss. `+∞` with wins and no losses, `0` with
    /// neither.
    pub profit_factor: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    /// Annualized Sharpe ratio over day-over-day equity returns (sample
    /// standard deviation, ×√252). `0` with fewer than 2 valid returns or
    /// zero deviation.
    pub sharpe_ratio: f64,
}

impl BacktestStats {
    pub fn neutral() -> Self {
        BacktestStats {
            total_return: 0.0,
            total_return_pct: 0.0,
            trade_count: 0,
            round_trips: 0,
            win_rate: 0.0,
            max_drawdown_pct: 0.0,
            max_drawdown_abs: 0.0,
            profit_factor: 0.0,
            avg_win: 0.0,
            avg_loss: 0.0,
            sharpe_ratio: 0.0,
        }
    }

    pub fn compute(initial_capital: f64, trades: &[Trade], equity: &[EquityPoint]) -> Self {
        if equity.is_empty() {
            return BacktestStats {
                trade_count: trades.len(),
                ..BacktestStats::neutral()
            };
        }

        let final_equity = equity.last().map(|p| p.equity).unwrap_or(initial_capital);
        let total_return = final_equity - initial_capital;
        let total_return_pct = if initial_capital > 0.0 {
            total_return / initial_capital * 100.0
        } else {
            0.0
        };

        let (round_trips, win_rate, profit_factor, avg_win, avg_loss) = round_trip_stats(trades);
        let (max_drawdown_pct, max_drawdown_abs) = max_drawdown(equity);
        let sharpe_ratio = sharpe(equity);

        BacktestStats {
            total_return,
            total_return_pct,
            trade_count: trades.len(),
            round_trips,
            win_rate,
            max_drawdown_pct,
            max_drawdown_abs,
            profit_factor,
            avg_win,
            avg_loss,
            sharpe_ratio,
        }
    }
}

/// Pair each sell with the preceding buy and fold profit statistics.
fn round_trip_stats(trades: &[Trade]) -> (usize, f64, f64, f64, f64) {
    let mut open_buy: Option<&Trade> = None;
    let mut round_trips = 0usize;
    let mut wins = 0usize;
    let mut losses = 0usize;
    let mut gross_profit = 0.0_f64;
    let mut gross_loss = 0.0_f64;

    for trade in trades {
        match trade.side {
            TradeSide::Buy => {
                if open_buy.is_none() {
                    open_buy = Some(trade);
                }
            }
            TradeSide::Sell => {
                if let Some(buy) = open_buy.take() {
                    round_trips += 1;
                    let pnl = (trade.price - buy.price) * trade.shares as f64;
                    if pnl > 0.0 {
                        wins += 1;
                        gross_profit += pnl;
                    } else if pnl < 0.0 {
                        losses += 1;
                        gross_loss += pnl.abs();
                    }
                }
            }
        }
    }

    let win_rate = if round_trips > 0 {
        wins as f64 / round_trips as f64
    } else {
        0.0
    };

    let profit_factor = if gross_loss > 0.0 {
        gross_profit / gross_loss
    } else if gross_profit > 0.0 {
        f64::INFINITY
    } else {
        0.0
    };

    let avg_win = if wins > 0 { gross_profit / wins as f64 } else { 0.0 };
    let avg_loss = if losses > 0 { gross_loss / losses as f64 } else { 0.0 };

    (round_trips, win_rate, profit_factor, avg_win, avg_loss)
}

fn max_drawdown(equity: &[EquityPoint]) -> (f64, f64) {
    let mut peak = f64::NEG_INFINITY;
    let mut max_pct = 0.0_f64;
    let mut max_abs = 0.0_f64;

    for point in equity {
        peak = peak.max(point.equity);
        let abs = peak - point.equity;
        if abs > max_abs {
            max_abs = abs;
        }
        if peak > 0.0 {
            let pct = abs / peak * 100.0;
            if pct > max_pct {
                max_pct = pct;
            }
        }
    }

    (max_pct, max_abs)
}

/// Annualized Sharpe over day-over-day equity returns. Bars whose previous
/// equity is 0 contribute no return.
fn sharpe(equity: &[EquityPoint]) -> f64 {
    let returns: Vec<f64> = equity
        .windows(2)
        .filter(|w| w[0].equity > 0.0)
        .map(|w| (w[1].equity - w[0].equity) / w[0].equity)
        .collect();

    if returns.len() < 2 {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let stddev = variance.sqrt();

    if stddev > 0.0 {
        mean / stddev * TRADING_DAYS_PER_YEAR.sqrt()
    } else {
        0.0
    }
}
