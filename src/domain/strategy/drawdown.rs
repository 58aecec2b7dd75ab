//! Drawdown/recovery strategies: buy a set percentage below the running
//! peak, sell after recovering a set percentage from the entry price.
//! The dip variants gate the entry on volume, RSI or the -3σ band.
//!
//! The running peak tracks closes while flat and re-arms at the exit bar's
//! close, so a sell does not immediately re-trigger the same drawdown.

use crate::domain::bar::PriceBar;
use crate::domain::indicator::{bollinger, rsi};
use crate::domain::strategy::{Action, PositionState};

const RSI_PERIOD: usize = 14;
const VOLUME_WINDOW: usize = 20;

pub fn peak_drop(bars: &[PriceBar], drop_pct: f64, recover_pct: f64) -> Vec<Action> {
    scan(bars, drop_pct, recover_pct, |_| true)
}

pub fn dip_volume(
    bars: &[PriceBar],
    drop_pct: f64,
    recover_pct: f64,
    volume_mult: f64,
) -> Vec<Action> {
    scan(bars, drop_pct, recover_pct, |i| {
        if i < VOLUME_WINDOW {
            return false;
        }
        let avg: f64 = bars[i - VOLUME_WINDOW..i]
            .iter()
            .map(|b| b.volume as f64)
            .sum::<f64>()
            / VOLUME_WINDOW as f64;
        bars[i].volume as f64 >= volume_mult * avg
    })
}

pub fn dip_rsi(bars: &[PriceBar], drop_pct: f64, recover_pct: f64, rsi_max: f64) -> Vec<Action> {
    let rsi_series = rsi(bars, RSI_PERIOD);
    scan(bars, drop_pct, recover_pct, |i| {
        rsi_series[i].is_some_and(|v| v <= rsi_max)
    })
}

pub fn dip_band(bars: &[PriceBar], drop_pct: f64, recover_pct: f64, period: usize) -> Vec<Action> {
    let bands = bollinger(bars, period);
    scan(bars, drop_pct, recover_pct, |i| {
        bands[i]
            .as_ref()
            .is_some_and(|p| bars[i].close <= p.lower3)
    })
}

fn scan<F>(bars: &[PriceBar], drop_pct: f64, recover_pct: f64, gate: F) -> Vec<Action>
where
    F: Fn(usize) -> bool,
{
    let mut actions = vec![Action::Hold; bars.len()];
    let mut state = PositionState::Flat;
    let mut peak = f64::NEG_INFINITY;

    for (i, bar) in bars.iter().enumerate() {
        match state {
            PositionState::Flat => {
                peak = peak.max(bar.close);
                if bar.close <= peak * (1.0 - drop_pct / 100.0) && gate(i) {
                    actions[i] = Action::Buy;
                    state = PositionState::Holding {
                        entry_price: bar.close,
                        entry_index: i,
                    };
                }
            }
            PositionState::Holding { entry_price, .. } => {
                if bar.close >= entry_price * (1.0 + recover_pct / 100.0) {
                    actions[i] = Action::Sell;
                    state = PositionState::Flat;
                    peak = bar.close;
                }
            }
        }
    }

    actions
}
