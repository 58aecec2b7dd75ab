//! RSI (Relative Strength Index), Wilder's smoothing.
//!
//! - First average: simple mean of gains/losses over the first n deltas
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//! - RSI = 100 - (100 / (1 + avg_gain / avg_loss)); avg_loss == 0 → 100
//!
//! Warmup: the first value lands at index n (n price changes are needed).
//! Output is bounded in [0, 100].

use crate::domain::bar::PriceBar;
use crate::domain::indicator::round2;

pub fn rsi(bars: &[PriceBar], period: usize) -> Vec<Option<f64>> {
    if period == 0 || bars.len() <= period {
        return vec![None; bars.len()];
    }

    let mut values = vec![None; period];
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..=period {
        let change = bars[i].close - bars[i - 1].close;
        avg_gain += change.max(0.0);
        avg_loss += (-change).max(0.0);
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    values.push(Some(round2(rsi_value(avg_gain, avg_loss))));

    for i in (period + 1)..bars.len() {
        let change = bars[i].close - bars[i - 1].close;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);
        avg_gain = (avg_gain * (period - 1) as f64 + gain) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + loss) / period as f64;
        values.push(Some(round2(rsi_value(avg_gain, avg_loss))));
    }

    values
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
