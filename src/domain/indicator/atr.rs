//! ATR (Average True Range), Wilder's smoothing.
//!
//! True range = max(high-low, |high-prev_close|, |low-prev_close|); bar 0
//! uses high-low. The first ATR at index (period-1) is a simple average of
//! the first `period` true ranges, thereafter
//! ATR = (prev_atr * (n-1) + TR) / n.

use crate::domain::bar::PriceBar;
use crate::domain::indicator::round2;

pub fn atr(bars: &[PriceBar], period: usize) -> Vec<Option<f64>> {
    if period == 0 || bars.len() < period {
        return vec![None; bars.len()];
    }

    let tr: Vec<f64> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                bar.high - bar.low
            } else {
                bar.true_range(bars[i - 1].close)
            }
        })
        .collect();

    let mut values = vec![None; period - 1];
    let mut atr = tr[..period].iter().sum::<f64>() / period as f64;
    values.push(Some(round2(atr)));

    for &range in &tr[period..] {
        atr = (atr * (period - 1) as f64 + range) / period as f64;
        values.push(Some(round2(atr)));
    }

    values
}
