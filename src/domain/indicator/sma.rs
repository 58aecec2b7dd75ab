//! Simple Moving Average.
//!
//! Rolling mean of close prices over `period` bars, maintained as a running
//! sum. Warmup: first (period-1) entries are `None`.

use crate::domain::bar::PriceBar;
use crate::domain::indicator::round2;

pub fn sma(bars: &[PriceBar], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; bars.len()];
    }

    let mut values = Vec::with_capacity(bars.len());
    let mut sum = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        sum += bar.close;
        if i >= period {
            sum -= bars[i - period].close;
        }
        if i + 1 >= period {
            values.push(Some(round2(sum / period as f64)));
        } else {
            values.push(None);
        }
    }

    values
}
