//! Bollinger Bands at 1, 2 and 3 standard deviations.
//!
//! Middle band is the SMA of closes over `period`; the standard deviation is
//! population (divides by N, not N-1) over the same window. All three band
//! pairs are computed simultaneously per bar.
//!
//! Warmup: first (period-1) entries are `None`.

use crate::domain::bar::PriceBar;
use crate::domain::indicator::round2;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BollingerPoint {
    pub middle: f64,
    pub upper1: f64,
    pub upper2: f64,
    pub upper3: f64,
    pub lower1: f64,
    pub lower2: f64,
    pub lower3: f64,
}

pub fn bollinger(bars: &[PriceBar], period: usize) -> Vec<Option<BollingerPoint>> {
    if period == 0 {
        return vec![None; bars.len()];
    }

    let mut values = Vec::with_capacity(bars.len());

    for i in 0..bars.len() {
        if i + 1 < period {
            values.push(None);
            continue;
        }

        let window = &bars[i + 1 - period..=i];
        let mean: f64 = window.iter().map(|b| b.close).sum::<f64>() / period as f64;
        let variance: f64 = window
            .iter()
            .map(|b| {
                let diff = b.close - mean;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        let stddev = variance.sqrt();

        values.push(Some(BollingerPoint {
            middle: round2(mean),
            upper1: round2(mean + stddev),
            upper2: round2(mean + 2.0 * stddev),
            upper3: round2(mean + 3.0 * stddev),
            lower1: round2(mean - stddev),
            lower2: round2(mean - 2.0 * stddev),
            lower3: round2(mean - 3.0 * stddev),
        }));
    }

    values
}
