//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the first close (not an SMA seed), then
//! EMA[i] = C[i]*k + EMA[i-1]*(1-k). The recurrence runs from bar 0 but
//! values are only reported from index (n-1); earlier entries are `None`.

use crate::domain::bar::PriceBar;
use crate::domain::indicator::round2;

pub fn ema(bars: &[PriceBar], period: usize) -> Vec<Option<f64>> {
    ema_of(&bars.iter().map(|b| b.close).collect::<Vec<_>>(), period)
}

/// EMA over an arbitrary value sequence.
pub(crate) fn ema_of(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || values.is_empty() {
        return vec![None; values.len()];
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut ema = values[0];

    for (i, &value) in values.iter().enumerate() {
        if i > 0 {
            ema = value * k + ema * (1.0 - k);
        }
        if i + 1 >= period {
            out.push(Some(round2(ema)));
        } else {
            out.push(None);
        }
    }

    out
}

/// Full-precision variant used internally by MACD, which rounds only at
/// its own emission point.
pub(crate) fn ema_raw(values: &[f64], period: usize) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut ema = values[0];

    for (i, &value) in values.iter().enumerate() {
        if i > 0 {
            ema = value * k + ema * (1.0 - k);
        }
        out.push(ema);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn ema_warmup() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = ema(&bars, 3);
        assert!(series[0].is_none());
        assert!(series[1].is_none());
        assert!(series[2].is_some());
        assert!(series[4].is_some());
    }

    #[test]
    fn ema_first_value_seed() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = ema(&bars, 3);
        // seed 10, k=0.5: 10 → 15 → 22.5 (not the SMA 20)
        assert_eq!(series[2], Some(22.5));
    }

    #[test]
    fn ema_recurrence() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0]);
        let series = ema(&bars, 3);
        // 22.5 → 40*0.5 + 22.5*0.5 = 31.25
        assert_eq!(series[3], Some(31.25));
    }

    #[test]
    fn ema_flat_series() {
        let bars = make_bars(&[100.0; 5]);
        let series = ema(&bars, 3);
        for v in series.iter().skip(2) {
            assert_eq!(*v, Some(100.0));
        }
    }

    #[test]
    fn ema_zero_period() {
        let bars = make_bars(&[10.0, 20.0]);
        assert_eq!(ema(&bars, 0), vec![None, None]);
    }

    #[test]
    fn ema_empty_bars() {
        assert!(ema(&[], 3).is_empty());
    }
}
