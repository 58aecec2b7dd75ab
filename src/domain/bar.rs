//! OHLCV price-bar representation and sampling periods.

use chrono::{Datelike, NaiveDate};

/// One daily or weekly price bar. A series is ordered oldest-first with
/// unique dates; calendar gaps are tolerated.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl PriceBar {
    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }

    /// close > open
    pub fn is_white(&self) -> bool {
        self.close > self.open
    }

    /// close < open
    pub fn is_black(&self) -> bool {
        self.close < self.open
    }
}

/// Sampling period of a bar series, used to key parameter presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SamplingPeriod {
    Daily,
    Weekly,
}

impl std::fmt::Display for SamplingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SamplingPeriod::Daily => write!(f, "daily"),
            SamplingPeriod::Weekly => write!(f, "weekly"),
        }
    }
}

impl std::str::FromStr for SamplingPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" | "d" => Ok(SamplingPeriod::Daily),
            "weekly" | "w" => Ok(SamplingPeriod::Weekly),
            other => Err(format!("unknown period '{other}' (expected daily or weekly)")),
        }
    }
}

/// Fold a daily series into ISO-week bars: first open, max high, min low,
/// last close, summed volume, dated at the week's last bar. The engine
/// never resamples implicitly; callers opt in.
pub fn resample_weekly(bars: &[PriceBar]) -> Vec<PriceBar> {
    let mut weekly: Vec<PriceBar> = Vec::new();
    let mut current_week: Option<(i32, u32)> = None;

    for bar in bars {
        let week = bar.date.iso_week();
        let key = (week.year(), week.week());

        match (weekly.last_mut(), current_week) {
            (Some(acc), Some(k)) if k == key => {
                acc.high = acc.high.max(bar.high);
                acc.low = acc.low.min(bar.low);
                acc.close = bar.close;
                acc.volume += bar.volume;
                acc.date = bar.date;
            }
            _ => {
                weekly.push(bar.clone());
                current_week = Some(key);
            }
        }
    }

    weekly
}
