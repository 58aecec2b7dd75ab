#![allow(dead_code)]

use chrono::{Duration, NaiveDate};

use barsight::domain::bar::PriceBar;
use barsight::domain::error::BarsightError;
use barsight::ports::data_port::DataPort;

use std::collections::HashMap;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn day(offset: usize) -> NaiveDate {
    date(2024, 1, 1) + Duration::days(offset as i64)
}

pub fn make_bar(offset: usize, open: f64, high: f64, low: f64, close: f64, volume: i64) -> PriceBar {
    PriceBar {
        date: day(offset),
        open,
        high,
        low,
        close,
        volume,
    }
}

/// Bar with ±1 high/low around the close, at a daily cadence.
pub fn close_bar(offset: usize, close: f64) -> PriceBar {
    make_bar(offset, close - 0.5, close + 1.0, close - 1.0, close, 1000)
}

/// Monotone rising series: close = start_price + i.
pub fn rising_bars(count: usize, start_price: f64) -> Vec<PriceBar> {
    (0..count)
        .map(|i| close_bar(i, start_price + i as f64))
        .collect()
}

/// Every bar identical; open == close so bars are neither white nor black.
pub fn flat_bars(count: usize, price: f64) -> Vec<PriceBar> {
    (0..count)
        .map(|i| make_bar(i, price, price, price, price, 1000))
        .collect()
}

/// 105-bar cup-with-handle tape: left rim at 5 (high 100), bottom at 45
/// (low 70), right rim at 85 (high 100), handle pulling back toward 95,
/// breakout at 96 on elevated volume, tapering tail.
pub fn cup_series() -> Vec<PriceBar> {
    let mut bars = Vec::new();
    for i in 0..5 {
        bars.push(make_bar(i, 94.0, 95.5, 93.5, 94.5, 1000));
    }
    bars.push(make_bar(5, 98.0, 100.0, 97.5, 99.0, 1000));
    for i in 6..45 {
        let close = 99.0 - (i - 5) as f64 * (28.0 / 39.0);
        bars.push(make_bar(i, close + 0.3, close + 0.5, close - 0.5, close, 1000));
    }
    bars.push(make_bar(45, 70.8, 71.0, 70.0, 70.5, 1000));
    for i in 46..85 {
        let close = 70.5 + (i - 45) as f64 * (28.0 / 39.0);
        bars.push(make_bar(i, close - 0.3, close + 0.5, close - 0.5, close, 1000));
    }
    bars.push(make_bar(85, 98.5, 100.0, 98.0, 99.0, 1000));
    for i in 86..96 {
        let close = 99.0 - (i - 85) as f64 * 0.4;
        bars.push(make_bar(i, close + 0.2, close + 0.5, close - 0.5, close, 1000));
    }
    bars.push(make_bar(96, 97.0, 101.5, 96.5, 101.0, 5000));
    for i in 97..105 {
        let high = 101.0 - (i - 96) as f64 * 0.05;
        bars.push(make_bar(i, 100.3, high, 100.0, 100.5, 1000));
    }
    bars
}

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, BarsightError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(BarsightError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start && b.date <= end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, BarsightError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BarsightError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(BarsightError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}
