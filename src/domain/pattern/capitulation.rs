//! Gap-down capitulation detector.
//!
//! At each index i (i >= 2): bar i-1 opened below the low two bars prior
//! (a gap down) and closed black; bar i is also black and closes within
//! 110% of the -2σ Bollinger band. Fires at i, priced at bar i's low.
//! The scan is stateless; overlapping three-bar windows may each fire.

use crate::domain::bar::PriceBar;
use crate::domain::indicator::bollinger;
use crate::domain::signal::{Signal, SignalKind};

const BAND_PERIOD: usize = 25;
const BAND_PROXIMITY: f64 = 1.10;

pub fn detect_capitulation(bars: &[PriceBar]) -> Vec<Signal> {
    detect_with_period(bars, BAND_PERIOD)
}

/// Same scan over a caller-chosen band period.
pub fn detect_with_period(bars: &[PriceBar], period: usize) -> Vec<Signal> {
    if period == 0 || bars.len() < period {
        return Vec::new();
    }

    let bands = bollinger(bars, period);
    let mut signals = Vec::new();

    for i in 2..bars.len() {
        let Some(point) = &bands[i] else { continue };

        let gap_bar = &bars[i - 1];
        let gap_down = gap_bar.open < bars[i - 2].low;
        if !(gap_down && gap_bar.is_black()) {
            continue;
        }

        let bar = &bars[i];
        if bar.is_black() && bar.close <= point.lower2 * BAND_PROXIMITY {
            signals.push(Signal {
                index: i,
                date: bar.date,
                price: bar.low,
                kind: SignalKind::CapitulationGap,
                label: "capitulation gap".into(),
                description: format!(
                    "two black bars after a gap down, close near the -2σ band ({:.2})",
                    point.lower2
                ),
                cup: None,
            });
        }
    }

    signals
}
