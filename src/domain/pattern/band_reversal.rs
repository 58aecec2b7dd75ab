//! Bounce-off-lower-band reversal detector.
//!
//! A "below-band" flag is armed when a bar closes below the -2σ Bollinger
//! band. While armed, the first bar that closes back at or above the band
//! fires a signal if it is white (close > open), priced at that bar's low;
//! a non-white recovery bar just clears the flag. Closing below the band
//! again re-arms it.

use crate::domain::bar::PriceBar;
use crate::domain::indicator::bollinger;
use crate::domain::signal::{Signal, SignalKind};

const BAND_PERIOD: usize = 25;

pub fn detect_band_reversal(bars: &[PriceBar]) -> Vec<Signal> {
    detect_with_period(bars, BAND_PERIOD)
}

/// Same scan over a caller-chosen band period; the band-reversal strategy
/// threads its tuned period through here.
pub fn detect_with_period(bars: &[PriceBar], period: usize) -> Vec<Signal> {
    if period == 0 || bars.len() < period {
        return Vec::new();
    }

    let bands = bollinger(bars, period);
    let mut signals = Vec::new();
    let mut below_band = false;

    for (i, bar) in bars.iter().enumerate() {
        let Some(point) = &bands[i] else { continue };

        if bar.close < point.lower2 {
            below_band = true;
            continue;
        }

        if below_band {
            if bar.is_white() {
                signals.push(Signal {
                    index: i,
                    date: bar.date,
                    price: bar.low,
                    kind: SignalKind::BandReversal,
                    label: "band reversal".into(),
                    description: format!(
                        "white bar recovering above the -2σ band ({:.2})",
                        point.lower2
                    ),
                    cup: None,
                });
            }
            below_band = false;
        }
    }

    signals
}
