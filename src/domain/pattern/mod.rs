//! Pattern detectors: independent scanning passes over a bar series, each
//! producing its own ordered signal list.

pub mod band_reversal;
pub mod capitulation;
pub mod cup_handle;

pub use band_reversal::detect_band_reversal;
pub use capitulation::detect_capitulation;
pub use cup_handle::{detect_cup_forming, detect_cup_handle, CupConfig};

use crate::domain::bar::PriceBar;
use crate::domain::signal::Signal;

/// Run every detector and merge the results into one index-ordered list.
pub fn scan_signals(bars: &[PriceBar]) -> Vec<Signal> {
    let mut signals = detect_band_reversal(bars);
    signals.extend(detect_capitulation(bars));
    let cup = CupConfig::default();
    signals.extend(detect_cup_handle(bars, &cup));
    signals.extend(detect_cup_forming(bars, &cup));
    signals.sort_by_key(|s| s.index);
    signals
}
