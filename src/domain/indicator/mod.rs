//! Technical indicator implementations.
//!
//! Every indicator returns a `Vec` parallel to the input bars, with `None`
//! until its warm-up window is satisfied. A defined value never changes
//! retroactively. Emitted values are rounded to 2 decimal places; internal
//! accumulators keep full precision.

pub mod sma;
pub mod ema;
pub mod rsi;
pub mod macd;
pub mod bollinger;
pub mod atr;

pub use atr::atr;
pub use bollinger::{bollinger, BollingerPoint};
pub use ema::ema;
pub use macd::{macd, MacdSeries};
pub use rsi::rsi;
pub use sma::sma;

/// Round to 2 decimal places at the point of emission.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::round2;

    #[test]
    fn round2_truncates_to_cents() {
        assert_eq!(round2(3.14159), 3.14);
        assert_eq!(round2(2.71828), 2.72);
        assert_eq!(round2(-1.239), -1.24);
        assert_eq!(round2(100.0), 100.0);
    }
}
