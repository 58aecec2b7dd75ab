//! MACD (Moving Average Convergence Divergence).
//!
//! MACD line = EMA(short) - EMA(long); signal line = EMA(signal) of the MACD
//! line, seeded with the first defined MACD value; histogram = MACD - signal.
//! The MACD line is defined from index (long-1), signal and histogram from
//! (long+signal-2). The histogram is the difference of the *emitted* (2-dp)
//! macd and signal values, so `histogram == macd - signal` holds exactly.

use crate::domain::bar::PriceBar;
use crate::domain::indicator::ema::ema_raw;
use crate::domain::indicator::round2;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

pub fn macd(bars: &[PriceBar], short: usize, long: usize, signal_period: usize) -> MacdSeries {
    let n = bars.len();
    if short == 0 || long == 0 || signal_period == 0 || n == 0 {
        return MacdSeries {
            macd: vec![None; n],
            signal: vec![None; n],
            histogram: vec![None; n],
        };
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema_short = ema_raw(&closes, short);
    let ema_long = ema_raw(&closes, long);

    let macd_raw: Vec<f64> = ema_short
        .iter()
        .zip(&ema_long)
        .map(|(s, l)| s - l)
        .collect();

    let macd_warmup = long - 1;
    let signal_warmup = long + signal_period - 2;

    let mut macd_line = vec![None; n];
    let mut signal_line = vec![None; n];
    let mut histogram = vec![None; n];

    let mut signal_ema = 0.0;
    let k = 2.0 / (signal_period as f64 + 1.0);

    for i in macd_warmup..n {
        let m = round2(macd_raw[i]);
        macd_line[i] = Some(m);

        if i == macd_warmup {
            signal_ema = macd_raw[i];
        } else {
            signal_ema = macd_raw[i] * k + signal_ema * (1.0 - k);
        }

        if i >= signal_warmup {
            let s = round2(signal_ema);
            signal_line[i] = Some(s);
            histogram[i] = Some(m - s);
        }
    }

    MacdSeries {
        macd: macd_line,
        signal: signal_line,
        histogram,
    }
}
