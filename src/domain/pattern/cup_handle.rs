//! Cup-with-handle detector, completed and still-forming variants.
//!
//! Peaks are local maxima of `high` over a ±5-bar window. Every ordered
//! peak pair 15-120 bars apart whose highs differ by no more than 6% is a
//! rim candidate; the lowest low strictly between the rims must land in the
//! middle 70% of the span and sit 8-50% below the left rim. A completed cup
//! then needs a handle: within 25 bars of the right rim, the running low may
//! retrace at most 12% below the rim before a white bar closes above it
//! (the breakout bar). The right-peak search is window-limited to the
//! 120-bar maximum cup span; peak-pair enumeration stays O(n²) in the number
//! of peaks inside that window.

use crate::domain::bar::PriceBar;
use crate::domain::signal::{CupMeta, FormingPhase, Signal, SignalKind};

const MIN_SERIES_LEN: usize = 30;
const PEAK_WINDOW: usize = 5;
const MIN_CUP_BARS: usize = 15;
const MAX_CUP_BARS: usize = 120;
const RIM_TOLERANCE: f64 = 0.06;
const BOTTOM_EDGE_FRACTION: f64 = 0.15;
const MIN_DEPTH: f64 = 0.08;
const MAX_DEPTH: f64 = 0.50;
const MAX_HANDLE_BARS: usize = 25;
const MAX_HANDLE_RETRACE: f64 = 0.12;
const TREND_SHORT: usize = 50;
const TREND_LONG: usize = 200;
const VOLUME_WINDOW: usize = 20;
const VOLUME_MULT: f64 = 1.5;
const HIGH_WINDOW: usize = 252;
const READY_PROXIMITY: f64 = 0.05;
const DEDUP_BARS: usize = 3;

/// Optional preconditions and breakout confirmations.
#[derive(Debug, Clone)]
pub struct CupConfig {
    /// Left-rim close above its trailing 50-bar SMA, which itself exceeds
    /// the trailing 200-bar SMA. Skipped when history is insufficient.
    pub require_uptrend: bool,
    /// Breakout volume at least 1.5x the trailing 20-bar average.
    pub confirm_volume: bool,
    /// Breakout close at or above the trailing 252-bar closing high.
    pub confirm_new_high: bool,
}

impl Default for CupConfig {
    fn default() -> Self {
        CupConfig {
            require_uptrend: true,
            confirm_volume: true,
            confirm_new_high: true,
        }
    }
}

struct CupCandidate {
    left: usize,
    right: usize,
    bottom: usize,
    depth: f64,
}

/// Completed cup-with-handle breakouts, earliest candidate first.
/// Signals closer than 3 bars apart are deduplicated keeping the first.
pub fn detect_cup_handle(bars: &[PriceBar], config: &CupConfig) -> Vec<Signal> {
    if bars.len() < MIN_SERIES_LEN {
        return Vec::new();
    }

    let peaks = find_peaks(bars);
    let mut signals: Vec<Signal> = Vec::new();

    for (pi, &left) in peaks.iter().enumerate() {
        for &right in &peaks[pi + 1..] {
            let span = right - left;
            if span < MIN_CUP_BARS {
                continue;
            }
            if span > MAX_CUP_BARS {
                break;
            }

            let Some(cup) = validate_cup(bars, left, right, config) else {
                continue;
            };
            let Some((breakout, handle_low)) = find_breakout(bars, right, config) else {
                continue;
            };

            let bar = &bars[breakout];
            let rim = bars[right].high;
            let pullback = ((rim - handle_low) / rim * 100.0).max(0.0);
            signals.push(Signal {
                index: breakout,
                date: bar.date,
                price: bar.close,
                kind: SignalKind::CupHandle,
                label: "cup with handle".into(),
                description: format!(
                    "breakout above the {:.2} rim after a {:.0}% deep cup",
                    rim,
                    cup.depth * 100.0
                ),
                cup: Some(CupMeta {
                    left_rim_index: cup.left,
                    left_rim_price: bars[cup.left].high,
                    bottom_index: cup.bottom,
                    bottom_price: bars[cup.bottom].low,
                    right_rim_index: cup.right,
                    right_rim_price: rim,
                    cup_bars: span,
                    depth_pct: cup.depth * 100.0,
                    handle_bars: breakout - right,
                    handle_pullback_pct: pullback,
                }),
            });
        }
    }

    signals.sort_by_key(|s| s.index);
    dedup_signals(signals)
}

/// Cups whose right rim lies in the last 25 bars and which have not yet
/// broken out. At most one signal is reported, for the candidate closest
/// to its breakout level, placed at the last bar.
pub fn detect_cup_forming(bars: &[PriceBar], config: &CupConfig) -> Vec<Signal> {
    if bars.len() < MIN_SERIES_LEN {
        return Vec::new();
    }

    let last = bars.len() - 1;
    let close = bars[last].close;
    let peaks = find_peaks(bars);
    let mut best: Option<(f64, Signal)> = None;

    for (pi, &left) in peaks.iter().enumerate() {
        for &right in &peaks[pi + 1..] {
            let span = right - left;
            if span < MIN_CUP_BARS {
                continue;
            }
            if span > MAX_CUP_BARS {
                break;
            }
            if last - right > MAX_HANDLE_BARS {
                continue;
            }

            let rim = bars[right].high;
            if close > rim {
                continue;
            }
            let Some(cup) = validate_cup(bars, left, right, config) else {
                continue;
            };

            let handle_low = bars[right + 1..=last]
                .iter()
                .map(|b| b.low)
                .fold(f64::INFINITY, f64::min);
            let has_handle = right < last;
            if has_handle && handle_low < rim * (1.0 - MAX_HANDLE_RETRACE) {
                continue;
            }

            let phase = if has_handle && close >= rim * (1.0 - READY_PROXIMITY) && close > handle_low
            {
                FormingPhase::HandleReady
            } else {
                FormingPhase::HandleForming
            };

            let pullback = if has_handle {
                ((rim - handle_low) / rim * 100.0).max(0.0)
            } else {
                0.0
            };

            // closest to breakout wins
            let score = close / rim;
            if best.as_ref().is_some_and(|(s, _)| *s >= score) {
                continue;
            }

            best = Some((
                score,
                Signal {
                    index: last,
                    date: bars[last].date,
                    price: close,
                    kind: SignalKind::CupForming(phase),
                    label: "cup forming".into(),
                    description: format!(
                        "handle in progress below the {:.2} rim ({:.1}% to breakout)",
                        rim,
                        (rim - close) / rim * 100.0
                    ),
                    cup: Some(CupMeta {
                        left_rim_index: cup.left,
                        left_rim_price: bars[cup.left].high,
                        bottom_index: cup.bottom,
                        bottom_price: bars[cup.bottom].low,
                        right_rim_index: cup.right,
                        right_rim_price: rim,
                        cup_bars: span,
                        depth_pct: cup.depth * 100.0,
                        handle_bars: last - right,
                        handle_pullback_pct: pullback,
                    }),
                },
            ));
        }
    }

    best.map(|(_, s)| vec![s]).unwrap_or_default()
}

/// Indices whose high is the maximum over a ±5-bar window (clamped at the
/// series edges).
fn find_peaks(bars: &[PriceBar]) -> Vec<usize> {
    let mut peaks = Vec::new();
    for i in 0..bars.len() {
        let start = i.saturating_sub(PEAK_WINDOW);
        let end = (i + PEAK_WINDOW).min(bars.len() - 1);
        if bars[start..=end].iter().all(|b| b.high <= bars[i].high) {
            peaks.push(i);
        }
    }
    peaks
}

fn validate_cup(
    bars: &[PriceBar],
    left: usize,
    right: usize,
    config: &CupConfig,
) -> Option<CupCandidate> {
    let left_high = bars[left].high;
    let right_high = bars[right].high;
    if (right_high - left_high).abs() / left_high > RIM_TOLERANCE {
        return None;
    }

    if config.require_uptrend && left + 1 >= TREND_LONG {
        let short_avg = trailing_mean(bars, left, TREND_SHORT);
        let long_avg = trailing_mean(bars, left, TREND_LONG);
        if !(bars[left].close > short_avg && short_avg > long_avg) {
            return None;
        }
    }

    let span = right - left;
    let (bottom, bottom_low) = bars[left + 1..right]
        .iter()
        .enumerate()
        .map(|(k, b)| (left + 1 + k, b.low))
        .min_by(|a, b| a.1.total_cmp(&b.1))?;

    let edge = BOTTOM_EDGE_FRACTION * span as f64;
    if ((bottom - left) as f64) < edge || ((right - bottom) as f64) < edge {
        return None;
    }

    let depth = (left_high - bottom_low) / left_high;
    if !(MIN_DEPTH..=MAX_DEPTH).contains(&depth) {
        return None;
    }

    Some(CupCandidate {
        left,
        right,
        bottom,
        depth,
    })
}

/// Mean close over the `window` bars ending at `i` inclusive. Callers
/// guarantee `i + 1 >= window`.
fn trailing_mean(bars: &[PriceBar], i: usize, window: usize) -> f64 {
    bars[i + 1 - window..=i].iter().map(|b| b.close).sum::<f64>() / window as f64
}

/// First qualifying breakout within 25 bars of the right rim, or `None` if
/// the handle retraces more than 12% first. Returns (index, handle low).
fn find_breakout(bars: &[PriceBar], right: usize, config: &CupConfig) -> Option<(usize, f64)> {
    let rim = bars[right].high;
    let floor = rim * (1.0 - MAX_HANDLE_RETRACE);
    let mut handle_low = f64::INFINITY;

    let end = (right + MAX_HANDLE_BARS).min(bars.len() - 1);
    for j in right + 1..=end {
        handle_low = handle_low.min(bars[j].low);
        if handle_low < floor {
            return None;
        }

        let bar = &bars[j];
        if bar.is_white() && bar.close > rim && confirm_breakout(bars, j, config) {
            return Some((j, handle_low));
        }
    }

    None
}

fn confirm_breakout(bars: &[PriceBar], j: usize, config: &CupConfig) -> bool {
    if config.confirm_volume && j >= VOLUME_WINDOW {
        let avg: f64 = bars[j - VOLUME_WINDOW..j]
            .iter()
            .map(|b| b.volume as f64)
            .sum::<f64>()
            / VOLUME_WINDOW as f64;
        if (bars[j].volume as f64) < VOLUME_MULT * avg {
            return false;
        }
    }

    if config.confirm_new_high {
        let start = j.saturating_sub(HIGH_WINDOW);
        let prior_high = bars[start..j]
            .iter()
            .map(|b| b.close)
            .fold(f64::NEG_INFINITY, f64::max);
        if bars[j].close < prior_high {
            return false;
        }
    }

    true
}

fn dedup_signals(signals: Vec<Signal>) -> Vec<Signal> {
    let mut kept: Vec<Signal> = Vec::new();
    for signal in signals {
        match kept.last() {
            Some(prev) if signal.index < prev.index + DEDUP_BARS => {}
            _ => kept.push(signal),
        }
    }
    kept
}
