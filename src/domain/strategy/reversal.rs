//! Threshold/reversal strategies: RSI oversold/overbought, band-reversal
//! entry with middle-band exit, capitulation entry with gap-fill exit.

use crate::domain::bar::PriceBar;
use crate::domain::indicator::{bollinger, rsi};
use crate::domain::pattern::{band_reversal, capitulation};
use crate::domain::strategy::{Action, PositionState};

pub fn rsi_reversal(
    bars: &[PriceBar],
    period: usize,
    oversold: f64,
    overbought: f64,
) -> Vec<Action> {
    let rsi_series = rsi(bars, period);
    let mut actions = vec![Action::Hold; bars.len()];
    let mut state = PositionState::Flat;

    for (i, value) in rsi_series.iter().enumerate() {
        let Some(v) = value else { continue };

        match state {
            PositionState::Flat if *v <= oversold => {
                actions[i] = Action::Buy;
                state = PositionState::Holding {
                    entry_price: bars[i].close,
                    entry_index: i,
                };
            }
            PositionState::Holding { .. } if *v >= overbought => {
                actions[i] = Action::Sell;
                state = PositionState::Flat;
            }
            _ => {}
        }
    }

    actions
}

/// Enter at a band-reversal signal bar; exit when the close regains the
/// middle band.
pub fn band_reversal(bars: &[PriceBar], period: usize) -> Vec<Action> {
    let signals = band_reversal::detect_with_period(bars, period);
    let bands = bollinger(bars, period);
    let mut entry_at = vec![false; bars.len()];
    for s in &signals {
        entry_at[s.index] = true;
    }

    let mut actions = vec![Action::Hold; bars.len()];
    let mut state = PositionState::Flat;

    for (i, bar) in bars.iter().enumerate() {
        match state {
            PositionState::Flat if entry_at[i] => {
                actions[i] = Action::Buy;
                state = PositionState::Holding {
                    entry_price: bar.close,
                    entry_index: i,
                };
            }
            PositionState::Holding { entry_index, .. } if i > entry_index => {
                if let Some(point) = &bands[i] {
                    if bar.close >= point.middle {
                        actions[i] = Action::Sell;
                        state = PositionState::Flat;
                    }
                }
            }
            _ => {}
        }
    }

    actions
}

/// Enter at a capitulation-gap signal bar; exit when the gap fills, i.e.
/// the close regains the low of the bar before the gap.
pub fn capitulation(bars: &[PriceBar], period: usize) -> Vec<Action> {
    let signals = capitulation::detect_with_period(bars, period);
    // signal at i means the gap bar is i-1; the gap fills at bars[i-2].low
    let mut gap_level = vec![None; bars.len()];
    for s in &signals {
        gap_level[s.index] = Some(bars[s.index - 2].low);
    }

    let mut actions = vec![Action::Hold; bars.len()];
    let mut state = PositionState::Flat;
    let mut fill_level = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        match state {
            PositionState::Flat => {
                if let Some(level) = gap_level[i] {
                    actions[i] = Action::Buy;
                    fill_level = level;
                    state = PositionState::Holding {
                        entry_price: bar.close,
                        entry_index: i,
                    };
                }
            }
            PositionState::Holding { entry_index, .. } => {
                if i > entry_index && bar.close >= fill_level {
                    actions[i] = Action::Sell;
                    state = PositionState::Flat;
                }
            }
        }
    }

    actions
}
