//! Crossover strategies: short/long SMA and MACD-line/signal-line crosses.
//!
//! Buy on the upward cross, sell on the downward cross, hold otherwise.
//! A cross needs both lines defined at the current and previous bar.

use crate::domain::bar::PriceBar;
use crate::domain::indicator::{macd, sma};
use crate::domain::strategy::{Action, PositionState};

pub fn sma_cross(bars: &[PriceBar], short: usize, long: usize) -> Vec<Action> {
    let fast = sma(bars, short);
    let slow = sma(bars, long);
    cross_actions(bars, &fast, &slow)
}

pub fn macd_cross(bars: &[PriceBar], short: usize, long: usize, signal: usize) -> Vec<Action> {
    let series = macd(bars, short, long, signal);
    cross_actions(bars, &series.macd, &series.signal)
}

fn cross_actions(bars: &[PriceBar], fast: &[Option<f64>], slow: &[Option<f64>]) -> Vec<Action> {
    let mut actions = vec![Action::Hold; bars.len()];
    let mut state = PositionState::Flat;

    for i in 1..bars.len() {
        let (Some(f), Some(s), Some(fp), Some(sp)) = (fast[i], slow[i], fast[i - 1], slow[i - 1])
        else {
            continue;
        };

        if fp <= sp && f > s {
            if state == PositionState::Flat {
                actions[i] = Action::Buy;
                state = PositionState::Holding {
                    entry_price: bars[i].close,
                    entry_index: i,
                };
            }
        } else if fp >= sp && f < s {
            if let PositionState::Holding { .. } = state {
                actions[i] = Action::Sell;
                state = PositionState::Flat;
            }
        }
    }

    actions
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
                high: close + 0.5,
                low: close - 0.5,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn monotone_rise_buys_at_most_once() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let actions = sma_cross(&make_bars(&closes), 5, 25);
        let buys = actions.iter().filter(|a| **a == Action::Buy).count();
        let sells = actions.iter().filter(|a| **a == Action::Sell).count();
        assert!(buys <= 1);
        assert_eq!(sells, 0);
    }

    #[test]
    fn v_shape_buys_on_upward_cross() {
        // fall then recover: the short SMA crosses the long SMA upward once
        let closes: Vec<f64> = (0..30)
            .map(|i| 130.0 - i as f64)
            .chain((0..30).map(|i| 100.0 + i as f64 * 1.5))
            .collect();
        let actions = sma_cross(&make_bars(&closes), 5, 25);
        let buys = actions.iter().filter(|a| **a == Action::Buy).count();
        assert_eq!(buys, 1);
    }

    #[test]
    fn entries_only_when_flat() {
        // oscillating tape: crosses alternate, so actions must alternate too
        let closes: Vec<f64> = (0..120)
            .map(|i| 100.0 + ((i as f64) * 0.35).sin() * 10.0)
            .collect();
        let actions = sma_cross(&make_bars(&closes), 5, 25);

        let mut expect_buy = true;
        for action in &actions {
            match action {
                Action::Buy => {
                    assert!(expect_buy, "buy while holding");
                    expect_buy = false;
                }
                Action::Sell => {
                    assert!(!expect_buy, "sell while flat");
                    expect_buy = true;
                }
                Action::Hold => {}
            }
        }
    }

    #[test]
    fn macd_cross_flat_series_holds() {
        let actions = macd_cross(&make_bars(&[100.0; 60]), 12, 26, 9);
        assert!(actions.iter().all(|a| *a == Action::Hold));
    }

    #[test]
    fn short_series_all_hold() {
        let actions = sma_cross(&make_bars(&[100.0, 101.0, 102.0]), 5, 25);
        assert_eq!(actions, vec![Action::Hold; 3]);
    }
}
