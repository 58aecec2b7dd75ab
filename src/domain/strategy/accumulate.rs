//! Fixed-amount accumulation: buy on the first bar of each calendar month,
//! independent of price. Never sells.

use chrono::Datelike;

use crate::domain::bar::PriceBar;
use crate::domain::strategy::Action;

pub fn monthly(bars: &[PriceBar]) -> Vec<Action> {
    let mut actions = vec![Action::Hold; bars.len()];
    let mut current_month: Option<(i32, u32)> = None;

    for (i, bar) in bars.iter().enumerate() {
        let month = (bar.date.year(), bar.date.month());
        if current_month != Some(month) {
            actions[i] = Action::Buy;
            current_month = Some(month);
        }
    }

    actions
}
