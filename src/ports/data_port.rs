//! Data access port trait.

use chrono::NaiveDate;

use crate::domain::bar::PriceBar;
use crate::domain::error::BarsightError;

pub trait DataPort {
    /// Bars for `symbol` within [start, end], oldest first, unique dates.
    fn fetch_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, BarsightError>;

    fn list_symbols(&self) -> Result<Vec<String>, BarsightError>;

    /// (first date, last date, bar count), or `None` when the symbol has
    /// no data.
    fn data_range(&self, symbol: &str)
        -> Result<Option<(NaiveDate, NaiveDate, usize)>, BarsightError>;
}
