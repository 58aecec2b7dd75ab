//! CSV file data adapter.
//!
//! Reads `SYMBOL.csv` files (`date,open,high,low,close,volume`, dates
//! `YYYY-MM-DD`) from a base directory. Rows are sorted by date and
//! de-duplicated on load, keeping the first row per date.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::domain::bar::PriceBar;
use crate::domain::error::BarsightError;
use crate::ports::data_port::DataPort;

pub struct CsvDataAdapter {
    base_path: PathBuf,
}

impl CsvDataAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{symbol}.csv"))
    }

    fn load_all(&self, symbol: &str) -> Result<Vec<PriceBar>, BarsightError> {
        let path = self.csv_path(symbol);
        let mut rdr = csv::Reader::from_path(&path).map_err(|e| BarsightError::Data {
            reason: format!("failed to read {}: {e}", path.display()),
        })?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| BarsightError::Data {
                reason: format!("CSV parse error: {e}"),
            })?;
            bars.push(parse_record(&record)?);
        }

        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Ok(bars)
    }
}

fn field<'a>(record: &'a csv::StringRecord, index: usize, name: &str) -> Result<&'a str, BarsightError> {
    record.get(index).ok_or_else(|| BarsightError::Data {
        reason: format!("missing {name} column"),
    })
}

fn parse_record(record: &csv::StringRecord) -> Result<PriceBar, BarsightError> {
    let date = NaiveDate::parse_from_str(field(record, 0, "date")?, "%Y-%m-%d").map_err(|e| {
        BarsightError::Data {
            reason: format!("invalid date: {e}"),
        }
    })?;

    let number = |index: usize, name: &str| -> Result<f64, BarsightError> {
        field(record, index, name)?
            .parse()
            .map_err(|e| BarsightError::Data {
                reason: format!("invalid {name} value: {e}"),
            })
    };

    let volume: i64 = field(record, 5, "volume")?
        .parse()
        .map_err(|e| BarsightError::Data {
            reason: format!("invalid volume value: {e}"),
        })?;

    Ok(PriceBar {
        date,
        open: number(1, "open")?,
        high: number(2, "high")?,
        low: number(3, "low")?,
        close: number(4, "close")?,
        volume,
    })
}

impl DataPort for CsvDataAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, BarsightError> {
        let bars = self.load_all(symbol)?;
        Ok(bars
            .into_iter()
            .filter(|b| b.date >= start && b.date <= end)
            .collect())
    }

    fn list_symbols(&self) -> Result<Vec<String>, BarsightError> {
        let entries = std::fs::read_dir(&self.base_path).map_err(|e| BarsightError::Data {
            reason: format!("failed to read directory {}: {e}", self.base_path.display()),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| BarsightError::Data {
                reason: format!("directory entry error: {e}"),
            })?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if let Some(stem) = name.strip_suffix(".csv") {
                symbols.push(stem.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BarsightError> {
        let bars = self.load_all(symbol)?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, bars.len())),
            _ => None,
        })
    }
}
