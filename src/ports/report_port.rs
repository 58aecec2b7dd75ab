//! Report generation port trait.

use crate::domain::error::BarsightError;
use crate::domain::simulator::BacktestResult;
use crate::domain::strategy::StrategyDef;

/// Port for writing backtest reports.
pub trait ReportPort {
    fn write(
        &self,
        result: &BacktestResult,
        strategy: &StrategyDef,
        output_path: &str,
    ) -> Result<(), BarsightError>;
}
