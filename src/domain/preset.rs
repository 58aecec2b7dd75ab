//! Parameter preset store: a static, versioned table of grid-searched
//! parameter values keyed by (strategy, sampling period). The summary
//! statistics recorded alongside are informational only; the simulator
//! never reads them. Lookups fall back to a strategy's declared defaults,
//! and the table deliberately omits some combinations so the fallback path
//! is exercised in normal use.

use crate::domain::bar::SamplingPeriod;
use crate::domain::strategy::{StrategyId, StrategyParams};

pub const PRESET_TABLE_VERSION: u32 = 3;

/// Where resolved parameters should come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSource {
    /// Use the tuned preset when one exists.
    Tuned,
    /// Ignore presets and use the strategy's declared defaults.
    Defaults,
}

#[derive(Debug, Clone)]
pub struct PresetEntry {
    pub strategy: StrategyId,
    pub period: SamplingPeriod,
    pub params: &'static [(&'static str, f64)],
    /// Round-trip win rate observed during the tuning search.
    pub win_rate: f64,
    /// Total return observed during the tuning search, in percent.
    pub return_pct: f64,
    /// Trade count observed during the tuning search.
    pub trades: u32,
}

static PRESETS: [PresetEntry; 12] = [
    PresetEntry {
        strategy: StrategyId::SmaCross,
        period: SamplingPeriod::Daily,
        params: &[("short", 7.0), ("long", 29.0)],
        win_rate: 0.47,
        return_pct: 41.2,
        trades: 38,
    },
    PresetEntry {
        strategy: StrategyId::SmaCross,
        period: SamplingPeriod::Weekly,
        params: &[("short", 4.0), ("long", 18.0)],
        win_rate: 0.52,
        return_pct: 63.5,
        trades: 11,
    },
    PresetEntry {
        strategy: StrategyId::MacdCross,
        period: SamplingPeriod::Daily,
        params: &[("short", 10.0), ("long", 24.0), ("signal", 8.0)],
        win_rate: 0.44,
        return_pct: 28.9,
        trades: 52,
    },
    PresetEntry {
        strategy: StrategyId::RsiReversal,
        period: SamplingPeriod::Daily,
        params: &[("period", 12.0), ("oversold", 27.0), ("overbought", 72.0)],
        win_rate: 0.61,
        return_pct: 35.4,
        trades: 23,
    },
    PresetEntry {
        strategy: StrategyId::RsiReversal,
        period: SamplingPeriod::Weekly,
        params: &[("period", 10.0), ("oversold", 32.0), ("overbought", 68.0)],
        win_rate: 0.58,
        return_pct: 49.1,
        trades: 9,
    },
    PresetEntry {
        strategy: StrategyId::BandReversal,
        period: SamplingPeriod::Daily,
        params: &[("period", 22.0)],
        win_rate: 0.56,
        return_pct: 22.7,
        trades: 18,
    },
    PresetEntry {
        strategy: StrategyId::CapitulationGap,
        period: SamplingPeriod::Daily,
        params: &[("period", 25.0)],
        win_rate: 0.63,
        return_pct: 17.8,
        trades: 8,
    },
    PresetEntry {
        strategy: StrategyId::PeakDrop,
        period: SamplingPeriod::Daily,
        params: &[("drop_pct", 24.0), ("recover_pct", 12.0)],
        win_rate: 0.70,
        return_pct: 54.3,
        trades: 10,
    },
    PresetEntry {
        strategy: StrategyId::PeakDrop,
        period: SamplingPeriod::Weekly,
        params: &[("drop_pct", 28.0), ("recover_pct", 14.0)],
        win_rate: 0.67,
        return_pct: 71.9,
        trades: 6,
    },
    PresetEntry {
        strategy: StrategyId::DipVolume,
        period: SamplingPeriod::Daily,
        params: &[("drop_pct", 17.0), ("recover_pct", 9.0), ("volume_mult", 1.8)],
        win_rate: 0.59,
        return_pct: 31.0,
        trades: 14,
    },
    PresetEntry {
        strategy: StrategyId::DipRsi,
        period: SamplingPeriod::Daily,
        params: &[("drop_pct", 16.0), ("recover_pct", 10.0), ("rsi_max", 34.0)],
        win_rate: 0.62,
        return_pct: 27.5,
        trades: 16,
    },
    PresetEntry {
        strategy: StrategyId::DipBand,
        period: SamplingPeriod::Daily,
        params: &[("drop_pct", 15.0), ("recover_pct", 11.0), ("period", 25.0)],
        win_rate: 0.55,
        return_pct: 19.6,
        trades: 12,
    },
];

/// Tuned entry for (strategy, period), if one was recorded.
pub fn preset(strategy: StrategyId, period: SamplingPeriod) -> Option<&'static PresetEntry> {
    PRESETS
        .iter()
        .find(|p| p.strategy == strategy && p.period == period)
}

/// Resolve the parameter set a run should use. With `ParamSource::Tuned`
/// and a recorded preset, its values are returned; otherwise an empty
/// override set, which makes every lookup fall back to the strategy's
/// declared defaults.
pub fn resolve_params(
    strategy: StrategyId,
    period: SamplingPeriod,
    source: ParamSource,
) -> StrategyParams {
    let mut params = StrategyParams::new();
    if source == ParamSource::Tuned {
        if let Some(entry) = preset(strategy, period) {
            for (name, value) in entry.params {
                params.set(name, *value);
            }
        }
    }
    params
}
