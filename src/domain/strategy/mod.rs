//! Strategy registry: a closed catalogue of parametrized buy/sell rules.
//!
//! Each strategy is a pure function of (bars, params) producing one
//! [`Action`] per input bar. Position bookkeeping is an explicit
//! `Flat | Holding` accumulator folded over the series, local to each
//! `compute` call; strategies share no state with each other or with the
//! simulator.

pub mod crossover;
pub mod reversal;
pub mod drawdown;
pub mod accumulate;

use std::collections::BTreeMap;

use crate::domain::bar::PriceBar;
use crate::domain::error::BarsightError;

/// Per-bar strategy output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

/// How the simulator turns a strategy's signals into positions.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecMode {
    /// Buy converts all cash into whole shares; sell liquidates everything.
    AllInOut,
    /// Every buy spends up to `amount`; positions only accumulate.
    FixedAmount { amount: f64 },
}

impl std::fmt::Display for ExecMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecMode::AllInOut => write!(f, "all-in-out"),
            ExecMode::FixedAmount { .. } => write!(f, "fixed-amount"),
        }
    }
}

/// One declared parameter: name, default and inclusive bounds.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: &'static str,
    pub default: f64,
    pub min: f64,
    pub max: f64,
}

/// Caller-supplied parameter overrides; anything unset falls back to the
/// strategy's declared default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyParams {
    values: BTreeMap<String, f64>,
}

impl StrategyParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }

    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, &v)| (k.as_str(), v))
    }
}

/// Static description of one registered strategy.
#[derive(Debug, Clone)]
pub struct StrategyDef {
    pub id: StrategyId,
    pub name: &'static str,
    pub description: &'static str,
    pub mode: ExecMode,
    pub params: &'static [ParamSpec],
}

/// The closed set of registered strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StrategyId {
    SmaCross,
    MacdCross,
    RsiReversal,
    BandReversal,
    CapitulationGap,
    PeakDrop,
    DipVolume,
    DipRsi,
    DipBand,
    MonthlyAmount,
}

static REGISTRY: [StrategyDef; 10] = [
    StrategyDef {
        id: StrategyId::SmaCross,
        name: "SMA crossover",
        description: "buy when the short SMA crosses above the long SMA, sell on the downward cross",
        mode: ExecMode::AllInOut,
        params: &[
            ParamSpec { name: "short", default: 5.0, min: 2.0, max: 100.0 },
            ParamSpec { name: "long", default: 25.0, min: 3.0, max: 400.0 },
        ],
    },
    StrategyDef {
        id: StrategyId::MacdCross,
        name: "MACD crossover",
        description: "buy when the MACD line crosses above its signal line, sell on the downward cross",
        mode: ExecMode::AllInOut,
        params: &[
            ParamSpec { name: "short", default: 12.0, min: 2.0, max: 100.0 },
            ParamSpec { name: "long", default: 26.0, min: 3.0, max: 200.0 },
            ParamSpec { name: "signal", default: 9.0, min: 2.0, max: 50.0 },
        ],
    },
    StrategyDef {
        id: StrategyId::RsiReversal,
        name: "RSI reversal",
        description: "buy oversold, sell overbought",
        mode: ExecMode::AllInOut,
        params: &[
            ParamSpec { name: "period", default: 14.0, min: 2.0, max: 100.0 },
            ParamSpec { name: "oversold", default: 30.0, min: 1.0, max: 50.0 },
            ParamSpec { name: "overbought", default: 70.0, min: 50.0, max: 99.0 },
        ],
    },
    StrategyDef {
        id: StrategyId::BandReversal,
        name: "Band reversal",
        description: "enter on a lower-band reversal signal, exit when the close regains the middle band",
        mode: ExecMode::AllInOut,
        params: &[ParamSpec { name: "period", default: 25.0, min: 5.0, max: 100.0 }],
    },
    StrategyDef {
        id: StrategyId::CapitulationGap,
        name: "Capitulation gap",
        description: "enter on a capitulation-gap signal, exit when the gap fills",
        mode: ExecMode::AllInOut,
        params: &[ParamSpec { name: "period", default: 25.0, min: 5.0, max: 100.0 }],
    },
    StrategyDef {
        id: StrategyId::PeakDrop,
        name: "Peak drop",
        description: "buy a set percentage below the running peak, sell after recovering from entry",
        mode: ExecMode::AllInOut,
        params: &[
            ParamSpec { name: "drop_pct", default: 20.0, min: 1.0, max: 90.0 },
            ParamSpec { name: "recover_pct", default: 10.0, min: 1.0, max: 100.0 },
        ],
    },
    StrategyDef {
        id: StrategyId::DipVolume,
        name: "Volume dip",
        description: "peak-drop entry gated by elevated volume",
        mode: ExecMode::AllInOut,
        params: &[
            ParamSpec { name: "drop_pct", default: 15.0, min: 1.0, max: 90.0 },
            ParamSpec { name: "recover_pct", default: 10.0, min: 1.0, max: 100.0 },
            ParamSpec { name: "volume_mult", default: 1.5, min: 1.0, max: 10.0 },
        ],
    },
    StrategyDef {
        id: StrategyId::DipRsi,
        name: "RSI dip",
        description: "peak-drop entry gated by a depressed RSI",
        mode: ExecMode::AllInOut,
        params: &[
            ParamSpec { name: "drop_pct", default: 15.0, min: 1.0, max: 90.0 },
            ParamSpec { name: "recover_pct", default: 10.0, min: 1.0, max: 100.0 },
            ParamSpec { name: "rsi_max", default: 30.0, min: 1.0, max: 99.0 },
        ],
    },
    StrategyDef {
        id: StrategyId::DipBand,
        name: "Band dip",
        description: "peak-drop entry gated by a close at or below the -3σ band",
        mode: ExecMode::AllInOut,
        params: &[
            ParamSpec { name: "drop_pct", default: 15.0, min: 1.0, max: 90.0 },
            ParamSpec { name: "recover_pct", default: 10.0, min: 1.0, max: 100.0 },
            ParamSpec { name: "period", default: 25.0, min: 5.0, max: 100.0 },
        ],
    },
    StrategyDef {
        id: StrategyId::MonthlyAmount,
        name: "Monthly accumulation",
        description: "buy a fixed amount on the first bar of each calendar month, never sell",
        mode: ExecMode::FixedAmount { amount: 1000.0 },
        params: &[ParamSpec { name: "amount", default: 1000.0, min: 1.0, max: 1_000_000.0 }],
    },
];

impl StrategyId {
    pub const ALL: [StrategyId; 10] = [
        StrategyId::SmaCross,
        StrategyId::MacdCross,
        StrategyId::RsiReversal,
        StrategyId::BandReversal,
        StrategyId::CapitulationGap,
        StrategyId::PeakDrop,
        StrategyId::DipVolume,
        StrategyId::DipRsi,
        StrategyId::DipBand,
        StrategyId::MonthlyAmount,
    ];

    pub fn def(self) -> &'static StrategyDef {
        REGISTRY
            .iter()
            .find(|d| d.id == self)
            .expect("every StrategyId has a registry entry")
    }

    /// Execution mode with the amount parameter resolved.
    pub fn exec_mode(self, params: &StrategyParams) -> ExecMode {
        match self.def().mode {
            ExecMode::AllInOut => ExecMode::AllInOut,
            ExecMode::FixedAmount { .. } => ExecMode::FixedAmount {
                amount: self.resolve(params, "amount"),
            },
        }
    }

    /// Parameter value, falling back to the declared default.
    pub fn resolve(self, params: &StrategyParams, name: &str) -> f64 {
        params.get(name).unwrap_or_else(|| {
            self.def()
                .params
                .iter()
                .find(|p| p.name == name)
                .map(|p| p.default)
                .unwrap_or(0.0)
        })
    }

    /// Reject unknown parameter names and out-of-bounds values.
    pub fn validate_params(self, params: &StrategyParams) -> Result<(), BarsightError> {
        for (name, value) in params.iter() {
            let Some(spec) = self.def().params.iter().find(|p| p.name == name) else {
                return Err(BarsightError::InvalidParam {
                    strategy: self.to_string(),
                    name: name.to_string(),
                    reason: "no such parameter".into(),
                });
            };
            if value < spec.min || value > spec.max {
                return Err(BarsightError::InvalidParam {
                    strategy: self.to_string(),
                    name: name.to_string(),
                    reason: format!("{value} outside [{}, {}]", spec.min, spec.max),
                });
            }
        }
        Ok(())
    }

    /// Per-bar action stream; a pure function of its two inputs.
    pub fn compute(self, bars: &[PriceBar], params: &StrategyParams) -> Vec<Action> {
        let p = |name: &str| self.resolve(params, name);
        match self {
            StrategyId::SmaCross => {
                crossover::sma_cross(bars, p("short") as usize, p("long") as usize)
            }
            StrategyId::MacdCross => crossover::macd_cross(
                bars,
                p("short") as usize,
                p("long") as usize,
                p("signal") as usize,
            ),
            StrategyId::RsiReversal => reversal::rsi_reversal(
                bars,
                p("period") as usize,
                p("oversold"),
                p("overbought"),
            ),
            StrategyId::BandReversal => reversal::band_reversal(bars, p("period") as usize),
            StrategyId::CapitulationGap => reversal::capitulation(bars, p("period") as usize),
            StrategyId::PeakDrop => drawdown::peak_drop(bars, p("drop_pct"), p("recover_pct")),
            StrategyId::DipVolume => drawdown::dip_volume(
                bars,
                p("drop_pct"),
                p("recover_pct"),
                p("volume_mult"),
            ),
            StrategyId::DipRsi => {
                drawdown::dip_rsi(bars, p("drop_pct"), p("recover_pct"), p("rsi_max"))
            }
            StrategyId::DipBand => {
                drawdown::dip_band(bars, p("drop_pct"), p("recover_pct"), p("period") as usize)
            }
            StrategyId::MonthlyAmount => accumulate::monthly(bars),
        }
    }
}

impl std::fmt::Display for StrategyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StrategyId::SmaCross => "sma-cross",
            StrategyId::MacdCross => "macd-cross",
            StrategyId::RsiReversal => "rsi-reversal",
            StrategyId::BandReversal => "band-reversal",
            StrategyId::CapitulationGap => "capitulation-gap",
            StrategyId::PeakDrop => "peak-drop",
            StrategyId::DipVolume => "dip-volume",
            StrategyId::DipRsi => "dip-rsi",
            StrategyId::DipBand => "dip-band",
            StrategyId::MonthlyAmount => "monthly-amount",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for StrategyId {
    type Err = BarsightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyId::ALL
            .iter()
            .copied()
            .find(|id| id.to_string() == s)
            .ok_or_else(|| BarsightError::UnknownStrategy { name: s.to_string() })
    }
}

/// Explicit position accumulator shared by the per-bar folds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum PositionState {
    Flat,
    Holding {
        entry_price: f64,
        entry_index: usize,
    },
}
