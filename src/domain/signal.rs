//! Discrete pattern signals emitted by the detectors.

use chrono::NaiveDate;

/// How far along a still-forming cup's handle is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormingPhase {
    /// Price is within 5% of the breakout level and above the handle low.
    HandleReady,
    HandleForming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SignalKind {
    BandReversal,
    CapitulationGap,
    CupHandle,
    CupForming(FormingPhase),
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalKind::BandReversal => write!(f, "band-reversal"),
            SignalKind::CapitulationGap => write!(f, "capitulation-gap"),
            SignalKind::CupHandle => write!(f, "cup-with-handle"),
            SignalKind::CupForming(FormingPhase::HandleReady) => {
                write!(f, "cup-forming (handle ready)")
            }
            SignalKind::CupForming(FormingPhase::HandleForming) => {
                write!(f, "cup-forming (handle forming)")
            }
        }
    }
}

/// Structural description of a detected cup, attached to cup signals.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CupMeta {
    pub left_rim_index: usize,
    pub left_rim_price: f64,
    pub bottom_index: usize,
    pub bottom_price: f64,
    pub right_rim_index: usize,
    pub right_rim_price: f64,
    /// Bars from left rim to right rim.
    pub cup_bars: usize,
    /// Depth of the cup below the left rim, in percent.
    pub depth_pct: f64,
    /// Bars from the right rim to the breakout (or to the last bar while
    /// the handle is still forming).
    pub handle_bars: usize,
    /// Deepest handle pullback below the right rim, in percent.
    pub handle_pullback_pct: f64,
}

/// A point-in-time pattern occurrence. Immutable; ordered by index.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signal {
    pub index: usize,
    pub date: NaiveDate,
    pub price: f64,
    pub kind: SignalKind,
    pub label: String,
    pub description: String,
    pub cup: Option<CupMeta>,
}
