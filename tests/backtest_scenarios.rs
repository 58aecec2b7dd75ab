//! End-to-end backtest scenarios over known tapes:
//! - monotone rise with an SMA crossover never re-enters
//! - flat series collapses bands and pins RSI
//! - the cup-with-handle reference tape yields exactly one breakout
//! - thirteen calendar months of fixed-amount accumulation
//! - empty and too-short series degrade to neutral results

mod common;

use common::*;

use approx::assert_relative_eq;
use barsight::domain::indicator::{bollinger, rsi};
use barsight::domain::pattern::{detect_cup_handle, scan_signals, CupConfig};
use barsight::domain::signal::SignalKind;
use barsight::domain::simulator::{simulate, SimConfig, TradeSide};
use barsight::domain::strategy::{Action, ExecMode, StrategyId, StrategyParams};
use barsight::ports::data_port::DataPort;

mod monotone_rise {
    use super::*;

    #[test]
    fn sma_cross_buys_at_most_once() {
        let bars = rising_bars(60, 100.0);
        let actions = StrategyId::SmaCross.compute(&bars, &StrategyParams::new());

        let buys = actions.iter().filter(|a| **a == Action::Buy).count();
        assert!(buys <= 1, "{buys} buys on a monotone rise");
    }

    #[test]
    fn equity_never_decreases() {
        let bars = rising_bars(60, 100.0);
        let actions = StrategyId::SmaCross.compute(&bars, &StrategyParams::new());
        let result = simulate(
            &bars,
            &actions,
            &SimConfig {
                initial_capital: 100_000.0,
                mode: ExecMode::AllInOut,
            },
        );

        for window in result.equity.windows(2) {
            assert!(
                window[1].equity >= window[0].equity - 1e-9,
                "equity dipped on a monotone rise"
            );
        }
        assert!(result.final_equity >= 100_000.0);
    }
}

mod flat_series {
    use super::*;

    #[test]
    fn bands_collapse_onto_the_price() {
        let bars = flat_bars(40, 50.0);
        for point in bollinger(&bars, 25).into_iter().flatten() {
            assert_eq!(point.middle, 50.0);
            assert_eq!(point.upper3, 50.0);
            assert_eq!(point.lower3, 50.0);
        }
    }

    #[test]
    fn rsi_pins_at_one_hundred() {
        let bars = flat_bars(40, 50.0);
        let values: Vec<f64> = rsi(&bars, 14).into_iter().flatten().collect();
        assert!(!values.is_empty());
        assert!(values.iter().all(|&v| v == 100.0));
    }
}

mod cup_scenario {
    use super::*;

    #[test]
    fn reference_tape_yields_one_breakout_near_thirty_percent_depth() {
        let bars = cup_series();
        let signals = detect_cup_handle(&bars, &CupConfig::default());
        assert_eq!(signals.len(), 1);

        let meta = signals[0].cup.as_ref().unwrap();
        assert_relative_eq!(meta.depth_pct, 30.0, epsilon = 0.5);
        assert_eq!(signals[0].kind, SignalKind::CupHandle);
    }

    #[test]
    fn merged_scan_contains_the_breakout() {
        let bars = cup_series();
        let signals = scan_signals(&bars);
        let cups: Vec<_> = signals
            .iter()
            .filter(|s| s.kind == SignalKind::CupHandle)
            .collect();
        assert_eq!(cups.len(), 1);
        assert_eq!(cups[0].index, 96);
    }
}

mod monthly_accumulation {
    use super::*;

    #[test]
    fn thirteen_months_buy_thirteen_times_and_never_sell() {
        // 2024-01-01 + 370 days spans January 2024 through January 2025.
        let bars = flat_bars(370, 100.0);
        let params = StrategyParams::new();
        let actions = StrategyId::MonthlyAmount.compute(&bars, &params);
        let result = simulate(
            &bars,
            &actions,
            &SimConfig {
                initial_capital: 100_000.0,
                mode: StrategyId::MonthlyAmount.exec_mode(&params),
            },
        );

        assert_eq!(result.trades.len(), 13);
        assert!(result.trades.iter().all(|t| t.side == TradeSide::Buy));
        // 1000 per month at a constant 100 close: 10 shares each time.
        assert!(result.trades.iter().all(|t| t.shares == 10));
        assert_relative_eq!(result.final_equity, 100_000.0);
    }
}

mod degenerate_input {
    use super::*;

    #[test]
    fn empty_backtest_returns_initial_capital() {
        let result = simulate(
            &[],
            &[],
            &SimConfig {
                initial_capital: 10_000.0,
                mode: ExecMode::AllInOut,
            },
        );
        assert!(result.trades.is_empty());
        assert!(result.equity.is_empty());
        assert_eq!(result.final_equity, 10_000.0);
        assert_eq!(result.stats.trade_count, 0);
        assert_eq!(result.stats.sharpe_ratio, 0.0);
    }

    #[test]
    fn short_series_produces_no_signals() {
        assert!(scan_signals(&rising_bars(10, 100.0)).is_empty());
    }
}

mod pipeline_with_mock_port {
    use super::*;

    fn peak_drop_tape() -> Vec<barsight::domain::bar::PriceBar> {
        let mut closes: Vec<f64> = (0..=20).map(|i| 100.0 + i as f64).collect();
        closes.extend([110.0, 100.0, 95.0, 100.0, 106.0]);
        closes.extend([106.0; 10]);
        closes
            .into_iter()
            .enumerate()
            .map(|(i, c)| close_bar(i, c))
            .collect()
    }

    #[test]
    fn fetch_compute_simulate_round_trip() {
        let port = MockDataPort::new().with_bars("BHP", peak_drop_tape());
        let bars = port
            .fetch_bars("BHP", date(2024, 1, 1), date(2024, 12, 31))
            .unwrap();
        assert_eq!(bars.len(), 36);

        let params = StrategyParams::new();
        let actions = StrategyId::PeakDrop.compute(&bars, &params);
        let result = simulate(
            &bars,
            &actions,
            &SimConfig {
                initial_capital: 100_000.0,
                mode: ExecMode::AllInOut,
            },
        );

        // Peak 120, 20% drop hit at 95, 10% recovery hit at 106.
        assert_eq!(result.trades.len(), 2);
        assert_eq!(result.trades[0].side, TradeSide::Buy);
        assert_eq!(result.trades[0].price, 95.0);
        assert_eq!(result.trades[1].side, TradeSide::Sell);
        assert_eq!(result.trades[1].price, 106.0);

        assert_eq!(result.stats.round_trips, 1);
        assert_relative_eq!(result.stats.win_rate, 1.0);
        assert!(result.stats.profit_factor.is_infinite());
    }

    #[test]
    fn data_range_reports_span() {
        let port = MockDataPort::new().with_bars("BHP", rising_bars(30, 100.0));
        let (first, last, count) = port.data_range("BHP").unwrap().unwrap();
        assert_eq!(first, date(2024, 1, 1));
        assert_eq!(last, date(2024, 1, 30));
        assert_eq!(count, 30);
        assert!(port.data_range("CBA").unwrap().is_none());
    }
}
