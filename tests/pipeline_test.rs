//! End-to-end pipeline tests over a mock data port.
//!
//! Tests cover:
//! - Validation through the data port (null rows, missing columns, date range)
//! - Clean pipeline output for each method
//! - Factor comparisons on raw vs cleaned tables
//! - Backtest with metrics and CSV output

mod common;

use approx::assert_relative_eq;
use common::*;
use riskpremia::adapters::csv_report_adapter::CsvReportAdapter;
use riskpremia::cli::{self, DataConfig};
use riskpremia::domain::backtest::{BacktestConfig, FactorWeights};
use riskpremia::domain::error::RiskPremiaError;
use riskpremia::domain::factor::{FactorKind, FactorParams};
use riskpremia::domain::noise::{CleaningMethod, NoiseConfig};
use riskpremia::domain::ohlcv::PriceColumn;
use riskpremia::domain::validation::RawTable;
use std::path::PathBuf;

fn data_config(symbol: &str) -> DataConfig {
    DataConfig {
        dir: PathBuf::from("unused"),
        symbol: symbol.to_string(),
        start_date: None,
        end_date: None,
    }
}

fn noise(method: CleaningMethod, window: usize) -> NoiseConfig {
    NoiseConfig { method, window }
}

fn report() -> CsvReportAdapter<Vec<u8>> {
    CsvReportAdapter::new(Vec::new())
}

fn output(report: CsvReportAdapter<Vec<u8>>) -> String {
    String::from_utf8(report.finish().unwrap()).unwrap()
}

mod loading {
    use super::*;

    #[test]
    fn null_rows_are_dropped() {
        let mut raw = RawTable::new(
            ["Open", "High", "Low", "Close", "Volume"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        raw.push(date(2024, 1, 1), vec![Some(1.0), Some(2.0), Some(0.5), Some(1.5), Some(10.0)]);
        raw.push(date(2024, 1, 2), vec![Some(1.0), Some(2.0), Some(0.5), None, Some(10.0)]);
        raw.push(date(2024, 1, 3), vec![Some(1.0), Some(2.0), Some(0.5), Some(1.7), Some(11.0)]);
        let port = MockDataPort::new().with_raw("BTC-USD", raw);

        let table = cli::load_table(&port, &data_config("BTC-USD")).unwrap();
        assert_eq!(table.dates(), vec![date(2024, 1, 1), date(2024, 1, 3)]);
        assert_eq!(table.column(PriceColumn::Close), vec![1.5, 1.7]);
    }

    #[test]
    fn missing_column_is_a_shape_error() {
        let mut raw = RawTable::new(
            ["Open", "High", "Low", "Volume"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        raw.push(date(2024, 1, 1), vec![Some(1.0), Some(2.0), Some(0.5), Some(10.0)]);
        let port = MockDataPort::new().with_raw("BTC-USD", raw);

        let err = cli::load_table(&port, &data_config("BTC-USD")).unwrap_err();
        assert!(matches!(err, RiskPremiaError::DataShape { .. }));
        assert!(err.to_string().contains("Close"));
    }

    #[test]
    fn date_range_is_applied() {
        let port = MockDataPort::new().with_bars("BTC-USD", &generate_bars("2024-01-01", 30, 100.0));
        let data = DataConfig {
            start_date: Some(date(2024, 1, 10)),
            end_date: Some(date(2024, 1, 19)),
            ..data_config("BTC-USD")
        };

        let table = cli::load_table(&port, &data).unwrap();
        assert_eq!(table.len(), 10);
        assert_eq!(table.first_date(), Some(date(2024, 1, 10)));
        assert_eq!(table.last_date(), Some(date(2024, 1, 19)));
    }

    #[test]
    fn empty_range_is_a_shape_error() {
        let port = MockDataPort::new().with_bars("BTC-USD", &generate_bars("2024-01-01", 5, 100.0));
        let data = DataConfig {
            start_date: Some(date(2025, 1, 1)),
            ..data_config("BTC-USD")
        };

        assert!(matches!(
            cli::load_table(&port, &data),
            Err(RiskPremiaError::DataShape { .. })
        ));
    }

    #[test]
    fn port_errors_propagate() {
        let port = MockDataPort::new().with_error("BTC-USD", "connection refused");
        let err = cli::load_table(&port, &data_config("BTC-USD")).unwrap_err();
        assert!(matches!(err, RiskPremiaError::Data { .. }));
    }
}

mod cleaning {
    use super::*;

    #[test]
    fn every_method_writes_all_rows() {
        let bars = generate_bars("2024-01-01", 40, 100.0);
        let port = MockDataPort::new().with_bars("BTC-USD", &bars);

        for method in CleaningMethod::ALL {
            let mut out = report();
            let cleaned =
                cli::run_clean_pipeline(&port, &data_config("BTC-USD"), noise(method, 5), &mut out)
                    .unwrap();
            assert_eq!(cleaned.len(), bars.len(), "{method}");

            let csv = output(out);
            let lines: Vec<&str> = csv.lines().collect();
            assert_eq!(lines[0], "Date,Open,High,Low,Close,Volume", "{method}");
            assert_eq!(lines.len(), bars.len() + 1, "{method}");
            assert!(!csv.contains("NaN"), "{method}");
        }
    }

    #[test]
    fn spike_is_removed_by_rolling_median() {
        let mut closes = vec![100.0; 15];
        closes[7] = 1_000.0;
        let port = MockDataPort::new().with_bars("BTC-USD", &bars_from_closes("2024-01-01", &closes));

        let mut out = report();
        let cleaned = cli::run_clean_pipeline(
            &port,
            &data_config("BTC-USD"),
            noise(CleaningMethod::RollingMedian, 3),
            &mut out,
        )
        .unwrap();

        assert_relative_eq!(cleaned.column(PriceColumn::Close)[7], 100.0);
    }

    #[test]
    fn passthrough_round_trips_volume() {
        let bars = generate_bars("2024-01-01", 10, 50.0);
        let port = MockDataPort::new().with_bars("ETH-USD", &bars);

        let mut out = report();
        let cleaned = cli::run_clean_pipeline(
            &port,
            &data_config("ETH-USD"),
            NoiseConfig::default(),
            &mut out,
        )
        .unwrap();

        assert_eq!(cleaned.bars(), bars.as_slice());
    }
}

mod factors {
    use super::*;

    #[test]
    fn passthrough_comparison_columns_match() {
        let port = MockDataPort::new().with_bars("BTC-USD", &generate_bars("2024-01-01", 60, 100.0));

        let mut out = report();
        let cmp = cli::run_factor_pipeline(
            &port,
            &data_config("BTC-USD"),
            NoiseConfig::default(),
            FactorKind::Momentum { lookback: 10 },
            &mut out,
        )
        .unwrap();

        assert_eq!(cmp.raw, cmp.cleaned);
        assert_eq!(cmp.raw.len(), 60 - 11);

        let csv = output(out);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("date,raw,cleaned"));
        for line in lines {
            let cells: Vec<&str> = line.split(',').collect();
            assert_eq!(cells.len(), 3);
            assert_eq!(cells[1], cells[2]);
        }
    }

    #[test]
    fn momentum_matches_hand_computed_values() {
        let closes = [100.0, 101.0, 99.0, 105.0, 110.0];
        let port = MockDataPort::new().with_bars("BTC-USD", &bars_from_closes("2024-03-01", &closes));

        let mut out = report();
        let cmp = cli::run_factor_pipeline(
            &port,
            &data_config("BTC-USD"),
            NoiseConfig::default(),
            FactorKind::Momentum { lookback: 1 },
            &mut out,
        )
        .unwrap();

        assert_eq!(cmp.raw.dates(), vec![date(2024, 3, 3), date(2024, 3, 4), date(2024, 3, 5)]);
        let expected = [101.0 / 100.0 - 1.0, 99.0 / 101.0 - 1.0, 105.0 / 99.0 - 1.0];
        for (got, want) in cmp.raw.values().iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-12);
        }
    }

    #[test]
    fn nvt_uses_raw_volume_for_both_sides() {
        let port = MockDataPort::new().with_bars("BTC-USD", &generate_bars("2024-01-01", 30, 100.0));

        let mut out = report();
        let cmp = cli::run_factor_pipeline(
            &port,
            &data_config("BTC-USD"),
            noise(CleaningMethod::Sma, 3),
            FactorKind::NvtRatio { volume_window: 7 },
            &mut out,
        )
        .unwrap();

        assert_eq!(cmp.raw.len(), 30);
        assert_eq!(cmp.cleaned.len(), 30);
        assert!(cmp.raw.values().iter().all(|v| v.is_finite() && *v > 0.0));
    }

    #[test]
    fn market_premium_on_flat_risk_free_is_price_return() {
        let closes = [10.0, 11.0, 9.9, 10.89];
        let port = MockDataPort::new().with_bars("BTC-USD", &bars_from_closes("2024-01-01", &closes));

        let mut out = report();
        let cmp = cli::run_factor_pipeline(
            &port,
            &data_config("BTC-USD"),
            NoiseConfig::default(),
            FactorParams::default().market_risk_premium(),
            &mut out,
        )
        .unwrap();

        let values = cmp.raw.values();
        assert_eq!(values.len(), 3);
        assert_relative_eq!(values[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(values[1], -0.1, epsilon = 1e-12);
        assert_relative_eq!(values[2], 0.1, epsilon = 1e-12);
    }

    #[test]
    fn short_table_yields_empty_factor() {
        let port = MockDataPort::new().with_bars("BTC-USD", &generate_bars("2024-01-01", 5, 100.0));

        let mut out = report();
        let cmp = cli::run_factor_pipeline(
            &port,
            &data_config("BTC-USD"),
            NoiseConfig::default(),
            FactorKind::LowVolatility { window: 30 },
            &mut out,
        )
        .unwrap();

        assert!(cmp.raw.is_empty());
        assert_eq!(output(out), "date,raw,cleaned\n");
    }
}

mod backtesting {
    use super::*;

    fn params() -> FactorParams {
        FactorParams {
            momentum_lookback: 5,
            low_vol_window: 10,
            ..FactorParams::default()
        }
    }

    #[test]
    fn backtest_writes_one_row_per_return() {
        let port = MockDataPort::new().with_bars("BTC-USD", &generate_bars("2024-01-01", 120, 100.0));

        let mut out = report();
        let (result, metrics) = cli::run_backtest_pipeline(
            &port,
            &data_config("BTC-USD"),
            noise(CleaningMethod::ZScoreClip, 3),
            &params(),
            &BacktestConfig::default(),
            &mut out,
        )
        .unwrap();

        assert!(!result.returns.is_empty());
        assert_eq!(metrics.periods, result.returns.len());

        let csv = output(out);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "date,position,strategy_return");
        assert_eq!(lines.len(), result.returns.len() + 1);
        for line in &lines[1..] {
            let position = line.split(',').nth(1).unwrap();
            assert!(position == "1" || position == "-1", "{line}");
        }
    }

    #[test]
    fn zero_weights_hold_long() {
        let bars = generate_bars("2024-01-01", 60, 100.0);
        let port = MockDataPort::new().with_bars("BTC-USD", &bars);
        let config = BacktestConfig {
            weights: FactorWeights::from((0.0, 0.0)),
            ..BacktestConfig::default()
        };

        let mut out = report();
        let (result, _) = cli::run_backtest_pipeline(
            &port,
            &data_config("BTC-USD"),
            NoiseConfig::default(),
            &params(),
            &config,
            &mut out,
        )
        .unwrap();

        for point in &result.returns.points {
            let i = bars.iter().position(|b| b.date == point.date).unwrap();
            let forward = bars[i + 1].close / bars[i].close - 1.0;
            assert_relative_eq!(point.value, forward, epsilon = 1e-12);
        }
    }

    #[test]
    fn metrics_reflect_compounded_returns() {
        let port = MockDataPort::new().with_bars("BTC-USD", &generate_bars("2024-01-01", 90, 100.0));

        let mut out = report();
        let (result, metrics) = cli::run_backtest_pipeline(
            &port,
            &data_config("BTC-USD"),
            NoiseConfig::default(),
            &params(),
            &BacktestConfig::default(),
            &mut out,
        )
        .unwrap();

        let compounded = result
            .returns
            .values()
            .iter()
            .fold(1.0, |acc, r| acc * (1.0 + r))
            - 1.0;
        assert_relative_eq!(metrics.total_return, compounded, epsilon = 1e-9);
        assert!(metrics.max_drawdown >= 0.0);
        assert!((0.0..=1.0).contains(&metrics.hit_rate));
    }
}
