//! Core domain types and logic. Nothing in here performs I/O.

pub mod ohlcv;
pub mod series;
pub mod stats;
pub mod validation;
pub mod noise;
pub mod factor;
pub mod backtest;
pub mod metrics;
pub mod config_validation;
pub mod error;
