//! riskpremia: noise reduction and factor analytics for digital assets.
//!
//! Hexagonal architecture: the pure numeric core lives in [`domain`], port
//! traits in [`ports`], concrete file-backed implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
