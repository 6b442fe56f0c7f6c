//! Domain layer: market data, chart contract, logging and errors.

pub mod chart;
pub mod errors;
pub mod logging;
pub mod market_data;
