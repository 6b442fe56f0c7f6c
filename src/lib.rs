use wasm_bindgen::prelude::*;

use crate::domain::logging::{LogComponent, get_logger, init_logger, init_time_provider};
use crate::infrastructure::services::{BrowserTimeProvider, ConsoleLogger};

pub mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod time_utils;
pub mod view_state;

pub use application::ChartController;
pub use domain::market_data::{Candle, CandleSeries, Granularity, SeriesGenerator};
pub use view_state::ViewState;

/// Browser entry: install logging and mount the chart
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    let console_logger = if cfg!(debug_assertions) {
        ConsoleLogger::new_development()
    } else {
        ConsoleLogger::new_production()
    };
    init_logger(Box::new(console_logger));
    init_time_provider(Box::new(BrowserTimeProvider::new()));

    get_logger().info(LogComponent::Presentation("Initialize"), "mounting candlestick chart");
    leptos::mount_to_body(app::App);
}
