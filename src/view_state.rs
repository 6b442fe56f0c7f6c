use crate::domain::market_data::{Candle, Granularity};

/// Zoom tuning shared by the controller and the UI
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewConfig {
    pub default_zoom: f64,
    pub zoom_step: f64,
    pub min_zoom: f64,
    /// Index units visible at zoom 1.0
    pub base_span: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self { default_zoom: 1.0, zoom_step: 0.5, min_zoom: 0.1, base_span: 80.0 }
    }
}

/// View parameters controlling zoom, interval and the hovered candle.
///
/// Every mutator consumes the state and returns the next one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    pub zoom_level: f64,
    pub granularity: Granularity,
    pub hovered: Option<Candle>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(&ViewConfig::default())
    }
}

impl ViewState {
    pub fn new(config: &ViewConfig) -> Self {
        Self { zoom_level: config.default_zoom, granularity: Granularity::default(), hovered: None }
    }

    /// Unbounded above
    #[must_use]
    pub fn zoom_in(self, config: &ViewConfig) -> Self {
        Self { zoom_level: self.zoom_level + config.zoom_step, ..self }
    }

    /// Never drops below `min_zoom`
    #[must_use]
    pub fn zoom_out(self, config: &ViewConfig) -> Self {
        Self { zoom_level: (self.zoom_level - config.zoom_step).max(config.min_zoom), ..self }
    }

    /// Zoom is kept across interval changes; the hovered candle belonged to
    /// the old series and is dropped.
    #[must_use]
    pub fn with_granularity(self, granularity: Granularity) -> Self {
        Self { granularity, hovered: None, ..self }
    }

    #[must_use]
    pub fn with_hovered(self, hovered: Option<Candle>) -> Self {
        Self { hovered, ..self }
    }

    /// Index units visible at the current zoom
    pub fn visible_span(&self, config: &ViewConfig) -> f64 {
        config.base_span / self.zoom_level
    }
}
