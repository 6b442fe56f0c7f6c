use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{AppError, ValidationResult};
use crate::domain::market_data::Candle;

/// Value Object - categorical candle colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CandleColor {
    #[display(fmt = "green")]
    Green,
    #[display(fmt = "red")]
    Red,
}

impl CandleColor {
    /// Green only when the candle closed strictly above its open
    pub fn for_candle(candle: &Candle) -> Self {
        if candle.is_bullish() { Self::Green } else { Self::Red }
    }

    pub fn css(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Red => "red",
        }
    }
}

pub fn close_color(candle: &Candle) -> CandleColor {
    CandleColor::for_candle(candle)
}

/// Fill for the volume sub-panel bars
pub const VOLUME_FILL: &str = "rgba(70,130,180,0.8)";

/// Value Object - outer margins in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Default for Margin {
    fn default() -> Self {
        Self { left: 50, right: 50, top: 10, bottom: 30 }
    }
}

impl Margin {
    pub fn horizontal(&self) -> u32 {
        self.left.saturating_add(self.right)
    }

    pub fn vertical(&self) -> u32 {
        self.top.saturating_add(self.bottom)
    }
}

/// Value Object - canvas geometry handed to the surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub width: u32,
    pub height: u32,
    pub margin: Margin,
    /// Share of the plotting height taken by the volume panel
    pub volume_ratio: f64,
    /// Candle body width as a share of the per-candle slot
    pub candle_width_ratio: f64,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 800,
            height: 500,
            margin: Margin::default(),
            volume_ratio: 0.2,
            candle_width_ratio: 0.5,
        }
    }
}

impl ChartLayout {
    /// Default layout at the host-supplied width
    pub fn with_width(width: u32) -> ValidationResult<Self> {
        let layout = Self { width, ..Default::default() };
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> ValidationResult<()> {
        if self.width <= self.margin.horizontal() {
            return Err(AppError::ValidationError(format!(
                "width {} leaves no room between margins",
                self.width
            )));
        }
        if self.height <= self.margin.vertical() {
            return Err(AppError::ValidationError(format!(
                "height {} leaves no room between margins",
                self.height
            )));
        }
        if !(0.0..=1.0).contains(&self.volume_ratio) {
            return Err(AppError::ValidationError(format!(
                "volume_ratio {} outside [0, 1]",
                self.volume_ratio
            )));
        }
        if !(self.candle_width_ratio > 0.0 && self.candle_width_ratio <= 1.0) {
            return Err(AppError::ValidationError(format!(
                "candle_width_ratio {} outside (0, 1]",
                self.candle_width_ratio
            )));
        }
        Ok(())
    }

    pub fn plot_width(&self) -> f64 {
        self.width.saturating_sub(self.margin.horizontal()) as f64
    }

    pub fn plot_height(&self) -> f64 {
        self.height.saturating_sub(self.margin.vertical()) as f64
    }

    pub fn volume_panel_height(&self) -> f64 {
        self.plot_height() * self.volume_ratio
    }

    /// Top of the volume panel, relative to the plot area
    pub fn volume_panel_origin(&self) -> f64 {
        self.plot_height() - self.volume_panel_height()
    }
}

/// Value Object - visible x-extents on the index scale
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VisibleWindow {
    pub start: f64,
    pub end: f64,
}

impl VisibleWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.start && x <= self.end
    }

    pub fn is_degenerate(&self) -> bool {
        self.span() <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_geometry() {
        let layout = ChartLayout::default();
        assert_eq!(layout.plot_width(), 700.0);
        assert_eq!(layout.plot_height(), 460.0);
        assert!((layout.volume_panel_height() - 92.0).abs() < 1e-9);
        assert!((layout.volume_panel_origin() - 368.0).abs() < 1e-9);
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn narrow_host_width_is_rejected() {
        assert!(ChartLayout::with_width(100).is_err());
        assert_eq!(ChartLayout::with_width(1024).unwrap().width, 1024);
    }

    #[test]
    fn oversized_margins_are_rejected() {
        let layout = ChartLayout {
            margin: Margin { left: u32::MAX, right: 10, ..Default::default() },
            ..Default::default()
        };
        assert!(matches!(layout.validate(), Err(AppError::ValidationError(_))));
        assert_eq!(layout.plot_width(), 0.0);

        let layout = ChartLayout {
            margin: Margin { top: 20, bottom: u32::MAX, ..Default::default() },
            ..Default::default()
        };
        assert!(matches!(layout.validate(), Err(AppError::ValidationError(_))));
        assert_eq!(layout.plot_height(), 0.0);
    }

    #[test]
    fn bad_ratios_are_rejected() {
        let layout = ChartLayout { volume_ratio: 1.5, ..Default::default() };
        assert!(layout.validate().is_err());
        let layout = ChartLayout { candle_width_ratio: 0.0, ..Default::default() };
        assert!(layout.validate().is_err());
    }

    #[test]
    fn window_helpers() {
        let w = VisibleWindow::new(119.0, 199.0);
        assert_eq!(w.span(), 80.0);
        assert!(w.contains(150.0));
        assert!(!w.contains(200.0));
        assert!(VisibleWindow::default().is_degenerate());
    }
}
