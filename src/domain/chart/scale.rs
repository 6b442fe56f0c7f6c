use crate::domain::market_data::{Candle, CandleSeries, Timestamp};

use super::value_objects::VisibleWindow;

/// Gap-free index scale: each candle sits at its position in the series,
/// regardless of how far apart the timestamps are.
#[derive(Debug, Clone, Copy)]
pub struct DiscontinuousScale<'a> {
    series: &'a CandleSeries,
}

impl<'a> DiscontinuousScale<'a> {
    pub fn new(series: &'a CandleSeries) -> Self {
        Self { series }
    }

    /// x position of the candle at `index`
    pub fn x_at(&self, index: usize) -> f64 {
        index as f64
    }

    /// x position of a candle from this series
    pub fn x_accessor(&self, candle: &Candle) -> Option<f64> {
        self.series.index_of(candle).map(|i| self.x_at(i))
    }

    /// Timestamp shown for the candle at `index`
    pub fn display_x(&self, index: usize) -> Option<Timestamp> {
        self.series.get(index).map(|c| c.timestamp)
    }

    /// Nearest candle index for a continuous x
    pub fn index_at(&self, x: f64) -> Option<usize> {
        if !x.is_finite() || self.series.is_empty() {
            return None;
        }
        let rounded = x.round();
        if rounded < 0.0 || rounded > (self.series.count() - 1) as f64 {
            return None;
        }
        Some(rounded as usize)
    }

    pub fn candle_at(&self, x: f64) -> Option<&'a Candle> {
        self.index_at(x).and_then(|i| self.series.get(i))
    }

    pub fn last_x(&self) -> Option<f64> {
        self.series.count().checked_sub(1).map(|i| self.x_at(i))
    }

    /// `[last - span, last]`, or `[0, 0]` without data
    pub fn window_ending_at_last(&self, span: f64) -> VisibleWindow {
        match self.last_x() {
            Some(last) => VisibleWindow::new(last - span, last),
            None => VisibleWindow::default(),
        }
    }

    /// Candle indices whose x falls inside the window
    pub fn visible_indices(&self, window: &VisibleWindow) -> std::ops::Range<usize> {
        if self.series.is_empty() || window.is_degenerate() {
            return 0..0;
        }
        let start = window.start.ceil().max(0.0) as usize;
        let end = (window.end.floor().max(-1.0) + 1.0) as usize;
        start.min(self.series.count())..end.min(self.series.count())
    }
}
