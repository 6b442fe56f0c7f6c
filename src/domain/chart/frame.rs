use std::ops::Range;

use crate::domain::errors::RenderingResult;
use crate::domain::market_data::{Candle, CandleSeries};

use super::scale::DiscontinuousScale;
use super::value_objects::{ChartLayout, VisibleWindow};

/// Everything a surface needs to draw one frame. Borrowed, so the surface
/// cannot mutate the series it is shown.
#[derive(Debug, Clone, Copy)]
pub struct ChartFrame<'a> {
    pub series: &'a CandleSeries,
    pub window: VisibleWindow,
    pub layout: &'a ChartLayout,
    pub hovered: Option<Candle>,
}

impl<'a> ChartFrame<'a> {
    pub fn scale(&self) -> DiscontinuousScale<'a> {
        DiscontinuousScale::new(self.series)
    }

    pub fn geometry(&self) -> PlotGeometry {
        PlotGeometry::new(self.layout, self.window)
    }

    pub fn visible_range(&self) -> Range<usize> {
        self.scale().visible_indices(&self.window)
    }

    /// Candles inside the window with their index
    pub fn visible_candles(&self) -> impl Iterator<Item = (usize, &'a Candle)> + 'a {
        let range = self.visible_range();
        let candles = self.series.get_candles();
        range.map(move |i| (i, &candles[i]))
    }

    /// Candle under a pixel position, if any
    pub fn hit_test(&self, px_x: f64, px_y: f64) -> Option<Candle> {
        let geometry = self.geometry();
        if !geometry.in_plot(px_x, px_y) || self.window.is_degenerate() {
            return None;
        }
        let x = geometry.index_for_px(px_x);
        if !self.window.contains(x.round()) {
            return None;
        }
        self.scale().candle_at(x).copied()
    }
}

/// Rendering component consumed by the controller's host.
///
/// Implementations draw a frame and translate pointer positions back into
/// candles; the host forwards the result to `ChartController::on_hover`.
pub trait ChartSurface {
    fn render(&mut self, frame: &ChartFrame<'_>) -> RenderingResult<()>;

    fn hit_test(&self, frame: &ChartFrame<'_>, px_x: f64, px_y: f64) -> Option<Candle> {
        frame.hit_test(px_x, px_y)
    }
}

/// Pixel mapping between the index scale and the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotGeometry {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    volume_top: f64,
    volume_height: f64,
    body_ratio: f64,
    window: VisibleWindow,
}

impl PlotGeometry {
    pub fn new(layout: &ChartLayout, window: VisibleWindow) -> Self {
        let top = layout.margin.top as f64;
        Self {
            left: layout.margin.left as f64,
            top,
            width: layout.plot_width(),
            height: layout.plot_height(),
            volume_top: top + layout.volume_panel_origin(),
            volume_height: layout.volume_panel_height(),
            body_ratio: layout.candle_width_ratio,
            window,
        }
    }

    pub fn in_plot(&self, px_x: f64, px_y: f64) -> bool {
        px_x >= self.left
            && px_x <= self.left + self.width
            && px_y >= self.top
            && px_y <= self.top + self.height
    }

    pub fn px_for_index(&self, x: f64) -> f64 {
        if self.window.is_degenerate() {
            return self.left;
        }
        self.left + (x - self.window.start) / self.window.span() * self.width
    }

    pub fn index_for_px(&self, px_x: f64) -> f64 {
        if self.window.is_degenerate() {
            return self.window.start;
        }
        self.window.start + (px_x - self.left) / self.width * self.window.span()
    }

    /// Pixel width of one index unit
    pub fn slot_width(&self) -> f64 {
        if self.window.is_degenerate() { 0.0 } else { self.width / self.window.span() }
    }

    pub fn body_width(&self) -> f64 {
        (self.slot_width() * self.body_ratio).max(1.0)
    }

    /// Price panel spans the whole plot height, volume overlays its bottom
    pub fn price_to_py(&self, price: f64, min: f64, max: f64) -> f64 {
        let range = max - min;
        if range <= 0.0 {
            return self.top + self.height / 2.0;
        }
        self.top + (1.0 - (price - min) / range) * self.height
    }

    /// Top y of a volume bar; bars grow from the panel bottom
    pub fn volume_to_py(&self, volume: f64, max_volume: f64) -> f64 {
        let bottom = self.volume_top + self.volume_height;
        if max_volume <= 0.0 {
            return bottom;
        }
        bottom - (volume / max_volume).clamp(0.0, 1.0) * self.volume_height
    }

    pub fn volume_bottom(&self) -> f64 {
        self.volume_top + self.volume_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market_data::{Granularity, SeededRandom, SeriesGenerator};

    fn fixture() -> (CandleSeries, ChartLayout) {
        let series =
            SeriesGenerator::default().generate_with(Granularity::Day, &mut SeededRandom::seeded(5));
        (series, ChartLayout::default())
    }

    #[test]
    fn pixel_mapping_round_trips() {
        let (_, layout) = fixture();
        let geometry = PlotGeometry::new(&layout, VisibleWindow::new(119.0, 199.0));
        assert_eq!(geometry.px_for_index(119.0), 50.0);
        assert_eq!(geometry.px_for_index(199.0), 750.0);
        let px = geometry.px_for_index(150.0);
        assert!((geometry.index_for_px(px) - 150.0).abs() < 1e-9);
        assert_eq!(geometry.slot_width(), 8.75);
    }

    #[test]
    fn hit_test_finds_candle_under_pointer() {
        let (series, layout) = fixture();
        let frame = ChartFrame {
            series: &series,
            window: VisibleWindow::new(119.0, 199.0),
            layout: &layout,
            hovered: None,
        };
        let px = frame.geometry().px_for_index(150.0);
        assert_eq!(frame.hit_test(px + 1.0, 200.0), series.get(150).copied());
        assert_eq!(frame.hit_test(10.0, 200.0), None);
        assert_eq!(frame.hit_test(px, 495.0), None);
    }

    #[test]
    fn hit_test_on_empty_series_is_none() {
        let series = CandleSeries::empty(Granularity::Day);
        let layout = ChartLayout::default();
        let frame = ChartFrame {
            series: &series,
            window: VisibleWindow::default(),
            layout: &layout,
            hovered: None,
        };
        assert_eq!(frame.hit_test(400.0, 200.0), None);
        assert_eq!(frame.visible_candles().count(), 0);
    }

    #[test]
    fn visible_candles_follow_window() {
        let (series, layout) = fixture();
        let frame = ChartFrame {
            series: &series,
            window: VisibleWindow::new(159.0, 199.0),
            layout: &layout,
            hovered: None,
        };
        let indices: Vec<usize> = frame.visible_candles().map(|(i, _)| i).collect();
        assert_eq!(indices.first(), Some(&159));
        assert_eq!(indices.len(), 41);
        assert_eq!(frame.visible_range(), 159..200);

        let (low, high) = series.price_range(frame.visible_range()).unwrap();
        assert!(frame.visible_candles().all(|(_, c)| c.ohlcv.low >= low && c.ohlcv.high <= high));
    }

    #[test]
    fn price_and_volume_projection() {
        let (_, layout) = fixture();
        let geometry = PlotGeometry::new(&layout, VisibleWindow::new(0.0, 10.0));
        assert_eq!(geometry.price_to_py(100.0, 100.0, 200.0), 470.0);
        assert_eq!(geometry.price_to_py(200.0, 100.0, 200.0), 10.0);
        assert_eq!(geometry.volume_to_py(0.0, 1500.0), geometry.volume_bottom());
        assert!((geometry.volume_to_py(1500.0, 1500.0) - 378.0).abs() < 1e-9);
    }
}
