#![allow(deprecated)]

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::domain::chart::{ChartFrame, ChartSurface, PlotGeometry, VOLUME_FILL, close_color};
use crate::domain::errors::{AppError, RenderingResult};
use crate::domain::logging::LogComponent;
use crate::domain::market_data::Candle;
use crate::{log_debug, log_warn};

const BACKGROUND: &str = "#1a1a1a";
const PLACEHOLDER: &str = "#ffffff";
const HOVER_OUTLINE: &str = "#ffffff";

/// Plain 2D-context surface: candles, wicks and the volume panel
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn from_canvas(canvas: HtmlCanvasElement) -> RenderingResult<Self> {
        let context = canvas
            .get_context("2d")
            .map_err(|_| AppError::RenderingError("getContext(\"2d\") threw".to_string()))?
            .ok_or_else(|| AppError::RenderingError("2D context unavailable".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| AppError::RenderingError("Failed to cast to 2D context".to_string()))?;
        Ok(Self { canvas, context })
    }

    fn clear(&self, frame: &ChartFrame<'_>) {
        let (w, h) = (frame.layout.width, frame.layout.height);
        if self.canvas.width() != w {
            self.canvas.set_width(w);
        }
        if self.canvas.height() != h {
            self.canvas.set_height(h);
        }
        self.context.set_fill_style(&JsValue::from_str(BACKGROUND));
        self.context.fill_rect(0.0, 0.0, w as f64, h as f64);
    }

    fn draw_placeholder(&self, frame: &ChartFrame<'_>) -> RenderingResult<()> {
        self.context.set_fill_style(&JsValue::from_str(PLACEHOLDER));
        self.context.set_font("16px Arial");
        self.context
            .fill_text("Loading...", frame.layout.margin.left as f64, frame.layout.height as f64 / 2.0)
            .map_err(|_| AppError::RenderingError("fillText failed".to_string()))
    }

    fn draw_candle(&self, geometry: &PlotGeometry, index: usize, candle: &Candle, range: (f64, f64)) {
        let (min, max) = range;
        let x = geometry.px_for_index(index as f64);
        let color = JsValue::from_str(close_color(candle).css());
        let high_y = geometry.price_to_py(candle.ohlcv.high.value(), min, max);
        let low_y = geometry.price_to_py(candle.ohlcv.low.value(), min, max);
        let open_y = geometry.price_to_py(candle.ohlcv.open.value(), min, max);
        let close_y = geometry.price_to_py(candle.ohlcv.close.value(), min, max);

        self.context.set_stroke_style(&color);
        self.context.set_line_width(1.0);
        self.context.begin_path();
        self.context.move_to(x, high_y);
        self.context.line_to(x, low_y);
        self.context.stroke();

        let body_width = geometry.body_width();
        let body_top = open_y.min(close_y);
        let body_height = (open_y - close_y).abs().max(1.0);
        self.context.set_fill_style(&color);
        self.context.fill_rect(x - body_width / 2.0, body_top, body_width, body_height);
    }

    fn draw_volume(&self, geometry: &PlotGeometry, index: usize, candle: &Candle, max_volume: f64) {
        let x = geometry.px_for_index(index as f64);
        let top = geometry.volume_to_py(candle.ohlcv.volume.value(), max_volume);
        let width = geometry.body_width();
        self.context.set_fill_style(&JsValue::from_str(VOLUME_FILL));
        self.context.fill_rect(x - width / 2.0, top, width, geometry.volume_bottom() - top);
    }

    fn outline_hovered(&self, geometry: &PlotGeometry, index: usize) {
        let x = geometry.px_for_index(index as f64);
        let width = geometry.slot_width().max(2.0);
        self.context.set_stroke_style(&JsValue::from_str(HOVER_OUTLINE));
        self.context.stroke_rect(x - width / 2.0, 0.0, width, self.canvas.height() as f64);
    }
}

impl ChartSurface for CanvasSurface {
    fn render(&mut self, frame: &ChartFrame<'_>) -> RenderingResult<()> {
        self.clear(frame);

        // y-extents follow what is on screen, not the whole series
        let range = frame.visible_range();
        let Some((min, max)) = frame.series.price_range(range.clone()) else {
            log_warn!(LogComponent::Infrastructure("CanvasSurface"), "no candles to render");
            return self.draw_placeholder(frame);
        };
        let (min, max) = (min.value(), max.value());
        let max_volume = frame.series.max_volume(range).map_or(0.0, |v| v.value());
        let visible: Vec<(usize, &Candle)> = frame.visible_candles().collect();

        let geometry = frame.geometry();
        for &(index, candle) in &visible {
            self.draw_volume(&geometry, index, candle, max_volume);
        }
        for &(index, candle) in &visible {
            self.draw_candle(&geometry, index, candle, (min, max));
        }
        if let Some(index) = frame.hovered.as_ref().and_then(|c| frame.series.index_of(c)) {
            self.outline_hovered(&geometry, index);
        }

        log_debug!(
            LogComponent::Infrastructure("CanvasSurface"),
            "rendered {} of {} candles, window [{:.1}, {:.1}]",
            visible.len(),
            frame.series.count(),
            frame.window.start,
            frame.window.end
        );
        Ok(())
    }
}
