use crate::domain::chart::{ChartFrame, ChartLayout, DiscontinuousScale, VisibleWindow};
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{
    Candle, CandleSeries, Granularity, RandomSource, SeriesGenerator, ThreadRandom,
};
use crate::view_state::{ViewConfig, ViewState};
use crate::{log_debug, log_info, log_trace, log_warn};

/// Owns the view state and the current series; every UI event goes through here.
pub struct ChartController<R: RandomSource = ThreadRandom> {
    state: ViewState,
    config: ViewConfig,
    layout: ChartLayout,
    generator: SeriesGenerator,
    rng: R,
    series: CandleSeries,
}

impl ChartController<ThreadRandom> {
    pub fn new() -> Self {
        Self::with_parts(SeriesGenerator::default(), ChartLayout::default(), ThreadRandom)
    }
}

impl Default for ChartController<ThreadRandom> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> ChartController<R> {
    pub fn with_parts(generator: SeriesGenerator, layout: ChartLayout, mut rng: R) -> Self {
        let config = ViewConfig::default();
        let state = ViewState::new(&config);
        let series = generator.generate_with(state.granularity, &mut rng);
        Self { state, config, layout, generator, rng, series }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn series(&self) -> &CandleSeries {
        &self.series
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    pub fn zoom_level(&self) -> f64 {
        self.state.zoom_level
    }

    pub fn granularity(&self) -> Granularity {
        self.state.granularity
    }

    pub fn hovered(&self) -> Option<&Candle> {
        self.state.hovered.as_ref()
    }

    /// Selector entry point; unknown values become `day`.
    pub fn set_granularity(&mut self, value: &str) {
        let granularity = Granularity::parse_or_default(value);
        if granularity.value() != value {
            log_warn!(
                LogComponent::Application("ChartController"),
                "unknown granularity {:?}, using {}",
                value,
                granularity
            );
        }
        self.select_granularity(granularity);
    }

    /// Replace the series for `granularity`. Always regenerates, even when
    /// the value did not change.
    pub fn select_granularity(&mut self, granularity: Granularity) {
        self.state = self.state.with_granularity(granularity);
        self.series = self.generator.generate_with(granularity, &mut self.rng);
        log_info!(
            LogComponent::Application("ChartController"),
            "granularity {} ({} candles, zoom {:.1})",
            granularity,
            self.series.count(),
            self.state.zoom_level
        );
    }

    pub fn zoom_in(&mut self) {
        self.state = self.state.zoom_in(&self.config);
        log_debug!(LogComponent::Application("ChartController"), "zoom in -> {:.1}", self.state.zoom_level);
    }

    pub fn zoom_out(&mut self) {
        self.state = self.state.zoom_out(&self.config);
        log_debug!(LogComponent::Application("ChartController"), "zoom out -> {:.1}", self.state.zoom_level);
    }

    /// `None` hides the tooltip. A candle that is not part of the current
    /// series is treated as `None`.
    pub fn on_hover(&mut self, candle: Option<Candle>) {
        let candle = candle.filter(|c| {
            let known = self.series.index_of(c).is_some();
            if !known {
                log_debug!(
                    LogComponent::Application("ChartController"),
                    "ignoring hover on candle outside the series at {}",
                    c.timestamp.value()
                );
            }
            known
        });
        if self.state.hovered == candle {
            return;
        }
        log_trace!(
            LogComponent::Application("ChartController"),
            "hover {:?}",
            candle.map(|c| c.timestamp.value())
        );
        self.state = self.state.with_hovered(candle);
    }

    /// x-extents on the index scale: `[last - 80 / zoom, last]`, `[0, 0]` when empty
    pub fn visible_window(&self) -> VisibleWindow {
        DiscontinuousScale::new(&self.series).window_ending_at_last(self.state.visible_span(&self.config))
    }

    /// Bundle for the rendering surface
    pub fn frame(&self) -> ChartFrame<'_> {
        ChartFrame {
            series: &self.series,
            window: self.visible_window(),
            layout: &self.layout,
            hovered: self.state.hovered,
        }
    }

    /// Resolve a pointer position through the current frame and record the result
    pub fn hover_at(&mut self, px_x: f64, px_y: f64) {
        let candle = self.frame().hit_test(px_x, px_y);
        self.on_hover(candle);
    }

    /// Host width changed
    pub fn resize(&mut self, layout: ChartLayout) {
        self.layout = layout;
    }
}
