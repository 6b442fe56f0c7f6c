use leptos::html::Canvas;
use leptos::*;

use crate::{
    application::ChartController,
    domain::{
        chart::{ChartLayout, ChartSurface},
        logging::LogComponent,
        market_data::{Candle, Granularity, SeriesGenerator, ThreadRandom},
    },
    infrastructure::rendering::CanvasSurface,
    log_error, log_warn,
    time_utils::format_time_label,
    view_state::ViewState,
};

/// Lines shown in the hover overlay
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipData {
    pub lines: Vec<String>,
}

impl TooltipData {
    pub fn from_candle(candle: &Candle, granularity: Granularity) -> Self {
        let ohlcv = &candle.ohlcv;
        Self {
            lines: vec![
                format!("Date: {}", format_time_label(candle.timestamp, granularity)),
                format!("Open: {:.2}", ohlcv.open.value()),
                format!("High: {:.2}", ohlcv.high.value()),
                format!("Low: {:.2}", ohlcv.low.value()),
                format!("Close: {:.2}", ohlcv.close.value()),
                format!("Volume: {:.0}", ohlcv.volume.value()),
            ],
        }
    }
}

/// Canvas width from the host window, within sane bounds
fn host_layout() -> ChartLayout {
    let width = web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|w| w.as_f64())
        .map(|w| (w - 40.0).clamp(400.0, 1200.0) as u32)
        .unwrap_or(800);
    ChartLayout::with_width(width).unwrap_or_else(|e| {
        log_warn!(LogComponent::Presentation("App"), "falling back to default layout: {}", e);
        ChartLayout::default()
    })
}

/// Reactive handle around the controller. `state` mirrors the controller's
/// view state for the DOM; `revision` bumps whenever the canvas must redraw.
#[derive(Clone, Copy)]
struct ChartHandle {
    controller: StoredValue<ChartController>,
    state: RwSignal<ViewState>,
    revision: RwSignal<u64>,
}

impl ChartHandle {
    fn new(layout: ChartLayout) -> Self {
        let controller = ChartController::with_parts(SeriesGenerator::default(), layout, ThreadRandom);
        let state = create_rw_signal(*controller.state());
        Self { controller: store_value(controller), state, revision: create_rw_signal(0) }
    }

    /// Signals are set only after the controller borrow is released, since
    /// setting them runs effects that read the controller again.
    fn dispatch(&self, action: impl FnOnce(&mut ChartController)) {
        let mut next = None;
        self.controller.update_value(|c| {
            action(c);
            next = Some(*c.state());
        });
        if let Some(next) = next {
            self.state.set(next);
        }
        self.revision.update(|r| *r += 1);
    }

    /// Hover fires on every pointer move; only redraw when the candle changes
    fn hover(&self, px_x: f64, px_y: f64) {
        let mut changed = None;
        self.controller.update_value(|c| {
            let before = c.hovered().copied();
            c.hover_at(px_x, px_y);
            if c.hovered().copied() != before {
                changed = Some(*c.state());
            }
        });
        if let Some(next) = changed {
            self.state.set(next);
            self.revision.update(|r| *r += 1);
        }
    }

    fn status(&self) -> String {
        let state = self.state.get();
        let count = self.controller.with_value(|c| c.series().count());
        format!("{} candles • {} • zoom {:.1}", count, state.granularity.label(), state.zoom_level)
    }
}

#[component]
pub fn App() -> impl IntoView {
    view! {
        <style>
            {r#"
            .app-container {
                font-family: -apple-system, BlinkMacSystemFont, sans-serif;
                background: #0f1724;
                min-height: 100vh;
                padding: 20px;
                color: white;
            }
            .chart-title { text-align: center; }
            .chart-wrapper { position: relative; display: inline-block; }
            .zoom-controls { position: absolute; top: 10px; right: 10px; z-index: 100; }
            .zoom-btn {
                width: 30px; height: 30px; margin: 5px;
                background: white; color: black;
                border-radius: 50%; cursor: pointer;
            }
            .interval-select { position: absolute; top: 50px; right: 10px; z-index: 100; }
            .interval-select select { padding: 5px; background: white; border-radius: 5px; }
            .tooltip {
                position: absolute; top: 10px; left: 10px; padding: 5px;
                background: rgba(0, 0, 0, 0.7); color: white;
                border-radius: 5px; pointer-events: none;
            }
            .status { color: #72c685; font-size: 14px; margin-top: 6px; }
            "#}
        </style>
        <div class="app-container">
            <h1 class="chart-title">"Candlestick Chart Example"</h1>
            <CandleStickChart />
        </div>
    }
}

#[component]
fn CandleStickChart() -> impl IntoView {
    let layout = host_layout();
    let (width, height) = (layout.width, layout.height);
    let handle = ChartHandle::new(layout);
    let surface = store_value::<Option<CanvasSurface>>(None);
    let (render_error, set_render_error) = create_signal::<Option<String>>(None);
    let canvas_ref = create_node_ref::<Canvas>();

    create_effect(move |_| {
        let _ = handle.revision.get();
        let Some(canvas) = canvas_ref.get() else {
            return;
        };
        if surface.with_value(Option::is_none) {
            match CanvasSurface::from_canvas((*canvas).clone()) {
                Ok(s) => surface.set_value(Some(s)),
                Err(e) => {
                    log_error!(LogComponent::Presentation("CandleStickChart"), "{}", e);
                    set_render_error.set(Some(e.to_string()));
                    return;
                }
            }
        }
        handle.controller.with_value(|c| {
            surface.update_value(|s| {
                if let Some(Err(e)) = s.as_mut().map(|s| s.render(&c.frame())) {
                    log_error!(LogComponent::Presentation("CandleStickChart"), "{}", e);
                    set_render_error.set(Some(e.to_string()));
                }
            })
        });
    });

    let resize = window_event_listener(ev::resize, move |_| {
        let layout = host_layout();
        if handle.controller.with_value(|c| c.layout() != &layout) {
            handle.dispatch(move |c| c.resize(layout));
        }
    });
    on_cleanup(move || resize.remove());

    let options = Granularity::ALL
        .into_iter()
        .map(|g| {
            view! {
                <option value=g.value().to_string() selected={g == Granularity::default()}>
                    {g.label()}
                </option>
            }
        })
        .collect_view();

    view! {
        <div class="chart-wrapper">
            <div class="zoom-controls">
                <button class="zoom-btn" on:click=move |_| handle.dispatch(|c| c.zoom_in())>"+"</button>
                <button class="zoom-btn" on:click=move |_| handle.dispatch(|c| c.zoom_out())>"-"</button>
            </div>
            <div class="interval-select">
                <select on:change=move |ev| {
                    let value = event_target_value(&ev);
                    handle.dispatch(move |c| c.set_granularity(&value));
                }>
                    {options}
                </select>
            </div>
            <canvas
                id="chart-canvas"
                node_ref=canvas_ref
                width=width
                height=height
                style="cursor: crosshair;"
                on:mousemove=move |ev| handle.hover(ev.offset_x() as f64, ev.offset_y() as f64)
                on:mouseleave=move |_| handle.dispatch(|c| c.on_hover(None))
            />
            {move || {
                let state = handle.state.get();
                state.hovered.map(|candle| {
                    let tooltip = TooltipData::from_candle(&candle, state.granularity);
                    view! {
                        <div class="tooltip">
                            {tooltip.lines.into_iter().map(|line| view! { <div>{line}</div> }).collect_view()}
                        </div>
                    }
                })
            }}
            <div class="status">
                {move || render_error.get().unwrap_or_else(|| handle.status())}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market_data::{OHLCV, Price, Timestamp, Volume};

    #[test]
    fn tooltip_lines_match_overlay_format() {
        let candle = Candle::new(
            Timestamp::from_millis(1_728_691_200_000),
            OHLCV::new(
                Price::from(200.0),
                Price::from(204.127),
                Price::from(196.5),
                Price::from(202.994),
                Volume::from(1234.56),
            ),
        );
        let tooltip = TooltipData::from_candle(&candle, Granularity::Day);
        assert_eq!(
            tooltip.lines,
            vec![
                "Date: 2024-10-12",
                "Open: 200.00",
                "High: 204.13",
                "Low: 196.50",
                "Close: 202.99",
                "Volume: 1235",
            ]
        );
    }

    #[test]
    fn intraday_tooltip_includes_time() {
        let candle = Candle::new(
            Timestamp::from_millis(1_728_691_200_000).advanced_by(Granularity::Hour, 5),
            OHLCV::new(
                Price::from(1.0),
                Price::from(1.0),
                Price::from(1.0),
                Price::from(1.0),
                Volume::from(0.0),
            ),
        );
        let tooltip = TooltipData::from_candle(&candle, Granularity::Hour);
        assert_eq!(tooltip.lines[0], "Date: 2024-10-12 05:00");
    }
}
