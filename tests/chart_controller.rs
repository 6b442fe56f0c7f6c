use candle_zoom_chart::ChartController;
use candle_zoom_chart::domain::chart::{ChartLayout, VisibleWindow};
use candle_zoom_chart::domain::market_data::{Granularity, SeededRandom, SeriesGenerator};

fn controller(seed: u64) -> ChartController<SeededRandom> {
    ChartController::with_parts(SeriesGenerator::default(), ChartLayout::default(), SeededRandom::seeded(seed))
}

#[test]
fn bogus_granularity_behaves_like_day() {
    let mut bogus = controller(9);
    let mut day = controller(9);
    bogus.zoom_in();
    day.zoom_in();
    bogus.set_granularity("bogus");
    day.set_granularity("day");
    assert_eq!(bogus.state(), day.state());
    assert_eq!(bogus.series(), day.series());
    assert_eq!(bogus.visible_window(), day.visible_window());
}

#[test]
fn every_selector_value_is_accepted() {
    let mut c = controller(2);
    for (value, expected) in [
        ("month", Granularity::Month),
        ("week", Granularity::Week),
        ("day", Granularity::Day),
        ("hour", Granularity::Hour),
        ("15min", Granularity::FifteenMinutes),
    ] {
        c.set_granularity(value);
        assert_eq!(c.granularity(), expected);
        assert_eq!(c.series().count(), 200);
        assert_eq!(c.series().granularity(), expected);
    }
}

#[test]
fn hover_round_trip() {
    let mut c = controller(4);
    let candle = *c.series().get(57).unwrap();
    c.on_hover(Some(candle));
    assert_eq!(c.hovered(), Some(&candle));
    c.on_hover(None);
    assert_eq!(c.hovered(), None);
    c.on_hover(None);
    assert_eq!(c.hovered(), None);
}

#[test]
fn window_tracks_zoom() {
    let mut c = controller(8);
    assert_eq!(c.visible_window(), VisibleWindow::new(119.0, 199.0));
    c.zoom_out();
    assert_eq!(c.visible_window(), VisibleWindow::new(39.0, 199.0));
    c.zoom_out();
    assert_eq!(c.zoom_level(), 0.1);
    let window = c.visible_window();
    assert_eq!(window.end, 199.0);
    assert!((window.span() - 800.0).abs() < 1e-9);
}

#[test]
fn frame_carries_current_state() {
    let mut c = controller(3);
    let candle = *c.series().latest().unwrap();
    c.on_hover(Some(candle));
    let frame = c.frame();
    assert_eq!(frame.hovered, Some(candle));
    assert_eq!(frame.window, c.visible_window());
    assert_eq!(frame.series.count(), 200);
    assert_eq!(frame.layout, &ChartLayout::default());
}

#[test]
fn resize_changes_only_layout() {
    let mut c = controller(5);
    let before = c.visible_window();
    c.resize(ChartLayout::with_width(1200).unwrap());
    assert_eq!(c.layout().width, 1200);
    assert_eq!(c.visible_window(), before);
}

#[test]
fn hover_follows_resized_layout() {
    let mut c = controller(6);
    c.resize(ChartLayout::with_width(1200).unwrap());
    let px = c.frame().geometry().px_for_index(199.0);
    assert_eq!(px, 1150.0);
    c.hover_at(px, 100.0);
    assert_eq!(c.hovered(), c.series().latest());
}

#[test]
fn foreign_candle_does_not_stick() {
    let mut c = controller(7);
    let other = controller(70);
    c.on_hover(other.series().get(3).copied());
    assert_eq!(c.hovered(), None);
}
