pub use super::value_objects::{Granularity, OHLCV, Price, Timestamp, Volume};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::Arc;

/// Domain entity - Candle (one OHLCV bar)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: Timestamp,
    pub ohlcv: OHLCV,
}

impl Candle {
    pub fn new(timestamp: Timestamp, ohlcv: OHLCV) -> Self {
        Self { timestamp, ohlcv }
    }

    pub fn is_bullish(&self) -> bool {
        self.ohlcv.close > self.ohlcv.open
    }

    pub fn is_bearish(&self) -> bool {
        self.ohlcv.close < self.ohlcv.open
    }

    pub fn body_size(&self) -> Price {
        Price::from((self.ohlcv.close.value() - self.ohlcv.open.value()).abs())
    }

    pub fn wick_high(&self) -> Price {
        Price::from(self.ohlcv.high.value() - self.ohlcv.close.value().max(self.ohlcv.open.value()))
    }

    pub fn wick_low(&self) -> Price {
        Price::from(self.ohlcv.close.value().min(self.ohlcv.open.value()) - self.ohlcv.low.value())
    }
}

/// Domain entity - an immutable, fully generated candle series.
///
/// The candle buffer sits behind an `Arc` so the controller and a rendering
/// surface can hold the same series without copying; nobody can mutate it
/// after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleSeries {
    granularity: Granularity,
    candles: Arc<[Candle]>,
}

impl CandleSeries {
    pub fn new(granularity: Granularity, candles: Vec<Candle>) -> Self {
        Self { granularity, candles: candles.into() }
    }

    pub fn empty(granularity: Granularity) -> Self {
        Self::new(granularity, Vec::new())
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn get_candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn get(&self, index: usize) -> Option<&Candle> {
        self.candles.get(index)
    }

    pub fn latest(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn count(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Position of a candle with this exact timestamp
    pub fn index_of(&self, candle: &Candle) -> Option<usize> {
        self.candles
            .binary_search_by(|c| c.timestamp.cmp(&candle.timestamp))
            .ok()
            .filter(|&i| self.candles[i] == *candle)
    }

    /// Lowest low and highest high over `range`; `None` when the range is
    /// empty or out of bounds
    pub fn price_range(&self, range: Range<usize>) -> Option<(Price, Price)> {
        let slice = self.candles.get(range)?;
        let first = slice.first()?;
        let init = (first.ohlcv.low, first.ohlcv.high);
        Some(slice.iter().fold(init, |(min, max), c| {
            (
                if c.ohlcv.low < min { c.ohlcv.low } else { min },
                if c.ohlcv.high > max { c.ohlcv.high } else { max },
            )
        }))
    }

    pub fn max_volume(&self, range: Range<usize>) -> Option<Volume> {
        self.candles
            .get(range)?
            .iter()
            .map(|c| c.ohlcv.volume.value())
            .reduce(f64::max)
            .map(Volume::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(ts: u64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Candle {
        Candle::new(
            Timestamp::from_millis(ts),
            OHLCV::new(
                Price::from(open),
                Price::from(high),
                Price::from(low),
                Price::from(close),
                Volume::from(volume),
            ),
        )
    }

    #[test]
    fn candle_methods() {
        let c = candle(0, 10.0, 12.0, 9.0, 11.0, 1.0);
        assert!(c.is_bullish());
        assert!(!c.is_bearish());
        assert_eq!(c.body_size().value(), 1.0);
        assert_eq!(c.wick_high().value(), 1.0);
        assert_eq!(c.wick_low().value(), 1.0);
    }

    #[test]
    fn flat_candle_is_neither_bullish_nor_bearish() {
        let c = candle(0, 10.0, 10.0, 10.0, 10.0, 0.0);
        assert!(!c.is_bullish());
        assert!(!c.is_bearish());
    }

    #[test]
    fn series_ranges() {
        let series = CandleSeries::new(
            Granularity::Day,
            vec![
                candle(0, 10.0, 12.0, 9.0, 11.0, 700.0),
                candle(1, 11.0, 14.0, 10.0, 13.0, 1200.0),
                candle(2, 13.0, 13.5, 8.0, 9.0, 900.0),
            ],
        );
        let (min, max) = series.price_range(0..3).unwrap();
        assert_eq!(min.value(), 8.0);
        assert_eq!(max.value(), 14.0);
        assert_eq!(series.max_volume(0..3).unwrap().value(), 1200.0);

        let (min, max) = series.price_range(0..2).unwrap();
        assert_eq!((min.value(), max.value()), (9.0, 14.0));
        assert_eq!(series.max_volume(2..3).unwrap().value(), 900.0);
        assert!(series.price_range(1..1).is_none());
        assert!(series.max_volume(2..7).is_none());
        assert_eq!(series.latest().unwrap().timestamp.value(), 2);
    }

    #[test]
    fn index_of_requires_exact_match() {
        let a = candle(0, 10.0, 12.0, 9.0, 11.0, 1.0);
        let b = candle(5, 11.0, 12.0, 9.0, 10.0, 1.0);
        let series = CandleSeries::new(Granularity::Day, vec![a, b]);
        assert_eq!(series.index_of(&b), Some(1));
        let forged = candle(5, 1.0, 2.0, 0.5, 1.5, 1.0);
        assert_eq!(series.index_of(&forged), None);
    }

    #[test]
    fn empty_series_has_no_ranges() {
        let series = CandleSeries::empty(Granularity::Hour);
        assert!(series.is_empty());
        assert!(series.price_range(0..0).is_none());
        assert!(series.max_volume(0..0).is_none());
        assert!(series.latest().is_none());
    }
}
