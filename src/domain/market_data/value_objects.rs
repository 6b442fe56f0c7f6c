use derive_more::{Constructor, Deref, From, Into};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

/// Value Object - Price
#[derive(Debug, Clone, Copy, PartialEq, From, Into, Deref, Constructor, Serialize, Deserialize)]
pub struct Price(f64);

impl Price {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

/// Value Object - Volume
#[derive(Debug, Clone, Copy, PartialEq, From, Into, Deref, Constructor, Serialize, Deserialize)]
pub struct Volume(f64);

impl Volume {
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Value Object - Unix timestamp in milliseconds
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Deref, Constructor, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }

    pub fn from_millis(value: u64) -> Self {
        Self(value)
    }

    /// Offset by `steps` whole intervals of `granularity`, saturating at `u64::MAX`
    pub fn advanced_by(&self, granularity: Granularity, steps: u64) -> Self {
        Self(self.0.saturating_add(steps.saturating_mul(granularity.duration_ms())))
    }

    /// `None` when the offset does not fit in a `u64`
    pub fn checked_advanced_by(&self, granularity: Granularity, steps: u64) -> Option<Self> {
        steps
            .checked_mul(granularity.duration_ms())
            .and_then(|offset| self.0.checked_add(offset))
            .map(Self)
    }
}

/// Value Object - OHLCV
#[derive(Debug, Clone, Copy, PartialEq, Constructor, Serialize, Deserialize)]
pub struct OHLCV {
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Volume,
}

impl OHLCV {
    /// High caps the body, low floors it, volume is non-negative
    pub fn is_valid(&self) -> bool {
        self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.volume.value() >= 0.0
    }
}

const MINUTE_MS: u64 = 60 * 1000;
const HOUR_MS: u64 = 60 * MINUTE_MS;
const DAY_MS: u64 = 24 * HOUR_MS;

/// Value Object - time bucket per candle.
///
/// Only these five values exist; anything else a host hands in is coerced to
/// [`Granularity::Day`] by [`Granularity::parse_or_default`].
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    StrumDisplay,
    EnumIter,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
pub enum Granularity {
    #[strum(serialize = "month")]
    #[serde(rename = "month")]
    Month,

    #[strum(serialize = "week")]
    #[serde(rename = "week")]
    Week,

    #[default]
    #[strum(serialize = "day")]
    #[serde(rename = "day")]
    Day,

    #[strum(serialize = "hour")]
    #[serde(rename = "hour")]
    Hour,

    #[strum(serialize = "15min")]
    #[serde(rename = "15min")]
    FifteenMinutes,
}

impl Granularity {
    /// Selector order
    pub const ALL: [Granularity; 5] = [
        Granularity::Month,
        Granularity::Week,
        Granularity::Day,
        Granularity::Hour,
        Granularity::FifteenMinutes,
    ];

    /// Parse a selector value, falling back to `Day` for anything unknown
    pub fn parse_or_default(value: &str) -> Self {
        Self::from_str(value).unwrap_or_default()
    }

    /// Wire value used by the selector (`"15min"` etc.)
    pub fn value(&self) -> &str {
        self.as_ref()
    }

    /// Human label shown in the selector
    pub fn label(&self) -> &'static str {
        match self {
            Self::Month => "Month",
            Self::Week => "Week",
            Self::Day => "Day",
            Self::Hour => "Hour",
            Self::FifteenMinutes => "15 Minutes",
        }
    }

    /// Spacing between consecutive candle timestamps
    pub fn duration_ms(&self) -> u64 {
        match self {
            Self::Month => 30 * DAY_MS, // calendar months vary, fixed 30d buckets
            Self::Week => 7 * DAY_MS,
            Self::Day => DAY_MS,
            Self::Hour => HOUR_MS,
            Self::FifteenMinutes => 15 * MINUTE_MS,
        }
    }

    /// Whether labels need a time-of-day component
    pub fn is_intraday(&self) -> bool {
        self.duration_ms() < DAY_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn granularity_values_round_trip_through_parser() {
        for g in Granularity::iter() {
            assert_eq!(Granularity::parse_or_default(g.value()), g);
        }
    }

    #[test]
    fn unknown_granularity_falls_back_to_day() {
        assert_eq!(Granularity::parse_or_default("bogus"), Granularity::Day);
        assert_eq!(Granularity::parse_or_default(""), Granularity::Day);
        assert_eq!(Granularity::parse_or_default("Month"), Granularity::Day);
    }

    #[test]
    fn advancing_past_u64_is_detected() {
        let near_end = Timestamp::from_millis(u64::MAX - 1000);
        assert_eq!(near_end.checked_advanced_by(Granularity::Month, 1), None);
        assert_eq!(near_end.advanced_by(Granularity::Month, 1).value(), u64::MAX);
        let base = Timestamp::from_millis(1_000);
        assert_eq!(
            base.checked_advanced_by(Granularity::Hour, 2),
            Some(Timestamp::from_millis(1_000 + 2 * 3_600_000))
        );
    }

    #[test]
    fn durations_are_strictly_decreasing_in_selector_order() {
        let durations: Vec<u64> = Granularity::ALL.iter().map(|g| g.duration_ms()).collect();
        assert!(durations.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(Granularity::FifteenMinutes.duration_ms(), 900_000);
        assert_eq!(Granularity::Day.duration_ms(), 86_400_000);
    }

    #[test]
    fn ohlcv_validity() {
        let ok = OHLCV::new(
            Price::from(10.0),
            Price::from(12.0),
            Price::from(9.0),
            Price::from(11.0),
            Volume::from(1.0),
        );
        assert!(ok.is_valid());
        let bad = OHLCV { low: Price::from(10.5), ..ok };
        assert!(!bad.is_valid());
    }
}
