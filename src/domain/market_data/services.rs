use std::cell::RefCell;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{AppError, ValidationResult};
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{
    Candle, CandleSeries, Granularity, OHLCV, Price, Timestamp, Volume,
};
use crate::log_debug;

/// Source of uniformly distributed floats for the random walk
pub trait RandomSource {
    /// Sample from `[low, high)`; returns `low` when the range is empty
    fn uniform(&mut self, low: f64, high: f64) -> f64;
}

/// Adapter turning any `rand::Rng` into a [`RandomSource`]
#[derive(Debug, Clone)]
pub struct RngSource<R: Rng>(pub R);

impl<R: Rng> RandomSource for RngSource<R> {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        self.0.random_range(low..high)
    }
}

/// Reproducible source for tests and benchmarks
pub type SeededRandom = RngSource<ChaCha8Rng>;

impl SeededRandom {
    pub fn seeded(seed: u64) -> Self {
        RngSource(ChaCha8Rng::seed_from_u64(seed))
    }
}

thread_local! {
    static THREAD_RNG: RefCell<ChaCha8Rng> = RefCell::new(ChaCha8Rng::seed_from_u64(entropy_seed()));
}

/// Non-reproducible source backed by a per-thread generator, so concurrent
/// generation on different threads never shares state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        THREAD_RNG.with(|rng| rng.borrow_mut().random_range(low..high))
    }
}

#[cfg(target_arch = "wasm32")]
fn entropy_seed() -> u64 {
    let hi = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let lo = (js_sys::Math::random() * u32::MAX as f64) as u64;
    (hi << 32) | lo
}

#[cfg(not(target_arch = "wasm32"))]
fn entropy_seed() -> u64 {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static STREAM: AtomicU64 = AtomicU64::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    // distinct stream per thread even when clocks collide
    nanos ^ STREAM.fetch_add(0x9E37_79B9_7F4A_7C15, Ordering::Relaxed)
}

/// Shape of a synthetic series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub bar_count: usize,
    pub base_price: f64,
    pub base_timestamp_ms: u64,
    /// Close drifts from open by at most this much either way
    pub max_step: f64,
    /// Wicks extend beyond the body by at most this much
    pub max_wick: f64,
    pub volume_min: f64,
    pub volume_span: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            bar_count: 200,
            base_price: 200.0,
            // 2024-10-12T00:00:00Z
            base_timestamp_ms: 1_728_691_200_000,
            max_step: 5.0,
            max_wick: 5.0,
            volume_min: 500.0,
            volume_span: 1000.0,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> ValidationResult<()> {
        if self.bar_count == 0 {
            return Err(AppError::ValidationError("bar_count must be positive".to_string()));
        }
        if !self.base_price.is_finite() || self.base_price <= 0.0 {
            return Err(AppError::ValidationError(format!(
                "base_price must be finite and positive, got {}",
                self.base_price
            )));
        }
        for (name, bound) in [
            ("max_step", self.max_step),
            ("max_wick", self.max_wick),
            ("volume_min", self.volume_min),
            ("volume_span", self.volume_span),
        ] {
            if !bound.is_finite() || bound < 0.0 {
                return Err(AppError::ValidationError(format!(
                    "{name} must be finite and non-negative, got {bound}"
                )));
            }
        }
        let base = Timestamp::from_millis(self.base_timestamp_ms);
        let last_step = (self.bar_count - 1) as u64;
        if let Some(g) = Granularity::ALL
            .into_iter()
            .find(|&g| base.checked_advanced_by(g, last_step).is_none())
        {
            return Err(AppError::ValidationError(format!(
                "base_timestamp_ms {} overflows after {} {} candles",
                self.base_timestamp_ms, self.bar_count, g
            )));
        }
        Ok(())
    }
}

/// Domain service producing random-walk candle series
#[derive(Debug, Clone, Default)]
pub struct SeriesGenerator {
    config: GeneratorConfig,
}

impl SeriesGenerator {
    pub fn new(config: GeneratorConfig) -> ValidationResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Fresh series from the thread-local random source
    pub fn generate(&self, granularity: Granularity) -> CandleSeries {
        self.generate_with(granularity, &mut ThreadRandom)
    }

    /// Each candle opens at the previous close; the first opens at `base_price`.
    pub fn generate_with<R: RandomSource + ?Sized>(
        &self,
        granularity: Granularity,
        rng: &mut R,
    ) -> CandleSeries {
        let cfg = &self.config;
        let base = Timestamp::from_millis(cfg.base_timestamp_ms);
        let mut candles = Vec::with_capacity(cfg.bar_count);
        let mut open = cfg.base_price;

        for i in 0..cfg.bar_count {
            let close = open + rng.uniform(-cfg.max_step, cfg.max_step);
            let high = open.max(close) + rng.uniform(0.0, cfg.max_wick);
            let low = open.min(close) - rng.uniform(0.0, cfg.max_wick);
            let volume = rng.uniform(cfg.volume_min, cfg.volume_min + cfg.volume_span);

            candles.push(Candle::new(
                base.advanced_by(granularity, i as u64),
                OHLCV::new(
                    Price::from(open),
                    Price::from(high),
                    Price::from(low),
                    Price::from(close),
                    Volume::from(volume),
                ),
            ));
            open = close;
        }

        log_debug!(
            LogComponent::Domain("SeriesGenerator"),
            "generated {} {} candles",
            candles.len(),
            granularity
        );

        CandleSeries::new(granularity, candles)
    }
}
