//! Moving-average engine.
//!
//! Smoothing strategies form a closed set (`MaMode`). Consumers depend only on
//! the [`MovingAverage`] capability: a nullable series in, a nullable series of
//! the same length out. How each strategy warms up is its own business and is
//! reported through [`MovingAverage::lookback`].
//!
//! Null handling shared by every strategy:
//! - leading `None`s are skipped before the first window is formed;
//! - windowed averages (sma, wma) yield `None` for any window touching a `None`;
//! - recursive averages (ema, rma) stay `None` for the rest of the series once
//!   a `None` follows their seed.

pub mod ema;
pub mod rma;
pub mod sma;
pub mod wma;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::OptSeries;

pub use ema::{dema, ema, tema};
pub use rma::rma;
pub use sma::sma;
pub use wma::{hma, wma};

/// A smoothing strategy: `smooth(series, window) -> series`.
pub trait MovingAverage {
    /// Smooth `values` over `window` bars. Output length equals input length.
    fn smooth(&self, values: &[Option<f64>], window: usize) -> OptSeries;

    /// Bars of warm-up this strategy adds on top of the input's own leading `None`s.
    fn lookback(&self, window: usize) -> usize;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown moving average mode: {0}")]
pub struct ParseMaModeError(pub String);

/// Closed enumeration of supported smoothing strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaMode {
    /// Simple rolling mean.
    Sma,
    /// Exponential, alpha = 2/(n+1), SMA-seeded.
    Ema,
    /// Wilder's running average, alpha = 1/n, SMA-seeded.
    #[default]
    Rma,
    /// Linearly weighted, weights 1..=n.
    Wma,
    /// Double exponential.
    Dema,
    /// Triple exponential.
    Tema,
    /// Hull.
    Hma,
}

impl MaMode {
    pub const ALL: [MaMode; 7] = [
        MaMode::Sma,
        MaMode::Ema,
        MaMode::Rma,
        MaMode::Wma,
        MaMode::Dema,
        MaMode::Tema,
        MaMode::Hma,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaMode::Sma => "sma",
            MaMode::Ema => "ema",
            MaMode::Rma => "rma",
            MaMode::Wma => "wma",
            MaMode::Dema => "dema",
            MaMode::Tema => "tema",
            MaMode::Hma => "hma",
        }
    }
}

impl fmt::Display for MaMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaMode {
    type Err = ParseMaModeError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = s.trim().to_lowercase();
        MaMode::ALL
            .into_iter()
            .find(|m| m.as_str() == folded)
            .ok_or_else(|| ParseMaModeError(s.to_string()))
    }
}

impl MovingAverage for MaMode {
    fn smooth(&self, values: &[Option<f64>], window: usize) -> OptSeries {
        match self {
            MaMode::Sma => sma(values, window),
            MaMode::Ema => ema(values, window),
            MaMode::Rma => rma(values, window),
            MaMode::Wma => wma(values, window),
            MaMode::Dema => dema(values, window),
            MaMode::Tema => tema(values, window),
            MaMode::Hma => hma(values, window),
        }
    }

    fn lookback(&self, window: usize) -> usize {
        let w = window.saturating_sub(1);
        match self {
            MaMode::Sma | MaMode::Ema | MaMode::Rma | MaMode::Wma => w,
            MaMode::Dema => 2 * w,
            MaMode::Tema => 3 * w,
            MaMode::Hma => w + wma::hma_sqrt_window(window).saturating_sub(1),
        }
    }
}

/// Start of the first run of `window` consecutive defined values.
pub(crate) fn first_valid_run(values: &[Option<f64>], window: usize) -> Option<usize> {
    if window == 0 {
        return None;
    }
    let mut run = 0;
    for (i, v) in values.iter().enumerate() {
        if v.is_some() {
            run += 1;
            if run == window {
                return Some(i + 1 - window);
            }
        } else {
            run = 0;
        }
    }
    None
}

/// SMA-seeded recursive average with smoothing factor `alpha`.
///
/// Shared by ema and rma; they differ only in `alpha`.
pub(crate) fn seeded_recursive(values: &[Option<f64>], window: usize, alpha: f64) -> OptSeries {
    let n = values.len();
    let mut result = vec![None; n];

    let Some(seed_start) = first_valid_run(values, window) else {
        return result;
    };
    let seed_end = seed_start + window;

    let seed = values[seed_start..seed_end].iter().flatten().sum::<f64>() / window as f64;
    result[seed_end - 1] = Some(seed);

    let mut prev = seed;
    for i in seed_end..n {
        let Some(v) = values[i] else {
            // rest stays None
            return result;
        };
        let smoothed = alpha * v + (1.0 - alpha) * prev;
        result[i] = Some(smoothed);
        prev = smoothed;
    }

    result
}

/// Combine two aligned nullable series element-wise; `None` if either side is.
pub(crate) fn zip_with(
    a: &[Option<f64>],
    b: &[Option<f64>],
    f: impl Fn(f64, f64) -> f64,
) -> OptSeries {
    a.iter()
        .zip(b)
        .map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => Some(f(*x, *y)),
            _ => None,
        })
        .collect()
}
