//! DM: Directional Movement (+DM / -DM).
//!
//! Steps on the internal path:
//! 1. up[t] = high[t] - high[t-drift], down[t] = low[t-drift] - low[t]
//! 2. +DM raw = up where up > down and up > 0, else 0; -DM raw mirrors it
//! 3. values within f64::EPSILON of zero (including -0.0) become exactly 0
//! 4. each raw column is smoothed by the configured moving average
//!
//! An injected native backend replaces steps 1-4 when requested. Either way the
//! columns are then offset, gap-filled and composed into a [`DmResult`].
//!
//! Undefined bars: the first `drift` (differencing), then the smoother's
//! warm-up, then `|offset|` at the head (positive) or tail (negative).

use std::sync::Arc;

use tracing::debug;

use crate::backend::{select_backend, Backend, NativeDm};
use crate::components::indicator::Indicator;
use crate::data::high_low_series;
use crate::domain::{Bar, OptSeries, PriceSeries};
use crate::ma::MovingAverage;
use crate::params::{DmParams, RawDmParams};
use crate::result::DmResult;
use crate::shift::{apply_fill, shift};

/// Raw directional candidates, one entry per bar.
///
/// Non-negative, and at most one of the two is non-zero at any bar.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalCandidates {
    pub positive: OptSeries,
    pub negative: OptSeries,
}

/// Upward and downward movement against the bar `drift` bars back.
///
/// Bars before `drift`, and bars where either end of a difference is not
/// finite, are `None`.
pub fn directional_diff(high: &[f64], low: &[f64], drift: usize) -> (OptSeries, OptSeries) {
    let drift = drift.max(1);
    let n = high.len().min(low.len());
    let mut up = vec![None; n];
    let mut down = vec![None; n];

    for t in drift..n {
        let (h, ph) = (high[t], high[t - drift]);
        let (l, pl) = (low[t], low[t - drift]);
        if h.is_finite() && ph.is_finite() && l.is_finite() && pl.is_finite() {
            up[t] = Some(h - ph);
            down[t] = Some(pl - l);
        }
    }

    (up, down)
}

/// Clamp values numerically indistinguishable from zero to exactly `0.0`.
pub fn zero(x: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        0.0
    } else {
        x
    }
}

/// Turn raw movement into two exclusive, non-negative candidate columns.
pub fn mask_and_clamp(up: &[Option<f64>], down: &[Option<f64>]) -> DirectionalCandidates {
    let (positive, negative): (OptSeries, OptSeries) = up
        .iter()
        .zip(down)
        .map(|(u, d)| match (u, d) {
            (Some(u), Some(d)) => {
                let pos = if u > d && *u > 0.0 { *u } else { 0.0 };
                let neg = if d > u && *d > 0.0 { *d } else { 0.0 };
                (Some(zero(pos)), Some(zero(neg)))
            }
            _ => (None, None),
        })
        .unzip();

    DirectionalCandidates { positive, negative }
}

/// Smooth both candidate columns independently with the same strategy.
pub fn smooth_candidates<M: MovingAverage + ?Sized>(
    ma: &M,
    candidates: &DirectionalCandidates,
    window: usize,
) -> (OptSeries, OptSeries) {
    (
        ma.smooth(&candidates.positive, window),
        ma.smooth(&candidates.negative, window),
    )
}

/// Leading undefined bars of the finished columns on fully defined input.
pub fn lookback(params: &DmParams, native: Option<&dyn NativeDm>) -> usize {
    let core = match select_backend(params.use_native, native) {
        Backend::Native(p) => p.lookback(params.length),
        Backend::Internal => params.drift + params.mamode.lookback(params.length),
    };
    core + params.offset.max(0) as usize
}

fn validated<'a>(
    high: Option<&'a PriceSeries>,
    low: Option<&'a PriceSeries>,
) -> Option<(&'a PriceSeries, &'a PriceSeries)> {
    let (Some(high), Some(low)) = (high, low) else {
        debug!("high or low series missing, no result");
        return None;
    };
    if !high.is_aligned_with(low) {
        debug!(
            high_len = high.len(),
            low_len = low.len(),
            "high and low are not aligned, no result"
        );
        return None;
    }
    Some((high, low))
}

/// Compute +DM/-DM.
///
/// Returns `None` when either input is absent or the two are not aligned.
/// Never fails otherwise.
pub fn dm(
    high: Option<&PriceSeries>,
    low: Option<&PriceSeries>,
    params: &DmParams,
    native: Option<&dyn NativeDm>,
) -> Option<DmResult> {
    let (high, low) = validated(high, low)?;

    let backend = select_backend(params.use_native, native);
    debug!(
        length = params.length,
        mamode = %params.mamode,
        drift = params.drift,
        offset = params.offset,
        ?backend,
        bars = high.len(),
        "computing directional movement"
    );

    let (pos, neg, source) = match backend {
        Backend::Native(provider) => (
            provider.plus_dm(high.values(), low.values(), params.length),
            provider.minus_dm(high.values(), low.values(), params.length),
            provider.name().to_string(),
        ),
        Backend::Internal => {
            let (up, down) = directional_diff(high.values(), low.values(), params.drift);
            let candidates = mask_and_clamp(&up, &down);
            let (pos, neg) = smooth_candidates(&params.mamode, &candidates, params.length);
            (pos, neg, format!("internal:{}", params.mamode))
        }
    };

    let mut pos = shift(&pos, params.offset);
    let mut neg = shift(&neg, params.offset);

    if !params.fill.is_noop() {
        apply_fill(&mut pos, &params.fill);
        apply_fill(&mut neg, &params.fill);
    }

    Some(DmResult::compose(
        params.length,
        high.index().clone(),
        pos,
        neg,
        source,
    ))
}

/// Normalize loosely typed options, then compute.
pub fn dm_with(
    high: Option<&PriceSeries>,
    low: Option<&PriceSeries>,
    raw: &RawDmParams,
    native: Option<&dyn NativeDm>,
) -> Option<DmResult> {
    dm(high, low, &raw.normalize(), native)
}

/// Compute over bars, using their dates as the index.
pub fn dm_bars(
    bars: &[Bar],
    params: &DmParams,
    native: Option<&dyn NativeDm>,
) -> Option<DmResult> {
    match high_low_series(bars) {
        Ok((high, low)) => dm(Some(&high), Some(&low), params, native),
        Err(e) => {
            debug!(error = %e, "bars do not form a valid series, no result");
            None
        }
    }
}

/// Which column a [`DirectionalMovement`] indicator exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmBand {
    Plus,
    Minus,
}

/// One DM column exposed through the single-series [`Indicator`] trait.
///
/// Each band is a separately named instance (`DMP_14`, `DMN_14`).
#[derive(Clone)]
pub struct DirectionalMovement {
    params: DmParams,
    band: DmBand,
    native: Option<Arc<dyn NativeDm>>,
    name: String,
}

impl DirectionalMovement {
    pub fn new(params: DmParams, band: DmBand) -> Self {
        let prefix = match band {
            DmBand::Plus => "DMP",
            DmBand::Minus => "DMN",
        };
        Self {
            name: format!("{prefix}_{}", params.length),
            params,
            band,
            native: None,
        }
    }

    /// Both bands with the same parameters.
    pub fn pair(params: DmParams) -> (Self, Self) {
        (
            Self::new(params.clone(), DmBand::Plus),
            Self::new(params, DmBand::Minus),
        )
    }

    pub fn with_native(mut self, native: Arc<dyn NativeDm>) -> Self {
        self.native = Some(native);
        self
    }

    pub fn band(&self) -> DmBand {
        self.band
    }
}

impl std::fmt::Debug for DirectionalMovement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectionalMovement")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("native", &self.native.as_ref().map(|n| n.name().to_string()))
            .finish()
    }
}

impl Indicator for DirectionalMovement {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        lookback(&self.params, self.native.as_deref())
    }

    fn compute(&self, bars: &[Bar]) -> OptSeries {
        match dm_bars(bars, &self.params, self.native.as_deref()) {
            Some(result) => match self.band {
                DmBand::Plus => result.plus().to_vec(),
                DmBand::Minus => result.minus().to_vec(),
            },
            None => vec![None; bars.len()],
        }
    }
}
