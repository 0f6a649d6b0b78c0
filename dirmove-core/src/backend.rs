//! Native backend seam.
//!
//! A native backend computes already-smoothed +DM/-DM straight from highs and
//! lows, bypassing differencing, masking and the moving-average engine. The
//! caller decides whether one exists and injects it; there is no global
//! registry to probe.
//!
//! Native output uses a different published formulation than the internal
//! pipeline. The two are not expected to agree numerically.

use tracing::debug;

use crate::domain::OptSeries;

/// An external +DM/-DM primitive, one call per direction.
pub trait NativeDm: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &str;

    fn plus_dm(&self, high: &[f64], low: &[f64], length: usize) -> OptSeries;

    fn minus_dm(&self, high: &[f64], low: &[f64], length: usize) -> OptSeries;

    /// Leading undefined bars on fully defined input.
    fn lookback(&self, length: usize) -> usize;
}

/// Which path a single call takes.
#[derive(Clone, Copy)]
pub enum Backend<'a> {
    Native(&'a dyn NativeDm),
    Internal,
}

impl std::fmt::Debug for Backend<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Native(p) => write!(f, "Native({})", p.name()),
            Backend::Internal => f.write_str("Internal"),
        }
    }
}

/// Native only when requested AND provided; anything else runs internally.
pub fn select_backend<'a>(use_native: bool, provider: Option<&'a dyn NativeDm>) -> Backend<'a> {
    match (use_native, provider) {
        (true, Some(p)) => Backend::Native(p),
        (true, None) => {
            debug!("native backend requested but none provided, using internal pipeline");
            Backend::Internal
        }
        (false, _) => Backend::Internal,
    }
}

/// Running-sum formulation of +DM/-DM.
///
/// The first value, at `first_valid + length - 1`, is the plain sum of the
/// `length - 1` raw movements before it. Each later value is
/// `sum - sum / length + dm`. With `length == 1` the raw movements are
/// returned from the second defined bar on.
///
/// Raw movements here compare against the immediately preceding bar; there is
/// no drift and no epsilon clamp.
#[derive(Debug, Clone, Copy, Default)]
pub struct WilderSumBackend;

#[derive(Clone, Copy)]
enum Direction {
    Plus,
    Minus,
}

impl WilderSumBackend {
    fn compute(high: &[f64], low: &[f64], length: usize, dir: Direction) -> OptSeries {
        let n = high.len().min(low.len());
        let mut out = vec![None; high.len()];

        if length == 0 {
            return out;
        }

        let Some(first) = (0..n).find(|&i| high[i].is_finite() && low[i].is_finite()) else {
            return out;
        };

        let raw = |i: usize| -> Option<f64> {
            let (h, ph, l, pl) = (high[i], high[i - 1], low[i], low[i - 1]);
            if !(h.is_finite() && ph.is_finite() && l.is_finite() && pl.is_finite()) {
                return None;
            }
            let up = h - ph;
            let down = pl - l;
            let v = match dir {
                Direction::Plus if up > 0.0 && up > down => up,
                Direction::Minus if down > 0.0 && down > up => down,
                _ => 0.0,
            };
            Some(v)
        };

        if length == 1 {
            for i in (first + 1)..n {
                out[i] = raw(i);
            }
            return out;
        }

        let end_init = first + length - 1;
        if end_init >= n {
            return out;
        }

        let mut sum = 0.0;
        for i in (first + 1)..=end_init {
            let Some(v) = raw(i) else {
                return out;
            };
            sum += v;
        }
        out[end_init] = Some(sum);

        let inv = 1.0 / length as f64;
        for i in (end_init + 1)..n {
            let Some(v) = raw(i) else {
                return out;
            };
            sum = sum - sum * inv + v;
            out[i] = Some(sum);
        }

        out
    }
}

impl NativeDm for WilderSumBackend {
    fn name(&self) -> &str {
        "wilder_sum"
    }

    fn plus_dm(&self, high: &[f64], low: &[f64], length: usize) -> OptSeries {
        Self::compute(high, low, length, Direction::Plus)
    }

    fn minus_dm(&self, high: &[f64], low: &[f64], length: usize) -> OptSeries {
        Self::compute(high, low, length, Direction::Minus)
    }

    fn lookback(&self, length: usize) -> usize {
        if length <= 1 {
            1
        } else {
            length - 1
        }
    }
}
