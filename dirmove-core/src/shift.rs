//! Offset shifting and gap filling of finished columns.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::OptSeries;

/// Shift `values` forward by `offset` bars.
///
/// `out[t] = values[t - offset]` where that index exists, `None` otherwise:
/// the first `offset` entries become undefined for a positive offset, the
/// last `|offset|` for a negative one. Zero is a no-op.
pub fn shift(values: &[Option<f64>], offset: isize) -> OptSeries {
    let n = values.len();
    if offset == 0 {
        return values.to_vec();
    }
    let k = offset.unsigned_abs();
    if k >= n {
        return vec![None; n];
    }
    let mut out = vec![None; n];
    if offset > 0 {
        out[k..].copy_from_slice(&values[..n - k]);
    } else {
        out[..n - k].copy_from_slice(&values[k..]);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown fill method: {0}")]
pub struct ParseFillMethodError(pub String);

/// Propagation direction for gap filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMethod {
    /// Carry the last defined value forward (`ffill`, `pad`).
    Forward,
    /// Pull the next defined value backward (`bfill`, `backfill`).
    Backward,
}

impl FromStr for FillMethod {
    type Err = ParseFillMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ffill" | "pad" | "forward" => Ok(FillMethod::Forward),
            "bfill" | "backfill" | "backward" => Ok(FillMethod::Backward),
            _ => Err(ParseFillMethodError(s.to_string())),
        }
    }
}

/// Post-hoc gap filling. A value fill runs first, then the method fill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FillPolicy {
    pub value: Option<f64>,
    pub method: Option<FillMethod>,
}

impl FillPolicy {
    pub fn is_noop(&self) -> bool {
        self.value.is_none() && self.method.is_none()
    }
}

/// Apply `policy` to `values` in place.
pub fn apply_fill(values: &mut [Option<f64>], policy: &FillPolicy) {
    if let Some(fill) = policy.value {
        for v in values.iter_mut().filter(|v| v.is_none()) {
            *v = Some(fill);
        }
    }
    match policy.method {
        Some(FillMethod::Forward) => {
            let mut last = None;
            for v in values.iter_mut() {
                match *v {
                    Some(x) => last = Some(x),
                    None => *v = last,
                }
            }
        }
        Some(FillMethod::Backward) => {
            let mut next = None;
            for v in values.iter_mut().rev() {
                match *v {
                    Some(x) => next = Some(x),
                    None => *v = next,
                }
            }
        }
        None => {}
    }
}
