//! Weighted Moving Average (WMA) and Hull Moving Average (HMA).
//!
//! WMA weights the window linearly: oldest bar weight 1, newest weight n.
//! HMA = WMA(2 * WMA(n/2) - WMA(n), floor(sqrt(n))).

use super::zip_with;
use crate::domain::OptSeries;

pub fn wma(values: &[Option<f64>], window: usize) -> OptSeries {
    let n = values.len();
    let mut result = vec![None; n];

    if window == 0 || n < window {
        return result;
    }

    let denom = (window * (window + 1)) as f64 / 2.0;
    for end in (window - 1)..n {
        let slice = &values[(end + 1 - window)..=end];
        let mut acc = 0.0;
        let mut complete = true;
        for (k, v) in slice.iter().enumerate() {
            match v {
                Some(v) => acc += (k + 1) as f64 * v,
                None => {
                    complete = false;
                    break;
                }
            }
        }
        if complete {
            result[end] = Some(acc / denom);
        }
    }

    result
}

pub(crate) fn hma_half_window(window: usize) -> usize {
    (window / 2).max(1)
}

pub(crate) fn hma_sqrt_window(window: usize) -> usize {
    ((window as f64).sqrt().floor() as usize).max(1)
}

pub fn hma(values: &[Option<f64>], window: usize) -> OptSeries {
    if window == 0 {
        return vec![None; values.len()];
    }
    let half = wma(values, hma_half_window(window));
    let full = wma(values, window);
    let raw = zip_with(&half, &full, |h, f| 2.0 * h - f);
    wma(&raw, hma_sqrt_window(window))
}
