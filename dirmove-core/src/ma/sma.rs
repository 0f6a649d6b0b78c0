//! Simple Moving Average (SMA).
//!
//! Rolling mean over a window of `window` bars.
//! Lookback: window - 1 (first valid value at index window-1 on a fully defined input).

use crate::domain::OptSeries;

pub fn sma(values: &[Option<f64>], window: usize) -> OptSeries {
    let n = values.len();
    let mut result = vec![None; n];

    if window == 0 || n < window {
        return result;
    }

    // Running sum over the defined values in the window, plus a count of the
    // undefined ones. Any undefined value voids the window.
    let mut sum = 0.0;
    let mut missing = 0usize;

    for i in 0..n {
        match values[i] {
            Some(v) => sum += v,
            None => missing += 1,
        }
        if i >= window {
            match values[i - window] {
                Some(v) => sum -= v,
                None => missing -= 1,
            }
        }
        if i + 1 >= window && missing == 0 {
            result[i] = Some(sum / window as f64);
        }
    }

    result
}
