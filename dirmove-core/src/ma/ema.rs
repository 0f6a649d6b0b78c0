//! Exponential Moving Average (EMA) and its double/triple compositions.
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], alpha = 2/(n+1)
//! Seed: SMA of the first `n` consecutive defined values.
//! Lookback: n - 1 (ema), 2(n-1) (dema), 3(n-1) (tema).

use super::{seeded_recursive, zip_with};
use crate::domain::OptSeries;

pub fn ema(values: &[Option<f64>], window: usize) -> OptSeries {
    if window == 0 {
        return vec![None; values.len()];
    }
    seeded_recursive(values, window, 2.0 / (window as f64 + 1.0))
}

/// DEMA = 2 * EMA - EMA(EMA).
pub fn dema(values: &[Option<f64>], window: usize) -> OptSeries {
    let e1 = ema(values, window);
    let e2 = ema(&e1, window);
    zip_with(&e1, &e2, |a, b| 2.0 * a - b)
}

/// TEMA = 3 * EMA - 3 * EMA(EMA) + EMA(EMA(EMA)).
pub fn tema(values: &[Option<f64>], window: usize) -> OptSeries {
    let e1 = ema(values, window);
    let e2 = ema(&e1, window);
    let e3 = ema(&e2, window);
    let partial = zip_with(&e1, &e2, |a, b| 3.0 * (a - b));
    zip_with(&partial, &e3, |p, c| p + c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_opt_approx, DEFAULT_EPSILON};

    fn some(values: &[f64]) -> OptSeries {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn ema_period_1_is_identity() {
        let values = some(&[100.0, 200.0, 300.0]);
        let result = ema(&values, 1);
        assert_opt_approx(result[0], 100.0, DEFAULT_EPSILON);
        assert_opt_approx(result[1], 200.0, DEFAULT_EPSILON);
        assert_opt_approx(result[2], 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_3_known_values() {
        // alpha = 0.5, seed at 2 = SMA(10, 11, 12) = 11
        let result = ema(&some(&[10.0, 11.0, 12.0, 13.0, 14.0]), 3);
        assert!(result[0].is_none());
        assert!(result[1].is_none());
        assert_opt_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert_opt_approx(result[3], 12.0, DEFAULT_EPSILON);
        assert_opt_approx(result[4], 13.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_gap_after_seed_propagates() {
        let mut values = some(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        values[3] = None;
        let result = ema(&values, 3);
        assert_opt_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert!(result[3].is_none());
        assert!(result[4].is_none());
    }

    #[test]
    fn dema_on_linear_input_tracks_price() {
        // On a straight line, EMA lags by a constant; DEMA removes that lag.
        let values: OptSeries = (0..40).map(|i| Some(i as f64)).collect();
        let result = dema(&values, 3);
        assert!(result[3].is_none());
        assert!(result[4].is_some());
        assert_opt_approx(result[39], 39.0, 1e-6);
    }

    #[test]
    fn tema_constant_input_is_constant() {
        let values = vec![Some(5.0); 20];
        let result = tema(&values, 3);
        assert!(result[5].is_none());
        for v in result.iter().skip(6) {
            assert_opt_approx(*v, 5.0, DEFAULT_EPSILON);
        }
    }
}
