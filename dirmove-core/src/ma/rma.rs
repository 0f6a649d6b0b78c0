//! Wilder's running average (RMA).
//!
//! RMA[t] = (1/n) * x[t] + (1 - 1/n) * RMA[t-1]
//! Seed: mean of the first `n` consecutive defined values.
//! Lookback: n - 1.

use super::seeded_recursive;
use crate::domain::OptSeries;

pub fn rma(values: &[Option<f64>], window: usize) -> OptSeries {
    if window == 0 {
        return vec![None; values.len()];
    }
    seeded_recursive(values, window, 1.0 / window as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_opt_approx, DEFAULT_EPSILON};

    #[test]
    fn rma_period_3() {
        // seed at 3 = mean(8, 9, 6) = 23/3
        // rma[4] = (1/3)*6 + (2/3)*(23/3) = 64/9
        let values = vec![None, Some(8.0), Some(9.0), Some(6.0), Some(6.0)];
        let result = rma(&values, 3);

        assert!(result[0].is_none());
        assert!(result[1].is_none());
        assert!(result[2].is_none());
        assert_opt_approx(result[3], 23.0 / 3.0, DEFAULT_EPSILON);
        assert_opt_approx(result[4], 64.0 / 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rma_gap_after_seed_ends_series() {
        let values = vec![Some(1.0), Some(2.0), Some(3.0), None, Some(5.0)];
        let result = rma(&values, 2);
        assert_opt_approx(result[1], 1.5, DEFAULT_EPSILON);
        assert_opt_approx(result[2], 2.25, DEFAULT_EPSILON);
        assert!(result[3].is_none());
        assert!(result[4].is_none());
    }

    #[test]
    fn rma_seed_waits_for_full_run() {
        let values = vec![Some(1.0), None, Some(2.0), Some(4.0), Some(6.0)];
        let result = rma(&values, 2);
        assert!(result[1].is_none());
        assert!(result[2].is_none());
        assert_opt_approx(result[3], 3.0, DEFAULT_EPSILON);
        assert_opt_approx(result[4], 4.5, DEFAULT_EPSILON);
    }

    #[test]
    fn rma_constant_input_is_constant() {
        let values = vec![Some(7.0); 20];
        let result = rma(&values, 5);
        for v in result.iter().skip(4) {
            assert_opt_approx(*v, 7.0, DEFAULT_EPSILON);
        }
    }
}
