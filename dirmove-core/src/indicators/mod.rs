//! Indicator implementations.
//!
//! Directional movement is a two-column indicator. Its bands are exposed as
//! separate named instances so the single-series `Indicator` trait stays
//! unchanged.

pub mod dm;

pub use dm::{
    directional_diff, dm, dm_bars, dm_with, mask_and_clamp, smooth_candidates, zero,
    DirectionalCandidates, DirectionalMovement, DmBand,
};

/// Bars from parallel high/low arrays, dated one day apart from 2024-01-02.
///
/// open/close sit at the midpoint; volume is constant.
#[cfg(test)]
pub fn make_hl_bars(high: &[f64], low: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    high.iter()
        .zip(low)
        .enumerate()
        .map(|(i, (&high, &low))| {
            let mid = (high + low) / 2.0;
            Bar {
                symbol: "TEST".to_string(),
                date: base_date + chrono::Duration::days(i as i64),
                open: mid,
                high,
                low,
                close: mid,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Assert a nullable value is defined and approximately equal to `expected`.
#[cfg(test)]
pub fn assert_opt_approx(actual: Option<f64>, expected: f64, epsilon: f64) {
    match actual {
        Some(v) => assert_approx(v, expected, epsilon),
        None => panic!("assert_opt_approx failed: actual=None, expected={expected}"),
    }
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
