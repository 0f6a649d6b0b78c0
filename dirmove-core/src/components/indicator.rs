//! Indicator trait and precomputed indicator values container.
//!
//! Indicators are pure functions: bar history in, nullable series out.
//! Consumers precompute them once over the full history and then query by
//! bar index.

use std::collections::HashMap;

use crate::domain::{Bar, OptSeries};
use crate::result::DmResult;

/// Trait for single-series indicators.
///
/// `compute` returns a series of the same length as `bars`. On fully defined
/// input the first `lookback()` values are `None` (warmup).
///
/// # Look-ahead contamination guard
/// With a non-negative offset, no value at bar t may depend on bar t+1 or
/// later: computing over `bars[..=t]` must reproduce the value at t.
pub trait Indicator: Send + Sync {
    /// Canonical name (e.g., "DMP_14").
    fn name(&self) -> &str;

    /// Number of leading undefined bars.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[Bar]) -> OptSeries;
}

/// Container for precomputed indicator values, keyed by canonical name.
#[derive(Debug, Clone, Default)]
pub struct IndicatorValues {
    series: HashMap<String, OptSeries>,
}

impl IndicatorValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a named indicator series.
    pub fn insert(&mut self, name: impl Into<String>, values: OptSeries) {
        self.series.insert(name.into(), values);
    }

    /// Compute `indicator` over `bars` and store it under its name.
    pub fn insert_indicator(&mut self, indicator: &dyn Indicator, bars: &[Bar]) {
        self.insert(indicator.name(), indicator.compute(bars));
    }

    /// Append both columns of a directional-movement result under their keys.
    pub fn insert_result(&mut self, result: &DmResult) {
        for (key, values) in result.columns() {
            self.insert(key, values.to_vec());
        }
    }

    /// Value at a bar index. `None` when the name is unknown, the index is out
    /// of range, or the bar is undefined.
    pub fn get(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.series
            .get(name)
            .and_then(|v| v.get(bar_index).copied().flatten())
    }

    /// Get the full series for a named indicator.
    pub fn get_series(&self, name: &str) -> Option<&[Option<f64>]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    /// Number of indicator series stored.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{make_hl_bars, DirectionalMovement};
    use crate::params::DmParams;

    #[test]
    fn indicator_values_insert_and_get() {
        let mut iv = IndicatorValues::new();
        iv.insert("DMP_3", vec![None, None, Some(1.5), Some(2.0)]);
        assert_eq!(iv.get("DMP_3", 0), None);
        assert_eq!(iv.get("DMP_3", 2), Some(1.5));
        assert_eq!(iv.get("DMP_3", 3), Some(2.0));
        assert_eq!(iv.get("DMP_3", 4), None);
        assert_eq!(iv.get_series("DMP_3").map(|s| s.len()), Some(4));
    }

    #[test]
    fn indicator_values_missing_name() {
        let iv = IndicatorValues::new();
        assert_eq!(iv.get("nonexistent", 0), None);
        assert!(iv.get_series("nonexistent").is_none());
    }

    #[test]
    fn insert_result_appends_both_columns() {
        let bars = make_hl_bars(&[10.0, 11.0, 12.0, 11.0], &[9.0, 9.5, 10.0, 9.0]);
        let params = DmParams {
            length: 2,
            use_native: false,
            ..DmParams::default()
        };
        let result = crate::indicators::dm_bars(&bars, &params, None).unwrap();

        let mut iv = IndicatorValues::new();
        assert!(iv.is_empty());
        iv.insert_result(&result);
        assert_eq!(iv.len(), 2);
        assert_eq!(iv.get_series("DMP_2"), Some(result.plus()));
        assert_eq!(iv.get_series("DMN_2"), Some(result.minus()));
    }

    #[test]
    fn insert_indicator_uses_band_name() {
        let bars = make_hl_bars(&[10.0, 11.0, 12.0, 11.0], &[9.0, 9.5, 10.0, 9.0]);
        let (plus, minus) = DirectionalMovement::pair(DmParams {
            length: 2,
            use_native: false,
            ..DmParams::default()
        });
        let mut iv = IndicatorValues::new();
        iv.insert_indicator(&plus, &bars);
        iv.insert_indicator(&minus, &bars);
        assert_eq!(iv.len(), 2);
        // +DM raw [_, 1, 1, 0] -> rma(2) seed at 2 = 1.0
        assert_eq!(iv.get("DMP_2", 2), Some(1.0));
    }
}
