//! Bar sources: CSV files and deterministic synthetic data.
//!
//! Loading is the surrounding application's concern; the indicator itself
//! only sees the high/low series produced by [`high_low_series`].

pub mod loader;
pub mod synthetic;

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{Bar, PriceSeries, SeriesError, SeriesIndex};

pub use loader::{load_bars_csv, read_bars_csv};
pub use synthetic::generate_synthetic_bars;

/// Structured error types for bar loading.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed bar row at line {line}: {source}")]
    Parse {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("bar at line {line} ({date}) is not after the previous bar")]
    Unordered { line: u64, date: chrono::NaiveDate },

    #[error("no bars found")]
    Empty,
}

/// Split bars into aligned high and low series over their date index.
pub fn high_low_series(bars: &[Bar]) -> Result<(PriceSeries, PriceSeries), SeriesError> {
    let index = SeriesIndex::dates(bars.iter().map(|b| b.date).collect())?;
    let high = PriceSeries::new("high", index.clone(), bars.iter().map(|b| b.high).collect())?;
    let low = PriceSeries::new("low", index, bars.iter().map(|b| b.low).collect())?;
    Ok((high, low))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_hl_bars;

    #[test]
    fn high_low_series_share_index() {
        let bars = make_hl_bars(&[10.0, 11.0], &[9.0, 9.5]);
        let (high, low) = high_low_series(&bars).unwrap();
        assert!(high.is_aligned_with(&low));
        assert_eq!(high.values(), &[10.0, 11.0]);
        assert_eq!(low.values(), &[9.0, 9.5]);
        assert_eq!(high.name(), "high");
    }

    #[test]
    fn high_low_series_rejects_duplicate_dates() {
        let mut bars = make_hl_bars(&[10.0, 11.0], &[9.0, 9.5]);
        bars[1].date = bars[0].date;
        assert!(high_low_series(&bars).is_err());
    }

    #[test]
    fn empty_bars_give_empty_series() {
        let (high, low) = high_low_series(&[]).unwrap();
        assert!(high.is_empty() && low.is_empty());
    }
}
