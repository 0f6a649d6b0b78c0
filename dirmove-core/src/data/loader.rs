//! CSV bar import.
//!
//! Header-based: `date,open,high,low,close,volume` with dates as `YYYY-MM-DD`.
//! An optional `symbol` column is honored; other extra columns are ignored.
//! Empty price cells load as NaN so they surface as undefined bars downstream.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use super::DataError;
use crate::domain::Bar;

#[derive(Debug, Deserialize)]
struct CsvBar {
    #[serde(default)]
    symbol: Option<String>,
    date: NaiveDate,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    #[serde(default)]
    volume: Option<u64>,
}

impl CsvBar {
    fn into_bar(self, default_symbol: &str) -> Bar {
        Bar {
            symbol: self
                .symbol
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| default_symbol.to_string()),
            date: self.date,
            open: self.open.unwrap_or(f64::NAN),
            high: self.high.unwrap_or(f64::NAN),
            low: self.low.unwrap_or(f64::NAN),
            close: self.close.unwrap_or(f64::NAN),
            volume: self.volume.unwrap_or(0),
        }
    }
}

/// Read bars from any CSV source. Rows must be strictly increasing in date.
pub fn read_bars_csv<R: Read>(reader: R, default_symbol: &str) -> Result<Vec<Bar>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bars: Vec<Bar> = Vec::new();
    for row in rdr.deserialize::<CsvBar>() {
        let row = row.map_err(|source| DataError::Parse {
            line: source.position().map(|p| p.line()).unwrap_or(0),
            source,
        })?;
        let line = bars.len() as u64 + 2; // header is line 1
        if let Some(prev) = bars.last() {
            if row.date <= prev.date {
                return Err(DataError::Unordered {
                    line,
                    date: row.date,
                });
            }
        }
        bars.push(row.into_bar(default_symbol));
    }

    Ok(bars)
}

/// Load bars from a CSV file. The file stem is the symbol when no `symbol`
/// column is present.
pub fn load_bars_csv(path: &Path) -> Result<Vec<Bar>, DataError> {
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let symbol = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_uppercase())
        .unwrap_or_default();
    let bars = read_bars_csv(file, &symbol)?;
    if bars.is_empty() {
        return Err(DataError::Empty);
    }
    debug!(path = %path.display(), bars = bars.len(), "loaded bars");
    Ok(bars)
}
