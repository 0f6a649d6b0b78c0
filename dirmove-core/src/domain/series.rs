//! Price series and their shared time index.
//!
//! High and low arrive as two separate series. They must already be aligned:
//! same length, same index, same ordering. Nothing here realigns them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A column that may contain undefined entries (warm-up, shift horizon).
pub type OptSeries = Vec<Option<f64>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    #[error("index has {index} entries but series has {values} values")]
    LengthMismatch { index: usize, values: usize },

    #[error("date index is not strictly increasing at position {position}")]
    Unordered { position: usize },
}

/// Time index shared by aligned series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum SeriesIndex {
    /// Plain `0..len` positions.
    Positional(usize),
    /// One date per observation, strictly increasing.
    Dates(Vec<NaiveDate>),
}

impl SeriesIndex {
    pub fn len(&self) -> usize {
        match self {
            SeriesIndex::Positional(n) => *n,
            SeriesIndex::Dates(d) => d.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build a date index, rejecting out-of-order dates.
    pub fn dates(dates: Vec<NaiveDate>) -> Result<Self, SeriesError> {
        if let Some(pos) = dates.windows(2).position(|w| w[1] <= w[0]) {
            return Err(SeriesError::Unordered { position: pos + 1 });
        }
        Ok(SeriesIndex::Dates(dates))
    }

    /// Render the label at `i` (date or position) for tabular output.
    pub fn label(&self, i: usize) -> String {
        match self {
            SeriesIndex::Positional(_) => i.to_string(),
            SeriesIndex::Dates(d) => d.get(i).map(|d| d.to_string()).unwrap_or_default(),
        }
    }
}

/// An ordered sequence of prices aligned to a [`SeriesIndex`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    name: String,
    index: SeriesIndex,
    values: Vec<f64>,
}

impl PriceSeries {
    pub fn new(
        name: impl Into<String>,
        index: SeriesIndex,
        values: Vec<f64>,
    ) -> Result<Self, SeriesError> {
        if index.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                index: index.len(),
                values: values.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            index,
            values,
        })
    }

    /// Series over a positional index.
    pub fn from_values(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            index: SeriesIndex::Positional(values.len()),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> &SeriesIndex {
        &self.index
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when `other` shares this series' length and index exactly.
    pub fn is_aligned_with(&self, other: &PriceSeries) -> bool {
        self.len() == other.len() && self.index == other.index
    }
}
