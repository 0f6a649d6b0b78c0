//! Result composition: two named columns plus descriptive metadata.

use polars::prelude::{DataFrame, NamedFrom, PolarsResult, Series};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::{OptSeries, SeriesIndex};

/// Indicator family tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Trend,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Trend => "trend",
        }
    }
}

/// +DM/-DM columns aligned to the input index.
///
/// Keys are `DMP_<length>` and `DMN_<length>`; the composite name is
/// `DM_<length>`.
#[derive(Debug, Clone, PartialEq)]
pub struct DmResult {
    length: usize,
    index: SeriesIndex,
    plus: OptSeries,
    minus: OptSeries,
    source: String,
}

impl DmResult {
    pub(crate) fn compose(
        length: usize,
        index: SeriesIndex,
        plus: OptSeries,
        minus: OptSeries,
        source: impl Into<String>,
    ) -> Self {
        debug_assert_eq!(plus.len(), index.len());
        debug_assert_eq!(minus.len(), index.len());
        Self {
            length,
            index,
            plus,
            minus,
            source: source.into(),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Composite display name, e.g. `DM_14`.
    pub fn name(&self) -> String {
        format!("DM_{}", self.length)
    }

    pub fn category(&self) -> Category {
        Category::Trend
    }

    pub fn plus_key(&self) -> String {
        format!("DMP_{}", self.length)
    }

    pub fn minus_key(&self) -> String {
        format!("DMN_{}", self.length)
    }

    pub fn plus(&self) -> &[Option<f64>] {
        &self.plus
    }

    pub fn minus(&self) -> &[Option<f64>] {
        &self.minus
    }

    pub fn index(&self) -> &SeriesIndex {
        &self.index
    }

    /// Which path produced the columns (`internal:<mamode>` or the native backend name).
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Look a column up by its canonical key.
    pub fn column(&self, key: &str) -> Option<&[Option<f64>]> {
        if key == self.plus_key() {
            Some(&self.plus)
        } else if key == self.minus_key() {
            Some(&self.minus)
        } else {
            None
        }
    }

    /// Both columns in canonical order (+DM first).
    pub fn columns(&self) -> [(String, &[Option<f64>]); 2] {
        [
            (self.plus_key(), self.plus.as_slice()),
            (self.minus_key(), self.minus.as_slice()),
        ]
    }

    /// Polars frame with an index column followed by both value columns.
    ///
    /// Dates are rendered as `YYYY-MM-DD` strings; positional indexes as `u64`.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let index = match &self.index {
            SeriesIndex::Positional(n) => {
                Series::new("index".into(), (0..*n as u64).collect::<Vec<u64>>())
            }
            SeriesIndex::Dates(dates) => Series::new(
                "date".into(),
                dates.iter().map(|d| d.to_string()).collect::<Vec<String>>(),
            ),
        };
        DataFrame::new(vec![
            index.into(),
            Series::new(self.plus_key().as_str().into(), self.plus.clone()).into(),
            Series::new(self.minus_key().as_str().into(), self.minus.clone()).into(),
        ])
    }
}

struct Columns<'a>(&'a DmResult);

impl Serialize for Columns<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        for (key, values) in self.0.columns() {
            map.serialize_entry(&key, values)?;
        }
        map.end()
    }
}

impl Serialize for DmResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("DmResult", 5)?;
        s.serialize_field("name", &self.name())?;
        s.serialize_field("category", &self.category())?;
        s.serialize_field("source", &self.source)?;
        s.serialize_field("index", &self.index)?;
        s.serialize_field("columns", &Columns(self))?;
        s.end()
    }
}
