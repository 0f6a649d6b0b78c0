//! Domain types: bars and aligned price series.

pub mod bar;
pub mod series;

pub use bar::Bar;
pub use series::{OptSeries, PriceSeries, SeriesError, SeriesIndex};
