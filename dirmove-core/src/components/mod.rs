//! Integration surface for bar-driven consumers.

pub mod indicator;

pub use indicator::{Indicator, IndicatorValues};
