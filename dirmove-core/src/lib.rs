//! Dirmove Core: Directional Movement (+DM / -DM) for high/low price series.
//!
//! This crate contains:
//! - Domain types (bars, aligned price series with nullable output)
//! - Parameter normalization that never fails
//! - A closed family of moving-average strategies
//! - The internal differencing/masking/smoothing pipeline and a native backend seam
//! - Result composition with polars and serde export
//! - CSV and synthetic bar sources plus TOML configuration

pub mod backend;
pub mod components;
pub mod config;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod ma;
pub mod params;
pub mod result;
pub mod shift;

pub use backend::{select_backend, Backend, NativeDm, WilderSumBackend};
pub use config::{ConfigError, DmConfig, OutputConfig, OutputFormat};
pub use domain::{Bar, OptSeries, PriceSeries, SeriesIndex};
pub use indicators::{dm, dm_bars, dm_with, DirectionalMovement, DmBand};
pub use ma::{MaMode, MovingAverage};
pub use params::{DmParams, RawDmParams};
pub use result::{Category, DmResult};
pub use shift::{FillMethod, FillPolicy};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: results, parameters and indicators can cross threads.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<PriceSeries>();
        require_sync::<PriceSeries>();
        require_send::<DmParams>();
        require_sync::<DmParams>();
        require_send::<RawDmParams>();
        require_sync::<RawDmParams>();
        require_send::<DmResult>();
        require_sync::<DmResult>();
        require_send::<DmConfig>();
        require_sync::<DmConfig>();
        require_send::<WilderSumBackend>();
        require_sync::<WilderSumBackend>();
        require_send::<DirectionalMovement>();
        require_sync::<DirectionalMovement>();
        require_send::<components::IndicatorValues>();
        require_sync::<components::IndicatorValues>();
    }

    /// Both bands fit behind the shared trait object.
    #[test]
    fn dm_bands_are_indicator_objects() {
        let (plus, minus) = DirectionalMovement::pair(DmParams::default());
        let indicators: Vec<Box<dyn components::Indicator>> = vec![Box::new(plus), Box::new(minus)];
        let names: Vec<&str> = indicators.iter().map(|i| i.name()).collect();
        assert_eq!(names, ["DMP_14", "DMN_14"]);
    }
}
