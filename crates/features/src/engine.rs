//! Profile computation engine.
//!
//! Validates configuration once and exposes the per-window computations
//! behind a single facade. Every call is a pure function of the supplied
//! bar window; the engine keeps no state between calls, so independent
//! windows can be processed from any number of threads.

use crate::{
    histogram::PriceHistogram, levels::LevelDetector, order_flow::OrderFlowProfile,
    value_area::ValueAreaComputer,
};
use profile_core::{Bar, Config, Level, Result, VolumeProfile};
use tracing::debug;

/// Profile computation engine.
#[derive(Debug, Clone)]
pub struct ProfileEngine {
    config: Config,
}

impl ProfileEngine {
    /// Create a new engine from a validated configuration.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The engine's configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Compute the volume profile for a bar window.
    pub fn profile(&self, bars: &[Bar]) -> Result<VolumeProfile> {
        let cfg = &self.config.profile;
        let histogram = PriceHistogram::build(bars, cfg.resolution, cfg.min_bin_size)?;
        let value_area =
            ValueAreaComputer::new(cfg.value_area_fraction).compute(&histogram);

        debug!(
            bars = bars.len(),
            bins = histogram.resolution(),
            poc = value_area.poc,
            vah = value_area.vah,
            val = value_area.val,
            coverage = value_area.coverage,
            "computed volume profile"
        );

        let total_volume = histogram.total_volume();
        let bin_width = histogram.bin_width();
        let min_price = histogram.min_price();
        let max_price = histogram.max_price();

        Ok(VolumeProfile {
            bins: histogram.into_bins(),
            value_area,
            total_volume,
            bin_width,
            min_price,
            max_price,
        })
    }

    /// Compute the buy/sell split profile for a bar window.
    pub fn order_flow(&self, bars: &[Bar]) -> Result<OrderFlowProfile> {
        let cfg = &self.config.order_flow;
        let profile = OrderFlowProfile::build(
            bars,
            cfg.resolution,
            self.config.profile.min_bin_size,
            cfg.imbalance_threshold,
        )?;

        debug!(
            bars = bars.len(),
            net = profile.net_order_flow(),
            flagged = profile.imbalanced_bins().len(),
            "computed order flow profile"
        );

        Ok(profile)
    }

    /// Detect support/resistance levels in a bar window.
    pub fn levels(&self, bars: &[Bar]) -> Result<Vec<Level>> {
        let levels = LevelDetector::new(self.config.levels.clone()).detect(bars)?;
        debug!(bars = bars.len(), levels = levels.len(), "detected levels");
        Ok(levels)
    }
}
