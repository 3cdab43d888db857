//! Configuration structures for the volume-profile workspace.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Main configuration for profile computations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Volume profile configuration.
    pub profile: ProfileConfig,
    /// Order flow split-profile configuration.
    pub order_flow: OrderFlowConfig,
    /// Support/resistance level configuration.
    pub levels: LevelConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: ProfileConfig::default(),
            order_flow: OrderFlowConfig::default(),
            levels: LevelConfig::default(),
        }
    }
}

impl Config {
    /// Validate all sub-configurations.
    pub fn validate(&self) -> Result<()> {
        self.profile.validate()?;
        self.order_flow.validate()?;
        self.levels.validate()
    }
}

/// Volume profile configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Number of price bins.
    pub resolution: u32,
    /// Target value-area coverage (e.g., 0.70 for 70%).
    pub value_area_fraction: f64,
    /// Fallback bin width for a flat window (minimum price increment).
    pub min_bin_size: f64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            resolution: 24,
            value_area_fraction: 0.70,
            min_bin_size: 0.01,
        }
    }
}

impl ProfileConfig {
    /// Validate the profile configuration.
    pub fn validate(&self) -> Result<()> {
        if self.resolution < 1 {
            return Err(Error::config("resolution must be at least 1"));
        }
        if !(self.value_area_fraction > 0.0 && self.value_area_fraction < 1.0) {
            return Err(Error::config(format!(
                "value_area_fraction must be in (0, 1), got {}",
                self.value_area_fraction
            )));
        }
        if !(self.min_bin_size > 0.0) {
            return Err(Error::config(format!(
                "min_bin_size must be positive, got {}",
                self.min_bin_size
            )));
        }
        Ok(())
    }
}

/// Order flow split-profile configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderFlowConfig {
    /// Number of price bins.
    pub resolution: u32,
    /// Dominant-side share required to flag a bin as imbalanced.
    pub imbalance_threshold: f64,
}

impl Default for OrderFlowConfig {
    fn default() -> Self {
        Self {
            resolution: 20,
            imbalance_threshold: 0.75,
        }
    }
}

impl OrderFlowConfig {
    /// Validate the order flow configuration.
    pub fn validate(&self) -> Result<()> {
        if self.resolution < 1 {
            return Err(Error::config("order flow resolution must be at least 1"));
        }
        if !(self.imbalance_threshold > 0.5 && self.imbalance_threshold <= 1.0) {
            return Err(Error::config(format!(
                "imbalance_threshold must be in (0.5, 1], got {}",
                self.imbalance_threshold
            )));
        }
        Ok(())
    }
}

/// Support/resistance level detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Bars on each side a swing point must dominate.
    pub swing_length: u32,
    /// Maximum levels kept on each side of the reference price.
    pub max_levels: u32,
    /// Relative tolerance for merging nearby levels.
    pub merge_epsilon: f64,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            swing_length: 5,
            max_levels: 5,
            merge_epsilon: 0.001,
        }
    }
}

impl LevelConfig {
    /// Validate the level configuration.
    pub fn validate(&self) -> Result<()> {
        if self.swing_length < 1 {
            return Err(Error::config("swing_length must be at least 1"));
        }
        if self.max_levels < 1 {
            return Err(Error::config("max_levels must be at least 1"));
        }
        if !(self.merge_epsilon >= 0.0) {
            return Err(Error::config(format!(
                "merge_epsilon must be non-negative, got {}",
                self.merge_epsilon
            )));
        }
        Ok(())
    }
}
