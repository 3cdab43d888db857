//! Core data types for the volume-profile workspace.

use crate::error::{Error, Result};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Timestamp in milliseconds since Unix epoch (UTC).
pub type TimestampMs = i64;

/// Price type with ordering support.
pub type Price = OrderedFloat<f64>;

/// Size/quantity type.
pub type Size = f64;

/// A single OHLCV bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    /// Bar open timestamp (ms).
    pub ts_min: TimestampMs,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
    /// Total volume.
    pub volume: Size,
}

impl Bar {
    /// Price range of the bar.
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Midpoint of the high/low range.
    #[inline]
    pub fn mid(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    /// A bar whose high equals its low traded at a single price.
    #[inline]
    pub fn is_flat(&self) -> bool {
        self.high == self.low
    }

    /// Bar closed above its open (buy pressure).
    #[inline]
    pub fn is_up_close(&self) -> bool {
        self.close > self.open
    }

    /// Bar closed below its open (sell pressure).
    #[inline]
    pub fn is_down_close(&self) -> bool {
        self.close < self.open
    }

    /// Check the bar satisfies the engine's preconditions.
    ///
    /// `high >= low`, non-negative volume, all fields finite.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ] {
            if !value.is_finite() {
                return Err(Error::data(format!(
                    "bar at ts {} has non-finite {name}",
                    self.ts_min
                )));
            }
        }
        if self.high < self.low {
            return Err(Error::data(format!(
                "bar at ts {} has high {} below low {}",
                self.ts_min, self.high, self.low
            )));
        }
        if self.volume < 0.0 {
            return Err(Error::data(format!(
                "bar at ts {} has negative volume {}",
                self.ts_min, self.volume
            )));
        }
        Ok(())
    }
}

/// One price bin of a volume histogram.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bin {
    /// Lower price edge of the bin.
    pub floor: f64,
    /// Accumulated volume.
    pub volume: Size,
}

impl Bin {
    /// Midpoint of the bin given the profile's bin width.
    #[inline]
    pub fn mid(&self, bin_width: f64) -> f64 {
        self.floor + bin_width / 2.0
    }
}

/// Value Area output (POC, VAH, VAL).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueArea {
    /// Point of Control (midpoint of the highest-volume bin).
    pub poc: f64,
    /// Value Area High (upper edge of the highest included bin).
    pub vah: f64,
    /// Value Area Low (lower edge of the lowest included bin).
    pub val: f64,
    /// Actual coverage achieved (e.g., 0.72).
    pub coverage: f64,
    /// Number of bins inside the VA.
    pub bin_count: u32,
}

/// Complete volume profile for one bar window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeProfile {
    /// Bins ordered by price ascending.
    pub bins: Vec<Bin>,
    /// Value Area boundaries.
    pub value_area: ValueArea,
    /// Total volume across all bins.
    pub total_volume: Size,
    /// Width of each bin.
    pub bin_width: f64,
    /// Lowest low of the window.
    pub min_price: f64,
    /// Highest high of the window.
    pub max_price: f64,
}

impl VolumeProfile {
    /// Point of Control price.
    #[inline]
    pub fn poc(&self) -> f64 {
        self.value_area.poc
    }

    /// Value Area High.
    #[inline]
    pub fn vah(&self) -> f64 {
        self.value_area.vah
    }

    /// Value Area Low.
    #[inline]
    pub fn val(&self) -> f64 {
        self.value_area.val
    }

    /// Width of the value area.
    #[inline]
    pub fn value_area_width(&self) -> f64 {
        self.value_area.vah - self.value_area.val
    }

    /// Classify a price relative to the value area.
    pub fn position_of(&self, price: f64) -> ProfilePosition {
        let va = &self.value_area;
        if price > va.vah {
            ProfilePosition::AboveValueArea
        } else if price < va.val {
            ProfilePosition::BelowValueArea
        } else if price > va.poc {
            ProfilePosition::UpperValueArea
        } else if price < va.poc {
            ProfilePosition::LowerValueArea
        } else {
            ProfilePosition::AtPoc
        }
    }
}

/// Where a price sits relative to a profile's value area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfilePosition {
    /// Above VAH.
    AboveValueArea,
    /// Between POC and VAH.
    UpperValueArea,
    /// Exactly at the POC.
    AtPoc,
    /// Between VAL and POC.
    LowerValueArea,
    /// Below VAL.
    BelowValueArea,
}

/// One price bin with buy and sell volume tracked separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitBin {
    /// Lower price edge of the bin.
    pub floor: f64,
    /// Volume from up-close bars.
    pub buy_volume: Size,
    /// Volume from down-close bars.
    pub sell_volume: Size,
}

impl SplitBin {
    /// Total volume in the bin.
    #[inline]
    pub fn total(&self) -> Size {
        self.buy_volume + self.sell_volume
    }

    /// Net order flow (buy minus sell).
    #[inline]
    pub fn net(&self) -> f64 {
        self.buy_volume - self.sell_volume
    }

    /// Classify the bin's pressure.
    ///
    /// The dominant side must hold at least `threshold` of the bin's
    /// total volume to be flagged; empty bins are balanced.
    pub fn pressure(&self, threshold: f64) -> BinPressure {
        let total = self.total();
        if total <= 0.0 {
            return BinPressure::Balanced;
        }
        if self.buy_volume / total >= threshold {
            BinPressure::Buy
        } else if self.sell_volume / total >= threshold {
            BinPressure::Sell
        } else {
            BinPressure::Balanced
        }
    }
}

/// Dominant pressure in a split bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinPressure {
    /// Buy volume dominates beyond the threshold.
    Buy,
    /// Sell volume dominates beyond the threshold.
    Sell,
    /// Neither side dominates.
    Balanced,
}

/// Kind of a support/resistance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelKind {
    /// Swing-low cluster below price.
    Support,
    /// Swing-high cluster above price.
    Resistance,
}

/// A detected support or resistance level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    /// Level price.
    pub price: f64,
    /// Support or resistance.
    pub kind: LevelKind,
    /// Number of swing points merged into this level.
    pub touches: u32,
}
