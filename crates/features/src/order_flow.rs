//! Buy/sell split profile with per-bin imbalance flagging.
//!
//! Splits each bar's volume by close direction (up-close bars count as buy
//! pressure, down-close bars as sell pressure, dojis as neither) and bins
//! both sides over the same price geometry as the plain histogram.

use crate::histogram::PriceHistogram;
use profile_core::{Bar, BinPressure, Result, Size, SplitBin};
use serde::Serialize;

/// Buy/sell volume profile for one bar window.
#[derive(Debug, Clone, Serialize)]
pub struct OrderFlowProfile {
    /// Split bins ordered by price ascending.
    bins: Vec<SplitBin>,
    /// Width of each bin.
    bin_width: f64,
    /// Lowest low of the window.
    min_price: f64,
    /// Highest high of the window.
    max_price: f64,
    /// Dominant-side share required to flag a bin.
    imbalance_threshold: f64,
}

impl OrderFlowProfile {
    /// Build a split profile from a bar window.
    pub fn build(
        bars: &[Bar],
        resolution: u32,
        min_bin_size: f64,
        imbalance_threshold: f64,
    ) -> Result<Self> {
        // Validate the window as supplied; the side-filtered copies below
        // zero out volumes, which would mask a malformed doji bar.
        for bar in bars {
            bar.validate()?;
        }

        // Both sides share the window's geometry: zeroing the volume of the
        // opposite side leaves every bar's high/low in place, so the two
        // histograms bin over identical edges.
        let buy_bars: Vec<Bar> = bars
            .iter()
            .map(|b| Bar {
                volume: if b.is_up_close() { b.volume } else { 0.0 },
                ..b.clone()
            })
            .collect();
        let sell_bars: Vec<Bar> = bars
            .iter()
            .map(|b| Bar {
                volume: if b.is_down_close() { b.volume } else { 0.0 },
                ..b.clone()
            })
            .collect();

        let buy = PriceHistogram::build(&buy_bars, resolution, min_bin_size)?;
        let sell = PriceHistogram::build(&sell_bars, resolution, min_bin_size)?;

        let bin_width = buy.bin_width();
        let min_price = buy.min_price();
        let max_price = buy.max_price();

        let bins = buy
            .into_bins()
            .into_iter()
            .zip(sell.into_bins())
            .map(|(b, s)| SplitBin {
                floor: b.floor,
                buy_volume: b.volume,
                sell_volume: s.volume,
            })
            .collect();

        Ok(Self {
            bins,
            bin_width,
            min_price,
            max_price,
            imbalance_threshold,
        })
    }

    /// Split bins ordered by price ascending.
    pub fn bins(&self) -> &[SplitBin] {
        &self.bins
    }

    /// Width of each bin.
    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    /// Lowest low of the window.
    pub fn min_price(&self) -> f64 {
        self.min_price
    }

    /// Highest high of the window.
    pub fn max_price(&self) -> f64 {
        self.max_price
    }

    /// Total buy volume across all bins.
    pub fn buy_volume(&self) -> Size {
        self.bins.iter().map(|b| b.buy_volume).sum()
    }

    /// Total sell volume across all bins.
    pub fn sell_volume(&self) -> Size {
        self.bins.iter().map(|b| b.sell_volume).sum()
    }

    /// Net order flow for the whole window (buy minus sell).
    pub fn net_order_flow(&self) -> f64 {
        self.buy_volume() - self.sell_volume()
    }

    /// Per-bin pressure classification at the configured threshold.
    pub fn pressures(&self) -> Vec<BinPressure> {
        self.bins
            .iter()
            .map(|b| b.pressure(self.imbalance_threshold))
            .collect()
    }

    /// Indices of bins flagged as imbalanced, with their pressure.
    pub fn imbalanced_bins(&self) -> Vec<(usize, BinPressure)> {
        self.bins
            .iter()
            .enumerate()
            .filter_map(|(i, b)| match b.pressure(self.imbalance_threshold) {
                BinPressure::Balanced => None,
                pressure => Some((i, pressure)),
            })
            .collect()
    }
}
