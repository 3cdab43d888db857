//! Price-volume histogram construction.
//!
//! Bins a window of OHLCV bars into `R` equal-width price bins spanning the
//! window's low/high range, distributing each bar's volume across the bins it
//! overlaps in proportion to the overlap length.

use profile_core::{Bar, Bin, Error, Result, Size};

/// Fixed-resolution price-volume histogram for one bar window.
#[derive(Debug, Clone)]
pub struct PriceHistogram {
    /// Bins ordered by price ascending.
    bins: Vec<Bin>,
    /// Width of each bin.
    bin_width: f64,
    /// Lowest low of the window.
    min_price: f64,
    /// Highest high of the window.
    max_price: f64,
    /// Total volume across all bins.
    total_volume: Size,
}

impl PriceHistogram {
    /// Build a histogram from a bar window.
    ///
    /// A window whose highs and lows are all equal has zero price range; the
    /// range is then substituted with `min_bin_size` per bin so every bin has
    /// positive width and all volume lands in the bin containing the single
    /// traded price.
    pub fn build(bars: &[Bar], resolution: u32, min_bin_size: f64) -> Result<Self> {
        if bars.is_empty() {
            return Err(Error::insufficient_data(
                "cannot build a histogram from an empty bar window",
            ));
        }
        if resolution < 1 {
            return Err(Error::config("histogram resolution must be at least 1"));
        }
        if !(min_bin_size > 0.0) {
            return Err(Error::config(format!(
                "min_bin_size must be positive, got {min_bin_size}"
            )));
        }
        for bar in bars {
            bar.validate()?;
        }

        let mut min_price = f64::INFINITY;
        let mut max_price = f64::NEG_INFINITY;
        for bar in bars {
            min_price = min_price.min(bar.low);
            max_price = max_price.max(bar.high);
        }

        let mut price_range = max_price - min_price;
        if price_range == 0.0 {
            price_range = min_bin_size * resolution as f64;
        }
        let bin_width = price_range / resolution as f64;

        let mut bins: Vec<Bin> = (0..resolution)
            .map(|i| Bin {
                floor: min_price + i as f64 * bin_width,
                volume: 0.0,
            })
            .collect();

        for bar in bars {
            distribute(bar, &mut bins, min_price, bin_width);
        }

        let total_volume = bins.iter().map(|b| b.volume).sum();

        Ok(Self {
            bins,
            bin_width,
            min_price,
            max_price,
            total_volume,
        })
    }

    /// Bins ordered by price ascending.
    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// Consume the histogram, yielding its bins.
    pub fn into_bins(self) -> Vec<Bin> {
        self.bins
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

    /// Total volume across all bins.
    pub fn total_volume(&self) -> Size {
        self.total_volume
    }

    /// Number of bins.
    pub fn resolution(&self) -> usize {
        self.bins.len()
    }
}

/// Distribute one bar's volume across the bins it overlaps.
fn distribute(bar: &Bar, bins: &mut [Bin], min_price: f64, bin_width: f64) {
    if bar.volume == 0.0 {
        return;
    }

    // A flat bar traded at a single price; the whole volume belongs to the
    // bin containing it. A price equal to the window high maps past the last
    // bin edge and is clamped into the top bin.
    if bar.is_flat() {
        let idx = bin_index(bar.high, min_price, bin_width, bins.len());
        bins[idx].volume += bar.volume;
        return;
    }

    let bar_range = bar.range();
    let first = bin_index(bar.low, min_price, bin_width, bins.len());
    let last = bin_index(bar.high, min_price, bin_width, bins.len());

    for (i, bin) in bins.iter_mut().enumerate().take(last + 1).skip(first) {
        let bin_bottom = min_price + i as f64 * bin_width;
        let bin_top = bin_bottom + bin_width;
        let overlap = (bar.high.min(bin_top) - bar.low.max(bin_bottom)).max(0.0);
        if overlap > 0.0 {
            bin.volume += bar.volume * (overlap / bar_range);
        }
    }
}

/// Index of the bin containing `price`, clamped into the bin array.
fn bin_index(price: f64, min_price: f64, bin_width: f64, resolution: usize) -> usize {
    let idx = ((price - min_price) / bin_width).floor() as isize;
    idx.clamp(0, resolution as isize - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bar(high: f64, low: f64, volume: f64) -> Bar {
        Bar {
            ts_min: 0,
            open: low,
            high,
            low,
            close: high,
            volume,
        }
    }

    #[test]
    fn test_empty_window_rejected() {
        let err = PriceHistogram::build(&[], 10, 0.01).unwrap_err();
        assert!(matches!(err, Error::InsufficientData(_)));
    }

    #[test]
    fn test_invalid_bar_rejected() {
        let mut b = bar(10.0, 8.0, 100.0);
        b.low = 11.0;
        assert!(PriceHistogram::build(&[b], 10, 0.01).is_err());
    }

    #[test]
    fn test_single_bar_single_bin() {
        let hist = PriceHistogram::build(&[bar(10.0, 8.0, 100.0)], 1, 0.01).unwrap();
        assert_eq!(hist.resolution(), 1);
        assert_relative_eq!(hist.bins()[0].volume, 100.0);
        assert_relative_eq!(hist.bin_width(), 2.0);
        assert_relative_eq!(hist.total_volume(), 100.0);
    }

    #[test]
    fn test_known_three_bar_distribution() {
        // Range [8, 12], four unit-width bins.
        let bars = [
            bar(10.0, 8.0, 100.0),
            bar(12.0, 9.0, 200.0),
            bar(11.0, 10.0, 50.0),
        ];
        let hist = PriceHistogram::build(&bars, 4, 0.01).unwrap();

        assert_relative_eq!(hist.bin_width(), 1.0);
        // Bar1 splits 50/50 over [8,9) and [9,10); Bar2 spreads a third into
        // each of [9,10), [10,11), [11,12); Bar3 splits 25/25 over the top two.
        assert_relative_eq!(hist.bins()[0].volume, 50.0, max_relative = 1e-12);
        assert_relative_eq!(
            hist.bins()[1].volume,
            50.0 + 200.0 / 3.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            hist.bins()[2].volume,
            200.0 / 3.0 + 25.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            hist.bins()[3].volume,
            200.0 / 3.0 + 25.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(hist.total_volume(), 350.0, max_relative = 1e-12);
    }

    #[test]
    fn test_volume_conserved_across_resolutions() {
        let bars = [
            bar(105.3, 101.7, 42.5),
            bar(104.1, 99.2, 17.0),
            bar(108.6, 103.4, 88.8),
            bar(103.0, 103.0, 12.0), // flat bar
        ];
        let expected: f64 = bars.iter().map(|b| b.volume).sum();

        for resolution in [1, 2, 7, 24, 50] {
            let hist = PriceHistogram::build(&bars, resolution, 0.01).unwrap();
            assert_relative_eq!(hist.total_volume(), expected, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_flat_bar_assigned_to_single_bin() {
        // Flat bar at the exact window high must land in the top bin.
        let bars = [bar(10.0, 8.0, 100.0), bar(10.0, 10.0, 30.0)];
        let hist = PriceHistogram::build(&bars, 4, 0.01).unwrap();
        assert_relative_eq!(hist.bins()[3].volume, 25.0 + 30.0);
    }

    #[test]
    fn test_flat_window_substitutes_min_bin_size() {
        let bars = [bar(100.0, 100.0, 10.0), bar(100.0, 100.0, 20.0)];
        let hist = PriceHistogram::build(&bars, 5, 0.01).unwrap();

        assert_relative_eq!(hist.bin_width(), 0.01);
        // Everything in the first bin, which contains the traded price.
        assert_relative_eq!(hist.bins()[0].volume, 30.0);
        assert!(hist.bins()[1..].iter().all(|b| b.volume == 0.0));
    }

    #[test]
    fn test_bar_contained_in_one_bin() {
        // A bar spanning exactly one bin puts all of its volume there.
        let bars = [bar(12.0, 8.0, 100.0), bar(9.0, 8.0, 40.0)];
        let hist = PriceHistogram::build(&bars, 4, 0.01).unwrap();
        // First bin: 25 (quarter of bar1) + 40 (all of bar2).
        assert_relative_eq!(hist.bins()[0].volume, 65.0, max_relative = 1e-12);
    }

    #[test]
    fn test_zero_volume_window() {
        let hist = PriceHistogram::build(&[bar(10.0, 8.0, 0.0)], 4, 0.01).unwrap();
        assert_relative_eq!(hist.total_volume(), 0.0);
    }
}
