//! Value Area computation (POC, VAH, VAL).
//!
//! Finds the Point of Control and expands outward from it until the value
//! area holds the target fraction of total volume.

use crate::histogram::PriceHistogram;
use profile_core::{Bin, ValueArea};

/// Value Area computer.
#[derive(Debug, Clone)]
pub struct ValueAreaComputer {
    /// Target VA coverage (e.g., 0.70 for 70%).
    va_fraction: f64,
}

impl ValueAreaComputer {
    /// Create a new Value Area computer.
    pub fn new(va_fraction: f64) -> Self {
        Self { va_fraction }
    }

    /// Index of the bin with the strictly greatest volume.
    ///
    /// Ties resolve to the first (lowest-price) bin so results are
    /// reproducible run to run.
    pub fn poc_index(bins: &[Bin]) -> usize {
        let mut max_volume = f64::NEG_INFINITY;
        let mut poc = 0;
        for (i, bin) in bins.iter().enumerate() {
            if bin.volume > max_volume {
                max_volume = bin.volume;
                poc = i;
            }
        }
        poc
    }

    /// Compute the Value Area for a histogram.
    ///
    /// Expansion takes the larger of the two candidate neighbor bins at each
    /// step, preferring the upper bin on exact volume ties. A side that runs
    /// out of bins forces expansion through the other.
    pub fn compute(&self, histogram: &PriceHistogram) -> ValueArea {
        let bins = histogram.bins();
        let bin_width = histogram.bin_width();
        let total_volume = histogram.total_volume();

        let poc_index = Self::poc_index(bins);
        let target_volume = total_volume * self.va_fraction;

        let mut accumulated = bins[poc_index].volume;
        let mut lower_index = poc_index;
        let mut upper_index = poc_index;
        let mut bin_count = 1u32;

        while accumulated < target_volume {
            let lower = lower_index.checked_sub(1).map(|i| bins[i].volume);
            let upper = if upper_index + 1 < bins.len() {
                Some(bins[upper_index + 1].volume)
            } else {
                None
            };

            let expand_up = match (lower, upper) {
                (Some(l), Some(u)) => u >= l,
                (None, Some(_)) => true,
                (Some(_), None) => false,
                (None, None) => break,
            };

            if expand_up {
                upper_index += 1;
                accumulated += bins[upper_index].volume;
            } else {
                lower_index -= 1;
                accumulated += bins[lower_index].volume;
            }
            bin_count += 1;
        }

        let coverage = if total_volume > 0.0 {
            accumulated / total_volume
        } else {
            0.0
        };

        ValueArea {
            poc: bins[poc_index].floor + bin_width / 2.0,
            vah: bins[upper_index].floor + bin_width,
            val: bins[lower_index].floor,
            coverage,
            bin_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use profile_core::Bar;

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

    /// One flat bar per bin gives full control over per-bin volumes.
    fn histogram_from_bins(volumes: &[f64]) -> PriceHistogram {
        let mut bars: Vec<Bar> = volumes
            .iter()
            .enumerate()
            .map(|(i, &v)| bar(100.0 + i as f64 + 0.5, 100.0 + i as f64 + 0.5, v))
            .collect();
        // Pin the window range to [100, 100 + n] with zero-volume extremes.
        bars.push(bar(100.0 + volumes.len() as f64, 100.0, 0.0));
        PriceHistogram::build(&bars, volumes.len() as u32, 0.01).unwrap()
    }

    #[test]
    fn test_poc_tie_breaks_to_lowest_price() {
        let hist = histogram_from_bins(&[50.0, 200.0, 200.0, 50.0]);
        assert_eq!(ValueAreaComputer::poc_index(hist.bins()), 1);
    }

    #[test]
    fn test_symmetric_profile() {
        let hist = histogram_from_bins(&[50.0, 100.0, 200.0, 100.0, 50.0]);
        let va = ValueAreaComputer::new(0.70).compute(&hist);

        // POC bin is [102, 103): midpoint 102.5.
        assert_relative_eq!(va.poc, 102.5);
        // 200 + 100 (up, tie prefers upper) + 100 (down) = 400 >= 350.
        assert_relative_eq!(va.val, 101.0);
        assert_relative_eq!(va.vah, 104.0);
        assert_eq!(va.bin_count, 3);
        assert_relative_eq!(va.coverage, 0.8);
    }

    #[test]
    fn test_expansion_tie_prefers_upper() {
        // Both neighbors of the POC hold equal volume; the upper one must be
        // taken first, so a target just above the POC share stops at it.
        let hist = histogram_from_bins(&[80.0, 200.0, 80.0]);
        let va = ValueAreaComputer::new(0.60).compute(&hist);

        // 200 < 216 target; one expansion (upward) reaches 280.
        assert_relative_eq!(va.val, 101.0);
        assert_relative_eq!(va.vah, 103.0);
        assert_eq!(va.bin_count, 2);
    }

    #[test]
    fn test_poc_at_lower_edge_expands_up_only() {
        let hist = histogram_from_bins(&[200.0, 50.0, 50.0, 50.0]);
        let va = ValueAreaComputer::new(0.70).compute(&hist);

        assert_relative_eq!(va.val, 100.0);
        assert!(va.vah > 101.0);
    }

    #[test]
    fn test_poc_at_upper_edge_expands_down_only() {
        let hist = histogram_from_bins(&[50.0, 50.0, 50.0, 200.0]);
        let va = ValueAreaComputer::new(0.70).compute(&hist);

        assert_relative_eq!(va.vah, 104.0);
        assert!(va.val < 103.0);
    }

    #[test]
    fn test_ordering_invariant() {
        let hist = histogram_from_bins(&[10.0, 30.0, 90.0, 20.0, 70.0, 5.0]);
        let va = ValueAreaComputer::new(0.70).compute(&hist);

        let poc_floor = va.poc - hist.bin_width() / 2.0;
        assert!(va.val <= poc_floor);
        assert!(poc_floor <= va.vah);
        assert!(va.poc >= hist.min_price() && va.poc <= hist.max_price());
    }

    #[test]
    fn test_width_monotone_in_fraction() {
        let hist = histogram_from_bins(&[10.0, 30.0, 90.0, 20.0, 70.0, 5.0, 40.0]);

        let mut prev_width = 0.0;
        for fraction in [0.30, 0.50, 0.70, 0.90, 0.99] {
            let va = ValueAreaComputer::new(fraction).compute(&hist);
            let width = va.vah - va.val;
            assert!(width >= prev_width);
            prev_width = width;
        }
    }

    #[test]
    fn test_full_fraction_covers_everything() {
        let hist = histogram_from_bins(&[10.0, 20.0, 30.0, 40.0]);
        let va = ValueAreaComputer::new(0.999).compute(&hist);

        assert_eq!(va.bin_count, 4);
        assert_relative_eq!(va.coverage, 1.0, max_relative = 1e-9);
    }

    #[test]
    fn test_zero_volume_histogram() {
        let hist = PriceHistogram::build(&[bar(10.0, 8.0, 0.0)], 4, 0.01).unwrap();
        let va = ValueAreaComputer::new(0.70).compute(&hist);

        // Degenerate but well-defined: collapses to the first bin.
        assert_relative_eq!(va.coverage, 0.0);
        assert_relative_eq!(va.val, 8.0);
    }

    #[test]
    fn test_single_bar_single_bin() {
        let hist = PriceHistogram::build(&[bar(11.0, 9.0, 100.0)], 1, 0.01).unwrap();
        let va = ValueAreaComputer::new(0.70).compute(&hist);

        assert_relative_eq!(va.poc, 10.0);
        assert_relative_eq!(va.vah, 11.0);
        assert_relative_eq!(va.val, 9.0);
    }
}
