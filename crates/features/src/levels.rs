//! Swing-based support/resistance level detection.
//!
//! Scans a bar window for swing lows and highs, merges nearby candidates
//! within a relative tolerance, and keeps the levels nearest the reference
//! price on each side.

use profile_core::{config::LevelConfig, Bar, Error, Level, LevelKind, Price, Result};

/// Support/resistance level detector.
#[derive(Debug, Clone)]
pub struct LevelDetector {
    config: LevelConfig,
}

impl LevelDetector {
    /// Create a new level detector.
    pub fn new(config: LevelConfig) -> Self {
        Self { config }
    }

    /// Detect support and resistance levels in a bar window.
    ///
    /// Returns levels sorted by price ascending: supports strictly below
    /// the last bar's close, resistances strictly above it, at most
    /// `max_levels` per side (nearest the close). A swing point exactly at
    /// the close belongs to neither side.
    pub fn detect(&self, bars: &[Bar]) -> Result<Vec<Level>> {
        let swing = self.config.swing_length as usize;
        if bars.len() < 2 * swing + 1 {
            return Err(Error::insufficient_data(format!(
                "need at least {} bars for swing detection, got {}",
                2 * swing + 1,
                bars.len()
            )));
        }
        for bar in bars {
            bar.validate()?;
        }

        let mut supports = Vec::new();
        let mut resistances = Vec::new();

        for i in swing..bars.len() - swing {
            let center_low = bars[i].low;
            let center_high = bars[i].high;

            let swing_low = (1..=swing)
                .all(|j| bars[i - j].low > center_low && bars[i + j].low > center_low);
            let swing_high = (1..=swing)
                .all(|j| bars[i - j].high < center_high && bars[i + j].high < center_high);

            if swing_low {
                supports.push(center_low);
            }
            if swing_high {
                resistances.push(center_high);
            }
        }

        let reference = bars[bars.len() - 1].close;
        let max_levels = self.config.max_levels as usize;

        let supports = merge_levels(supports, self.config.merge_epsilon);
        let resistances = merge_levels(resistances, self.config.merge_epsilon);

        // Nearest `max_levels` below the reference price on the support
        // side, nearest above on the resistance side.
        let mut levels: Vec<Level> = supports
            .into_iter()
            .filter(|(price, _)| *price < reference)
            .rev()
            .take(max_levels)
            .map(|(price, touches)| Level {
                price,
                kind: LevelKind::Support,
                touches,
            })
            .collect();
        levels.reverse();

        levels.extend(
            resistances
                .into_iter()
                .filter(|(price, _)| *price > reference)
                .take(max_levels)
                .map(|(price, touches)| Level {
                    price,
                    kind: LevelKind::Resistance,
                    touches,
                }),
        );

        Ok(levels)
    }
}

/// Stable-sort candidate prices and merge runs within `price * epsilon`.
///
/// Returns `(price, touches)` pairs sorted ascending; a merged run keeps the
/// first (lowest) price and counts the candidates folded into it.
fn merge_levels(mut prices: Vec<f64>, epsilon: f64) -> Vec<(f64, u32)> {
    prices.sort_by_key(|p| Price::from(*p));

    let mut merged: Vec<(f64, u32)> = Vec::with_capacity(prices.len());
    for price in prices {
        match merged.last_mut() {
            Some((kept, touches)) if (price - *kept).abs() <= kept.abs() * epsilon => {
                *touches += 1;
            }
            _ => merged.push((price, 1)),
        }
    }
    merged
}
