//! Ink key zone aggregation
//!
//! The plate is split into `num_keys` equal vertical strips. Every canvas
//! pixel is converted to CMYK and summed into the strip its column falls
//! in; the zone value is the rounded mean. Large canvases are scanned in
//! parallel by rows and the partial sums merged.

use crate::color::rgb_to_cmyk;
use crate::constants::PARALLEL_THRESHOLD;
use crate::plate::PlateCanvas;
use crate::types::*;
use rayon::prelude::*;

/// Running per-zone CMYK sums and pixel counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneAccumulator {
    sums: Vec<[u64; 4]>,
    counts: Vec<u64>,
}

impl ZoneAccumulator {
    pub fn new(num_keys: usize) -> Self {
        Self {
            sums: vec![[0; 4]; num_keys],
            counts: vec![0; num_keys],
        }
    }

    pub fn num_keys(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn add(&mut self, zone: usize, ink: Cmyk) {
        let sum = &mut self.sums[zone];
        sum[0] += u64::from(ink.c);
        sum[1] += u64::from(ink.m);
        sum[2] += u64::from(ink.y);
        sum[3] += u64::from(ink.k);
        self.counts[zone] += 1;
    }

    /// Combine two partial accumulators over disjoint pixel sets
    pub fn merge(mut self, other: Self) -> Self {
        debug_assert_eq!(self.num_keys(), other.num_keys());
        for (sum, other_sum) in self.sums.iter_mut().zip(&other.sums) {
            for (a, b) in sum.iter_mut().zip(other_sum) {
                *a += b;
            }
        }
        for (count, other_count) in self.counts.iter_mut().zip(&other.counts) {
            *count += other_count;
        }
        self
    }

    /// Number of pixels that fell in each zone
    pub fn pixel_counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn total_pixels(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Rounded mean coverage per zone. Zones without pixels report 0.
    pub fn averages(&self) -> InkLevels {
        let mut levels = InkLevels::with_capacity(self.num_keys());
        for (sum, &count) in self.sums.iter().zip(&self.counts) {
            if count == 0 {
                levels.push(Cmyk::WHITE);
                continue;
            }
            let mean = |total: u64| (total as f64 / count as f64).round() as u8;
            levels.push(Cmyk::new(mean(sum[0]), mean(sum[1]), mean(sum[2]), mean(sum[3])));
        }
        levels
    }
}

/// Zone index for every column of a `width`-pixel plate.
///
/// Column `x` belongs to zone `floor(x / (width / num_keys))`, clamped to
/// the last zone. Evaluated in integers as `x * num_keys / width`.
pub fn zone_columns(width: u32, num_keys: usize) -> Vec<usize> {
    let last = num_keys.saturating_sub(1);
    (0..u64::from(width))
        .map(|x| ((x * num_keys as u64 / u64::from(width)) as usize).min(last))
        .collect()
}

/// Scan every pixel of the plate and accumulate CMYK per zone
pub fn aggregate_zones(
    plate: &PlateCanvas,
    num_keys: usize,
    black_generation: f32,
) -> Result<ZoneAccumulator> {
    if num_keys < 1 {
        return Err(InkError::Config(
            "Number of ink keys must be at least 1".to_string(),
        ));
    }

    let columns = zone_columns(plate.width(), num_keys);
    let row_len = plate.width() as usize * 4;
    let raw = plate.image().as_raw();

    let scan_row = |mut acc: ZoneAccumulator, row: &[u8]| {
        for (pixel, &zone) in row.chunks_exact(4).zip(&columns) {
            acc.add(zone, rgb_to_cmyk(pixel[0], pixel[1], pixel[2], black_generation));
        }
        acc
    };

    let totals = if plate.pixel_count() >= PARALLEL_THRESHOLD as u64 {
        raw.par_chunks_exact(row_len)
            .fold(|| ZoneAccumulator::new(num_keys), scan_row)
            .reduce(|| ZoneAccumulator::new(num_keys), ZoneAccumulator::merge)
    } else {
        raw.chunks_exact(row_len)
            .fold(ZoneAccumulator::new(num_keys), scan_row)
    };

    log::debug!(
        "Aggregated {} pixels into {} zones",
        totals.total_pixels(),
        num_keys
    );

    Ok(totals)
}
