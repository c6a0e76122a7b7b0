//! Frequency-histogram reducer ("simple" mode).
//!
//! Samples evenly spaced pixels, drops translucent ones, groups the rest
//! into coarse per-channel buckets and returns the full-precision average
//! of the most frequent bucket.

use std::collections::HashMap;

use super::buffer::{PixelBuffer, Region};
use super::{Reduce, ReducerOptions};
use crate::color::Srgb;

/// Frequency-histogram reducer.
///
/// # Algorithm
///
/// 1. `n = min(sample_limit, total)` pixels are visited at indices
///    `floor(k * total / n)` for `k` in `0..n`, so the samples spread over the
///    whole region even when `total / n` is not an integer
/// 2. Pixels with alpha below `simple_alpha_threshold` are skipped
/// 3. Each channel is bucketed as `floor(c / bucket_size) * bucket_size`
/// 4. The bucket with the highest count wins; on a tie the bucket seen
///    first wins
/// 5. The winner's unquantized channel sums are averaged and rounded
pub struct FrequencyHistogram;

#[derive(Debug, Default)]
struct Bucket {
    count: u64,
    sums: [u64; 3],
}

impl Reduce for FrequencyHistogram {
    fn reduce(
        &self,
        buffer: &PixelBuffer<'_>,
        region: Region,
        options: &ReducerOptions,
    ) -> Option<Srgb> {
        let total = region.pixel_count();
        let samples = options.sample_limit.min(total).max(1);
        let size = options.bucket_size.max(1);

        // Buckets in first-seen order; the map only locates them.
        let mut buckets: Vec<Bucket> = Vec::new();
        let mut index: HashMap<[u8; 3], usize> = HashMap::new();

        for k in 0..samples.min(total) {
            let [r, g, b, a] = region.nth(buffer, k * total / samples);
            if a < options.simple_alpha_threshold {
                continue;
            }
            let key = [r / size * size, g / size * size, b / size * size];
            let slot = *index.entry(key).or_insert_with(|| {
                buckets.push(Bucket::default());
                buckets.len() - 1
            });
            let bucket = &mut buckets[slot];
            bucket.count += 1;
            bucket.sums[0] += r as u64;
            bucket.sums[1] += g as u64;
            bucket.sums[2] += b as u64;
        }

        let mut best: Option<&Bucket> = None;
        for bucket in &buckets {
            if best.map_or(true, |b| bucket.count > b.count) {
                best = Some(bucket);
            }
        }

        best.map(|bucket| {
            let n = bucket.count as f64;
            let avg = |sum: u64| (sum as f64 / n).round() as u8;
            Srgb::new(avg(bucket.sums[0]), avg(bucket.sums[1]), avg(bucket.sums[2]))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reduce(data: &[u8], width: usize, height: usize, options: &ReducerOptions) -> Option<Srgb> {
        let buffer = PixelBuffer::new(data, width, height).unwrap();
        let region = buffer
            .clip(0.0, 0.0, width as f64, height as f64)
            .unwrap();
        FrequencyHistogram.reduce(&buffer, region, options)
    }

    fn solid(color: [u8; 4], n: usize) -> Vec<u8> {
        color.repeat(n)
    }

    #[test]
    fn test_solid_color_is_returned_exactly() {
        let data = solid([201, 37, 99, 255], 20 * 10);
        assert_eq!(
            reduce(&data, 20, 10, &ReducerOptions::new()),
            Some(Srgb::new(201, 37, 99))
        );
    }

    #[test]
    fn test_transparent_region_yields_nothing() {
        let data = solid([255, 0, 0, 0], 16);
        assert_eq!(reduce(&data, 4, 4, &ReducerOptions::new()), None);
    }

    #[test]
    fn test_alpha_threshold_is_inclusive() {
        // 127 is dropped, 128 is kept.
        let mut data = solid([0, 0, 255, 127], 3);
        data.extend_from_slice(&[10, 200, 10, 128]);
        assert_eq!(
            reduce(&data, 4, 1, &ReducerOptions::new()),
            Some(Srgb::new(10, 200, 10))
        );
    }

    #[test]
    fn test_bucket_average_uses_original_precision() {
        // 200..=203 all land in bucket 200; the average is 201.5 -> 202.
        let data: Vec<u8> = (200..=203u8).flat_map(|v| [v, 0, 0, 255]).collect();
        assert_eq!(
            reduce(&data, 4, 1, &ReducerOptions::new()),
            Some(Srgb::new(202, 0, 0))
        );
    }

    #[test]
    fn test_most_frequent_bucket_wins() {
        let mut data = solid([250, 250, 250, 255], 2);
        data.extend(solid([20, 30, 40, 255], 3));
        assert_eq!(
            reduce(&data, 5, 1, &ReducerOptions::new()),
            Some(Srgb::new(20, 30, 40))
        );
    }

    #[test]
    fn test_tie_goes_to_first_seen_bucket() {
        let mut data = solid([90, 0, 0, 255], 2);
        data.extend(solid([0, 90, 0, 255], 2));
        assert_eq!(
            reduce(&data, 4, 1, &ReducerOptions::new()),
            Some(Srgb::new(90, 0, 0))
        );
    }

    #[test]
    fn test_sampling_step() {
        // 10 pixels with a limit of 5 -> step 2: only even indices are read.
        let data: Vec<u8> = (0..10)
            .flat_map(|i| if i % 2 == 0 { [0, 0, 0, 255] } else { [255, 255, 255, 255] })
            .collect();
        let options = ReducerOptions::new().sample_limit(5);
        assert_eq!(reduce(&data, 10, 1, &options), Some(Srgb::new(0, 0, 0)));
    }

    #[test]
    fn test_samples_cover_whole_region() {
        // 1950 pixels, 1000 samples: rows past the first 1000 pixels are read
        // too. 14 black rows on top of 25 white rows is mostly white.
        let (width, height) = (50, 39);
        let mut data = solid([0, 0, 0, 255], width * 14);
        data.extend(solid([255, 255, 255, 255], width * 25));
        assert_eq!(
            reduce(&data, width, height, &ReducerOptions::new()),
            Some(Srgb::new(255, 255, 255))
        );
    }

    #[test]
    fn test_fractional_stride_reaches_last_rows() {
        // 15 pixels, 10 samples: indices 0, 1, 3, 4, 6, 7, 9, 10, 12, 13.
        // Six black pixels give four black samples against six white ones.
        let mut data = solid([0, 0, 0, 255], 6);
        data.extend(solid([255, 255, 255, 255], 9));
        let options = ReducerOptions::new().sample_limit(10);
        assert_eq!(
            reduce(&data, 15, 1, &options),
            Some(Srgb::new(255, 255, 255))
        );
    }

    #[test]
    fn test_zero_bucket_size_behaves_like_one() {
        let mut data = solid([100, 100, 100, 255], 1);
        data.extend(solid([101, 100, 100, 255], 2));
        let options = ReducerOptions::new().bucket_size(0);
        assert_eq!(reduce(&data, 3, 1, &options), Some(Srgb::new(101, 100, 100)));
    }
}
