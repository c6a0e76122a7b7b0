//! Median-cut reducer ("quantize" mode).

use super::buffer::{PixelBuffer, Region};
use super::{Reduce, ReducerOptions};
use crate::color::Srgb;

/// Median-cut quantization reducer.
///
/// Every pixel of the region with alpha at or above
/// `quantize_alpha_threshold` is collected. The set is split into at most
/// [`ReducerOptions::effective_clusters()`] boxes, each time cutting the
/// splittable box with the highest population times color volume at the
/// median of its widest channel.
///
/// The box means then seed a short k-means pass over the same pixels: each
/// pixel goes to its nearest centroid and every centroid moves to the mean of
/// its members. The centroid holding the most pixels is returned. A median
/// split can cut a dominant color in two; the reassignment gathers it back
/// into one cluster before clusters are ranked.
///
/// A region of a single color is never split and yields exactly that color.
pub struct MedianCut;

/// Upper bound on k-means rounds after the cut.
const MAX_REFINE_ROUNDS: usize = 16;

#[derive(Debug)]
struct ColorBox {
    pixels: Vec<[u8; 3]>,
}

impl ColorBox {
    /// Per-channel value range.
    fn ranges(&self) -> [u8; 3] {
        let mut lo = [u8::MAX; 3];
        let mut hi = [u8::MIN; 3];
        for px in &self.pixels {
            for c in 0..3 {
                lo[c] = lo[c].min(px[c]);
                hi[c] = hi[c].max(px[c]);
            }
        }
        [hi[0] - lo[0], hi[1] - lo[1], hi[2] - lo[2]]
    }

    fn widest_channel(&self) -> usize {
        let ranges = self.ranges();
        // First channel wins ties (R, then G, then B).
        let mut channel = 0;
        for c in 1..3 {
            if ranges[c] > ranges[channel] {
                channel = c;
            }
        }
        channel
    }

    /// Population times color volume. Tight clusters stay whole while a
    /// box straddling two colors is cut first.
    fn priority(&self) -> u64 {
        let volume: u64 = self.ranges().iter().map(|&r| r as u64 + 1).product();
        self.pixels.len() as u64 * volume
    }

    fn is_splittable(&self) -> bool {
        self.pixels.len() >= 2 && self.ranges() != [0, 0, 0]
    }

    fn split(mut self) -> (ColorBox, ColorBox) {
        let channel = self.widest_channel();
        self.pixels.sort_by_key(|px| px[channel]);
        let upper = self.pixels.split_off(self.pixels.len() / 2);
        (self, ColorBox { pixels: upper })
    }

    fn mean(&self) -> [f64; 3] {
        let n = self.pixels.len() as f64;
        let mut sums = [0u64; 3];
        for px in &self.pixels {
            for c in 0..3 {
                sums[c] += px[c] as u64;
            }
        }
        [
            sums[0] as f64 / n,
            sums[1] as f64 / n,
            sums[2] as f64 / n,
        ]
    }
}

fn distance_sq(centroid: &[f64; 3], px: &[u8; 3]) -> f64 {
    (0..3)
        .map(|c| {
            let d = centroid[c] - px[c] as f64;
            d * d
        })
        .sum()
}

/// Index of the nearest centroid; the lowest index wins ties.
fn find_nearest(centroids: &[[f64; 3]], px: &[u8; 3]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::MAX;
    for (i, centroid) in centroids.iter().enumerate() {
        let d = distance_sq(centroid, px);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

/// Moves each centroid to the mean of its nearest pixels until no
/// assignment changes. Returns the member count of every centroid.
fn refine(centroids: &mut [[f64; 3]], pixels: &[[u8; 3]]) -> Vec<usize> {
    let k = centroids.len();
    let mut assignment = vec![usize::MAX; pixels.len()];
    let mut counts = vec![0usize; k];

    for _ in 0..MAX_REFINE_ROUNDS {
        let mut changed = false;
        let mut sums = vec![[0u64; 3]; k];
        counts.iter_mut().for_each(|n| *n = 0);

        for (px, slot) in pixels.iter().zip(assignment.iter_mut()) {
            let nearest = find_nearest(centroids, px);
            if *slot != nearest {
                *slot = nearest;
                changed = true;
            }
            counts[nearest] += 1;
            for c in 0..3 {
                sums[nearest][c] += px[c] as u64;
            }
        }

        for i in 0..k {
            if counts[i] > 0 {
                let n = counts[i] as f64;
                centroids[i] = [
                    sums[i][0] as f64 / n,
                    sums[i][1] as f64 / n,
                    sums[i][2] as f64 / n,
                ];
            }
        }

        if !changed {
            break;
        }
    }
    counts
}

impl Reduce for MedianCut {
    fn reduce(
        &self,
        buffer: &PixelBuffer<'_>,
        region: Region,
        options: &ReducerOptions,
    ) -> Option<Srgb> {
        let pixels: Vec<[u8; 3]> = region
            .pixels(buffer)
            .filter(|px| px[3] >= options.quantize_alpha_threshold)
            .map(|[r, g, b, _]| [r, g, b])
            .collect();
        if pixels.is_empty() {
            return None;
        }

        let target = options.effective_clusters(pixels.len());
        let mut boxes = vec![ColorBox {
            pixels: pixels.clone(),
        }];

        while boxes.len() < target {
            let candidate = boxes
                .iter()
                .enumerate()
                .filter(|(_, b)| b.is_splittable())
                .max_by(|(i, a), (j, b)| a.priority().cmp(&b.priority()).then(j.cmp(i)))
                .map(|(i, _)| i);
            let Some(idx) = candidate else {
                break;
            };
            // Halves take the parent's place so creation order stays stable.
            let (lower, upper) = boxes.remove(idx).split();
            boxes.insert(idx, upper);
            boxes.insert(idx, lower);
        }

        let mut centroids: Vec<[f64; 3]> = boxes.iter().map(ColorBox::mean).collect();
        let counts = refine(&mut centroids, &pixels);

        let mut winner = 0;
        for (i, &n) in counts.iter().enumerate() {
            if n > counts[winner] {
                winner = i;
            }
        }
        let [r, g, b] = centroids[winner].map(|v| v.round().clamp(0.0, 255.0) as u8);
        Some(Srgb::new(r, g, b))
    }
}
