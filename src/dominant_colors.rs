use crate::{AnalyzerConfig, DominantColorEntry, DominantColorSet};
use image::RgbImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

// ── Dominant color extraction ────────────────────────────────────────────────

/// Cluster an image's pixels into a ranked palette of dominant colors.
///
/// Every pixel is assigned to exactly one cluster, so entry counts sum to
/// the image's pixel count. When the image has no more distinct colors than
/// [`AnalyzerConfig::palette_size`], each distinct color becomes its own
/// exact entry and no clustering runs at all. Otherwise k-means refines
/// seeded centroids for at most
/// [`AnalyzerConfig::max_cluster_iterations`] passes.
///
/// Initialization draws from a [`StdRng`] seeded with
/// [`AnalyzerConfig::clustering_seed`], and ranking ties are broken by RGB
/// value, so repeated extraction from the same image yields an identical
/// palette.
///
/// ```
/// use docanalyzer::{extract_dominant_colors, AnalyzerConfig};
/// use image::{Rgb, RgbImage};
///
/// let red = RgbImage::from_pixel(3, 3, Rgb([255, 0, 0]));
/// let set = extract_dominant_colors(&red, 0, &AnalyzerConfig::default());
/// assert_eq!(set.colors.len(), 1);
/// assert_eq!(set.colors[0].rgb, [255, 0, 0]);
/// assert_eq!(set.colors[0].count, 9);
/// ```
pub fn extract_dominant_colors(
    image: &RgbImage,
    image_index: usize,
    config: &AnalyzerConfig,
) -> DominantColorSet {
    let pixels: Vec<[u8; 3]> = image.pixels().map(|p| p.0).collect();

    let mut histogram: HashMap<[u8; 3], u64> = HashMap::new();
    for px in &pixels {
        *histogram.entry(*px).or_insert(0) += 1;
    }

    let mut colors = if histogram.len() <= config.palette_size {
        histogram
            .into_iter()
            .map(|(rgb, count)| DominantColorEntry { rgb, count })
            .collect()
    } else {
        kmeans(&pixels, config)
    };

    // Largest cluster first; RGB tie-break keeps the order reproducible.
    colors.sort_by(|a, b| b.count.cmp(&a.count).then(a.rgb.cmp(&b.rgb)));

    DominantColorSet {
        image_index,
        colors,
    }
}

/// Lloyd's algorithm over raw RGB space with seeded initialization.
fn kmeans(pixels: &[[u8; 3]], config: &AnalyzerConfig) -> Vec<DominantColorEntry> {
    let k = config.palette_size;
    let mut centroids = initial_centroids(pixels, k, config.clustering_seed);
    let mut assignments = vec![0usize; pixels.len()];

    for _ in 0..config.max_cluster_iterations {
        let mut changed = false;

        for (i, px) in pixels.iter().enumerate() {
            let nearest = nearest_centroid(px, &centroids);
            if assignments[i] != nearest {
                assignments[i] = nearest;
                changed = true;
            }
        }

        let mut sums = vec![[0u64; 3]; k];
        let mut counts = vec![0u64; k];
        for (i, px) in pixels.iter().enumerate() {
            let c = assignments[i];
            counts[c] += 1;
            for ch in 0..3 {
                sums[c][ch] += u64::from(px[ch]);
            }
        }

        for c in 0..k {
            if counts[c] > 0 {
                for ch in 0..3 {
                    centroids[c][ch] = sums[c][ch] as f64 / counts[c] as f64;
                }
            }
        }

        if !changed {
            break;
        }
    }

    let mut counts = vec![0u64; k];
    for &a in &assignments {
        counts[a] += 1;
    }

    centroids
        .iter()
        .zip(&counts)
        .filter(|(_, &count)| count > 0)
        .map(|(centroid, &count)| DominantColorEntry {
            rgb: [
                centroid[0].round() as u8,
                centroid[1].round() as u8,
                centroid[2].round() as u8,
            ],
            count,
        })
        .collect()
}

/// Pick `k` distinct pixel colors as starting centroids.
///
/// Callers guarantee the image has more than `k` distinct colors, so the
/// sampling loop always terminates.
fn initial_centroids(pixels: &[[u8; 3]], k: usize, seed: u64) -> Vec<[f64; 3]> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut chosen: Vec<[u8; 3]> = Vec::with_capacity(k);

    while chosen.len() < k {
        let px = pixels[rng.random_range(0..pixels.len())];
        if !chosen.contains(&px) {
            chosen.push(px);
        }
    }

    chosen
        .into_iter()
        .map(|[r, g, b]| [f64::from(r), f64::from(g), f64::from(b)])
        .collect()
}

/// Index of the closest centroid by squared distance; ties go to the lower
/// index so assignment is order-independent of float noise.
fn nearest_centroid(px: &[u8; 3], centroids: &[[f64; 3]]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;

    for (i, c) in centroids.iter().enumerate() {
        let dist = (0..3)
            .map(|ch| {
                let d = f64::from(px[ch]) - c[ch];
                d * d
            })
            .sum::<f64>();
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }

    best
}
