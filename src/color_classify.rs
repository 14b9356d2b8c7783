use crate::{AnalyzerConfig, ColorClassification};
use image::RgbImage;

// ── Color classification ─────────────────────────────────────────────────────

/// Classify a decoded image as color, grayscale, or black-and-white.
///
/// The decision runs in two stages:
///
/// 1. **Chroma test.** A pixel is chromatic when its channel spread
///    `max(R,G,B) − min(R,G,B)` exceeds
///    [`AnalyzerConfig::chroma_tolerance`]. If the chromatic fraction of all
///    pixels exceeds [`AnalyzerConfig::color_presence_fraction`], the image
///    is [`ColorClassification::Color`].
/// 2. **Bilevel test.** Among achromatic images, if every pixel's luma sits
///    at or below [`AnalyzerConfig::black_luma_max`] or at or above
///    [`AnalyzerConfig::white_luma_min`], the image is effectively bilevel
///    and classified [`ColorClassification::BlackAndWhite`]; otherwise it is
///    [`ColorClassification::Grayscale`].
///
/// Degenerate zero-pixel images never reach this function; the format
/// extractors drop them before decoding.
///
/// ```
/// use docanalyzer::{classify, AnalyzerConfig, ColorClassification};
/// use image::{Rgb, RgbImage};
///
/// let red = RgbImage::from_pixel(4, 4, Rgb([255, 0, 0]));
/// let cfg = AnalyzerConfig::default();
/// assert_eq!(classify(&red, &cfg), ColorClassification::Color);
/// ```
pub fn classify(image: &RgbImage, config: &AnalyzerConfig) -> ColorClassification {
    let total = (image.width() as u64 * image.height() as u64) as usize;
    debug_assert!(total > 0, "extractors must drop zero-pixel images");

    let chromatic = image
        .pixels()
        .filter(|p| channel_spread(p.0) > config.chroma_tolerance)
        .count();

    if chromatic as f64 / total as f64 > config.color_presence_fraction {
        return ColorClassification::Color;
    }

    let bilevel = image.pixels().all(|p| {
        let l = luma(p.0);
        l <= config.black_luma_max || l >= config.white_luma_min
    });

    if bilevel {
        ColorClassification::BlackAndWhite
    } else {
        ColorClassification::Grayscale
    }
}

/// Max inter-channel difference: 0 for a perfectly gray pixel.
fn channel_spread([r, g, b]: [u8; 3]) -> u8 {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    max - min
}

/// Integer Rec.601 luma approximation.
fn luma([r, g, b]: [u8; 3]) -> u8 {
    ((u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000) as u8
}
