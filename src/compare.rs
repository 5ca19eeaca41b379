// Tolerant pixel comparison of two stamp buffers.
//
// Pure functions: nothing here owns state, so comparisons can run on any
// thread. A size mismatch is an answer (0 % similar), not an error.

use log::debug;
use serde::Serialize;

use crate::config::{CompareConfig, sanitize_tolerance};
use crate::raster::RasterBuffer;

/// sqrt(3 · 255²): the largest possible RGB distance.
const MAX_RGB_DISTANCE: f64 = 441.672_955_930_063_7;

/// Outcome of one `compare` call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    /// 0..=100
    pub similarity_percent: f64,
    pub is_match: bool,
    pub tolerance: f32,
    pub total_pixels: u64,
    /// Fractional: a pixel with ink on only one side counts 0.5.
    pub matching_pixels: f64,
}

/// Descriptive summary of a single buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferStats {
    pub width: u32,
    pub height: u32,
    pub total_pixels: u64,
    pub non_transparent_pixels: u64,
    /// Mean alpha over *all* pixels (transparent ones count as 0).
    pub average_alpha: f64,
}

/// Compare with the default per-pixel threshold scale.
pub fn compare(a: &RasterBuffer, b: &RasterBuffer, tolerance: f32) -> ComparisonResult {
    compare_with(a, b, &CompareConfig::with_tolerance(tolerance))
}

/// Compare two buffers.
///
/// Per pixel, by alpha:
/// - both transparent: full match
/// - both inked: match when normalized RGB distance and alpha distance are each
///   within `pixel_threshold_scale · tolerance`
/// - ink on one side only: half match
///
/// The buffers match overall when similarity ≥ `100 · (1 - tolerance)`.
pub fn compare_with(a: &RasterBuffer, b: &RasterBuffer, cfg: &CompareConfig) -> ComparisonResult {
    let tolerance = sanitize_tolerance(cfg.tolerance);

    if a.width() != b.width() || a.height() != b.height() {
        debug!(
            "compare: size mismatch {}x{} vs {}x{}",
            a.width(),
            a.height(),
            b.width(),
            b.height()
        );
        return ComparisonResult {
            similarity_percent: 0.0,
            is_match: false,
            tolerance,
            total_pixels: a.pixel_count().max(b.pixel_count()),
            matching_pixels: 0.0,
        };
    }

    let scale = if cfg.pixel_threshold_scale.is_finite() { cfg.pixel_threshold_scale.max(0.0) } else { 0.0 };
    let threshold = (scale * tolerance) as f64;
    let total_pixels = a.pixel_count();

    let matching_pixels: f64 = a.pixels().zip(b.pixels()).map(|(p, q)| pixel_score(p, q, threshold)).sum();

    // Two empty buffers have nothing that could differ.
    let similarity_percent = if total_pixels == 0 {
        100.0
    } else {
        100.0 * matching_pixels / total_pixels as f64
    };
    let is_match = similarity_percent >= 100.0 * (1.0 - tolerance as f64);

    debug!("compare: {similarity_percent:.2}% similar at tolerance {tolerance} → match={is_match}");
    ComparisonResult { similarity_percent, is_match, tolerance, total_pixels, matching_pixels }
}

/// 1.0, 0.5 or 0.0 for one pixel pair.
fn pixel_score(p: [u8; 4], q: [u8; 4], threshold: f64) -> f64 {
    match (p[3] > 0, q[3] > 0) {
        (false, false) => 1.0,
        (true, false) | (false, true) => 0.5,
        (true, true) => {
            let dr = p[0] as f64 - q[0] as f64;
            let dg = p[1] as f64 - q[1] as f64;
            let db = p[2] as f64 - q[2] as f64;
            let color_diff = (dr * dr + dg * dg + db * db).sqrt() / MAX_RGB_DISTANCE;
            let alpha_diff = (p[3] as f64 - q[3] as f64).abs() / 255.0;
            if color_diff <= threshold && alpha_diff <= threshold { 1.0 } else { 0.0 }
        }
    }
}

/// True when any pixel has alpha > 0.
pub fn has_content(buf: &RasterBuffer) -> bool {
    buf.pixels().any(|p| p[3] > 0)
}

pub fn stats(buf: &RasterBuffer) -> BufferStats {
    let total_pixels = buf.pixel_count();
    let (non_transparent_pixels, alpha_sum) = buf
        .pixels()
        .fold((0u64, 0u64), |(n, sum), p| (n + u64::from(p[3] > 0), sum + p[3] as u64));
    let average_alpha = if total_pixels == 0 { 0.0 } else { alpha_sum as f64 / total_pixels as f64 };

    BufferStats {
        width: buf.width(),
        height: buf.height(),
        total_pixels,
        non_transparent_pixels,
        average_alpha,
    }
}
