// Software rasterization into RGBA stamp buffers.
// Every primitive takes its drawing parameters explicitly (no "current fill
// style" hidden anywhere) and writes into the buffer it is handed.
// Coverage is binary: a pixel is painted when its centre falls inside the shape.

use std::path::Path;

use image::{ImageBuffer, Rgba, RgbaImage};

use crate::error::Error;
use crate::geometry::{Point, distance_to_segment};
use crate::types::FrameBuffer;

/// A width × height grid of RGBA8 pixels.
///
/// Outside this crate it is read-only: a finished gesture hands out its own
/// buffer and never touches it again.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    image: RgbaImage,
}

impl std::fmt::Debug for RasterBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterBuffer")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl RasterBuffer {
    /// Fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self { image: ImageBuffer::new(width, height) }
    }

    /// Every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self { image: ImageBuffer::from_pixel(width, height, Rgba(rgba)) }
    }

    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        Self { image: ImageBuffer::from_fn(width, height, |x, y| Rgba(f(x, y))) }
    }

    /// Wrap raw row-major RGBA bytes; the length must be exactly width × height × 4.
    pub fn from_rgba(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self, Error> {
        let len = bytes.len();
        ImageBuffer::from_raw(width, height, bytes)
            .filter(|_| len == width as usize * height as usize * 4)
            .map(|image| Self { image })
            .ok_or_else(|| Error::InvalidBuffer(format!("{len} bytes for a {width}x{height} RGBA buffer")))
    }

    pub fn width(&self) -> u32 { self.image.width() }
    pub fn height(&self) -> u32 { self.image.height() }

    pub fn pixel_count(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// RGBA at (x, y); None when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Row-major RGBA bytes.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Iterate pixels as `[r, g, b, a]`, row-major.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.image.pixels().map(|p| p.0)
    }

    /// Write the stamp as a PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| Error::ImageExport(format!("{}: {e}", path.display())))
    }

    /// Composite this buffer over an opaque `paper` colour into a screen buffer
    /// at (ox, oy). Visual: the stamp shows up on a sheet of paper in the window.
    pub fn composite_onto(&self, fb: &mut FrameBuffer, ox: usize, oy: usize, paper: u32) {
        let pr = ((paper >> 16) & 0xFF) as f32;
        let pg = ((paper >> 8) & 0xFF) as f32;
        let pb = (paper & 0xFF) as f32;

        for (x, y, px) in self.image.enumerate_pixels() {
            let (sx, sy) = (ox + x as usize, oy + y as usize);
            if sx >= fb.width || sy >= fb.height { continue; }
            let [r, g, b, a] = px.0;
            let a = a as f32 / 255.0;
            let mix = |s: u8, d: f32| (s as f32 * a + d * (1.0 - a)).round().clamp(0.0, 255.0) as u32;
            fb.pixels[sy * fb.width + sx] = (mix(r, pr) << 16) | (mix(g, pg) << 8) | mix(b, pb);
        }
    }

    /// Reset every pixel to transparent.
    pub(crate) fn clear(&mut self) {
        for p in self.image.pixels_mut() { *p = Rgba([0, 0, 0, 0]); }
    }

    /// Source-over blend of `paint` at (x, y); silently skips out-of-bounds.
    pub(crate) fn blend_pixel(&mut self, x: i64, y: i64, paint: Paint) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        dst.0 = source_over(paint.rgba, dst.0);
    }
}

/// Colour plus opacity for one drawing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paint {
    pub rgba: [u8; 4],
}

impl Paint {
    pub const fn solid(rgba: [u8; 4]) -> Self {
        Self { rgba }
    }

    /// Same colour with its alpha scaled by `opacity` (0..1).
    pub fn with_opacity(self, opacity: f32) -> Self {
        let [r, g, b, a] = self.rgba;
        let a = (a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { rgba: [r, g, b, a] }
    }
}

/// Non-premultiplied "source over destination".
fn source_over(src: [u8; 4], dst: [u8; 4]) -> [u8; 4] {
    if src[3] == 255 { return src; }
    if src[3] == 0 { return dst; }

    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let ch = |s: u8, d: u8| {
        let v = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    [
        ch(src[0], dst[0]),
        ch(src[1], dst[1]),
        ch(src[2], dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ]
}

/// Integer pixel range whose centres may fall within [lo, hi], clipped to 0..limit.
fn pixel_span(lo: f32, hi: f32, limit: u32) -> std::ops::Range<i64> {
    if !(lo.is_finite() && hi.is_finite()) || hi < lo {
        return 0..0;
    }
    let start = (lo - 0.5).ceil().max(0.0).min(limit as f32) as i64;
    let end = ((hi - 0.5).floor() + 1.0).max(0.0).min(limit as f32) as i64;
    start..end.max(start)
}

/// Filled axis-aligned ellipse. Visual: a solid oval blob.
pub fn fill_ellipse(buf: &mut RasterBuffer, center: Point, rx: f32, ry: f32, paint: Paint) {
    if !(rx > 0.0 && ry > 0.0) { return; }
    let (w, h) = (buf.width(), buf.height());
    for y in pixel_span(center.y - ry, center.y + ry, h) {
        let dy = (y as f32 + 0.5 - center.y) / ry;
        for x in pixel_span(center.x - rx, center.x + rx, w) {
            let dx = (x as f32 + 0.5 - center.x) / rx;
            if dx * dx + dy * dy <= 1.0 {
                buf.blend_pixel(x, y, paint);
            }
        }
    }
}

/// Filled disc. Visual: a solid round dot of the given radius.
pub fn fill_disc(buf: &mut RasterBuffer, center: Point, radius: f32, paint: Paint) {
    fill_ellipse(buf, center, radius, radius, paint);
}

/// Filled axis-aligned square of side `2 · half`, centred on `center`.
pub fn fill_square(buf: &mut RasterBuffer, center: Point, half: f32, paint: Paint) {
    if !(half > 0.0) { return; }
    let (w, h) = (buf.width(), buf.height());
    // Half-open [c - half, c + half) so the side is exactly 2·half pixels.
    let ys = pixel_span(center.y - half, center.y + half - 1e-3, h);
    let xs = pixel_span(center.x - half, center.x + half - 1e-3, w);
    for y in ys {
        for x in xs.clone() {
            buf.blend_pixel(x, y, paint);
        }
    }
}

/// Even-odd scanline fill of a closed polygon (the last vertex connects back to
/// the first). Visual: the polygon interior becomes solid ink.
pub fn fill_polygon(buf: &mut RasterBuffer, poly: &[Point], paint: Paint) {
    if poly.len() < 3 { return; }
    let (w, h) = (buf.width(), buf.height());
    let (min_y, max_y) = poly
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));

    let mut crossings: Vec<f32> = Vec::with_capacity(poly.len());
    for y in pixel_span(min_y, max_y, h) {
        let yc = y as f32 + 0.5;
        crossings.clear();
        for i in 0..poly.len() {
            let a = poly[i];
            let b = poly[(i + 1) % poly.len()];
            // half-open so a vertex shared by two edges is counted once
            if (a.y <= yc && yc < b.y) || (b.y <= yc && yc < a.y) {
                crossings.push(a.x + (yc - a.y) * (b.x - a.x) / (b.y - a.y));
            }
        }
        crossings.sort_by(f32::total_cmp);

        for pair in crossings.chunks_exact(2) {
            // centres in [x0, x1)
            for x in pixel_span(pair[0], pair[1] - 1e-4, w) {
                buf.blend_pixel(x, y, paint);
            }
        }
    }
}

/// Thick line a→b with round caps; consecutive calls give round joins.
/// Visual: a pen stroke of `width` pixels.
pub fn stroke_segment(buf: &mut RasterBuffer, a: Point, b: Point, width: f32, paint: Paint) {
    let r = width * 0.5;
    if !(r > 0.0) { return; }
    let (w, h) = (buf.width(), buf.height());
    let ys = pixel_span(a.y.min(b.y) - r, a.y.max(b.y) + r, h);
    let xs = pixel_span(a.x.min(b.x) - r, a.x.max(b.x) + r, w);
    for y in ys {
        for x in xs.clone() {
            let c = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            if distance_to_segment(c, a, b) <= r {
                buf.blend_pixel(x, y, paint);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INK: Paint = Paint::solid([10, 20, 30, 255]);

    fn painted(buf: &RasterBuffer) -> usize {
        buf.pixels().filter(|p| p[3] > 0).count()
    }

    fn painted_in_row(buf: &RasterBuffer, y: u32) -> usize {
        (0..buf.width()).filter(|&x| buf.pixel(x, y).is_some_and(|p| p[3] > 0)).count()
    }

    #[test]
    fn from_rgba_checks_length() {
        assert!(RasterBuffer::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(RasterBuffer::from_rgba(2, 2, vec![0; 15]), Err(Error::InvalidBuffer(_))));
        assert!(matches!(RasterBuffer::from_rgba(2, 2, vec![0; 20]), Err(Error::InvalidBuffer(_))));
    }

    #[test]
    fn disc_diameter_matches_radius() {
        let mut buf = RasterBuffer::new(100, 100);
        fill_disc(&mut buf, Point::new(50.0, 50.0), 6.0, INK);
        assert_eq!(painted_in_row(&buf, 50), 12);
        assert_eq!(buf.pixel(50, 50), Some([10, 20, 30, 255]));
        assert_eq!(buf.pixel(50, 40), Some([0, 0, 0, 0]));
    }

    #[test]
    fn square_has_exact_side() {
        let mut buf = RasterBuffer::new(100, 100);
        fill_square(&mut buf, Point::new(50.0, 50.0), 25.0, INK);
        assert_eq!(painted(&buf), 50 * 50);
        assert_eq!(painted_in_row(&buf, 25), 50);
        assert_eq!(painted_in_row(&buf, 24), 0);
    }

    #[test]
    fn polygon_fill_covers_rectangle_area() {
        let mut buf = RasterBuffer::new(40, 40);
        let rect = [Point::new(5.0, 5.0), Point::new(25.0, 5.0), Point::new(25.0, 15.0), Point::new(5.0, 15.0)];
        fill_polygon(&mut buf, &rect, INK);
        assert_eq!(painted(&buf), 20 * 10);
    }

    #[test]
    fn shapes_are_clipped_to_the_buffer() {
        let mut buf = RasterBuffer::new(10, 10);
        fill_disc(&mut buf, Point::new(0.0, 0.0), 100.0, INK);
        assert_eq!(painted(&buf), 100);

        let mut empty = RasterBuffer::new(0, 0);
        fill_disc(&mut empty, Point::new(0.0, 0.0), 5.0, INK);
        stroke_segment(&mut empty, Point::new(0.0, 0.0), Point::new(3.0, 3.0), 3.0, INK);
        assert_eq!(empty.pixel_count(), 0);
    }

    #[test]
    fn stroke_has_round_caps() {
        let mut buf = RasterBuffer::new(40, 20);
        stroke_segment(&mut buf, Point::new(10.0, 10.0), Point::new(30.0, 10.0), 4.0, INK);
        // caps reach 2 px past both ends
        assert_eq!(painted_in_row(&buf, 10), 24);
        // but corners of the bounding box stay clear
        assert_eq!(buf.pixel(8, 8), Some([0, 0, 0, 0]));
    }

    #[test]
    fn translucent_paint_blends_over_ink() {
        let mut buf = RasterBuffer::filled(1, 1, [200, 200, 200, 255]);
        buf.blend_pixel(0, 0, Paint::solid([0, 0, 0, 255]).with_opacity(0.5));
        let [r, _, _, a] = buf.pixel(0, 0).unwrap();
        assert_eq!(a, 255);
        assert!((99..=101).contains(&r));

        let mut clear = RasterBuffer::new(1, 1);
        clear.blend_pixel(0, 0, Paint::solid([0, 0, 0, 255]).with_opacity(0.1));
        assert_eq!(clear.pixel(0, 0), Some([0, 0, 0, 26]));
    }

    #[test]
    fn composite_mixes_with_paper() {
        let stamp = RasterBuffer::from_fn(2, 1, |x, _| if x == 0 { [0, 0, 0, 255] } else { [0, 0, 0, 0] });
        let mut fb = FrameBuffer::new(4, 2, 0);
        stamp.composite_onto(&mut fb, 1, 1, 0x00FF_FFFF);
        assert_eq!(fb.pixels[4 + 1], 0x0000_0000);
        assert_eq!(fb.pixels[4 + 2], 0x00FF_FFFF);
        assert_eq!(fb.pixels[0], 0);
    }
}
