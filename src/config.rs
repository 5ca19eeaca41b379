// Knobs for the two engines. Everything is a plain struct with a Default,
// so callers tweak a field or two and pass the struct in explicitly.

/// Pressure used when a mouse reports nothing (mice are "fully pressed").
pub const MOUSE_PRESSURE: f32 = 1.0;
/// Pressure used for touches on hardware without pressure reporting.
pub const TOUCH_PRESSURE: f32 = 0.5;

/// Single-contact disc radius = base + pressure · scale.
/// Visual: a light tap gives a 6 px dot, a full press a 26 px blob.
pub const POINT_BASE_RADIUS: f32 = 6.0;
pub const POINT_PRESSURE_RADIUS: f32 = 20.0;

/// Extra radius added on each axis of the two-contact ellipse.
pub const ELLIPSE_PADDING: f32 = 6.0;

/// Line segments per quadratic when flattening the smoothed outline.
pub const CURVE_STEPS: usize = 8;

/// Tolerance the UI starts at (30 %).
pub const DEFAULT_TOLERANCE: f32 = 0.30;
/// Highest tolerance the UI exposes (80 %). The engine itself accepts 0..=1.
pub const MAX_UI_TOLERANCE: f32 = 0.80;
/// Per-pixel thresholds are `scale · tolerance`; 2.0 keeps the historic behaviour.
pub const DEFAULT_PIXEL_THRESHOLD_SCALE: f32 = 2.0;

/// Per-surface capture settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
    /// RGBA colour every stamp is drawn with.
    pub ink: [u8; 4],
    /// Opacity of the extra soft-shading pass over smoothed outlines.
    pub shade_opacity: f32,
    /// Circle radius, and half the side of the Square stamp.
    pub fixed_radius: f32,
    /// Freehand stroke width in pixels (round caps and joins).
    pub stroke_width: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 320,
            ink: [40, 40, 40, 255],
            shade_opacity: 0.1,
            fixed_radius: 25.0,
            stroke_width: 3.0,
        }
    }
}

impl SurfaceConfig {
    /// Same settings, different surface size.
    pub fn with_size(self, width: u32, height: u32) -> Self {
        Self { width, height, ..self }
    }
}

/// Comparison settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompareConfig {
    /// 0.0 = exact, 1.0 = anything goes.
    pub tolerance: f32,
    /// Multiplier applied to `tolerance` for the per-pixel colour/alpha thresholds.
    /// The overall match decision always uses `1 - tolerance`; the two scales
    /// differ unless this is set to 1.0.
    pub pixel_threshold_scale: f32,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            pixel_threshold_scale: DEFAULT_PIXEL_THRESHOLD_SCALE,
        }
    }
}

impl CompareConfig {
    /// Default config with the given tolerance (NaN → 0, clamped to 0..=1).
    pub fn with_tolerance(tolerance: f32) -> Self {
        Self { tolerance: sanitize_tolerance(tolerance), ..Self::default() }
    }

    /// Turn a UI percentage (0..=80) into a config.
    pub fn from_percent(percent: f32) -> Self {
        let pct = if percent.is_nan() { 0.0 } else { percent.clamp(0.0, MAX_UI_TOLERANCE * 100.0) };
        Self::with_tolerance(pct / 100.0)
    }
}

pub(crate) fn sanitize_tolerance(tolerance: f32) -> f32 {
    if tolerance.is_nan() {
        log::warn!("tolerance is NaN, using 0.0");
        return 0.0;
    }
    if !(0.0..=1.0).contains(&tolerance) {
        log::warn!("tolerance {tolerance} outside 0..=1, clamping");
    }
    tolerance.clamp(0.0, 1.0)
}
