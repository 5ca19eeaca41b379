// Core value types shared by capture, comparison and the demo window.

use std::fmt::{self, Display};

use serde::Serialize;

use crate::config::{MOUSE_PRESSURE, TOUCH_PRESSURE};

/// One pointer/touch contact, already in the surface's own pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactSample {
    pub x: f32,
    pub y: f32,
    pub pressure: f32, // 0..1; see `effective_pressure`
    pub timestamp: u64, // ms
}

impl ContactSample {
    pub fn new(x: f32, y: f32, pressure: f32, timestamp: u64) -> Self {
        Self { x, y, pressure, timestamp }
    }

    /// Mice don't report pressure, so they always press at `MOUSE_PRESSURE`.
    pub fn from_mouse(x: f32, y: f32, timestamp: u64) -> Self {
        Self::new(x, y, MOUSE_PRESSURE, timestamp)
    }

    /// Touches fall back to `TOUCH_PRESSURE` when the hardware reports none.
    pub fn from_touch(x: f32, y: f32, pressure: Option<f32>, timestamp: u64) -> Self {
        Self::new(x, y, pressure.unwrap_or(TOUCH_PRESSURE), timestamp)
    }

    /// False for NaN/infinite coordinates; such samples are dropped by capture.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Pressure clamped to 0..=1 (NaN counts as a mouse press).
    pub fn effective_pressure(&self) -> f32 {
        if self.pressure.is_nan() { MOUSE_PRESSURE } else { self.pressure.clamp(0.0, 1.0) }
    }
}

/// How a surface turns contacts into a stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Mode {
    /// Convex-hull reconstruction of the contact footprint.
    #[default]
    Auto,
    Circle,
    Square,
    Freehand,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Auto, Mode::Circle, Mode::Square, Mode::Freehand];

    /// Next mode in `ALL`, wrapping around (the demo's M key).
    pub fn next(self) -> Mode {
        let idx = Mode::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Mode::ALL[(idx + 1) % Mode::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Auto => "AUTO",
            Mode::Circle => "CIRCLE",
            Mode::Square => "SQUARE",
            Mode::Freehand => "FREEHAND",
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize, color: u32) -> Self {
        Self { width, height, pixels: vec![color; width * height] }
    }

    pub fn fill(&mut self, color: u32) {
        for p in &mut self.pixels { *p = color; }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressure_fallbacks() {
        assert_eq!(ContactSample::from_mouse(1.0, 2.0, 0).pressure, 1.0);
        assert_eq!(ContactSample::from_touch(1.0, 2.0, None, 0).pressure, 0.5);
        assert_eq!(ContactSample::from_touch(1.0, 2.0, Some(0.2), 0).pressure, 0.2);
    }

    #[test]
    fn effective_pressure_is_clamped() {
        assert_eq!(ContactSample::new(0.0, 0.0, 4.0, 0).effective_pressure(), 1.0);
        assert_eq!(ContactSample::new(0.0, 0.0, -1.0, 0).effective_pressure(), 0.0);
        assert_eq!(ContactSample::new(0.0, 0.0, f32::NAN, 0).effective_pressure(), 1.0);
    }

    #[test]
    fn non_finite_samples_are_flagged() {
        assert!(!ContactSample::new(f32::NAN, 0.0, 1.0, 0).is_finite());
        assert!(!ContactSample::new(0.0, f32::INFINITY, 1.0, 0).is_finite());
        assert!(ContactSample::new(3.0, 4.0, 1.0, 0).is_finite());
    }

    #[test]
    fn mode_cycles_through_all() {
        assert_eq!(Mode::Auto.next(), Mode::Circle);
        assert_eq!(Mode::Freehand.next(), Mode::Auto);
        assert_eq!(Mode::Square.to_string(), "SQUARE");
    }
}
