// Stamp capture: contact samples in, filled RGBA footprint out.
//
// One `StampSurface` per drawing surface. It is a small state machine
// (Idle → Capturing → Idle) driven by begin / extend / end, plus `clear`
// which is allowed from any state and cancels whatever is going on.

use log::{debug, trace, warn};

use crate::config::{CURVE_STEPS, ELLIPSE_PADDING, POINT_BASE_RADIUS, POINT_PRESSURE_RADIUS, SurfaceConfig};
use crate::geometry::{Point, Shape};
use crate::raster::{self, Paint, RasterBuffer};
use crate::types::{ContactSample, Mode};

/// The reconstructed contact footprint, before it is rasterized.
#[derive(Debug, Clone, PartialEq)]
pub enum Footprint {
    /// No usable contacts.
    Empty,
    /// One contact: disc sized by pressure.
    Disc { center: Point, radius: f32 },
    /// Two contacts: ellipse spanning both.
    Ellipse { center: Point, rx: f32, ry: f32 },
    /// Three contacts: the triangle through them.
    Triangle([Point; 3]),
    /// Four or more: smoothed outline around the hull.
    Outline(Shape),
}

/// Auto-mode reconstruction from every accumulated sample.
///
/// The number of usable samples picks the footprint. Up to three samples are
/// used raw; from four on, the hull outline is smoothed even if the hull
/// itself has fewer vertices.
pub fn reconstruct(samples: &[ContactSample]) -> Footprint {
    let usable: Vec<&ContactSample> = samples.iter().filter(|s| s.is_finite()).collect();
    let points: Vec<Point> = usable.iter().map(|s| Point::new(s.x, s.y)).collect();

    match points.as_slice() {
        [] => Footprint::Empty,
        [center] => Footprint::Disc {
            center: *center,
            radius: POINT_BASE_RADIUS + usable[0].effective_pressure() * POINT_PRESSURE_RADIUS,
        },
        [a, b] => Footprint::Ellipse {
            center: a.midpoint(*b),
            rx: (b.x - a.x).abs() / 2.0 + ELLIPSE_PADDING,
            ry: (b.y - a.y).abs() / 2.0 + ELLIPSE_PADDING,
        },
        [a, b, c] => Footprint::Triangle([*a, *b, *c]),
        _ => Footprint::Outline(Shape::from_points(&points)),
    }
}

impl Footprint {
    /// Draw into `buf` with the surface's ink. Outlines get an extra soft
    /// shading pass on top at `cfg.shade_opacity`.
    pub fn rasterize(&self, buf: &mut RasterBuffer, cfg: &SurfaceConfig) {
        let ink = Paint::solid(cfg.ink);
        match self {
            Footprint::Empty => {}
            Footprint::Disc { center, radius } => raster::fill_disc(buf, *center, *radius, ink),
            Footprint::Ellipse { center, rx, ry } => raster::fill_ellipse(buf, *center, *rx, *ry, ink),
            Footprint::Triangle(tri) => raster::fill_polygon(buf, tri, ink),
            Footprint::Outline(shape) => {
                let path = shape.smoothed_path(CURVE_STEPS);
                raster::fill_polygon(buf, &path, ink);
                raster::fill_polygon(buf, &path, ink.with_opacity(cfg.shade_opacity));
            }
        }
    }
}

/// What the input layer saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Start,
    Move,
    End,
    Cancel,
}

/// One input event, already translated into surface-space samples.
/// A multi-touch event carries one sample per finger, all with the same timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureEvent {
    pub kind: GestureKind,
    pub samples: Vec<ContactSample>,
}

impl GestureEvent {
    pub fn new(kind: GestureKind, samples: Vec<ContactSample>) -> Self {
        Self { kind, samples }
    }
}

/// Live state of one press-drag-release.
#[derive(Debug, Clone)]
struct CaptureSession {
    mode: Mode,
    samples: Vec<ContactSample>,
    last_point: Option<Point>, // freehand pen position
    first_point: Option<Point>, // freehand path start, for closing
}

/// A drawing surface that captures one stamp per gesture.
#[derive(Debug, Clone)]
pub struct StampSurface {
    config: SurfaceConfig,
    canvas: RasterBuffer,
    session: Option<CaptureSession>,
}

impl StampSurface {
    pub fn new(config: SurfaceConfig) -> Self {
        Self {
            canvas: RasterBuffer::new(config.width, config.height),
            config,
            session: None,
        }
    }

    pub fn config(&self) -> &SurfaceConfig { &self.config }

    pub fn is_capturing(&self) -> bool { self.session.is_some() }

    /// Mode of the running gesture, if any.
    pub fn mode(&self) -> Option<Mode> {
        self.session.as_ref().map(|s| s.mode)
    }

    /// Samples accumulated by the running gesture.
    pub fn sample_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.samples.len())
    }

    /// What the surface shows right now (redrawn on every move in Auto mode).
    pub fn preview(&self) -> &RasterBuffer { &self.canvas }

    /// Start a fresh gesture, throwing away any running one and the old drawing.
    pub fn begin_gesture(&mut self, mode: Mode, initial: &[ContactSample]) {
        if self.session.is_some() {
            debug!("begin_gesture while capturing: restarting");
        }
        self.canvas.clear();

        let initial = finite_samples(initial);
        let first = initial.first().map(|s| Point::new(s.x, s.y));
        let session = CaptureSession {
            mode,
            samples: initial,
            last_point: first,
            first_point: first,
        };

        let ink = Paint::solid(self.config.ink);
        match (mode, first) {
            (Mode::Auto, _) => self.redraw_auto(&session.samples),
            (Mode::Circle, Some(center)) => {
                raster::fill_disc(&mut self.canvas, center, self.config.fixed_radius, ink)
            }
            (Mode::Square, Some(center)) => {
                raster::fill_square(&mut self.canvas, center, self.config.fixed_radius, ink)
            }
            // the pen only leaves a mark once it moves
            _ => {}
        }

        debug!("gesture started: mode={mode}, samples={}", session.samples.len());
        self.session = Some(session);
    }

    /// Feed more samples into the running gesture (no-op when idle).
    pub fn extend_gesture(&mut self, more: &[ContactSample]) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let more = finite_samples(more);
        if more.is_empty() {
            return;
        }

        match session.mode {
            Mode::Auto => {
                session.samples.extend(more);
                trace!("auto: {} samples, re-reconstructing", session.samples.len());
                let samples = session.samples.clone();
                self.redraw_auto(&samples);
            }
            Mode::Freehand => {
                // only the newest contact moves the pen
                let Some(newest) = more.last() else { return };
                let to = Point::new(newest.x, newest.y);
                match session.last_point {
                    Some(from) => {
                        let paint = Paint::solid(self.config.ink);
                        raster::stroke_segment(&mut self.canvas, from, to, self.config.stroke_width, paint);
                    }
                    None => session.first_point = Some(to),
                }
                session.last_point = Some(to);
                session.samples.push(*newest);
            }
            // fixed shapes were drawn once at gesture start
            Mode::Circle | Mode::Square => {}
        }
    }

    /// Finish the gesture and hand back the stamp. Idle surfaces return their
    /// current (unchanged) drawing.
    pub fn end_gesture(&mut self) -> RasterBuffer {
        let Some(session) = self.session.take() else {
            return self.canvas.clone();
        };

        match session.mode {
            Mode::Auto => self.redraw_auto(&session.samples),
            Mode::Freehand => {
                if let (Some(from), Some(to)) = (session.last_point, session.first_point) {
                    if from != to {
                        let paint = Paint::solid(self.config.ink);
                        raster::stroke_segment(&mut self.canvas, from, to, self.config.stroke_width, paint);
                    }
                }
            }
            Mode::Circle | Mode::Square => {}
        }

        debug!("gesture ended: mode={}, samples={}", session.mode, session.samples.len());
        self.canvas.clone()
    }

    /// Drop any gesture and wipe the surface back to transparent.
    pub fn clear(&mut self) {
        if self.session.take().is_some() {
            debug!("clear: gesture cancelled");
        }
        self.canvas = RasterBuffer::new(self.config.width, self.config.height);
    }

    /// Route one input event. `End` and `Cancel` both finish the gesture and
    /// return the stamp; the caller decides whether to keep a cancelled one.
    pub fn handle(&mut self, mode: Mode, event: &GestureEvent) -> Option<RasterBuffer> {
        match event.kind {
            GestureKind::Start => {
                self.begin_gesture(mode, &event.samples);
                None
            }
            GestureKind::Move => {
                self.extend_gesture(&event.samples);
                None
            }
            GestureKind::End | GestureKind::Cancel => Some(self.end_gesture()),
        }
    }

    fn redraw_auto(&mut self, samples: &[ContactSample]) {
        self.canvas.clear();
        reconstruct(samples).rasterize(&mut self.canvas, &self.config);
    }
}

fn finite_samples(samples: &[ContactSample]) -> Vec<ContactSample> {
    let kept: Vec<ContactSample> = samples.iter().copied().filter(ContactSample::is_finite).collect();
    if kept.len() != samples.len() {
        warn!("dropped {} non-finite contact sample(s)", samples.len() - kept.len());
    }
    kept
}
