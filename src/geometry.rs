// 2-D helpers for footprint reconstruction:
// contacts → convex hull → centroid → outline sorted by angle → smoothed path.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

/// Z of (a - o) × (b - o). Positive = counter-clockwise turn o→a→b.
#[inline]
pub fn cross(o: Point, a: Point, b: Point) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Convex hull by Andrew's monotone chain.
///
/// Exact duplicates are collapsed first. With fewer than 3 distinct points the
/// sorted points come back as-is. Collinear points on an edge are dropped
/// (a turn must be strictly counter-clockwise to survive).
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut pts = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    let mut lower: Vec<Point> = Vec::with_capacity(pts.len());
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point> = Vec::with_capacity(pts.len());
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    // Each chain ends where the other starts.
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Arithmetic mean of the points (origin for an empty slice).
pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::default();
    }
    let n = points.len() as f32;
    let (sx, sy) = points.iter().fold((0.0f32, 0.0f32), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

/// Sort points by `atan2(y - cy, x - cx)` ascending. Stable, so already-sorted
/// input is left untouched.
pub fn sort_by_angle(points: &mut [Point], center: Point) {
    points.sort_by(|a, b| {
        let ta = (a.y - center.y).atan2(a.x - center.x);
        let tb = (b.y - center.y).atan2(b.x - center.x);
        ta.total_cmp(&tb)
    });
}

/// Reconstructed contact outline: hull points ordered around their centroid.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub centroid: Point,
    pub outline: Vec<Point>,
}

impl Shape {
    /// Hull → centroid → angular order. Fewer than 3 points skip the hull.
    pub fn from_points(points: &[Point]) -> Self {
        let mut outline = if points.len() < 3 { points.to_vec() } else { convex_hull(points) };
        let centroid = centroid(&outline);
        sort_by_angle(&mut outline, centroid);
        Self { centroid, outline }
    }

    /// Closed outline with quadratic smoothing, flattened into a polygon.
    ///
    /// Starts at the first vertex; every inner vertex becomes the control point of
    /// a curve ending at the midpoint to its successor, and one last curve through
    /// the final vertex closes the loop back onto the first. Control points are
    /// hull vertices, so the curve never leaves the hull.
    pub fn smoothed_path(&self, steps: usize) -> Vec<Point> {
        let pts = &self.outline;
        let n = pts.len();
        if n < 3 {
            return pts.clone();
        }
        let steps = steps.max(1);
        let mut path = Vec::with_capacity(n * steps + 1);
        let mut cursor = pts[0];
        path.push(cursor);

        for i in 1..n - 1 {
            let end = pts[i].midpoint(pts[i + 1]);
            flatten_quadratic(&mut path, cursor, pts[i], end, steps);
            cursor = end;
        }
        flatten_quadratic(&mut path, cursor, pts[n - 1], pts[0], steps);
        path
    }
}

/// Append points of the quadratic p0→(ctrl)→p1, excluding p0 itself.
fn flatten_quadratic(out: &mut Vec<Point>, p0: Point, ctrl: Point, p1: Point, steps: usize) {
    for s in 1..=steps {
        let t = s as f32 / steps as f32;
        let u = 1.0 - t;
        let x = u * u * p0.x + 2.0 * u * t * ctrl.x + t * t * p1.x;
        let y = u * u * p0.y + 2.0 * u * t * ctrl.y + t * t * p1.y;
        out.push(Point::new(x, y));
    }
}

/// Distance from `p` to the segment a–b.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    let t = if len2 <= f32::EPSILON {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0)
    };
    let (qx, qy) = (a.x + t * dx, a.y + t * dy);
    ((p.x - qx).powi(2) + (p.y - qy).powi(2)).sqrt()
}
