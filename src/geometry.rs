//! Boundary math for anchoring connection lines on shapes.
//!
//! Everything here is a pure function of its arguments. Coordinates are
//! document coordinates with y growing downward.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

const BOUND_TOLERANCE: f32 = 1e-5;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        (other - self).length()
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;

    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned rectangle stored as its two extreme corners.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RectF {
    pub min: Point,
    pub max: Point,
}

impl RectF {
    /// Builds a rectangle from any two opposite corners.
    pub fn from_min_max(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn from_origin_size(origin: Point, width: f32, height: f32) -> Self {
        Self {
            min: origin,
            max: Point::new(origin.x + width, origin.y + height),
        }
    }

    /// Swaps bounds that were dragged past each other.
    pub fn normalized(self) -> Self {
        Self::from_min_max(self.min, self.max)
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    pub fn is_valid(&self) -> bool {
        self.max.x > self.min.x && self.max.y > self.min.y
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn intersects(&self, other: &RectF) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    pub fn translated(self, delta: Point) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    pub fn expand(self, amount: f32) -> Self {
        Self {
            min: Point::new(self.min.x - amount, self.min.y - amount),
            max: Point::new(self.max.x + amount, self.max.y + amount),
        }
    }

    /// Corners clockwise from the top-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }
}

fn cross(a: Point, b: Point) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Intersection of the bounded segments `a1..a2` and `b1..b2`.
///
/// End points count as inside, so a ray passing exactly through a polygon
/// vertex still reports a hit. Parallel and zero-length segments never
/// intersect.
pub fn segment_intersection(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<Point> {
    let r = a2 - a1;
    let s = b2 - b1;
    let denom = cross(r, s);
    if denom.abs() <= f32::EPSILON {
        return None;
    }
    let qp = b1 - a1;
    let t = cross(qp, s) / denom;
    let u = cross(qp, r) / denom;
    let bounded = -BOUND_TOLERANCE..=1.0 + BOUND_TOLERANCE;
    if bounded.contains(&t) && bounded.contains(&u) {
        Some(a1 + r * t)
    } else {
        None
    }
}

/// Point where the ray `center -> target` leaves a closed polygon.
///
/// Edges are walked in order, closing back to the first vertex, and the first
/// bounded hit wins. Falls back to `center` when nothing intersects, which
/// covers degenerate polygons and targets that sit inside the shape.
pub fn polygon_edge_point(polygon: &[Point], center: Point, target: Point) -> Point {
    let n = polygon.len();
    if n < 2 {
        return center;
    }
    for i in 0..n {
        let p1 = polygon[i];
        let p2 = polygon[(i + 1) % n];
        if let Some(hit) = segment_intersection(p1, p2, center, target) {
            return hit;
        }
    }
    center
}

/// Point on an axis-aligned ellipse in the direction of `target`.
pub fn ellipse_edge_point(center: Point, radius_x: f32, radius_y: f32, target: Point) -> Point {
    let theta = (-(target.y - center.y)).atan2(target.x - center.x);
    Point::new(
        center.x + radius_x * theta.cos(),
        center.y - radius_y * theta.sin(),
    )
}

/// Even-odd containment test; points on the boundary may fall either way.
pub fn polygon_contains(polygon: &[Point], p: Point) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

pub fn ellipse_contains(center: Point, radius_x: f32, radius_y: f32, p: Point) -> bool {
    if radius_x <= f32::EPSILON || radius_y <= f32::EPSILON {
        return false;
    }
    let dx = (p.x - center.x) / radius_x;
    let dy = (p.y - center.y) / radius_y;
    dx * dx + dy * dy <= 1.0
}

/// Whether a closed polygon and an axis-aligned rectangle share any point.
pub fn polygon_intersects_rect(polygon: &[Point], rect: &RectF) -> bool {
    let n = polygon.len();
    if n == 0 {
        return false;
    }
    if polygon.iter().any(|p| rect.contains(*p)) {
        return true;
    }
    let corners = rect.corners();
    if corners.iter().any(|c| polygon_contains(polygon, *c)) {
        return true;
    }
    (0..n).any(|i| {
        let (a, b) = (polygon[i], polygon[(i + 1) % n]);
        (0..4).any(|j| segment_intersection(a, b, corners[j], corners[(j + 1) % 4]).is_some())
    })
}

/// Whether an axis-aligned ellipse and a normalized rectangle share any point.
pub fn ellipse_intersects_rect(center: Point, radius_x: f32, radius_y: f32, rect: &RectF) -> bool {
    let nearest = Point::new(
        center.x.clamp(rect.min.x, rect.max.x),
        center.y.clamp(rect.min.y, rect.max.y),
    );
    ellipse_contains(center, radius_x, radius_y, nearest)
}

pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let ab = b - a;
    let ap = p - a;
    let ab_len2 = ab.x * ab.x + ab.y * ab.y;
    if ab_len2 <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((ap.x * ab.x + ap.y * ab.y) / ab_len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Triangle for an arrowhead whose tip sits on `to`, sides at 30 degrees off
/// the line. `None` for zero-length lines.
pub fn arrow_head(from: Point, to: Point, size: f32) -> Option<[Point; 3]> {
    let d = to - from;
    if d.length() <= f32::EPSILON {
        return None;
    }
    let angle = d.y.atan2(d.x);
    let spread = std::f32::consts::PI / 6.0;
    let p1 = to
        - Point::new(
            (angle - spread).cos() * size,
            (angle - spread).sin() * size,
        );
    let p2 = to
        - Point::new(
            (angle + spread).cos() * size,
            (angle + spread).sin() * size,
        );
    Some([to, p1, p2])
}
