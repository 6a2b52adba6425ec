//! Axis-aligned geometry for collision queries
//!
//! Screen coordinates: x grows to the right, y grows downward. A rectangle is
//! its upper-left corner plus a non-negative width and height, and exposes its
//! four boundary segments on demand.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::EPSILON;
use crate::points_coincide;

/// A 2D point
pub type Point = DVec2;

/// Parametric slack when deciding whether an intersection lies on a segment,
/// so hits exactly at a corner or at the end of a trajectory are kept
const PARAM_SLACK: f64 = 1e-9;

/// Rejected geometry
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("rectangle {what} is negative ({value})")]
    NegativeDimension { what: &'static str, value: f64 },
    #[error("rectangle {what} is not finite")]
    NonFinite { what: &'static str },
}

/// A finite line segment from `start` to `end`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Unit direction from start to end (zero for a degenerate segment)
    #[inline]
    pub fn direction(&self) -> DVec2 {
        (self.end - self.start).normalize_or_zero()
    }

    pub fn middle(&self) -> Point {
        (self.start + self.end) * 0.5
    }

    /// Intersection point with another segment.
    ///
    /// Solves `start + t·r = other.start + u·s` with cross products. Parallel
    /// and collinear pairs have a zero denominator and report no intersection,
    /// as does any zero-length segment, so no division by zero can happen.
    pub fn intersection_with(&self, other: &Segment) -> Option<Point> {
        let r = self.end - self.start;
        let s = other.end - other.start;
        let denom = r.perp_dot(s);
        if denom.abs() <= f64::EPSILON {
            return None;
        }

        let qp = other.start - self.start;
        let t = qp.perp_dot(s) / denom;
        let u = qp.perp_dot(r) / denom;
        let on_segment = |v: f64| (-PARAM_SLACK..=1.0 + PARAM_SLACK).contains(&v);

        if on_segment(t) && on_segment(u) {
            Some(self.start + r * t.clamp(0.0, 1.0))
        } else {
            None
        }
    }

    /// First point where the segment enters the circle. `None` when it
    /// misses, or when it starts inside and only leaves.
    pub fn circle_entry(&self, center: Point, radius: f64) -> Option<Point> {
        let d = self.end - self.start;
        let a = d.length_squared();
        if a <= f64::EPSILON {
            return None;
        }
        let f = self.start - center;
        let half_b = f.dot(d);
        let c = f.length_squared() - radius * radius;
        let disc = half_b * half_b - a * c;
        if disc < 0.0 {
            return None;
        }
        let t = (-half_b - disc.sqrt()) / a;
        if (-PARAM_SLACK..=1.0 + PARAM_SLACK).contains(&t) {
            Some(self.start + d * t.clamp(0.0, 1.0))
        } else {
            None
        }
    }

    pub fn is_intersecting(&self, other: &Segment) -> bool {
        self.intersection_with(other).is_some()
    }

    /// Entry point into `rect`: the nearest boundary crossing made while
    /// moving into the rectangle. A segment that starts inside, or that only
    /// leaves a face it starts on, has no entry point.
    pub fn closest_intersection_to_start(&self, rect: &Rectangle) -> Option<Point> {
        closest_to(self.start, rect.entry_points(self))
    }
}

/// The candidate nearest to `origin`; earlier candidates win exact ties
pub fn closest_to(origin: Point, candidates: impl IntoIterator<Item = Point>) -> Option<Point> {
    let mut best: Option<(Point, f64)> = None;
    for point in candidates {
        let dist = origin.distance(point);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((point, dist)),
        }
    }
    best.map(|(point, _)| point)
}

/// Raw form used while deserializing, so loaded rectangles are validated too
#[derive(Deserialize)]
struct RawRectangle {
    upper_left: Point,
    width: f64,
    height: f64,
}

impl TryFrom<RawRectangle> for Rectangle {
    type Error = GeometryError;

    fn try_from(raw: RawRectangle) -> Result<Self, Self::Error> {
        Rectangle::new(raw.upper_left, raw.width, raw.height)
    }
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRectangle")]
pub struct Rectangle {
    upper_left: Point,
    width: f64,
    height: f64,
}

impl Rectangle {
    pub fn new(upper_left: Point, width: f64, height: f64) -> Result<Self, GeometryError> {
        if !upper_left.is_finite() {
            return Err(GeometryError::NonFinite { what: "corner" });
        }
        for (what, value) in [("width", width), ("height", height)] {
            if !value.is_finite() {
                return Err(GeometryError::NonFinite { what });
            }
            if value < 0.0 {
                return Err(GeometryError::NegativeDimension { what, value });
            }
        }
        Ok(Self {
            upper_left,
            width,
            height,
        })
    }

    /// Shorthand for `Rectangle::new(Point::new(x, y), width, height)`
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Result<Self, GeometryError> {
        Self::new(Point::new(x, y), width, height)
    }

    #[inline]
    pub fn upper_left(&self) -> Point {
        self.upper_left
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.upper_left.x
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.upper_left.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.upper_left.y
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.upper_left.y + self.height
    }

    pub fn center(&self) -> Point {
        self.upper_left + DVec2::new(self.width, self.height) * 0.5
    }

    /// Same size, new corner. Width and height are already validated, so only
    /// the corner can break the invariants.
    pub fn with_upper_left(&self, upper_left: Point) -> Result<Self, GeometryError> {
        Self::new(upper_left, self.width, self.height)
    }

    /// Zero width or height: such a rectangle never takes part in collisions
    pub fn is_degenerate(&self) -> bool {
        self.width <= EPSILON || self.height <= EPSILON
    }

    pub fn top_edge(&self) -> Segment {
        Segment::new(self.upper_left, Point::new(self.right(), self.top()))
    }

    pub fn bottom_edge(&self) -> Segment {
        Segment::new(
            Point::new(self.left(), self.bottom()),
            Point::new(self.right(), self.bottom()),
        )
    }

    pub fn left_edge(&self) -> Segment {
        Segment::new(self.upper_left, Point::new(self.left(), self.bottom()))
    }

    pub fn right_edge(&self) -> Segment {
        Segment::new(
            Point::new(self.right(), self.top()),
            Point::new(self.right(), self.bottom()),
        )
    }

    /// Boundary segments in top, bottom, left, right order
    pub fn edges(&self) -> [Segment; 4] {
        [
            self.top_edge(),
            self.bottom_edge(),
            self.left_edge(),
            self.right_edge(),
        ]
    }

    /// Outward normals matching [`Rectangle::edges`]
    const NORMALS: [DVec2; 4] = [DVec2::NEG_Y, DVec2::Y, DVec2::NEG_X, DVec2::X];

    /// This rectangle grown by `margin` on every side
    pub fn inflated(&self, margin: f64) -> Rectangle {
        let margin = margin.max(0.0);
        Rectangle {
            upper_left: self.upper_left - DVec2::splat(margin),
            width: self.width + 2.0 * margin,
            height: self.height + 2.0 * margin,
        }
    }

    /// Closest point of the rectangle (boundary or interior) to `p`
    pub fn clamp_point(&self, p: Point) -> Point {
        Point::new(
            p.x.clamp(self.left(), self.right()),
            p.y.clamp(self.top(), self.bottom()),
        )
    }

    /// Where `line` crosses the boundary. A crossing through a corner is
    /// reported once even though it touches two edges.
    pub fn intersection_points(&self, line: &Segment) -> Vec<Point> {
        if self.is_degenerate() {
            return Vec::new();
        }

        let mut points: Vec<Point> = Vec::with_capacity(2);
        for edge in self.edges() {
            if let Some(p) = line.intersection_with(&edge) {
                if !points.iter().any(|&q| points_coincide(p, q)) {
                    points.push(p);
                }
            }
        }
        points
    }

    /// Crossings where `line` moves into the rectangle, against a face's
    /// outward normal
    pub fn entry_points(&self, line: &Segment) -> Vec<Point> {
        if self.is_degenerate() {
            return Vec::new();
        }

        let heading = line.end - line.start;
        let mut points: Vec<Point> = Vec::with_capacity(2);
        for (edge, normal) in self.edges().iter().zip(Self::NORMALS) {
            if heading.dot(normal) >= 0.0 {
                continue;
            }
            if let Some(p) = line.intersection_with(edge) {
                if !points.iter().any(|&q| points_coincide(p, q)) {
                    points.push(p);
                }
            }
        }
        points
    }

    /// First contact of a circle of radius `margin` whose center moves along
    /// `line`: the center position at contact and the touched point on this
    /// rectangle's boundary.
    ///
    /// The swept shape is the rectangle grown by `margin` with rounded
    /// corners. A path through the square corner of the grown rectangle is
    /// re-tested against the circle around the real corner, which it may miss.
    /// A path starting inside the rounded shape never enters it.
    pub fn swept_contact(&self, line: &Segment, margin: f64) -> Option<(Point, Point)> {
        if self.is_degenerate() {
            return None;
        }
        let grown = self.inflated(margin);
        let started_inside = grown.contains_strictly(line.start);
        let entry = if started_inside {
            line.start
        } else {
            line.closest_intersection_to_start(&grown)?
        };
        let contact = self.clamp_point(entry);

        let beyond_x = entry.x < self.left() || entry.x > self.right();
        let beyond_y = entry.y < self.top() || entry.y > self.bottom();
        if margin > 0.0 && beyond_x && beyond_y {
            let center = line.circle_entry(contact, margin)?;
            return Some((center, contact));
        }
        if started_inside {
            return None;
        }
        Some((entry, contact))
    }

    /// Whether the point lies inside, not on the boundary
    pub fn contains_strictly(&self, p: Point) -> bool {
        p.x > self.left() + EPSILON
            && p.x < self.right() - EPSILON
            && p.y > self.top() + EPSILON
            && p.y < self.bottom() - EPSILON
    }
}
