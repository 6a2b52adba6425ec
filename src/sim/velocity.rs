//! Ball velocity in component and heading/speed form
//!
//! Headings are degrees under the [`HEADING_UP`] convention: 0° points up the
//! screen (negative y) and headings grow clockwise, so 90° points right and
//! 180° points down.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::Point;
use crate::consts::HEADING_UP;
use crate::normalize_heading;

/// Change in position per second
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub dx: f64,
    pub dy: f64,
}

impl Velocity {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Velocity moving along `heading` (degrees) at `speed`
    pub fn from_angle_and_speed(heading: f64, speed: f64) -> Self {
        let radians = (heading - HEADING_UP).to_radians();
        Self::new(speed * radians.sin(), -speed * radians.cos())
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.dx.hypot(self.dy)
    }

    /// Heading of this velocity in [0, 360); 0 for a stationary velocity
    pub fn angle(&self) -> f64 {
        if self.dx == 0.0 && self.dy == 0.0 {
            return normalize_heading(HEADING_UP);
        }
        normalize_heading(self.dx.atan2(-self.dy).to_degrees() + HEADING_UP)
    }

    #[inline]
    pub fn as_vec(&self) -> DVec2 {
        DVec2::new(self.dx, self.dy)
    }

    /// Where a body at `point` ends up after `dt` seconds
    #[inline]
    pub fn apply_to_point(&self, point: Point, dt: f64) -> Point {
        point + self.as_vec() * dt
    }

    pub fn is_finite(&self) -> bool {
        self.dx.is_finite() && self.dy.is_finite()
    }
}

impl From<DVec2> for Velocity {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}
