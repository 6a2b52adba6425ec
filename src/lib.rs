//! Brickfall - collision core for a paddle-and-brick arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, collisions, moving bodies, level setup)
//! - `render`: Draw-command sink consumed by an external renderer
//! - `input`: Held-control queries for the paddle and pause
//! - `settings`: Data-driven engine configuration

pub mod input;
pub mod render;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

use glam::DVec2;

/// Engine configuration constants
pub mod consts {
    /// Tolerance for comparing points and distances produced by intersection math
    pub const EPSILON: f64 = 1e-6;
    /// Gap left between a ball's edge and the surface it stopped against
    pub const SURFACE_CLEARANCE: f64 = 1e-3;

    /// Heading (degrees) that points straight up the screen, towards negative y.
    /// Headings grow clockwise from here. Velocity construction and the paddle
    /// bounce table both read headings in this convention.
    pub const HEADING_UP: f64 = 0.0;

    /// Screen dimensions
    pub const SCREEN_WIDTH: f64 = 800.0;
    pub const SCREEN_HEIGHT: f64 = 600.0;

    /// Frame borders
    pub const BORDER_THICKNESS: f64 = 26.0;
    pub const SCOREBOARD_HEIGHT: f64 = 20.0;

    /// Paddle defaults
    pub const PADDLE_HEIGHT: f64 = 19.0;
    pub const PADDLE_BOTTOM_MARGIN: f64 = 23.0;

    /// Ball defaults
    pub const BALL_RADIUS: f64 = 5.0;
    /// Distance between the paddle top and a freshly spawned ball's center
    pub const BALL_SPAWN_GAP: f64 = 10.0;

    /// Paddle bounce zones: zone `i` (1-based) sends the ball along
    /// `PADDLE_ZONE_BASE_HEADING + PADDLE_ZONE_HEADING_STEP * i`
    pub const PADDLE_ZONE_COUNT: u32 = 5;
    pub const PADDLE_ZONE_BASE_HEADING: f64 = 270.0;
    pub const PADDLE_ZONE_HEADING_STEP: f64 = 30.0;
}

/// Whether two points are equal within [`consts::EPSILON`]
#[inline]
pub fn points_coincide(a: DVec2, b: DVec2) -> bool {
    a.abs_diff_eq(b, consts::EPSILON)
}

/// Whether two scalars are equal within [`consts::EPSILON`]
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= consts::EPSILON
}

/// Normalize a heading in degrees to [0, 360)
#[inline]
pub fn normalize_heading(heading: f64) -> f64 {
    let wrapped = heading.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_heading() {
        assert!(approx_eq(normalize_heading(420.0), 60.0));
        assert!(approx_eq(normalize_heading(-90.0), 270.0));
        assert!(approx_eq(normalize_heading(360.0), 0.0));
        assert!(normalize_heading(-1e-20) < 360.0);
    }

    #[test]
    fn test_points_coincide() {
        assert!(points_coincide(DVec2::new(1.0, 2.0), DVec2::new(1.0 + 1e-9, 2.0)));
        assert!(!points_coincide(DVec2::new(1.0, 2.0), DVec2::new(1.1, 2.0)));
    }
}
