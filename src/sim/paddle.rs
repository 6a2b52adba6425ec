//! Player paddle
//!
//! Slides horizontally under keyboard control without passing through
//! obstacles, and redirects balls depending on which part of its top they
//! strike.

use std::rc::Rc;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::block::Block;
use super::collidable::{BodyId, Collidable};
use super::environment::Environment;
use super::geometry::{Point, Rectangle, Segment};
use super::listeners::HitListener;
use super::sprite::Sprite;
use super::velocity::Velocity;
use crate::consts::{PADDLE_ZONE_BASE_HEADING, PADDLE_ZONE_COUNT, PADDLE_ZONE_HEADING_STEP};
use crate::input::{Control, KeyboardSensor};
use crate::normalize_heading;
use crate::render::DrawSurface;

/// Equal-width strips across the paddle, numbered from 1 at the left.
///
/// A ball striking zone `i` leaves along heading `base_heading + step * i`,
/// except in the middle zone of an odd count, which reflects like any block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BounceZones {
    pub count: u32,
    pub base_heading: f64,
    pub step: f64,
}

impl Default for BounceZones {
    fn default() -> Self {
        Self {
            count: PADDLE_ZONE_COUNT,
            base_heading: PADDLE_ZONE_BASE_HEADING,
            step: PADDLE_ZONE_HEADING_STEP,
        }
    }
}

impl BounceZones {
    /// Zone holding horizontal position `x` on `rect`. A boundary belongs to
    /// the zone on its left; anything past the right edge is the last zone.
    pub fn zone_for(&self, rect: &Rectangle, x: f64) -> u32 {
        let count = self.count.max(1);
        let zone_width = rect.width() / f64::from(count);
        (1..count)
            .find(|&i| x <= rect.left() + zone_width * f64::from(i))
            .unwrap_or(count)
    }

    /// The zone that reflects instead of redirecting
    pub fn center_zone(&self) -> Option<u32> {
        (self.count % 2 == 1).then(|| self.count / 2 + 1)
    }

    /// Outgoing heading for `zone`, in [0, 360)
    pub fn heading(&self, zone: u32) -> f64 {
        normalize_heading(self.base_heading + self.step * f64::from(zone))
    }
}

/// The player's paddle
pub struct Paddle {
    block: Block,
    keyboard: Rc<dyn KeyboardSensor>,
    /// Horizontal speed in pixels per second
    speed: f64,
    /// Private copy of everything the paddle can bump into
    environment: Environment,
    zones: BounceZones,
}

impl Paddle {
    pub fn new(block: Block, keyboard: Rc<dyn KeyboardSensor>, speed: f64) -> Self {
        Self {
            block,
            keyboard,
            speed,
            environment: Environment::new(),
            zones: BounceZones::default(),
        }
    }

    pub fn with_zones(mut self, zones: BounceZones) -> Self {
        self.zones = zones;
        self
    }

    pub fn id(&self) -> BodyId {
        self.block.id()
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn zones(&self) -> &BounceZones {
        &self.zones
    }

    pub fn block(&self) -> &Block {
        &self.block
    }

    /// Put the paddle somewhere else outright, e.g. back in the middle for a new turn
    pub fn set_collision_rectangle(&mut self, rect: Rectangle) {
        self.block.set_collision_rectangle(rect);
    }

    pub fn add_hit_listener(&mut self, listener: Rc<dyn HitListener>) {
        self.block.add_hit_listener(listener);
    }

    /// Take a snapshot of `environment`, minus the paddle itself. Later
    /// registrations or removals there are not seen by the paddle.
    pub fn set_environment(&mut self, environment: &Environment) {
        let own = self.id();
        let obstacles = environment
            .obstacles()
            .into_iter()
            .filter(|o| o.id != own)
            .collect();
        self.environment = Environment::from_obstacles(obstacles);
    }

    pub fn move_left(&mut self, dt: f64) {
        self.slide(-self.speed * dt);
    }

    pub fn move_right(&mut self, dt: f64) {
        self.slide(self.speed * dt);
    }

    /// Shift horizontally by up to `dx`, stopping flush against the first
    /// obstacle in the way
    fn slide(&mut self, dx: f64) {
        if !dx.is_finite() {
            log::error!("paddle {} asked to move by non-finite {dx}, ignored", self.id());
            return;
        }
        if dx == 0.0 {
            return;
        }

        let rect = self.block.collision_rectangle();
        let leading_x = if dx < 0.0 { rect.left() } else { rect.right() };
        let from = Point::new(leading_x, rect.top() + rect.height() / 2.0);
        let trajectory = Segment::new(from, from + DVec2::new(dx, 0.0));

        let shift = match self.environment.closest_collision(&trajectory) {
            Some(info) => {
                log::debug!(
                    "paddle {} stopped by body {} at x = {:.2}",
                    self.id(),
                    info.body_id(),
                    info.collision_point().x
                );
                info.collision_point().x - leading_x
            }
            None => dx,
        };

        match rect.with_upper_left(rect.upper_left() + DVec2::new(shift, 0.0)) {
            Ok(moved) => self.block.set_collision_rectangle(moved),
            Err(err) => log::error!("paddle {} move rejected: {err}", self.id()),
        }
    }
}

impl Collidable for Paddle {
    fn collision_rectangle(&self) -> Rectangle {
        self.block.collision_rectangle()
    }

    fn hit(&mut self, hitter: &Ball, collision_point: Point, current_velocity: Velocity) -> Velocity {
        let rect = self.block.collision_rectangle();
        let zone = self.zones.zone_for(&rect, collision_point.x);

        if self.zones.center_zone() == Some(zone) {
            return self.block.hit(hitter, collision_point, current_velocity);
        }

        let heading = self.zones.heading(zone);
        log::trace!("paddle {} zone {zone} sends ball {} along {heading}", self.id(), hitter.id());
        let new_velocity = Velocity::from_angle_and_speed(heading, current_velocity.speed());
        self.block.notify_hit(hitter);
        new_velocity
    }
}

impl Sprite for Paddle {
    fn draw_on(&self, surface: &mut dyn DrawSurface) {
        self.block.draw_on(surface);
    }

    fn time_passed(&mut self, dt: f64) {
        if self.keyboard.is_pressed(Control::Left) {
            self.move_left(dt);
        }
        if self.keyboard.is_pressed(Control::Right) {
            self.move_right(dt);
        }
    }
}
