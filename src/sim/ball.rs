//! Free-moving ball
//!
//! Collisions are resolved by nearest hit along the path, never by testing
//! for overlap after moving. A ball therefore cannot skip over a thin
//! obstacle no matter how far it travels in one frame.

use std::rc::Rc;

use super::collidable::{BodyId, CollisionInfo};
use super::environment::Environment;
use super::geometry::{Point, Segment};
use super::sprite::Sprite;
use super::velocity::Velocity;
use crate::consts::{EPSILON, SURFACE_CLEARANCE};
use crate::render::{Color, DrawSurface};

/// A ball in play
pub struct Ball {
    id: BodyId,
    center: Point,
    radius: f64,
    velocity: Velocity,
    color: Color,
    environment: Rc<Environment>,
}

impl Ball {
    pub fn new(id: BodyId, center: Point, radius: f64, environment: Rc<Environment>) -> Self {
        Self {
            id,
            center,
            radius,
            velocity: Velocity::ZERO,
            color: Color::WHITE,
            environment,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Velocity) {
        self.velocity = velocity;
    }

    pub fn set_environment(&mut self, environment: Rc<Environment>) {
        self.environment = environment;
    }

    /// Advance the ball by `dt`, bouncing off the first thing in its way.
    ///
    /// The ball's full extent is swept along the path, so its edge is what
    /// touches an obstacle. On a hit the center stops `SURFACE_CLEARANCE`
    /// short of contact and the struck body decides the new velocity. A ball
    /// already overlapping a body's edge (a paddle slid into it) bounces in
    /// place if it is heading further in; a ball whose center is inside a
    /// body leaves it without bouncing.
    pub fn move_one_step(&mut self, dt: f64) {
        let displacement = self.velocity.as_vec() * dt;
        let travel = displacement.length();
        if !travel.is_finite() {
            log::error!(
                "ball {} has non-finite displacement {:?}, skipping move",
                self.id,
                displacement
            );
            return;
        }
        if travel <= EPSILON {
            return;
        }

        if let Some(contact) = self.environment.touching(self.center, self.radius) {
            let inward = contact.collision_point() - self.center;
            if inward.dot(displacement) > 0.0 {
                log::trace!("ball {} overlapping body {}", self.id, contact.body_id());
                self.resolve(&contact);
                return;
            }
        }

        let trajectory = Segment::new(self.center, self.center + displacement);
        let Some(info) = self
            .environment
            .closest_collision_with_margin(&trajectory, self.radius)
        else {
            self.commit(self.center + displacement);
            return;
        };

        let step = (info.distance() - SURFACE_CLEARANCE).clamp(0.0, travel);
        self.commit(self.center + displacement * (step / travel));
        self.resolve(&info);
    }

    /// Let the struck body compute the outgoing velocity
    fn resolve(&mut self, info: &CollisionInfo) {
        let point = info.collision_point();
        let before = self.velocity;
        let after = info.collision_object().borrow_mut().hit(self, point, before);
        log::trace!(
            "ball {} hit body {} at ({:.2}, {:.2}): {:?} -> {:?}",
            self.id,
            info.body_id(),
            point.x,
            point.y,
            before,
            after
        );
        if after.is_finite() {
            self.velocity = after;
        } else {
            log::error!("body {} returned non-finite velocity {:?}", info.body_id(), after);
        }
    }

    fn commit(&mut self, center: Point) {
        if center.is_finite() {
            self.center = center;
        } else {
            log::error!("ball {} resolved to non-finite center, move aborted", self.id);
        }
    }
}

impl Sprite for Ball {
    fn draw_on(&self, surface: &mut dyn DrawSurface) {
        surface.set_color(self.color);
        surface.fill_circle(self.center.x, self.center.y, self.radius);
        surface.set_color(Color::BLACK);
        surface.draw_circle(self.center.x, self.center.y, self.radius);
    }

    fn time_passed(&mut self, dt: f64) {
        self.move_one_step(dt);
    }
}
