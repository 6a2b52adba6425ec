//! The contract shared by every body a ball can strike

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::geometry::{Point, Rectangle};
use super::velocity::Velocity;

/// Identity of a registered body, handed out by the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A rectangular body that balls bounce off
pub trait Collidable {
    /// Region the body occupies right now
    fn collision_rectangle(&self) -> Rectangle;

    /// Velocity `hitter` leaves with after striking this body at
    /// `collision_point` while moving at `current_velocity`
    fn hit(&mut self, hitter: &Ball, collision_point: Point, current_velocity: Velocity) -> Velocity;
}

/// Shared handle to a collidable. The environment only holds clones of these.
pub type CollidableRef = Rc<RefCell<dyn Collidable>>;

/// The nearest hit along one trajectory. Valid for the frame it was computed in.
#[derive(Clone)]
pub struct CollisionInfo {
    point: Point,
    distance: f64,
    body: BodyId,
    collidable: CollidableRef,
}

impl CollisionInfo {
    pub fn new(point: Point, distance: f64, body: BodyId, collidable: CollidableRef) -> Self {
        Self {
            point,
            distance,
            body,
            collidable,
        }
    }

    pub fn collision_point(&self) -> Point {
        self.point
    }

    /// How far along the query the contact happens
    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn body_id(&self) -> BodyId {
        self.body
    }

    pub fn collision_object(&self) -> &CollidableRef {
        &self.collidable
    }
}

impl fmt::Debug for CollisionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollisionInfo")
            .field("point", &self.point)
            .field("distance", &self.distance)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}
