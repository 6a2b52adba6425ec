//! Collision index over every registered body
//!
//! A frame-recomputed linear scan: each query walks all registrations in
//! order, so the earliest registration wins ties between equally near hits.

use std::cell::RefCell;

use super::collidable::{BodyId, CollidableRef, CollisionInfo};
use super::geometry::{Point, Segment};
use crate::consts::EPSILON;

/// One registration: the body's id and a shared handle to it
#[derive(Clone)]
pub struct Obstacle {
    pub id: BodyId,
    pub body: CollidableRef,
}

/// Ordered set of collidable bodies.
///
/// Shared as `Rc<Environment>`. Every method borrows the registration list
/// only for its own duration, so bodies may register or unregister from
/// inside a hit or a time-passed notification.
#[derive(Default)]
pub struct Environment {
    obstacles: RefCell<Vec<Obstacle>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment over a copy of someone else's registrations
    pub fn from_obstacles(obstacles: Vec<Obstacle>) -> Self {
        Self {
            obstacles: RefCell::new(obstacles),
        }
    }

    pub fn register(&self, id: BodyId, body: CollidableRef) {
        self.obstacles.borrow_mut().push(Obstacle { id, body });
    }

    /// Drop the registration for `id`; false if it was not registered
    pub fn unregister(&self, id: BodyId) -> bool {
        let mut obstacles = self.obstacles.borrow_mut();
        let before = obstacles.len();
        obstacles.retain(|o| o.id != id);
        obstacles.len() != before
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.obstacles.borrow().iter().any(|o| o.id == id)
    }

    /// Snapshot of the current registrations, in order
    pub fn obstacles(&self) -> Vec<Obstacle> {
        self.obstacles.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.obstacles.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.borrow().is_empty()
    }

    /// Nearest boundary crossing along `trajectory`, with the body it belongs to
    pub fn closest_collision(&self, trajectory: &Segment) -> Option<CollisionInfo> {
        self.closest_collision_with_margin(trajectory, 0.0)
    }

    /// Nearest body a circle of radius `margin` meets while its center sweeps
    /// along `trajectory`.
    ///
    /// The reported point is where the circle touches the body's real
    /// boundary and the distance is how far the center travels before
    /// contact. Only entries count, so a sweep that starts touching a body
    /// and moves away from it is free to go.
    pub fn closest_collision_with_margin(
        &self,
        trajectory: &Segment,
        margin: f64,
    ) -> Option<CollisionInfo> {
        if trajectory.length() <= EPSILON {
            return None;
        }

        let obstacles = self.obstacles.borrow();
        let mut best: Option<(f64, &Obstacle, Point)> = None;

        for obstacle in obstacles.iter() {
            let rect = obstacle.body.borrow().collision_rectangle();
            let Some((center, contact)) = rect.swept_contact(trajectory, margin) else {
                continue;
            };
            let dist = trajectory.start.distance(center);
            match best {
                Some((best_dist, _, _)) if dist >= best_dist - EPSILON => {}
                _ => best = Some((dist, obstacle, contact)),
            }
        }

        best.map(|(dist, obstacle, point)| {
            CollisionInfo::new(point, dist, obstacle.id, obstacle.body.clone())
        })
    }

    /// Nearest body closer than `margin` to `center`, or containing it, with
    /// the closest point of that body's rectangle. A center inside the
    /// rectangle reports itself as the point.
    ///
    /// Anything strictly closer than `margin` counts, so every center the
    /// sweep treats as already inside a body is reported here.
    pub fn touching(&self, center: Point, margin: f64) -> Option<CollisionInfo> {
        let obstacles = self.obstacles.borrow();
        let mut best: Option<(f64, &Obstacle, Point)> = None;

        for obstacle in obstacles.iter() {
            let rect = obstacle.body.borrow().collision_rectangle();
            if rect.is_degenerate() {
                continue;
            }
            let point = rect.clamp_point(center);
            let dist = center.distance(point);
            if dist >= margin && !rect.contains_strictly(center) {
                continue;
            }
            match best {
                Some((best_dist, _, _)) if dist >= best_dist - EPSILON => {}
                _ => best = Some((dist, obstacle, point)),
            }
        }

        best.map(|(dist, obstacle, point)| {
            CollisionInfo::new(point, dist, obstacle.id, obstacle.body.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::points_coincide;
    use crate::render::Color;
    use crate::sim::block::Block;
    use crate::sim::geometry::Rectangle;
    use proptest::prelude::*;
    use std::rc::Rc;

    fn block(env: &Environment, id: u32, x: f64, y: f64, w: f64, h: f64) {
        let rect = Rectangle::from_xywh(x, y, w, h).unwrap();
        let body: CollidableRef = Rc::new(RefCell::new(Block::new(BodyId(id), rect, Color::GRAY, None)));
        env.register(BodyId(id), body);
    }

    fn down_at(x: f64) -> Segment {
        Segment::new(Point::new(x, 0.0), Point::new(x, 500.0))
    }

    #[test]
    fn test_empty_environment() {
        let env = Environment::new();
        assert!(env.is_empty());
        assert!(env.closest_collision(&down_at(10.0)).is_none());
    }

    #[test]
    fn test_trajectory_missing_everything() {
        let env = Environment::new();
        block(&env, 1, 100.0, 100.0, 50.0, 20.0);
        block(&env, 2, 300.0, 100.0, 50.0, 20.0);
        assert!(env.closest_collision(&down_at(200.0)).is_none());
    }

    #[test]
    fn test_single_hit_is_entry_point() {
        let env = Environment::new();
        block(&env, 1, 100.0, 100.0, 50.0, 20.0);

        let info = env.closest_collision(&down_at(120.0)).unwrap();
        assert_eq!(info.body_id(), BodyId(1));
        assert!(points_coincide(info.collision_point(), Point::new(120.0, 100.0)));

        let rect = info.collision_object().borrow().collision_rectangle();
        assert!((info.collision_point().y - rect.top()).abs() < 1e-9);
    }

    #[test]
    fn test_nearer_body_wins_regardless_of_order() {
        let env = Environment::new();
        block(&env, 1, 100.0, 300.0, 50.0, 20.0);
        block(&env, 2, 100.0, 100.0, 50.0, 20.0);

        let info = env.closest_collision(&down_at(120.0)).unwrap();
        assert_eq!(info.body_id(), BodyId(2));
        assert!(points_coincide(info.collision_point(), Point::new(120.0, 100.0)));
    }

    #[test]
    fn test_tie_goes_to_first_registered() {
        // Two bricks share the edge x = 100; a vertical trajectory down that
        // edge meets both top faces at the same point.
        let env = Environment::new();
        block(&env, 7, 50.0, 100.0, 50.0, 20.0);
        block(&env, 3, 100.0, 100.0, 50.0, 20.0);
        let info = env.closest_collision(&down_at(100.0)).unwrap();
        assert_eq!(info.body_id(), BodyId(7));

        let env = Environment::new();
        block(&env, 3, 100.0, 100.0, 50.0, 20.0);
        block(&env, 7, 50.0, 100.0, 50.0, 20.0);
        let info = env.closest_collision(&down_at(100.0)).unwrap();
        assert_eq!(info.body_id(), BodyId(3));
    }

    #[test]
    fn test_zero_length_trajectory() {
        let env = Environment::new();
        block(&env, 1, 0.0, 0.0, 50.0, 50.0);
        let p = Point::new(0.0, 25.0);
        assert!(env.closest_collision(&Segment::new(p, p)).is_none());
    }

    #[test]
    fn test_register_and_unregister() {
        let env = Environment::new();
        block(&env, 1, 100.0, 100.0, 50.0, 20.0);
        block(&env, 2, 100.0, 300.0, 50.0, 20.0);
        assert_eq!(env.len(), 2);

        assert!(env.unregister(BodyId(1)));
        assert!(!env.unregister(BodyId(1)));
        assert!(!env.contains(BodyId(1)));

        let info = env.closest_collision(&down_at(120.0)).unwrap();
        assert_eq!(info.body_id(), BodyId(2));
    }

    #[test]
    fn test_copied_environment_is_independent() {
        let env = Environment::new();
        block(&env, 1, 100.0, 100.0, 50.0, 20.0);
        let copy = Environment::from_obstacles(env.obstacles());

        block(&env, 2, 0.0, 0.0, 10.0, 10.0);
        assert_eq!(copy.len(), 1);
        assert!(copy.contains(BodyId(1)));
    }

    #[test]
    fn test_margin_sweep_reports_real_boundary() {
        let env = Environment::new();
        block(&env, 1, 100.0, 100.0, 50.0, 20.0);

        let info = env
            .closest_collision_with_margin(&down_at(120.0), 5.0)
            .unwrap();
        assert!(points_coincide(info.collision_point(), Point::new(120.0, 100.0)));
        assert!((info.distance() - 95.0).abs() < 1e-9);

        // Passes 3 px beside the brick: the center misses, a 5 px circle
        // catches the corner 4 px above the top face
        let info = env
            .closest_collision_with_margin(&down_at(97.0), 5.0)
            .unwrap();
        assert!(points_coincide(info.collision_point(), Point::new(100.0, 100.0)));
        assert!((info.distance() - 96.0).abs() < 1e-9);
        assert!(env.closest_collision(&down_at(97.0)).is_none());
    }

    #[test]
    fn test_margin_sweep_clears_corner() {
        let env = Environment::new();
        block(&env, 1, 100.0, 100.0, 50.0, 20.0);
        // Closest approach to (150, 100) is about 6 px
        let line = Segment::new(Point::new(140.0, 81.51), Point::new(190.0, 131.51));
        assert!(env.closest_collision_with_margin(&line, 5.0).is_none());
    }

    #[test]
    fn test_start_inside_body_is_not_a_collision() {
        let env = Environment::new();
        block(&env, 1, 0.0, 0.0, 100.0, 100.0);
        let line = Segment::new(Point::new(50.0, 50.0), Point::new(50.0, -50.0));
        assert!(env.closest_collision(&line).is_none());
    }

    #[test]
    fn test_touching() {
        let env = Environment::new();
        block(&env, 1, 100.0, 100.0, 50.0, 20.0);

        let info = env.touching(Point::new(120.0, 97.0), 5.0).unwrap();
        assert_eq!(info.body_id(), BodyId(1));
        assert!(points_coincide(info.collision_point(), Point::new(120.0, 100.0)));
        assert!((info.distance() - 3.0).abs() < 1e-9);

        // Exactly one radius away is resting contact, not overlap
        assert!(env.touching(Point::new(120.0, 95.0), 5.0).is_none());
        assert!(env.touching(Point::new(120.0, 50.0), 5.0).is_none());

        // Any overlap at all, however shallow
        let info = env.touching(Point::new(120.0, 95.0 + 5e-7), 5.0).unwrap();
        assert!(points_coincide(info.collision_point(), Point::new(120.0, 100.0)));

        // Inside the grown square's corner but outside the rounded shape
        assert!(env.touching(Point::new(154.0, 96.0), 5.0).is_none());
    }

    proptest! {
        #[test]
        fn prop_far_trajectories_never_collide(
            x in 0.0f64..700.0,
            y in 0.0f64..500.0,
            w in 1.0f64..100.0,
            h in 1.0f64..100.0,
            dx in -400.0f64..400.0,
        ) {
            let env = Environment::new();
            block(&env, 1, x, y, w, h);
            // Entirely above the rectangle
            let above = y - 10.0;
            let line = Segment::new(Point::new(x - 50.0, above), Point::new(x + dx, above - 5.0));
            prop_assert!(env.closest_collision(&line).is_none());
        }
    }
}
