//! Rectangular bodies: bricks, frame borders and the paddle's own body

use std::rc::Rc;

use super::ball::Ball;
use super::collidable::{BodyId, Collidable};
use super::geometry::{Point, Rectangle};
use super::listeners::HitListener;
use super::sprite::Sprite;
use super::velocity::Velocity;
use crate::approx_eq;
use crate::consts::EPSILON;
use crate::render::{Color, DrawSurface};

/// A brick-like body
pub struct Block {
    id: BodyId,
    rect: Rectangle,
    fill: Color,
    border: Option<Color>,
    /// Remaining hits before destruction; `None` never breaks (borders, paddle)
    hit_points: Option<u32>,
    listeners: Vec<Rc<dyn HitListener>>,
}

impl Block {
    pub fn new(id: BodyId, rect: Rectangle, fill: Color, hit_points: Option<u32>) -> Self {
        Self {
            id,
            rect,
            fill,
            border: None,
            hit_points,
            listeners: Vec::new(),
        }
    }

    /// Outline drawn on top of the fill
    pub fn with_border(mut self, border: Color) -> Self {
        self.border = Some(border);
        self
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn fill(&self) -> Color {
        self.fill
    }

    pub fn hit_points(&self) -> Option<u32> {
        self.hit_points
    }

    /// Destructible and out of hit points
    pub fn is_destroyed(&self) -> bool {
        self.hit_points == Some(0)
    }

    /// Swap in a new rectangle wholesale
    pub fn set_collision_rectangle(&mut self, rect: Rectangle) {
        self.rect = rect;
    }

    pub fn add_hit_listener(&mut self, listener: Rc<dyn HitListener>) {
        self.listeners.push(listener);
    }

    pub fn remove_hit_listener(&mut self, listener: &Rc<dyn HitListener>) {
        self.listeners.retain(|l| !Rc::ptr_eq(l, listener));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Tell every listener this block was just struck by `hitter`
    pub fn notify_hit(&self, hitter: &Ball) {
        let listeners = self.listeners.clone();
        for listener in &listeners {
            listener.hit_event(self, hitter);
        }
    }

    /// Elastic bounce off whichever face(s) `collision_point` lies on.
    ///
    /// The reflected component always points out of the struck face, so a
    /// ball grazing a face it is already leaving keeps leaving it.
    pub fn bounce(&self, collision_point: Point, current_velocity: Velocity) -> Velocity {
        let r = &self.rect;
        let p = collision_point;
        let within_x = p.x >= r.left() - EPSILON && p.x <= r.right() + EPSILON;
        let within_y = p.y >= r.top() - EPSILON && p.y <= r.bottom() + EPSILON;

        let mut v = current_velocity;
        if within_x && approx_eq(p.y, r.top()) {
            v.dy = -v.dy.abs();
        } else if within_x && approx_eq(p.y, r.bottom()) {
            v.dy = v.dy.abs();
        }
        if within_y && approx_eq(p.x, r.left()) {
            v.dx = -v.dx.abs();
        } else if within_y && approx_eq(p.x, r.right()) {
            v.dx = v.dx.abs();
        }
        v
    }
}

impl Collidable for Block {
    fn collision_rectangle(&self) -> Rectangle {
        self.rect
    }

    fn hit(&mut self, hitter: &Ball, collision_point: Point, current_velocity: Velocity) -> Velocity {
        let new_velocity = self.bounce(collision_point, current_velocity);
        if let Some(hp) = self.hit_points.as_mut() {
            *hp = hp.saturating_sub(1);
        }
        log::trace!(
            "block {} hit at ({:.2}, {:.2}), hit points now {:?}",
            self.id,
            collision_point.x,
            collision_point.y,
            self.hit_points
        );
        self.notify_hit(hitter);
        new_velocity
    }
}

impl Sprite for Block {
    fn draw_on(&self, surface: &mut dyn DrawSurface) {
        let r = &self.rect;
        surface.set_color(self.fill);
        surface.fill_rectangle(r.left(), r.top(), r.width(), r.height());
        if let Some(border) = self.border {
            surface.set_color(border);
            surface.draw_rectangle(r.left(), r.top(), r.width(), r.height());
        }
    }

    fn time_passed(&mut self, _dt: f64) {}
}
