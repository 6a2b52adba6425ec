//! Frame-reactive bodies and the collection that drives them

use std::cell::RefCell;
use std::rc::Rc;

use super::collidable::BodyId;
use crate::render::DrawSurface;

/// Something drawn every frame and told when time passes
pub trait Sprite {
    fn draw_on(&self, surface: &mut dyn DrawSurface);
    fn time_passed(&mut self, dt: f64);
}

pub type SpriteRef = Rc<RefCell<dyn Sprite>>;

/// Ordered sprites, drawn and notified in insertion order.
///
/// Shared as `Rc<SpriteCollection>`. Sprites may add or remove sprites,
/// themselves included, while being notified.
#[derive(Default)]
pub struct SpriteCollection {
    sprites: RefCell<Vec<(BodyId, SpriteRef)>>,
}

impl SpriteCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, id: BodyId, sprite: SpriteRef) {
        self.sprites.borrow_mut().push((id, sprite));
    }

    /// Remove `id`; false if it was not present
    pub fn remove(&self, id: BodyId) -> bool {
        let mut sprites = self.sprites.borrow_mut();
        let before = sprites.len();
        sprites.retain(|(sid, _)| *sid != id);
        sprites.len() != before
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.sprites.borrow().iter().any(|(sid, _)| *sid == id)
    }

    pub fn len(&self) -> usize {
        self.sprites.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.borrow().is_empty()
    }

    fn snapshot(&self) -> Vec<SpriteRef> {
        self.sprites
            .borrow()
            .iter()
            .map(|(_, sprite)| sprite.clone())
            .collect()
    }

    /// Advance every sprite by `dt`. Iterates over a copy of the handles
    /// taken before the first notification; sprites removed along the way
    /// still finish this frame, sprites added along the way start next frame.
    pub fn notify_all_time_passed(&self, dt: f64) {
        for sprite in self.snapshot() {
            sprite.borrow_mut().time_passed(dt);
        }
    }

    pub fn draw_all_on(&self, surface: &mut dyn DrawSurface) {
        for sprite in self.snapshot() {
            sprite.borrow().draw_on(surface);
        }
    }
}
