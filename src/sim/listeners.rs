//! Hit notifications and the listeners that keep level bookkeeping

use std::cell::Cell;
use std::rc::Rc;

use super::ball::Ball;
use super::block::Block;
use super::environment::Environment;
use super::sprite::SpriteCollection;

/// Told once per resolved collision, after the bounce has been computed
pub trait HitListener {
    fn hit_event(&self, being_hit: &Block, hitter: &Ball);
}

/// Shared integer tally. Clones observe and update the same value.
#[derive(Debug, Clone, Default)]
pub struct Counter(Rc<Cell<i64>>);

impl Counter {
    pub fn new(value: i64) -> Self {
        Self(Rc::new(Cell::new(value)))
    }

    pub fn increase(&self, by: i64) {
        self.0.set(self.0.get() + by);
    }

    pub fn decrease(&self, by: i64) {
        self.0.set(self.0.get() - by);
    }

    pub fn value(&self) -> i64 {
        self.0.get()
    }
}

/// Takes destroyed blocks out of play
pub struct BlockRemover {
    environment: Rc<Environment>,
    sprites: Rc<SpriteCollection>,
    remaining_blocks: Counter,
}

impl BlockRemover {
    pub fn new(
        environment: Rc<Environment>,
        sprites: Rc<SpriteCollection>,
        remaining_blocks: Counter,
    ) -> Self {
        Self {
            environment,
            sprites,
            remaining_blocks,
        }
    }
}

impl HitListener for BlockRemover {
    fn hit_event(&self, being_hit: &Block, _hitter: &Ball) {
        if !being_hit.is_destroyed() {
            return;
        }
        let id = being_hit.id();
        // Unregistering twice would double-count
        if self.environment.unregister(id) {
            self.sprites.remove(id);
            self.remaining_blocks.decrease(1);
            log::debug!(
                "block {} destroyed, {} remaining",
                id,
                self.remaining_blocks.value()
            );
        }
    }
}

/// Takes balls that strike the block it listens to out of play
pub struct BallRemover {
    sprites: Rc<SpriteCollection>,
    remaining_balls: Counter,
}

impl BallRemover {
    pub fn new(sprites: Rc<SpriteCollection>, remaining_balls: Counter) -> Self {
        Self {
            sprites,
            remaining_balls,
        }
    }
}

impl HitListener for BallRemover {
    fn hit_event(&self, _being_hit: &Block, hitter: &Ball) {
        if self.sprites.remove(hitter.id()) {
            self.remaining_balls.decrease(1);
            log::debug!(
                "ball {} lost, {} remaining",
                hitter.id(),
                self.remaining_balls.value()
            );
        }
    }
}

/// Scores block hits and destructions
pub struct ScoreTrackingListener {
    score: Counter,
    hit_score: i64,
    destroy_bonus: i64,
}

impl ScoreTrackingListener {
    pub fn new(score: Counter, hit_score: i64, destroy_bonus: i64) -> Self {
        Self {
            score,
            hit_score,
            destroy_bonus,
        }
    }
}

impl HitListener for ScoreTrackingListener {
    fn hit_event(&self, being_hit: &Block, _hitter: &Ball) {
        self.score.increase(self.hit_score);
        if being_hit.is_destroyed() {
            self.score.increase(self.destroy_bonus);
        }
    }
}
