//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Single-threaded, frame-stepped by the caller
//! - Stable iteration order (registration order)
//! - No rendering or platform dependencies beyond the draw and input traits

pub mod ball;
pub mod block;
pub mod collidable;
pub mod environment;
pub mod geometry;
pub mod indicators;
pub mod level;
pub mod listeners;
pub mod paddle;
pub mod sprite;
pub mod velocity;

pub use ball::Ball;
pub use block::Block;
pub use collidable::{BodyId, Collidable, CollidableRef, CollisionInfo};
pub use environment::{Environment, Obstacle};
pub use geometry::{GeometryError, Point, Rectangle, Segment};
pub use indicators::{LevelIndicator, LivesIndicator, ScoreIndicator};
pub use level::{BlockSpec, GameLevel, LevelInformation, TurnOutcome};
pub use listeners::{BallRemover, BlockRemover, Counter, HitListener, ScoreTrackingListener};
pub use paddle::{BounceZones, Paddle};
pub use sprite::{Sprite, SpriteCollection, SpriteRef};
pub use velocity::Velocity;
