//! Level setup and the per-frame loop
//!
//! A level owns the shared collision environment and sprite collection,
//! builds the frame around the play field, and tracks blocks, balls, score
//! and lives through shared counters that the hit listeners update.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::block::Block;
use super::collidable::BodyId;
use super::environment::Environment;
use super::geometry::{GeometryError, Point, Rectangle};
use super::indicators::{LevelIndicator, LivesIndicator, ScoreIndicator};
use super::listeners::{BallRemover, BlockRemover, Counter, HitListener, ScoreTrackingListener};
use super::paddle::Paddle;
use super::sprite::SpriteCollection;
use super::velocity::Velocity;
use crate::input::{Control, KeyboardSensor};
use crate::render::{Color, DrawSurface};
use crate::settings::Settings;

/// One brick as described by a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSpec {
    pub rect: Rectangle,
    pub fill: Color,
    #[serde(default)]
    pub border: Option<Color>,
    /// `None` never breaks and does not count towards clearing the level
    #[serde(default)]
    pub hit_points: Option<u32>,
}

/// Everything that makes one level different from another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelInformation {
    pub name: String,
    pub paddle_width: f64,
    /// Pixels per second
    pub paddle_speed: f64,
    /// One ball per entry
    pub initial_ball_velocities: Vec<Velocity>,
    pub background: Color,
    pub blocks: Vec<BlockSpec>,
}

impl LevelInformation {
    pub fn number_of_balls(&self) -> usize {
        self.initial_ball_velocities.len()
    }

    /// Blocks that must be destroyed to clear the level
    pub fn blocks_to_remove(&self) -> usize {
        self.blocks.iter().filter(|b| b.hit_points.is_some()).count()
    }
}

/// Why a turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Every destructible block is gone
    LevelCleared,
    /// Every ball fell out the bottom
    BallsLost,
}

/// A level being played
pub struct GameLevel {
    info: LevelInformation,
    settings: Settings,
    keyboard: Rc<dyn KeyboardSensor>,

    environment: Rc<Environment>,
    sprites: Rc<SpriteCollection>,
    paddle: Option<Rc<RefCell<Paddle>>>,
    balls: Vec<Rc<RefCell<Ball>>>,

    remaining_blocks: Counter,
    remaining_balls: Counter,
    score: Counter,
    lives: Counter,
    /// Latched by the first `check_turn_end` that finds the turn over
    outcome: Cell<Option<TurnOutcome>>,

    next_id: u32,
}

impl GameLevel {
    pub fn new(
        info: LevelInformation,
        settings: Settings,
        keyboard: Rc<dyn KeyboardSensor>,
        lives: Counter,
        score: Counter,
    ) -> Self {
        Self {
            info,
            settings,
            keyboard,
            environment: Rc::new(Environment::new()),
            sprites: Rc::new(SpriteCollection::new()),
            paddle: None,
            balls: Vec::new(),
            remaining_blocks: Counter::default(),
            remaining_balls: Counter::default(),
            score,
            lives,
            outcome: Cell::new(None),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Collidable and drawn
    fn add_block(&self, block: Block) {
        let id = block.id();
        let handle = Rc::new(RefCell::new(block));
        self.environment.register(id, handle.clone());
        self.sprites.add(id, handle);
    }

    /// Build the frame and the level's blocks. Starts from an empty field,
    /// so calling it again resets the level.
    pub fn initialize(&mut self) -> Result<(), GeometryError> {
        self.environment = Rc::new(Environment::new());
        self.sprites = Rc::new(SpriteCollection::new());
        self.paddle = None;
        self.balls.clear();
        self.remaining_blocks = Counter::new(self.info.blocks_to_remove() as i64);
        self.remaining_balls = Counter::new(0);
        self.outcome.set(None);

        let s = &self.settings;
        let (width, height, thickness) = (s.screen_width, s.screen_height, s.border_thickness);
        let background = Rectangle::from_xywh(0.0, 0.0, width, height)?;
        let frame = [
            Rectangle::from_xywh(width - thickness, 0.0, thickness, height)?,
            Rectangle::from_xywh(0.0, 0.0, thickness, height)?,
            Rectangle::from_xywh(0.0, s.scoreboard_height, width, thickness)?,
        ];
        let death_zone = Rectangle::from_xywh(0.0, height, width, s.death_border_thickness)?;

        // Drawn under everything, never collides
        let id = self.allocate_id();
        let backdrop = Block::new(id, background, self.info.background, None);
        self.sprites.add(id, Rc::new(RefCell::new(backdrop)));

        for rect in frame {
            let id = self.allocate_id();
            self.add_block(Block::new(id, rect, Color::GRAY, None));
        }

        let ball_remover: Rc<dyn HitListener> = Rc::new(BallRemover::new(
            self.sprites.clone(),
            self.remaining_balls.clone(),
        ));
        let id = self.allocate_id();
        let mut death_border = Block::new(id, death_zone, Color::GRAY, None);
        death_border.add_hit_listener(ball_remover);
        self.add_block(death_border);

        let block_remover: Rc<dyn HitListener> = Rc::new(BlockRemover::new(
            self.environment.clone(),
            self.sprites.clone(),
            self.remaining_blocks.clone(),
        ));
        let score_tracker: Rc<dyn HitListener> = Rc::new(ScoreTrackingListener::new(
            self.score.clone(),
            self.settings.block_hit_score,
            self.settings.block_destroy_bonus,
        ));
        let specs = self.info.blocks.clone();
        for spec in specs {
            let id = self.allocate_id();
            let mut block = Block::new(id, spec.rect, spec.fill, spec.hit_points);
            if let Some(border) = spec.border {
                block = block.with_border(border);
            }
            block.add_hit_listener(block_remover.clone());
            block.add_hit_listener(score_tracker.clone());
            self.add_block(block);
        }

        let strip = Rectangle::from_xywh(0.0, 0.0, width, self.settings.scoreboard_height)?;
        let id = self.allocate_id();
        let score = ScoreIndicator::new(strip, self.score.clone());
        self.sprites.add(id, Rc::new(RefCell::new(score)));
        let id = self.allocate_id();
        let lives = LivesIndicator::new(strip, self.lives.clone());
        self.sprites.add(id, Rc::new(RefCell::new(lives)));
        let id = self.allocate_id();
        let level = LevelIndicator::new(strip, self.info.name.clone());
        self.sprites.add(id, Rc::new(RefCell::new(level)));

        log::info!(
            "Level '{}' ready: {} blocks, {} to clear",
            self.info.name,
            self.info.blocks.len(),
            self.remaining_blocks.value()
        );
        Ok(())
    }

    /// Center the paddle on the bottom margin and serve this level's balls
    /// from just above it
    pub fn start_turn(&mut self) -> Result<(), GeometryError> {
        let s = &self.settings;
        let paddle_rect = Rectangle::from_xywh(
            (s.screen_width - self.info.paddle_width) / 2.0,
            s.screen_height - s.paddle_bottom_margin - s.paddle_height,
            self.info.paddle_width,
            s.paddle_height,
        )?;

        let paddle = if let Some(paddle) = self.paddle.clone() {
            paddle.borrow_mut().set_collision_rectangle(paddle_rect);
            paddle
        } else {
            let id = self.allocate_id();
            let block = Block::new(id, paddle_rect, Color::ORANGE, None).with_border(Color::BLACK);
            let paddle = Paddle::new(block, self.keyboard.clone(), self.info.paddle_speed)
                .with_zones(self.settings.bounce_zones);
            let paddle = Rc::new(RefCell::new(paddle));
            self.paddle = Some(paddle.clone());
            paddle
        };

        let paddle_id = paddle.borrow().id();
        paddle.borrow_mut().set_environment(&self.environment);
        self.environment.register(paddle_id, paddle.clone());
        self.sprites.add(paddle_id, paddle.clone());

        self.balls.retain(|b| self.sprites.contains(b.borrow().id()));
        let serve = Point::new(
            paddle_rect.center().x,
            paddle_rect.top() - self.settings.ball_spawn_gap,
        );
        for velocity in self.info.initial_ball_velocities.clone() {
            let id = self.allocate_id();
            let mut ball = Ball::new(id, serve, self.settings.ball_radius, self.environment.clone());
            ball.set_velocity(velocity);
            let ball = Rc::new(RefCell::new(ball));
            self.sprites.add(id, ball.clone());
            self.balls.push(ball);
            self.remaining_balls.increase(1);
        }
        self.outcome.set(None);

        log::info!(
            "Turn started on '{}': {} balls, {} lives",
            self.info.name,
            self.remaining_balls.value(),
            self.lives.value()
        );
        Ok(())
    }

    /// Take the paddle out of play
    pub fn end_turn(&mut self) {
        if let Some(paddle) = &self.paddle {
            let id = paddle.borrow().id();
            self.environment.unregister(id);
            self.sprites.remove(id);
        }
        log::info!("Turn ended on '{}', score {}", self.info.name, self.score.value());
    }

    /// Draw everything, then advance everything by `dt` unless paused
    pub fn do_one_frame(&self, dt: f64, surface: &mut dyn DrawSurface) {
        self.sprites.draw_all_on(surface);
        if self.keyboard.is_pressed(Control::Pause) {
            return;
        }
        self.sprites.notify_all_time_passed(dt);
    }

    /// Whether the turn is over. Clearing the level pays the clear bonus;
    /// losing every ball costs a life. Both are settled once per turn; later
    /// calls report the same outcome without touching score or lives.
    pub fn check_turn_end(&self) -> Option<TurnOutcome> {
        if let Some(outcome) = self.outcome.get() {
            return Some(outcome);
        }
        let outcome = self.settle_turn()?;
        self.outcome.set(Some(outcome));
        Some(outcome)
    }

    fn settle_turn(&self) -> Option<TurnOutcome> {
        if self.remaining_blocks.value() <= 0 {
            self.score.increase(self.settings.level_clear_bonus);
            log::info!("Level '{}' cleared", self.info.name);
            return Some(TurnOutcome::LevelCleared);
        }
        if self.remaining_balls.value() <= 0 {
            self.lives.decrease(1);
            log::info!("All balls lost, {} lives left", self.lives.value());
            return Some(TurnOutcome::BallsLost);
        }
        None
    }

    pub fn info(&self) -> &LevelInformation {
        &self.info
    }

    pub fn environment(&self) -> &Rc<Environment> {
        &self.environment
    }

    pub fn sprites(&self) -> &Rc<SpriteCollection> {
        &self.sprites
    }

    pub fn paddle(&self) -> Option<&Rc<RefCell<Paddle>>> {
        self.paddle.as_ref()
    }

    /// Balls still on the field
    pub fn balls_in_play(&self) -> Vec<Rc<RefCell<Ball>>> {
        self.balls
            .iter()
            .filter(|b| self.sprites.contains(b.borrow().id()))
            .cloned()
            .collect()
    }

    pub fn remaining_blocks(&self) -> i64 {
        self.remaining_blocks.value()
    }

    pub fn remaining_balls(&self) -> i64 {
        self.remaining_balls.value()
    }

    pub fn score(&self) -> i64 {
        self.score.value()
    }

    pub fn lives(&self) -> i64 {
        self.lives.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputState;
    use crate::render::{DrawCommand, DrawList};
    use crate::sim::collidable::Collidable;

    const DT: f64 = 1.0 / 60.0;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn brick(x: f64, y: f64, hit_points: Option<u32>) -> BlockSpec {
        BlockSpec {
            rect: Rectangle::from_xywh(x, y, 50.0, 20.0).unwrap(),
            fill: Color::rgb(200, 30, 30),
            border: Some(Color::BLACK),
            hit_points,
        }
    }

    fn level_info(paddle_speed: f64, velocity: Velocity, blocks: Vec<BlockSpec>) -> LevelInformation {
        LevelInformation {
            name: "Direct Hit".to_string(),
            paddle_width: 100.0,
            paddle_speed,
            initial_ball_velocities: vec![velocity],
            background: Color::NAVY,
            blocks,
        }
    }

    fn start(info: LevelInformation, keyboard: &Rc<InputState>) -> GameLevel {
        init_logging();
        let mut level = GameLevel::new(
            info,
            Settings::default(),
            keyboard.clone(),
            Counter::new(3),
            Counter::new(0),
        );
        level.initialize().unwrap();
        level.start_turn().unwrap();
        level
    }

    fn run_until_turn_ends(level: &GameLevel, max_frames: usize) -> Option<TurnOutcome> {
        let mut surface = DrawList::new();
        for _ in 0..max_frames {
            level.do_one_frame(DT, &mut surface);
            surface.take();
            if let Some(outcome) = level.check_turn_end() {
                return Some(outcome);
            }
        }
        None
    }

    #[test]
    fn test_level_information_from_json() {
        let json = r#"{
            "name": "Direct Hit",
            "paddle_width": 100.0,
            "paddle_speed": 300.0,
            "initial_ball_velocities": [{"dx": 0.0, "dy": -300.0}],
            "background": {"r": 0, "g": 0, "b": 0},
            "blocks": [
                {"rect": {"upper_left": [375.0, 100.0], "width": 50.0, "height": 20.0},
                 "fill": {"r": 255, "g": 0, "b": 0}, "hit_points": 1},
                {"rect": {"upper_left": [0.0, 300.0], "width": 50.0, "height": 20.0},
                 "fill": {"r": 128, "g": 128, "b": 128}}
            ]
        }"#;
        let info: LevelInformation = serde_json::from_str(json).unwrap();
        assert_eq!(info.number_of_balls(), 1);
        assert_eq!(info.blocks.len(), 2);
        assert_eq!(info.blocks_to_remove(), 1);
        assert_eq!(info.blocks[1].hit_points, None);
    }

    #[test]
    fn test_setup_layout() {
        let keyboard = Rc::new(InputState::new());
        let info = level_info(300.0, Velocity::new(0.0, -300.0), vec![brick(375.0, 100.0, Some(1))]);
        let level = start(info, &keyboard);

        // 3 frame borders + death border + 1 brick + paddle
        assert_eq!(level.environment().len(), 6);
        // Those plus backdrop, three scoreboard indicators and ball
        assert_eq!(level.sprites().len(), 11);
        assert_eq!(level.remaining_blocks(), 1);
        assert_eq!(level.remaining_balls(), 1);

        let paddle = level.paddle().unwrap().borrow().collision_rectangle();
        assert_eq!(paddle.left(), 350.0);
        assert_eq!(paddle.bottom(), 600.0 - 23.0);
        assert_eq!(paddle.height(), 19.0);

        let ball = level.balls_in_play()[0].borrow().center();
        assert_eq!(ball, Point::new(400.0, paddle.top() - 10.0));
    }

    #[test]
    fn test_clearing_the_level() {
        let keyboard = Rc::new(InputState::new());
        let info = level_info(300.0, Velocity::new(0.0, -300.0), vec![brick(375.0, 100.0, Some(1))]);
        let level = start(info, &keyboard);

        let outcome = run_until_turn_ends(&level, 300);
        assert_eq!(outcome, Some(TurnOutcome::LevelCleared));
        assert_eq!(level.remaining_blocks(), 0);
        assert_eq!(level.environment().len(), 5);
        // hit + destroy + clear bonus
        assert_eq!(level.score(), 5 + 10 + 100);
        assert_eq!(level.lives(), 3);

        // Asking again pays nothing more
        assert_eq!(level.check_turn_end(), Some(TurnOutcome::LevelCleared));
        assert_eq!(level.score(), 115);

        // The ball came back down after breaking the brick
        let ball = level.balls_in_play()[0].borrow().velocity();
        assert!(ball.dy > 0.0);
    }

    #[test]
    fn test_losing_the_ball_costs_a_life() {
        let keyboard = Rc::new(InputState::new());
        // Fast paddle runs into the left wall on the first frame, out of the ball's way
        let info = level_info(30000.0, Velocity::new(0.0, 300.0), vec![brick(100.0, 200.0, Some(1))]);
        let mut level = start(info, &keyboard);
        keyboard.press(Control::Left);

        let outcome = run_until_turn_ends(&level, 120);
        assert_eq!(outcome, Some(TurnOutcome::BallsLost));
        assert_eq!(level.lives(), 2);
        assert_eq!(level.check_turn_end(), Some(TurnOutcome::BallsLost));
        assert_eq!(level.lives(), 2);
        assert!(level.balls_in_play().is_empty());
        let paddle = level.paddle().unwrap().borrow().collision_rectangle();
        assert!((paddle.left() - 26.0).abs() < 1e-6);

        // Next turn: paddle back in the middle, a fresh ball served
        keyboard.release_all();
        level.end_turn();
        assert_eq!(level.environment().len(), 5);
        level.start_turn().unwrap();
        assert_eq!(level.remaining_balls(), 1);
        assert_eq!(level.balls_in_play().len(), 1);
        let paddle = level.paddle().unwrap().borrow().collision_rectangle();
        assert_eq!(paddle.left(), 350.0);
        // Fresh turn, fresh outcome
        assert_eq!(level.check_turn_end(), None);
    }

    #[test]
    fn test_scoreboard_shows_score_lives_and_name() {
        let keyboard = Rc::new(InputState::new());
        let info = level_info(300.0, Velocity::new(0.0, -300.0), vec![brick(375.0, 100.0, Some(1))]);
        let level = start(info, &keyboard);

        let mut surface = DrawList::new();
        level.do_one_frame(DT, &mut surface);
        let texts: Vec<&str> = surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["Score: 0", "Lives: 3", "Level Name: Direct Hit"]);
    }

    #[test]
    fn test_pause_freezes_but_still_draws() {
        let keyboard = Rc::new(InputState::new());
        let info = level_info(300.0, Velocity::new(0.0, -300.0), vec![brick(375.0, 100.0, Some(1))]);
        let level = start(info, &keyboard);
        let before = level.balls_in_play()[0].borrow().center();

        keyboard.press(Control::Pause);
        let mut surface = DrawList::new();
        for _ in 0..10 {
            level.do_one_frame(DT, &mut surface);
        }
        assert_eq!(level.balls_in_play()[0].borrow().center(), before);
        assert!(surface
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::FillCircle { color: Color::WHITE, .. })));

        keyboard.release(Control::Pause);
        level.do_one_frame(DT, &mut surface);
        assert!(level.balls_in_play()[0].borrow().center().y < before.y);
    }

    #[test]
    fn test_indestructible_blocks_do_not_block_clearing() {
        let keyboard = Rc::new(InputState::new());
        let info = level_info(
            300.0,
            Velocity::new(0.0, -300.0),
            vec![brick(375.0, 100.0, None), brick(100.0, 100.0, Some(2))],
        );
        let level = start(info, &keyboard);
        assert_eq!(level.remaining_blocks(), 1);
        assert_eq!(level.check_turn_end(), None);
    }
}
