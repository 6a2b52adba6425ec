//! Scoreboard strip above the playing field
//!
//! Three sprites share the strip: the score paints the white background and
//! its own text, then lives and level name are written over it. None of them
//! collide or react to time.

use super::geometry::Rectangle;
use super::listeners::Counter;
use super::sprite::Sprite;
use crate::render::{Color, DrawSurface};

/// Text height as a share of the strip height
const FONT_SCALE: f64 = 0.75;

/// Baseline of strip text, font size
fn text_metrics(strip: &Rectangle) -> (f64, f64) {
    let font_size = strip.height() * FONT_SCALE;
    (strip.top() + font_size, font_size)
}

/// Live score, centered in the strip
pub struct ScoreIndicator {
    strip: Rectangle,
    score: Counter,
}

impl ScoreIndicator {
    pub fn new(strip: Rectangle, score: Counter) -> Self {
        Self { strip, score }
    }
}

impl Sprite for ScoreIndicator {
    fn draw_on(&self, surface: &mut dyn DrawSurface) {
        let r = &self.strip;
        surface.set_color(Color::WHITE);
        surface.fill_rectangle(r.left(), r.top(), r.width(), r.height());

        let (baseline, font_size) = text_metrics(r);
        surface.set_color(Color::BLACK);
        surface.draw_text(
            r.left() + r.width() * 0.45,
            baseline,
            &format!("Score: {}", self.score.value()),
            font_size,
        );
    }

    fn time_passed(&mut self, _dt: f64) {}
}

/// Lives left, on the left of the strip
pub struct LivesIndicator {
    strip: Rectangle,
    lives: Counter,
}

impl LivesIndicator {
    pub fn new(strip: Rectangle, lives: Counter) -> Self {
        Self { strip, lives }
    }
}

impl Sprite for LivesIndicator {
    fn draw_on(&self, surface: &mut dyn DrawSurface) {
        let (baseline, font_size) = text_metrics(&self.strip);
        surface.set_color(Color::BLACK);
        surface.draw_text(
            self.strip.left() + self.strip.width() * 0.15,
            baseline,
            &format!("Lives: {}", self.lives.value()),
            font_size,
        );
    }

    fn time_passed(&mut self, _dt: f64) {}
}

/// Level name, on the right of the strip
pub struct LevelIndicator {
    strip: Rectangle,
    name: String,
}

impl LevelIndicator {
    pub fn new(strip: Rectangle, name: impl Into<String>) -> Self {
        Self {
            strip,
            name: name.into(),
        }
    }
}

impl Sprite for LevelIndicator {
    fn draw_on(&self, surface: &mut dyn DrawSurface) {
        let (baseline, font_size) = text_metrics(&self.strip);
        surface.set_color(Color::BLACK);
        surface.draw_text(
            self.strip.left() + self.strip.width() * 0.7,
            baseline,
            &format!("Level Name: {}", self.name),
            font_size,
        );
    }

    fn time_passed(&mut self, _dt: f64) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawCommand, DrawList};

    fn strip() -> Rectangle {
        Rectangle::from_xywh(0.0, 0.0, 800.0, 20.0).unwrap()
    }

    fn texts(list: &DrawList) -> Vec<String> {
        list.commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_score_follows_counter() {
        let score = Counter::new(0);
        let indicator = ScoreIndicator::new(strip(), score.clone());

        let mut list = DrawList::new();
        indicator.draw_on(&mut list);
        assert!(matches!(
            list.commands()[0],
            DrawCommand::FillRect { color: Color::WHITE, width, height, .. }
                if width == 800.0 && height == 20.0
        ));
        assert_eq!(texts(&list), vec!["Score: 0"]);

        score.increase(115);
        let mut list = DrawList::new();
        indicator.draw_on(&mut list);
        assert_eq!(texts(&list), vec!["Score: 115"]);
    }

    #[test]
    fn test_lives_and_level_name() {
        let lives = Counter::new(3);
        let mut list = DrawList::new();
        LivesIndicator::new(strip(), lives.clone()).draw_on(&mut list);
        lives.decrease(1);
        LivesIndicator::new(strip(), lives).draw_on(&mut list);
        LevelIndicator::new(strip(), "Direct Hit").draw_on(&mut list);
        assert_eq!(texts(&list), vec!["Lives: 3", "Lives: 2", "Level Name: Direct Hit"]);
    }

    #[test]
    fn test_text_sits_inside_strip() {
        let mut list = DrawList::new();
        LevelIndicator::new(strip(), "x").draw_on(&mut list);
        let DrawCommand::Text { x, y, font_size, color, .. } = &list.commands()[0] else {
            panic!("expected text");
        };
        assert_eq!(*color, Color::BLACK);
        assert_eq!(*x, 560.0);
        assert_eq!(*y, 15.0);
        assert_eq!(*font_size, 15.0);
    }
}
