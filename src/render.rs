//! Render sink
//!
//! The simulation never touches pixels. Each visible body describes itself
//! through [`DrawSurface`] once per frame, and a backend turns those calls
//! into actual drawing. [`DrawList`] records the calls as [`DrawCommand`]s.

use serde::{Deserialize, Serialize};

/// An opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const ORANGE: Color = Color::rgb(255, 200, 0);
    pub const NAVY: Color = Color::rgb(0, 0, 125);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packed as 0xRRGGBB
    pub fn to_hex(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

/// Drawing primitives a renderer must accept
pub trait DrawSurface {
    /// Color used by every following primitive
    fn set_color(&mut self, color: Color);
    fn fill_rectangle(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn draw_rectangle(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64);
    fn draw_circle(&mut self, x: f64, y: f64, radius: f64);
    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64);
    /// Text with its baseline starting at (x, y)
    fn draw_text(&mut self, x: f64, y: f64, text: &str, font_size: f64);
}

/// A recorded drawing primitive, tagged with the color active when it was issued
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect { color: Color, x: f64, y: f64, width: f64, height: f64 },
    StrokeRect { color: Color, x: f64, y: f64, width: f64, height: f64 },
    FillCircle { color: Color, x: f64, y: f64, radius: f64 },
    StrokeCircle { color: Color, x: f64, y: f64, radius: f64 },
    Line { color: Color, x1: f64, y1: f64, x2: f64, y2: f64 },
    Text { color: Color, x: f64, y: f64, text: String, font_size: f64 },
}

/// Frame draw list for a renderer backend
#[derive(Debug, Clone)]
pub struct DrawList {
    color: Color,
    commands: Vec<DrawCommand>,
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawList {
    pub fn new() -> Self {
        Self {
            color: Color::BLACK,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Hand the recorded frame to the backend and start a fresh one
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl DrawSurface for DrawList {
    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn fill_rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::FillRect {
            color: self.color,
            x,
            y,
            width,
            height,
        });
    }

    fn draw_rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::StrokeRect {
            color: self.color,
            x,
            y,
            width,
            height,
        });
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64) {
        self.commands.push(DrawCommand::FillCircle {
            color: self.color,
            x,
            y,
            radius,
        });
    }

    fn draw_circle(&mut self, x: f64, y: f64, radius: f64) {
        self.commands.push(DrawCommand::StrokeCircle {
            color: self.color,
            x,
            y,
            radius,
        });
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.commands.push(DrawCommand::Line {
            color: self.color,
            x1,
            y1,
            x2,
            y2,
        });
    }

    fn draw_text(&mut self, x: f64, y: f64, text: &str, font_size: f64) {
        self.commands.push(DrawCommand::Text {
            color: self.color,
            x,
            y,
            text: text.to_string(),
            font_size,
        });
    }
}
