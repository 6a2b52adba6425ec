//! Engine settings
//!
//! Screen geometry, frame layout and scoring. Loaded from JSON by the host;
//! any field left out takes its default.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{
    BALL_RADIUS, BALL_SPAWN_GAP, BORDER_THICKNESS, PADDLE_BOTTOM_MARGIN, PADDLE_HEIGHT,
    SCOREBOARD_HEIGHT, SCREEN_HEIGHT, SCREEN_WIDTH,
};
use crate::sim::paddle::BounceZones;

/// Settings that could not be loaded or make no sense
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Screen ===
    pub screen_width: f64,
    pub screen_height: f64,

    // === Frame ===
    /// Width of the left and right borders, height of the top border
    pub border_thickness: f64,
    /// Strip above the top border kept free for the score display
    pub scoreboard_height: f64,
    /// Height of the ball-eating border just below the screen
    pub death_border_thickness: f64,

    // === Paddle ===
    pub paddle_height: f64,
    /// Gap between the paddle's bottom and the bottom of the screen
    pub paddle_bottom_margin: f64,
    pub bounce_zones: BounceZones,

    // === Ball ===
    pub ball_radius: f64,
    /// Height of a new ball's center above the paddle top
    pub ball_spawn_gap: f64,

    // === Scoring ===
    pub block_hit_score: i64,
    pub block_destroy_bonus: i64,
    pub level_clear_bonus: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,

            border_thickness: BORDER_THICKNESS,
            scoreboard_height: SCOREBOARD_HEIGHT,
            death_border_thickness: BORDER_THICKNESS,

            paddle_height: PADDLE_HEIGHT,
            paddle_bottom_margin: PADDLE_BOTTOM_MARGIN,
            bounce_zones: BounceZones::default(),

            ball_radius: BALL_RADIUS,
            ball_spawn_gap: BALL_SPAWN_GAP,

            block_hit_score: 5,
            block_destroy_bonus: 10,
            level_clear_bonus: 100,
        }
    }
}

impl Settings {
    /// Parse and validate settings
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        log::info!(
            "Loaded settings: {}x{} screen",
            settings.screen_width,
            settings.screen_height
        );
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject sizes that cannot build a playable frame
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("border_thickness", self.border_thickness),
            ("death_border_thickness", self.death_border_thickness),
            ("paddle_height", self.paddle_height),
            ("ball_radius", self.ball_radius),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                });
            }
        }

        let non_negative = [
            ("scoreboard_height", self.scoreboard_height),
            ("paddle_bottom_margin", self.paddle_bottom_margin),
            ("ball_spawn_gap", self.ball_spawn_gap),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SettingsError::Invalid {
                    field,
                    reason: format!("must be zero or more, got {value}"),
                });
            }
        }

        if self.bounce_zones.count == 0 {
            return Err(SettingsError::Invalid {
                field: "bounce_zones.count",
                reason: "need at least one zone".to_string(),
            });
        }
        if 2.0 * self.border_thickness >= self.screen_width {
            return Err(SettingsError::Invalid {
                field: "border_thickness",
                reason: format!("side borders cover the {} px screen", self.screen_width),
            });
        }
        Ok(())
    }
}
