use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    ConfigError,
    core::{Board, MAX_SHAPE_HEIGHT, MAX_SHAPE_WIDTH},
};

/// Tunable rules of a game.
///
/// Every field is optional when deserialized; missing fields take their
/// default value.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{ "lock_delay_ticks": 2 }"#).unwrap();
/// assert_eq!(config.lock_delay_ticks, 2);
/// assert_eq!(config.next_figures, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GameConfig {
    /// Ticks a grounded figure waits before it locks.
    pub lock_delay_ticks: u32,
    /// Length of the upcoming-figure queue.
    pub next_figures: usize,
    pub initial_clock_period_ms: u64,
    pub minimum_clock_period_ms: u64,
    /// Period decrease per level gained.
    pub level_clock_step_ms: u64,
    pub render_clock_period_ms: u64,
    /// Score needed per level.
    pub score_level_step: u32,
    /// Score for clearing 1, 2, 3, 4 rows at once.
    ///
    /// Larger clears score the last entry.
    pub line_clear_scores: Vec<u32>,
    /// Score for a successful manual move down.
    pub soft_drop_score: u32,
    /// Columns kept free on both sides when choosing a spawn column.
    pub spawn_padding_x: usize,
    /// Row at which figures spawn.
    pub spawn_padding_top: usize,
    pub initial_score: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lock_delay_ticks: 5,
            next_figures: 3,
            initial_clock_period_ms: 300,
            minimum_clock_period_ms: 100,
            level_clock_step_ms: 50,
            render_clock_period_ms: 10,
            score_level_step: 100,
            line_clear_scores: vec![10, 25, 45, 70],
            soft_drop_score: 1,
            spawn_padding_x: 3,
            spawn_padding_top: 0,
            initial_score: 0,
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn initial_clock_period(&self) -> Duration {
        Duration::from_millis(self.initial_clock_period_ms)
    }

    #[must_use]
    pub fn minimum_clock_period(&self) -> Duration {
        Duration::from_millis(self.minimum_clock_period_ms)
    }

    #[must_use]
    pub fn level_clock_step(&self) -> Duration {
        Duration::from_millis(self.level_clock_step_ms)
    }

    #[must_use]
    pub fn render_clock_period(&self) -> Duration {
        Duration::from_millis(self.render_clock_period_ms)
    }

    /// Level reached at `score`.
    #[must_use]
    pub fn level_for(&self, score: u32) -> u32 {
        score / self.score_level_step.max(1)
    }

    /// Score awarded for clearing `count` rows at once.
    #[must_use]
    pub fn line_clear_score(&self, count: usize) -> u32 {
        if count == 0 {
            return 0;
        }
        let index = (count - 1).min(self.line_clear_scores.len().saturating_sub(1));
        self.line_clear_scores.get(index).copied().unwrap_or(0)
    }

    /// Checks that the rules are usable on `board`.
    pub fn validate(&self, board: &Board) -> Result<(), ConfigError> {
        if self.score_level_step == 0 {
            return Err(ConfigError::ZeroLevelStep);
        }
        if self.minimum_clock_period_ms == 0 {
            return Err(ConfigError::ZeroClockPeriod {
                name: "minimum_clock_period_ms",
            });
        }
        if self.render_clock_period_ms == 0 {
            return Err(ConfigError::ZeroClockPeriod {
                name: "render_clock_period_ms",
            });
        }
        if self.minimum_clock_period_ms > self.initial_clock_period_ms {
            return Err(ConfigError::MinimumAboveInitial {
                minimum: self.minimum_clock_period_ms,
                initial: self.initial_clock_period_ms,
            });
        }
        if self.line_clear_scores.is_empty() {
            return Err(ConfigError::EmptyScoreTable);
        }
        let required_width = self
            .spawn_padding_x
            .saturating_mul(2)
            .saturating_add(MAX_SHAPE_WIDTH);
        if board.width() < required_width {
            return Err(ConfigError::BoardTooNarrow {
                width: board.width(),
                required: required_width,
            });
        }
        let required_height = self.spawn_padding_top.saturating_add(MAX_SHAPE_HEIGHT);
        if board.height() < required_height {
            return Err(ConfigError::BoardTooShort {
                height: board.height(),
                required: required_height,
            });
        }
        Ok(())
    }
}
