pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Game rules that cannot be used on the given board.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("score_level_step must be positive")]
    ZeroLevelStep,
    #[display("{name} must be positive")]
    ZeroClockPeriod { name: &'static str },
    #[display("minimum clock period {minimum}ms exceeds initial clock period {initial}ms")]
    MinimumAboveInitial { minimum: u64, initial: u64 },
    #[display("line_clear_scores must not be empty")]
    EmptyScoreTable,
    #[display("board width {width} is too narrow for spawning, at least {required} required")]
    BoardTooNarrow { width: usize, required: usize },
    #[display("board height {height} is too short for spawning, at least {required} required")]
    BoardTooShort { height: usize, required: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseSeedError {
    #[display("invalid seed: expected 32 hex digits, got {len} characters")]
    InvalidLength { len: usize },
    #[display("invalid seed: {digit:?} is not a hex digit")]
    InvalidDigit { digit: char },
}
