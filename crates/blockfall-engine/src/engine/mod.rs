//! Game rules and state management.
//!
//! This module drives the core data structures through play:
//!
//! - [`Game`] - Tick state machine (gravity, lock delay, line clearing, scoring, timers)
//! - [`GameConfig`] - Tunable rules with serde defaults
//! - [`GameEvent`] / [`EventKind`] - Notifications delivered to subscribers
//! - [`Clock`] / [`Timer`] - Virtual time and periodic timer handles
//! - [`GameSeed`] - Seed for deterministic figure generation
//!
//! # Game Flow
//!
//! Each tick of a running game:
//!
//! 1. Resets the game if the top row is occupied
//! 2. Moves the active figure down, or starts its lock delay when it cannot move
//! 3. Locks the figure into the board once the lock delay runs out
//! 4. Removes completed rows and scores them
//! 5. Refills the upcoming-figure queue and activates the next figure
//!
//! Between ticks the host moves and rotates the figure with
//! [`Game::try_move`] and [`Game::try_rotate`]. A timer-driven game speeds up
//! every time the score reaches a new level.
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Board, Game, GameConfig, MoveDirection};
//!
//! let mut game = Game::new(Board::new(10, 20), GameConfig::default()).unwrap();
//!
//! game.tick();
//! if game.try_move(MoveDirection::Down) {
//!     assert_eq!(game.score(), 1);
//! }
//! ```

pub use self::{clock::*, config::*, events::*, game::*, seed::*};

mod clock;
mod config;
mod events;
mod game;
mod seed;
