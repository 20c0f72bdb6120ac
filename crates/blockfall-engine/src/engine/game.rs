use std::{collections::VecDeque, fmt, time::Duration};

use rand::Rng as _;
use rand_pcg::Pcg32;

use crate::{
    ConfigError,
    core::{Board, Cell, Figure, MoveDirection, Position, RotateDirection},
};

use super::{
    clock::{Clock, Timer},
    config::GameConfig,
    events::{EventBus, EventKind, GameEvent},
    seed::GameSeed,
};

/// Callback invoked by the render timer with read access to the game.
pub type Renderer = Box<dyn FnMut(&Game)>;

/// Whether a downward move is a player action or gravity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveSource {
    Player,
    Gravity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerSlot {
    Tick,
    Render,
}

/// A running game: board, active figure, queue, score and timers.
///
/// The game advances one step per [`Self::tick`]. Hosts either call `tick`
/// directly or [`Self::start`] the game and feed elapsed time through
/// [`Self::advance`], which fires the tick and render timers.
///
/// # Example
///
/// ```
/// use std::{cell::Cell, rc::Rc, time::Duration};
///
/// use blockfall_engine::{Board, EventKind, Game, GameConfig, GameSeed};
///
/// let seed = GameSeed::from_bytes([1; 16]);
/// let mut game = Game::with_seed(Board::new(10, 20), GameConfig::default(), seed).unwrap();
///
/// let ticks = Rc::new(Cell::new(0));
/// {
///     let ticks = Rc::clone(&ticks);
///     game.on(EventKind::Tick, move |_| ticks.set(ticks.get() + 1));
/// }
///
/// game.start(|_game| {});
/// game.advance(Duration::from_millis(1000));
///
/// assert_eq!(ticks.get(), 3);
/// assert!(game.figure().is_some());
/// ```
pub struct Game {
    config: GameConfig,
    seed: GameSeed,
    rng: Pcg32,
    board: Board,
    figure: Option<Figure>,
    next_figures: VecDeque<Figure>,
    score: u32,
    clock_period: Duration,
    timer_level: u32,
    events: EventBus,
    clock: Clock,
    tick_timer: Option<Timer>,
    render_timer: Option<Timer>,
    renderer: Option<Renderer>,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("seed", &self.seed)
            .field("board", &self.board)
            .field("figure", &self.figure)
            .field("next_figures", &self.next_figures)
            .field("score", &self.score)
            .field("clock_period", &self.clock_period)
            .field("elapsed", &self.clock.now())
            .field("tick_timer", &self.tick_timer)
            .field("render_timer", &self.render_timer)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl Game {
    /// Creates a paused game on `board` with a random seed.
    ///
    /// The board is used as given, so a host can prepare cells with
    /// [`Board::set_cell`] first. No figure is active until the first tick.
    pub fn new(board: Board, config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_seed(board, config, rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for a deterministic
    /// figure sequence.
    pub fn with_seed(board: Board, config: GameConfig, seed: GameSeed) -> Result<Self, ConfigError> {
        config.validate(&board)?;
        Ok(Self {
            seed,
            rng: seed.rng(),
            board,
            figure: None,
            next_figures: VecDeque::with_capacity(config.next_figures + 1),
            score: config.initial_score,
            clock_period: config.initial_clock_period(),
            timer_level: config.level_for(config.initial_score),
            events: EventBus::new(),
            clock: Clock::new(),
            tick_timer: None,
            render_timer: None,
            renderer: None,
            config,
        })
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn figure(&self) -> Option<&Figure> {
        self.figure.as_ref()
    }

    pub fn next_figures(&self) -> impl Iterator<Item = &Figure> + '_ {
        self.next_figures.iter()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.config.level_for(self.score)
    }

    /// Current period of the tick timer.
    #[must_use]
    pub fn clock_period(&self) -> Duration {
        self.clock_period
    }

    /// `true` while no tick timer is scheduled, including before the first
    /// [`Self::start`].
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.tick_timer.is_none()
    }

    /// `true` if the top row holds a locked cell; the next tick resets the game.
    #[must_use]
    pub fn has_lost(&self) -> bool {
        self.board.is_row_occupied(0)
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn seed(&self) -> GameSeed {
        self.seed
    }

    /// Virtual time fed through [`Self::advance`].
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.clock.now()
    }

    /// Time until the next timer fires, `None` if no timer is scheduled.
    #[must_use]
    pub fn next_timer_in(&self) -> Option<Duration> {
        [&self.tick_timer, &self.render_timer]
            .into_iter()
            .flatten()
            .map(Timer::due)
            .min()
            .map(|due| due.saturating_sub(self.clock.now()))
    }

    /// Subscribes `callback` to events of `kind`.
    pub fn on<F>(&mut self, kind: EventKind, callback: F)
    where
        F: FnMut(&GameEvent) + 'static,
    {
        self.events.on(kind, callback);
    }

    /// Replaces the active figure. Meant for debugging and test hosts.
    pub fn set_figure(&mut self, figure: Figure) {
        self.figure = Some(figure);
    }

    /// Moves the active figure one cell if the target is free.
    ///
    /// A successful move down earns the soft drop score. Returns `false`
    /// without changing anything if there is no active figure or the move is
    /// blocked.
    pub fn try_move(&mut self, direction: MoveDirection) -> bool {
        self.move_figure(direction, MoveSource::Player)
    }

    /// Turns the active figure a quarter if the result is free. No wall kicks.
    pub fn try_rotate(&mut self, direction: RotateDirection) -> bool {
        let Some(figure) = &mut self.figure else {
            return false;
        };
        let mut moved = figure.clone();
        moved.rotate(direction);
        if self.board.collides(&moved) {
            return false;
        }
        *figure = moved;
        true
    }

    fn move_figure(&mut self, direction: MoveDirection, source: MoveSource) -> bool {
        let Some(figure) = &mut self.figure else {
            return false;
        };
        let mut moved = figure.clone();
        moved.shift(direction);
        if self.board.collides(&moved) {
            return false;
        }
        *figure = moved;
        if direction.is_down() && source == MoveSource::Player {
            self.score = self.score.saturating_add(self.config.soft_drop_score);
        }
        true
    }

    /// Runs one step of the game.
    ///
    /// In order: the loss check (which resets the game and ends the step),
    /// gravity, the lock delay, line clearing after a lock, refilling the
    /// queue, and finally the [`GameEvent::Tick`] notification.
    ///
    /// A figure that would lock outside the board is discarded and the step
    /// ends early. This is reported with [`log::error!`], so hosts need a
    /// `log` logger installed to see it.
    pub fn tick(&mut self) {
        if self.has_lost() {
            self.events.emit(&GameEvent::Lose);
            self.reset();
            return;
        }

        self.apply_gravity();

        let fixed = match self.fix_figure() {
            Ok(fixed) => fixed,
            Err(FixOutOfBounds { position }) => {
                log::error!(
                    "figure at ({}, {}) locks outside the board, discarding it",
                    position.x,
                    position.y
                );
                self.figure = None;
                return;
            }
        };
        if fixed {
            let count = self.board.remove_completed_rows();
            self.events.emit(&GameEvent::CompletedLines { count });
            if count > 0 {
                let points = self.config.line_clear_score(count);
                self.score = self.score.saturating_add(points);
            }
        }

        self.add_new_figures();
        self.events.emit(&GameEvent::Tick);
    }

    fn apply_gravity(&mut self) {
        if self.figure.is_none() {
            return;
        }
        let moved = self.move_figure(MoveDirection::Down, MoveSource::Gravity);
        let lock_delay = self.config.lock_delay_ticks;
        if let Some(figure) = &mut self.figure {
            if moved {
                figure.set_ticks_to_fix(None);
            } else if figure.ticks_to_fix().is_none() {
                figure.set_ticks_to_fix(Some(lock_delay));
            }
        }
    }

    /// Counts down the lock delay and writes the figure into the board when
    /// it expires. Returns whether the figure was locked.
    fn fix_figure(&mut self) -> Result<bool, FixOutOfBounds> {
        let Some(figure) = &mut self.figure else {
            return Ok(false);
        };
        match figure.ticks_to_fix() {
            None => return Ok(false),
            Some(ticks @ 1..) => {
                figure.set_ticks_to_fix(Some(ticks - 1));
                return Ok(false);
            }
            Some(0) => {}
        }

        let position = figure.position();
        let in_bounds = figure.occupied_positions().all(|(x, y, _)| {
            usize::try_from(x).is_ok_and(|x| x < self.board.width())
                && usize::try_from(y).is_ok_and(|y| y < self.board.height())
        });
        if !in_bounds {
            return Err(FixOutOfBounds { position });
        }

        let color = figure.color();
        for (x, y, _) in figure.occupied_positions() {
            if let Some(cell) = self.board.cell_mut(x, y) {
                *cell = Cell::filled(color);
            }
        }
        self.figure = None;
        Ok(true)
    }

    fn add_new_figures(&mut self) {
        let wanted = self.config.next_figures + usize::from(self.figure.is_none());
        while self.next_figures.len() < wanted {
            let figure = self.spawn_figure();
            self.next_figures.push_back(figure);
        }
        if self.figure.is_none() {
            self.figure = self.next_figures.pop_front();
        }
    }

    /// Draws a random shape at a random column keeping the horizontal
    /// padding free on both sides.
    fn spawn_figure(&mut self) -> Figure {
        let width = self.board.width();
        let padding = self.config.spawn_padding_x;
        let top = to_coordinate(self.config.spawn_padding_top);
        Figure::spawn(&mut self.rng, None, |rng, shape| {
            let last_x = width
                .saturating_sub(padding.saturating_add(shape.width()))
                .max(padding);
            Position::new(to_coordinate(rng.random_range(padding..=last_x)), top)
        })
    }

    fn reset(&mut self) {
        log::debug!("game lost at score {}, resetting", self.score);
        self.board = Board::new(self.board.width(), self.board.height());
        self.figure = None;
        self.next_figures.clear();
        self.score = self.config.initial_score;
        self.clock_period = self.config.initial_clock_period();
    }

    /// Stops the tick timer. The render timer keeps running.
    pub fn pause(&mut self) {
        self.tick_timer = None;
    }

    /// Schedules the tick timer at the current clock period.
    ///
    /// Does nothing if the game is already running.
    pub fn resume(&mut self) {
        if self.tick_timer.is_some() {
            return;
        }
        self.timer_level = self.level();
        self.tick_timer = Some(self.clock.schedule(self.clock_period));
    }

    /// Installs `renderer` on the render timer and resumes the game.
    pub fn start<F>(&mut self, renderer: F)
    where
        F: FnMut(&Game) + 'static,
    {
        self.renderer = Some(Box::new(renderer));
        self.render_timer = Some(self.clock.schedule(self.config.render_clock_period()));
        self.resume();
    }

    /// Moves virtual time forward by `elapsed`, firing every timer that
    /// comes due on the way in deadline order.
    ///
    /// Virtual time saturates at [`Duration::MAX`]; timers whose deadline
    /// saturates stop firing.
    pub fn advance(&mut self, elapsed: Duration) {
        let target = self.clock.now().saturating_add(elapsed);
        while let Some(slot) = self.next_due(target) {
            let timer = match slot {
                TimerSlot::Tick => self.tick_timer.as_mut(),
                TimerSlot::Render => self.render_timer.as_mut(),
            };
            let Some(timer) = timer else {
                break;
            };
            self.clock.advance_to(timer.due());
            timer.reschedule();
            match slot {
                TimerSlot::Tick => self.on_tick_timer(),
                TimerSlot::Render => self.render(),
            }
        }
        self.clock.advance_to(target);
    }

    fn next_due(&self, target: Duration) -> Option<TimerSlot> {
        [
            (TimerSlot::Tick, &self.tick_timer),
            (TimerSlot::Render, &self.render_timer),
        ]
        .into_iter()
        .filter_map(|(slot, timer)| timer.as_ref().map(|timer| (slot, timer)))
        .filter(|(_, timer)| timer.is_pending() && timer.due() <= target)
        .min_by_key(|(_, timer)| timer.order_key())
        .map(|(slot, _)| slot)
    }

    fn on_tick_timer(&mut self) {
        self.tick();

        let level = self.level();
        if level > self.timer_level {
            self.clock_period = self
                .clock_period
                .saturating_sub(self.config.level_clock_step())
                .max(self.config.minimum_clock_period());
            log::debug!(
                "level {level} reached, clock period is now {:?}",
                self.clock_period
            );
        }
        self.timer_level = level;

        if self
            .tick_timer
            .as_ref()
            .is_some_and(|timer| timer.period() != self.clock_period)
        {
            log::debug!("replacing tick timer, period {:?}", self.clock_period);
            self.tick_timer = Some(self.clock.schedule(self.clock_period));
        }
    }

    fn render(&mut self) {
        if let Some(mut renderer) = self.renderer.take() {
            renderer(self);
            self.renderer = Some(renderer);
        }
    }
}

/// Lock-time check failure: a figure cell lies outside the board.
#[derive(Debug)]
struct FixOutOfBounds {
    position: Position,
}

fn to_coordinate(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use std::{
        cell::{Cell, RefCell},
        rc::Rc,
    };

    use super::*;
    use crate::core::{Cell as BoardCell, Rotation, ShapeKind};

    const MS: Duration = Duration::from_millis(1);

    fn seed() -> GameSeed {
        GameSeed::from_bytes(*b"blockfall-tests!")
    }

    fn game(board: Board) -> Game {
        Game::with_seed(board, GameConfig::default(), seed()).unwrap()
    }

    fn representation(board: &Board) -> Vec<String> {
        board
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| if cell.is_occupied() { 'x' } else { '_' })
                    .collect()
            })
            .collect()
    }

    fn counter(game: &mut Game, kind: EventKind) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let probe = Rc::clone(&count);
        game.on(kind, move |_| probe.set(probe.get() + 1));
        count
    }

    fn figure(kind: ShapeKind, x: i32, y: i32) -> Figure {
        Figure::new(kind, Position::new(x, y))
    }

    #[test]
    fn test_new_game_is_idle() {
        let game = game(Board::new(10, 10));
        assert!(game.figure().is_none());
        assert_eq!(game.next_figures().count(), 0);
        assert_eq!(game.score(), 0);
        assert!(game.is_paused());
        assert!(!game.has_lost());
        assert_eq!(game.next_timer_in(), None);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GameConfig {
            line_clear_scores: vec![],
            ..GameConfig::default()
        };
        assert_eq!(
            Game::new(Board::new(10, 10), config).unwrap_err(),
            ConfigError::EmptyScoreTable
        );
        assert!(matches!(
            Game::new(Board::new(5, 10), GameConfig::default()),
            Err(ConfigError::BoardTooNarrow { .. })
        ));
    }

    #[test]
    fn test_first_tick_spawns_figures() {
        let mut game = game(Board::new(10, 10));
        game.tick();
        let figure = game.figure().unwrap();
        assert_eq!(figure.position().y, 0);
        assert_eq!(game.next_figures().count(), 3);
        for figure in game.next_figures().chain(game.figure()) {
            let x = usize::try_from(figure.position().x).unwrap();
            assert!(x >= 3);
            assert!(x + figure.cells().width() <= 7);
        }
    }

    #[test]
    fn test_lose_when_top_row_occupied() {
        let mut board = Board::new(10, 10);
        board.set_cell(2, 0, BoardCell::BLOCKED);
        let game = game(board);
        assert!(game.has_lost());
    }

    #[test]
    fn test_figure_locks_after_lock_delay() {
        let mut game = game(Board::new(10, 10));
        let lines = counter(&mut game, EventKind::CompletedLines);
        game.set_figure(figure(ShapeKind::L, 3, 7));

        for _ in 0..5 {
            game.tick();
            assert_eq!(game.figure().unwrap().position(), Position::new(3, 7));
        }
        assert_eq!(game.figure().unwrap().ticks_to_fix(), Some(0));
        assert!(representation(game.board()).iter().all(|row| !row.contains('x')));

        game.tick();
        assert_eq!(
            representation(game.board()),
            vec![
                "__________",
                "__________",
                "__________",
                "__________",
                "__________",
                "__________",
                "__________",
                "___x______",
                "___x______",
                "___xx_____",
            ]
        );
        assert_eq!(game.board().cell(3, 9).unwrap().color(), Some(ShapeKind::L));
        assert_eq!(game.figure().unwrap().position().y, 0);
        assert_eq!(game.next_figures().count(), 3);
        assert_eq!(lines.get(), 1);
    }

    #[test]
    fn test_custom_lock_delay() {
        let config = GameConfig {
            lock_delay_ticks: 1,
            ..GameConfig::default()
        };
        let mut game = Game::with_seed(Board::new(10, 10), config, seed()).unwrap();
        game.set_figure(figure(ShapeKind::O, 0, 8));
        game.tick();
        game.tick();
        assert!(game.board().cell(0, 9).unwrap().is_occupied());
    }

    #[test]
    fn test_gravity_resets_lock_delay() {
        let mut board = Board::new(10, 10);
        board.set_cell(4, 5, BoardCell::BLOCKED);
        let mut game = game(board);
        game.set_figure(figure(ShapeKind::I, 4, 1));

        game.tick();
        assert_eq!(game.figure().unwrap().ticks_to_fix(), Some(4));
        assert!(game.try_move(MoveDirection::Right));
        game.tick();
        assert_eq!(game.figure().unwrap().position(), Position::new(5, 2));
        assert_eq!(game.figure().unwrap().ticks_to_fix(), None);
    }

    #[test]
    fn test_completed_lines_are_removed() {
        let mut board = Board::new(10, 10);
        for x in 0..10 {
            if x % 2 == 0 {
                board.set_cell(x, 2, BoardCell::BLOCKED);
                board.set_cell(x, 4, BoardCell::BLOCKED);
            }
            board.set_cell(x, 3, BoardCell::BLOCKED);
            board.set_cell(x, 5, BoardCell::BLOCKED);
        }
        let mut game = game(board);
        let counts = Rc::new(RefCell::new(vec![]));
        {
            let counts = Rc::clone(&counts);
            game.on(EventKind::CompletedLines, move |event| {
                if let GameEvent::CompletedLines { count } = event {
                    counts.borrow_mut().push(*count);
                }
            });
        }
        let mut o = figure(ShapeKind::O, 3, 8);
        o.set_ticks_to_fix(Some(0));
        game.set_figure(o);

        game.tick();
        assert_eq!(
            representation(game.board()),
            vec![
                "__________",
                "__________",
                "__________",
                "__________",
                "x_x_x_x_x_",
                "x_x_x_x_x_",
                "__________",
                "__________",
                "___xx_____",
                "___xx_____",
            ]
        );
        assert_eq!(*counts.borrow(), vec![2]);
        assert_eq!(game.score(), 25);
    }

    #[test]
    fn test_lock_without_lines_reports_zero() {
        let mut game = game(Board::new(10, 10));
        let counts = Rc::new(RefCell::new(vec![]));
        {
            let counts = Rc::clone(&counts);
            game.on(EventKind::CompletedLines, move |event| {
                counts.borrow_mut().push(*event);
            });
        }
        let mut o = figure(ShapeKind::O, 0, 8);
        o.set_ticks_to_fix(Some(0));
        game.set_figure(o);
        game.tick();
        assert_eq!(*counts.borrow(), vec![GameEvent::CompletedLines { count: 0 }]);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_four_lines_score_last_table_entry() {
        let mut board = Board::new(10, 10);
        for y in 6..10 {
            for x in 1..10 {
                board.set_cell(x, y, BoardCell::BLOCKED);
            }
        }
        let mut game = game(board);
        let mut i = figure(ShapeKind::I, 0, 6);
        i.set_ticks_to_fix(Some(0));
        game.set_figure(i);
        game.tick();
        assert_eq!(game.score(), 70);
        assert!(representation(game.board()).iter().all(|row| !row.contains('x')));
    }

    #[test]
    fn test_three_lines_score_third_table_entry() {
        let mut board = Board::new(10, 10);
        for y in 6..10 {
            for x in 1..10 {
                if y != 6 || x != 5 {
                    board.set_cell(x, y, BoardCell::BLOCKED);
                }
            }
        }
        let mut game = game(board);
        let lines = Rc::new(RefCell::new(vec![]));
        {
            let lines = Rc::clone(&lines);
            game.on(EventKind::CompletedLines, move |event| {
                if let GameEvent::CompletedLines { count } = event {
                    lines.borrow_mut().push(*count);
                }
            });
        }
        let mut i = figure(ShapeKind::I, 0, 6);
        i.set_ticks_to_fix(Some(0));
        game.set_figure(i);
        game.tick();

        assert_eq!(*lines.borrow(), vec![3]);
        assert_eq!(game.score(), 45);
        let rows = representation(game.board());
        assert!(rows[..9].iter().all(|row| row == "__________"));
        assert_eq!(rows[9], "xxxxx_xxxx");
    }

    #[test]
    fn test_move_right() {
        let mut game = game(Board::new(10, 10));
        game.set_figure(figure(ShapeKind::L, 1, 3));
        assert!(game.try_move(MoveDirection::Right));
        assert_eq!(game.figure().unwrap().position(), Position::new(2, 3));
        assert!(representation(game.board()).iter().all(|row| !row.contains('x')));
    }

    #[test]
    fn test_move_into_wall_is_rejected() {
        let mut game = game(Board::new(10, 10));
        game.set_figure(figure(ShapeKind::L, 0, 3));
        assert!(!game.try_move(MoveDirection::Left));
        assert_eq!(game.figure().unwrap().position(), Position::new(0, 3));
    }

    #[test]
    fn test_gravity_moves_down_without_score() {
        let mut game = game(Board::new(10, 10));
        game.set_figure(figure(ShapeKind::L, 1, 3));
        game.tick();
        assert_eq!(game.figure().unwrap().position(), Position::new(1, 4));
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_manual_move_down_scores() {
        let mut game = game(Board::new(10, 10));
        game.set_figure(figure(ShapeKind::L, 1, 3));
        assert!(game.try_move(MoveDirection::Down));
        assert_eq!(game.figure().unwrap().position(), Position::new(1, 4));
        assert_eq!(game.score(), 1);
    }

    #[test]
    fn test_blocked_move_down_does_not_score() {
        let mut game = game(Board::new(10, 10));
        game.set_figure(figure(ShapeKind::L, 1, 7));
        assert!(!game.try_move(MoveDirection::Down));
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_commands_without_figure_are_rejected() {
        let mut game = game(Board::new(10, 10));
        assert!(!game.try_move(MoveDirection::Down));
        assert!(!game.try_rotate(RotateDirection::Clockwise));
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_rotate() {
        let mut game = game(Board::new(10, 10));
        game.set_figure(figure(ShapeKind::L, 1, 3));
        assert!(game.try_rotate(RotateDirection::Clockwise));
        assert_eq!(game.figure().unwrap().rotation(), Rotation::new(1));
        assert!(game.try_rotate(RotateDirection::Clockwise));
        assert_eq!(game.figure().unwrap().rotation(), Rotation::new(2));
        assert!(game.try_rotate(RotateDirection::CounterClockwise));
        assert_eq!(game.figure().unwrap().rotation(), Rotation::new(1));
    }

    #[test]
    fn test_rotate_against_wall_is_rejected() {
        let mut game = game(Board::new(10, 10));
        game.set_figure(figure(ShapeKind::L, 8, 3));
        assert!(!game.try_rotate(RotateDirection::Clockwise));
        let figure = game.figure().unwrap();
        assert_eq!(figure.rotation(), Rotation::new(0));
        assert_eq!(figure.position(), Position::new(8, 3));
    }

    #[test]
    fn test_lose_resets_game() {
        let mut board = Board::new(10, 10);
        for x in 0..10 {
            board.set_cell(x, 0, BoardCell::BLOCKED);
        }
        board.set_cell(0, 9, BoardCell::BLOCKED);
        let config = GameConfig {
            initial_score: 7,
            ..GameConfig::default()
        };
        let mut game = Game::with_seed(board, config, seed()).unwrap();
        let loses = counter(&mut game, EventKind::Lose);
        let ticks = counter(&mut game, EventKind::Tick);
        game.score = 250;
        game.set_figure(figure(ShapeKind::T, 4, 3));

        game.tick();
        assert_eq!(loses.get(), 1);
        assert_eq!(ticks.get(), 0);
        assert!(representation(game.board()).iter().all(|row| !row.contains('x')));
        assert!(game.figure().is_none());
        assert_eq!(game.next_figures().count(), 0);
        assert_eq!(game.score(), 7);

        game.tick();
        assert_eq!(loses.get(), 1);
        assert_eq!(ticks.get(), 1);
        assert!(game.figure().is_some());
    }

    #[test]
    fn test_lost_game_resets_on_first_timer_tick() {
        let mut board = Board::new(10, 10);
        for x in 0..10 {
            board.set_cell(x, 0, BoardCell::BLOCKED);
        }
        let mut game = game(board);
        let loses = counter(&mut game, EventKind::Lose);
        game.start(|_| {});
        assert!(game.has_lost());

        game.advance(5000 * MS);
        assert_eq!(loses.get(), 1);
        let top: Vec<_> = representation(game.board()).into_iter().take(3).collect();
        assert_eq!(top, vec!["__________"; 3]);
    }

    #[test]
    fn test_fix_outside_board_is_discarded() {
        let mut game = game(Board::new(10, 10));
        let ticks = counter(&mut game, EventKind::Tick);
        let mut stray = figure(ShapeKind::O, 9, 3);
        stray.set_ticks_to_fix(Some(0));
        game.set_figure(stray);

        game.tick();
        assert!(game.figure().is_none());
        assert_eq!(ticks.get(), 0);
        assert!(representation(game.board()).iter().all(|row| !row.contains('x')));

        game.tick();
        assert!(game.figure().is_some());
        assert_eq!(ticks.get(), 1);
    }

    #[test]
    fn test_not_started_game_is_paused() {
        let mut game = game(Board::new(10, 10));
        assert!(game.is_paused());
        game.advance(1000 * MS);
        assert!(game.figure().is_none());
        assert_eq!(game.elapsed(), 1000 * MS);
    }

    #[test]
    fn test_advance_saturates_virtual_time() {
        let mut game = game(Board::new(10, 10));
        game.advance(1000 * MS);
        game.advance(Duration::MAX);
        assert_eq!(game.elapsed(), Duration::MAX);
        game.advance(1000 * MS);
        assert_eq!(game.elapsed(), Duration::MAX);
        assert!(game.figure().is_none());
    }

    #[test]
    fn test_start_renders_and_resumes() {
        let mut game = game(Board::new(10, 10));
        let renders = Rc::new(Cell::new(0));
        {
            let renders = Rc::clone(&renders);
            game.start(move |game| {
                assert_eq!(game.board().width(), 10);
                renders.set(renders.get() + 1);
            });
        }
        assert!(!game.is_paused());
        assert_eq!(game.next_timer_in(), Some(10 * MS));

        game.advance(50 * MS);
        assert_eq!(renders.get(), 5);
    }

    #[test]
    fn test_pause_stops_ticks() {
        let mut game = game(Board::new(10, 10));
        let ticks = counter(&mut game, EventKind::Tick);
        game.start(|_| {});

        game.advance(5000 * MS);
        assert_eq!(ticks.get(), 16);

        game.pause();
        assert!(game.is_paused());
        game.pause();
        game.advance(5000 * MS);
        assert_eq!(ticks.get(), 16);

        game.resume();
        game.resume();
        game.advance(300 * MS);
        assert_eq!(ticks.get(), 17);
    }

    #[test]
    fn test_advance_in_small_steps_matches_one_step() {
        let mut game = game(Board::new(10, 10));
        let ticks = counter(&mut game, EventKind::Tick);
        game.start(|_| {});
        for _ in 0..500 {
            game.advance(10 * MS);
        }
        assert_eq!(ticks.get(), 16);
        assert_eq!(game.elapsed(), 5000 * MS);
    }

    #[test]
    fn test_level_up_speeds_up_clock() {
        let mut game = game(Board::new(100, 10));
        let ticks = counter(&mut game, EventKind::Tick);
        game.start(|_| {});

        game.advance(5000 * MS);
        assert_eq!(ticks.get(), 16);

        game.set_figure(figure(ShapeKind::O, 3, 0));
        game.score = 99;
        assert!(game.try_move(MoveDirection::Down));
        assert_eq!(game.score(), 100);
        assert_eq!(game.level(), 1);

        game.advance(5000 * MS);
        assert_eq!(game.clock_period(), 250 * MS);
        assert_eq!(ticks.get(), 36);
    }

    #[test]
    fn test_clock_period_is_floored() {
        let config = GameConfig {
            initial_clock_period_ms: 150,
            ..GameConfig::default()
        };
        let mut game = Game::with_seed(Board::new(100, 10), config, seed()).unwrap();
        game.start(|_| {});
        for score in [100, 200, 300] {
            game.score = score;
            game.advance(game.clock_period());
        }
        assert_eq!(game.clock_period(), 100 * MS);
    }

    #[test]
    fn test_same_seed_same_figures() {
        let spawned = |seed: GameSeed| {
            let mut game = Game::with_seed(Board::new(10, 20), GameConfig::default(), seed).unwrap();
            let mut figures = vec![];
            for _ in 0..200 {
                game.tick();
                figures.push(game.figure().map(|figure| (figure.kind(), figure.position())));
            }
            figures
        };
        assert_eq!(spawned(seed()), spawned(seed()));
        assert_ne!(
            spawned(seed()),
            spawned(GameSeed::from_bytes([0x5a; 16]))
        );
    }
}
