use std::{
    cell::RefCell,
    io,
    rc::Rc,
    time::{Duration, Instant},
};

use anyhow::Context as _;
use blockfall_engine::{Game, MoveDirection, RotateDirection};
use crossterm::event::{self, KeyCode, KeyEventKind};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
};

use crate::{
    command::GameArg,
    model::SessionStats,
    ui::widgets::{GameDisplay, KeyBinding, KeyBindingDisplay},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    game: GameArg,
}

/// Poll timeout used when the game has no timer scheduled.
const IDLE_POLL: Duration = Duration::from_millis(100);

const PLAYING_KEYS: &[KeyBinding] = &[
    (&["←", "→"], "Move"),
    (&["↓"], "Soft Drop"),
    (&["↑", "X"], "Rotate"),
    (&["Z"], "Rotate Back"),
    (&["T"], "Step"),
    (&["P", "Esc"], "Pause"),
    (&["Q"], "Quit"),
];

const PAUSED_KEYS: &[KeyBinding] = &[(&["P", "Esc"], "Resume"), (&["Q"], "Quit")];

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let mut game = arg.game.build_game(arg.game.seed())?;
    let stats = SessionStats::subscribe(&mut game);

    let terminal = ratatui::init();
    let result = play(&mut game, terminal, &stats);
    ratatui::restore();
    result
}

fn play(
    game: &mut Game,
    mut terminal: DefaultTerminal,
    stats: &Rc<RefCell<SessionStats>>,
) -> anyhow::Result<()> {
    let draw_error = Rc::new(RefCell::new(None::<io::Error>));
    {
        let stats = Rc::clone(stats);
        let draw_error = Rc::clone(&draw_error);
        game.start(move |game| {
            let stats = stats.borrow();
            if let Err(e) = terminal.draw(|frame| draw(frame, game, &stats)) {
                *draw_error.borrow_mut() = Some(e);
            }
        });
    }

    let mut last_advance = Instant::now();
    loop {
        if let Some(e) = draw_error.borrow_mut().take() {
            return Err(e).context("Failed to draw the game");
        }

        let timeout = game.next_timer_in().unwrap_or(IDLE_POLL);
        if event::poll(timeout).context("Failed to poll terminal events")? {
            let event = event::read().context("Failed to read terminal event")?;
            if let Some(key) = event.as_key_event()
                && key.kind == KeyEventKind::Press
                && handle_key(game, key.code).is_quit()
            {
                break;
            }
        }

        let now = Instant::now();
        game.advance(now.duration_since(last_advance));
        last_advance = now;
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
enum Flow {
    Continue,
    Quit,
}

fn handle_key(game: &mut Game, code: KeyCode) -> Flow {
    let is_playing = !game.is_paused();
    match code {
        KeyCode::Left if is_playing => _ = game.try_move(MoveDirection::Left),
        KeyCode::Right if is_playing => _ = game.try_move(MoveDirection::Right),
        KeyCode::Down if is_playing => _ = game.try_move(MoveDirection::Down),
        KeyCode::Up | KeyCode::Char('x') if is_playing => {
            _ = game.try_rotate(RotateDirection::Clockwise);
        }
        KeyCode::Char('z') if is_playing => _ = game.try_rotate(RotateDirection::CounterClockwise),
        KeyCode::Char('t') if is_playing => game.tick(),
        KeyCode::Char('p') | KeyCode::Esc => {
            if game.is_paused() {
                game.resume();
            } else {
                game.pause();
            }
        }
        KeyCode::Char('q') => return Flow::Quit,
        _ => {}
    }
    Flow::Continue
}

fn draw(frame: &mut Frame<'_>, game: &Game, stats: &SessionStats) {
    let game_display = GameDisplay::new(game, stats);
    let keys = if game.is_paused() {
        PAUSED_KEYS
    } else {
        PLAYING_KEYS
    };
    let help = KeyBindingDisplay::new(keys);

    let [main_area, help_area] =
        Layout::vertical([Constraint::Length(game_display.height()), Constraint::Length(1)])
            .areas::<2>(frame.area());
    frame.render_widget(game_display, main_area);
    frame.render_widget(help, help_area);
}
