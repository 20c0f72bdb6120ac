use std::{cell::RefCell, rc::Rc};

use blockfall_engine::{EventKind, Game, GameEvent};
use serde::Serialize;

/// Counters collected from game events during a play session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    locked_figures: usize,
    cleared_lines: usize,
    line_cleared_counter: [usize; 5],
    losses: usize,
}

impl SessionStats {
    /// Creates shared counters fed by `game`'s line and loss events.
    pub fn subscribe(game: &mut Game) -> Rc<RefCell<Self>> {
        let stats = Rc::new(RefCell::new(Self::default()));
        {
            let stats = Rc::clone(&stats);
            game.on(EventKind::CompletedLines, move |event| {
                if let GameEvent::CompletedLines { count } = event {
                    stats.borrow_mut().record_lines(*count);
                }
            });
        }
        {
            let stats = Rc::clone(&stats);
            game.on(EventKind::Lose, move |_| stats.borrow_mut().record_loss());
        }
        stats
    }

    /// Records a locked figure that completed `count` rows.
    pub fn record_lines(&mut self, count: usize) {
        self.locked_figures += 1;
        self.cleared_lines += count;
        self.line_cleared_counter[count.min(4)] += 1;
    }

    pub fn record_loss(&mut self) {
        self.losses += 1;
    }

    pub fn locked_figures(&self) -> usize {
        self.locked_figures
    }

    pub fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    /// Number of locks per simultaneous clear size; the last slot counts 4 or more.
    pub fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    pub fn losses(&self) -> usize {
        self.losses
    }
}
