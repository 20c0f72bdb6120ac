use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

/// Notification emitted by a game while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
pub enum GameEvent {
    /// A figure locked and `count` rows were removed (possibly none).
    CompletedLines { count: usize },
    /// Row 0 was occupied at the start of a tick; the game has been reset.
    Lose,
    /// A tick ran to completion.
    Tick,
}

impl GameEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::CompletedLines { .. } => EventKind::CompletedLines,
            GameEvent::Lose => EventKind::Lose,
            GameEvent::Tick => EventKind::Tick,
        }
    }
}

/// Subscription key of a [`GameEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    CompletedLines,
    Lose,
    Tick,
}

pub type EventCallback = Box<dyn FnMut(&GameEvent)>;

/// Registry of event subscribers.
///
/// Callbacks of one kind run synchronously, in registration order.
#[derive(Default)]
pub struct EventBus {
    subscribers: HashMap<EventKind, Vec<EventCallback>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (kind, callbacks) in &self.subscribers {
            map.entry(kind, &callbacks.len());
        }
        map.finish()
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(&mut self, kind: EventKind, callback: F)
    where
        F: FnMut(&GameEvent) + 'static,
    {
        self.subscribers
            .entry(kind)
            .or_default()
            .push(Box::new(callback));
    }

    pub fn emit(&mut self, event: &GameEvent) {
        if let Some(callbacks) = self.subscribers.get_mut(&event.kind()) {
            for callback in callbacks {
                callback(event);
            }
        }
    }
}
