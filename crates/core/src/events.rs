use crate::{ClaimVerdict, ExtractInterval, RoundToken};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Event {
    CountdownTicked {
        remaining: u32,
    },
    RoundStarted {
        token: RoundToken,
        max_numbers: u8,
    },
    NumberCalled {
        token: RoundToken,
        index: usize,
        number: u8,
    },
    Paused {
        index: usize,
    },
    Resumed {
        index: usize,
    },
    IntervalChanged {
        interval: ExtractInterval,
    },
    CardCountChanged {
        count: usize,
    },
    RoundFinished {
        token: RoundToken,
        calls: usize,
    },
    RoundRestarted {
        countdown: u32,
    },
    BingoClaimed {
        ticket: usize,
        verdict: ClaimVerdict,
    },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }
}
