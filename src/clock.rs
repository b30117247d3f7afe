use serde::{Deserialize, Serialize};

use crate::piece::Color;

/// Two countdowns, at most one of them running.
///
/// The clock does not own a timer. Whoever drives it calls [`Clock::tick`]
/// once per elapsed second and polls [`Clock::has_expired`]; deciding what
/// expiry means for the game is left to the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clock {
    white_seconds: u32,
    black_seconds: u32,
    running: Option<Color>,
}

impl Clock {
    pub fn new(seconds_per_side: u32) -> Self {
        Clock {
            white_seconds: seconds_per_side,
            black_seconds: seconds_per_side,
            running: None,
        }
    }

    /// Run `side`'s countdown, stopping the other one.
    pub fn start(&mut self, side: Color) {
        self.running = Some(side);
    }

    pub fn stop(&mut self) {
        self.running = None;
    }

    pub fn running_side(&self) -> Option<Color> {
        self.running
    }

    pub fn remaining(&self, side: Color) -> u32 {
        match side {
            Color::White => self.white_seconds,
            Color::Black => self.black_seconds,
        }
    }

    /// One second elapsed. Only the running side loses time; a stopped
    /// clock ignores ticks.
    pub fn tick(&mut self) {
        match self.running {
            Some(Color::White) => self.white_seconds = self.white_seconds.saturating_sub(1),
            Some(Color::Black) => self.black_seconds = self.black_seconds.saturating_sub(1),
            None => {}
        }
    }

    pub fn has_expired(&self) -> bool {
        self.white_seconds == 0 || self.black_seconds == 0
    }

    /// The side whose time ran out, if any.
    pub fn flagged(&self) -> Option<Color> {
        if self.white_seconds == 0 {
            Some(Color::White)
        } else if self.black_seconds == 0 {
            Some(Color::Black)
        } else {
            None
        }
    }

    /// Remaining time as `MM:SS`.
    pub fn display(&self, side: Color) -> String {
        let seconds = self.remaining(side);
        format!("{:02}:{:02}", seconds / 60, seconds % 60)
    }
}
