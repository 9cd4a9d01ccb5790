/// Ticks until the next scheduled sync, for display.
///
/// Counts down once per tick and stops at zero. Reset whenever a sync attempt
/// completes, whether it succeeded or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    reset_to: u32,
}

impl Countdown {
    pub fn new(reset_to: u32) -> Self {
        Self {
            remaining: reset_to,
            reset_to,
        }
    }

    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.remaining = self.reset_to;
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}
