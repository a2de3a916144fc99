//! Deferred phase resolution.
//!
//! The Enemy and Income phases resolve a fixed delay after they begin. A
//! [`Ticket`] records which game, day and phase it was issued for; it is
//! only honoured while all three still match the live state.

use std::time::{Duration, Instant};

use crate::game::{GameState, Phase};

/// Identity of a scheduled resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    /// Game generation; bumped on every restart.
    pub epoch: u64,
    /// Day the ticket was issued on.
    pub day: u32,
    /// Phase the ticket resolves.
    pub phase: Phase,
}

impl Ticket {
    /// Ticket for the state's current day and phase.
    #[must_use]
    pub fn for_state(epoch: u64, state: &GameState) -> Self {
        Self {
            epoch,
            day: state.day,
            phase: state.phase,
        }
    }

    /// Check if this ticket still refers to the live game.
    #[must_use]
    pub fn is_current(&self, epoch: u64, state: &GameState) -> bool {
        !state.game_over && *self == Self::for_state(epoch, state)
    }
}

/// Holds at most one pending ticket and the instant it falls due.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseTimer {
    pending: Option<(Ticket, Instant)>,
}

impl PhaseTimer {
    /// Create an idle timer.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Schedule `ticket` to fall due `delay` after `now`.
    ///
    /// Scheduling the ticket already pending keeps its original deadline.
    /// Any other pending ticket is replaced.
    pub fn schedule(&mut self, ticket: Ticket, now: Instant, delay: Duration) {
        if matches!(self.pending, Some((pending, _)) if pending == ticket) {
            return;
        }
        self.pending = Some((ticket, now + delay));
    }

    /// Drop the pending ticket, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// The pending ticket.
    #[must_use]
    pub fn pending(&self) -> Option<Ticket> {
        self.pending.map(|(ticket, _)| ticket)
    }

    /// Time left until the pending ticket falls due.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|(_, due)| due.saturating_duration_since(now))
    }

    /// Take the pending ticket if it is due at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<Ticket> {
        match self.pending {
            Some((ticket, due)) if now >= due => {
                self.pending = None;
                Some(ticket)
            }
            _ => None,
        }
    }
}
