//! Deferred machine replies
//!
//! A pending reply is a ticket stamped with the generation it was scheduled
//! in. Cancelling bumps the generation, so any ticket issued earlier no
//! longer matches and can never apply its move.

use std::time::{Duration, Instant};

/// One scheduled machine reply
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AiTurnTicket {
    pub generation: u64,
    pub due: Instant,
}

/// Tracks at most one pending machine reply
#[derive(Debug, Default)]
pub struct AiScheduler {
    generation: u64,
    pending: Option<AiTurnTicket>,
}

impl AiScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket due after `delay`, replacing any pending one
    pub fn schedule(&mut self, delay: Duration) -> AiTurnTicket {
        self.generation += 1;
        let ticket = AiTurnTicket {
            generation: self.generation,
            due: Instant::now() + delay,
        };
        self.pending = Some(ticket);
        ticket
    }

    /// Invalidate every outstanding ticket
    pub fn cancel(&mut self) {
        self.generation += 1;
        if self.pending.take().is_some() {
            tracing::debug!("Cancelled pending machine reply");
        }
    }

    pub fn pending(&self) -> Option<AiTurnTicket> {
        self.pending
    }

    /// Claim the pending turn if `ticket` is still the live one
    pub fn claim(&mut self, ticket: AiTurnTicket) -> bool {
        if self.pending == Some(ticket) && ticket.generation == self.generation {
            self.pending = None;
            true
        } else {
            false
        }
    }
}
