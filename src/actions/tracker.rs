//! Last-write-wins tracking for in-flight requests.
//!
//! In-flight generation calls are never cancelled. A call site takes a
//! [`Ticket`] before dispatching and only uses the result if the ticket is
//! still the latest one issued.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of one dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Issues tickets for one call site.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: AtomicU64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding all earlier ones.
    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Supersede everything in flight without starting a new request.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Hand back `value` only if `ticket` is still current.
    pub fn deliver<T>(&self, ticket: Ticket, value: T) -> Option<T> {
        self.is_current(ticket).then_some(value)
    }
}
