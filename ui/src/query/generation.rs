use std::{cell::Cell, rc::Rc};

/// Monotonic request counter shared by everything that can issue a query for
/// one slot (a chart, a control list). Only the latest ticket is current.
#[derive(Debug, Clone, Default)]
pub struct RequestGeneration {
    current: Rc<Cell<u64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request, superseding every earlier one.
    pub fn issue(&self) -> Ticket {
        let next = self.current.get() + 1;
        self.current.set(next);
        Ticket(next)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.current.get() == ticket.0
    }

    /// Drop every in-flight request without starting a new one.
    pub fn invalidate(&self) {
        self.current.set(self.current.get() + 1);
    }
}
