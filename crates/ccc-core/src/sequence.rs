//! Latest-request-wins bookkeeping
//!
//! Each asynchronously refreshed field owns a [`RequestSequencer`]. Starting
//! a request issues a [`Ticket`]; a completion is applied only if its ticket
//! is still the most recently issued one, so a slow stale response can never
//! overwrite a newer one.

/// Monotonic request number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// Raw sequence number
    #[inline]
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Outcome of delivering a completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The response was current and has been stored
    Applied,
    /// A newer request was issued; the response was dropped
    Stale,
}

/// Issues tickets for one field
#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    issued: u64,
}

impl RequestSequencer {
    /// Create sequencer with nothing issued
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Most recently issued ticket
    #[must_use]
    pub fn latest(&self) -> Option<Ticket> {
        (self.issued > 0).then_some(Ticket(self.issued))
    }

    /// Whether `ticket` is the most recently issued one
    #[inline]
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }
}

/// A value refreshed by sequenced requests
#[derive(Debug, Clone)]
pub struct Latest<T> {
    sequencer: RequestSequencer,
    value: Option<T>,
}

impl<T> Default for Latest<T> {
    fn default() -> Self {
        Self {
            sequencer: RequestSequencer::new(),
            value: None,
        }
    }
}

impl<T> Latest<T> {
    /// Start a refresh
    pub fn begin(&mut self) -> Ticket {
        self.sequencer.issue()
    }

    /// Deliver a refresh result
    pub fn complete(&mut self, ticket: Ticket, value: T) -> Completion {
        if self.sequencer.is_current(ticket) {
            self.value = Some(value);
            Completion::Applied
        } else {
            tracing::debug!(
                ticket = ticket.value(),
                latest = ?self.sequencer.latest().map(Ticket::value),
                "dropping stale response"
            );
            Completion::Stale
        }
    }

    /// Drop the applied value and every request still in flight
    pub fn invalidate(&mut self) {
        self.sequencer.issue();
        self.value = None;
    }

    /// Whether `ticket` would be applied
    #[inline]
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.sequencer.is_current(ticket)
    }

    /// Last applied value
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn tickets_increase() {
        let mut seq = RequestSequencer::new();
        assert_eq!(seq.latest(), None);
        let a = seq.issue();
        let b = seq.issue();
        assert!(a < b);
        assert!(!seq.is_current(a));
        assert!(seq.is_current(b));
    }

    #[test]
    fn stale_completion_is_dropped() {
        let mut url = Latest::default();
        let first = url.begin();
        let second = url.begin();

        assert_eq!(url.complete(second, "new"), Completion::Applied);
        assert_eq!(url.complete(first, "old"), Completion::Stale);
        assert_eq!(url.get(), Some(&"new"));
    }

    #[test]
    fn invalidate_clears_value_and_in_flight() {
        let mut url = Latest::default();
        let first = url.begin();
        assert_eq!(url.complete(first, "a"), Completion::Applied);

        let pending = url.begin();
        url.invalidate();
        assert_eq!(url.get(), None);
        assert_eq!(url.complete(pending, "b"), Completion::Stale);
        assert_eq!(url.get(), None);
    }

    proptest! {
        #[test]
        fn only_latest_ticket_wins(count in 1usize..20, order in proptest::collection::vec(any::<prop::sample::Index>(), 1..40)) {
            let mut slot = Latest::default();
            let tickets: Vec<Ticket> = (0..count).map(|_| slot.begin()).collect();
            let last = *tickets.last().unwrap();

            for idx in order {
                let t = tickets[idx.index(count)];
                let outcome = slot.complete(t, t.value());
                prop_assert_eq!(outcome == Completion::Applied, t == last);
            }
            if let Some(v) = slot.get() {
                prop_assert_eq!(*v, last.value());
            }
        }
    }
}
