//! Stale-response guard for page fetches.
//!
//! Fetches are not cancelled; instead each one takes a [`FetchTicket`] and
//! the page applies the response only if no newer fetch started since and
//! the page is still mounted.

use std::cell::Cell;
use std::rc::Rc;

use dioxus::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket(u64);

#[derive(Clone, Debug, Default)]
pub struct RequestGeneration {
    current: Rc<Cell<u64>>,
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch, invalidating all earlier tickets.
    pub fn ticket(&self) -> FetchTicket {
        let next = self.current.get() + 1;
        self.current.set(next);
        FetchTicket(next)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.current.get() == ticket.0
    }

    /// Drop every outstanding response.
    pub fn invalidate(&self) {
        self.current.set(self.current.get() + 1);
    }
}

/// A generation that is invalidated when the calling component unmounts.
pub fn use_request_generation() -> RequestGeneration {
    let generation = use_hook(RequestGeneration::new);
    use_drop({
        let generation = generation.clone();
        move || generation.invalidate()
    });
    generation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::sleep;
    use std::time::Duration;

    #[test]
    fn test_only_latest_ticket_is_current() {
        let generation = RequestGeneration::new();
        let first = generation.ticket();
        let second = generation.ticket();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
        generation.invalidate();
        assert!(!generation.is_current(second));
    }

    async fn fetch(generation: &RequestGeneration, latency_ms: u64, rows: u32) -> Option<u32> {
        let ticket = generation.ticket();
        sleep(Duration::from_millis(latency_ms)).await;
        generation.is_current(ticket).then_some(rows)
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_earlier_response_is_discarded() {
        let generation = RequestGeneration::new();
        let (slow, fast) = tokio::join!(fetch(&generation, 500, 10), async {
            sleep(Duration::from_millis(10)).await;
            fetch(&generation, 50, 25).await
        });
        assert_eq!(slow, None);
        assert_eq!(fast, Some(25));
    }
}
