//! Debounced search input.
//!
//! Every keystroke arms the [`DebounceGate`] and sleeps for the debounce
//! window; only the sleeper holding the latest ticket publishes its value.
//! N keystrokes inside one window therefore settle exactly once, on the last
//! value typed.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use dioxus::prelude::*;

use crate::timer::sleep;

#[derive(Clone, Debug, Default)]
pub struct DebounceGate {
    armed: Rc<Cell<u64>>,
}

impl DebounceGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supersede every earlier ticket.
    pub fn arm(&self) -> u64 {
        let ticket = self.armed.get() + 1;
        self.armed.set(ticket);
        ticket
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.armed.get() == ticket
    }

    /// Wait out the window; true if no later keystroke arrived.
    pub async fn settle(&self, ticket: u64, window: Duration) -> bool {
        sleep(window).await;
        self.is_current(ticket)
    }
}

/// Raw text bound to the input, plus the settled value pages fetch with.
#[derive(Clone, Copy, PartialEq)]
pub struct DebouncedSearch {
    pub text: Signal<String>,
    pub settled: Signal<String>,
    gate: Signal<DebounceGate>,
    window: Duration,
}

impl DebouncedSearch {
    pub fn input(&mut self, value: String) {
        self.text.set(value.clone());
        let gate = self.gate.peek().clone();
        let ticket = gate.arm();
        let window = self.window;
        let mut settled = self.settled;
        spawn(async move {
            if gate.settle(ticket, window).await && *settled.peek() != value {
                tracing::debug!("Search settled on {value:?}");
                settled.set(value);
            }
        });
    }

    /// Clear immediately, without waiting for the window.
    pub fn clear(&mut self) {
        self.gate.peek().arm();
        self.text.set(String::new());
        self.settled.set(String::new());
    }
}

pub fn use_debounced_search(window: Duration) -> DebouncedSearch {
    let text = use_signal(String::new);
    let settled = use_signal(String::new);
    let gate = use_signal(DebounceGate::new);
    DebouncedSearch {
        text,
        settled,
        gate,
        window,
    }
}
