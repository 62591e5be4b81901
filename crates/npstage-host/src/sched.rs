//! Repeating-tick scheduling collaborator.
//!
//! The host core never owns an event loop; it registers repeating callbacks
//! with whatever loop drives the application. The contract is the classic
//! timeout one: the callback runs once per interval until it returns false.
//! Everything happens on the single plugin-call thread; a tick is a
//! deferred re-entry point, not a second thread.

use std::cell::RefCell;
use std::time::{Duration, Instant};

pub type TickFn = Box<dyn FnMut() -> bool>;

pub trait TickScheduler {
    /// Registers `tick` to run every `interval` until it returns false.
    fn add_repeating(&self, interval: Duration, tick: TickFn);
}

/// Cooperative scheduler for loops that pump ticks explicitly. The CLI
/// harness and the tests drive it; a GUI embedder would adapt its own timer
/// source instead.
#[derive(Default)]
pub struct ManualTicker {
    entries: RefCell<Vec<TickEntry>>,
}

struct TickEntry {
    interval: Duration,
    due: Instant,
    tick: TickFn,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every due callback once; drops the ones that returned false.
    /// Returns the number of callbacks still registered.
    pub fn pump(&self) -> usize {
        let now = Instant::now();
        // Entries are taken out while running so a callback registering a new
        // tick never observes a held borrow.
        let mut entries = self.entries.take();
        entries.retain_mut(|entry| {
            if now < entry.due {
                return true;
            }
            entry.due = now + entry.interval;
            (entry.tick)()
        });
        let mut slot = self.entries.borrow_mut();
        entries.extend(slot.drain(..));
        *slot = entries;
        slot.len()
    }
}

impl TickScheduler for ManualTicker {
    fn add_repeating(&self, interval: Duration, tick: TickFn) {
        self.entries.borrow_mut().push(TickEntry {
            interval,
            due: Instant::now() + interval,
            tick,
        });
    }
}
