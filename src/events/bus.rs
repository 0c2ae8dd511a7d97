//! Observer registry and delivery queue.
//!
//! Commands raise events into a pending buffer; the session flushes the
//! buffer when the command returns, delivering each event to every observer
//! in registration order. The most recent delivered events are also kept in
//! a bounded log the caller can drain; once the log is full the oldest entry
//! is dropped.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::event::GameEvent;

/// Receives session notifications.
///
/// Observers only see `&GameEvent`; they have no handle to the session.
pub trait GameObserver {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F> GameObserver for F
where
    F: FnMut(&GameEvent),
{
    fn on_event(&mut self, event: &GameEvent) {
        self(event);
    }
}

/// Handle returned by `EventBus::subscribe`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObserverId(pub u32);

impl ObserverId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ObserverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Observer({})", self.0)
    }
}

/// Number of delivered events the log keeps by default.
pub const DEFAULT_LOG_CAPACITY: usize = 256;

pub struct EventBus {
    observers: Vec<(ObserverId, Box<dyn GameObserver>)>,
    next_id: u32,
    pending: Vec<GameEvent>,
    log: VecDeque<GameEvent>,
    log_capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_log_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("observers", &self.observers.len())
            .field("pending", &self.pending)
            .field("log", &self.log.len())
            .field("log_capacity", &self.log_capacity)
            .finish()
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A bus whose log keeps at most `capacity` events. Zero disables the log.
    #[must_use]
    pub fn with_log_capacity(capacity: usize) -> Self {
        Self {
            observers: Vec::new(),
            next_id: 0,
            pending: Vec::new(),
            log: VecDeque::with_capacity(capacity.min(DEFAULT_LOG_CAPACITY)),
            log_capacity: capacity,
        }
    }

    #[must_use]
    pub fn log_capacity(&self) -> usize {
        self.log_capacity
    }

    /// Register an observer.
    pub fn subscribe(&mut self, observer: impl GameObserver + 'static) -> ObserverId {
        let id = ObserverId::new(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns `false` if the id is unknown.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Queue an event for the next flush.
    pub fn raise(&mut self, event: GameEvent) {
        self.pending.push(event);
    }

    /// The pending buffer, for code that raises several events at once.
    pub fn pending_mut(&mut self) -> &mut Vec<GameEvent> {
        &mut self.pending
    }

    /// Deliver every pending event, in order, to every observer.
    pub fn flush(&mut self) {
        for event in self.pending.drain(..) {
            trace!(kind = event.kind(), "delivering event");
            for (_, observer) in &mut self.observers {
                observer.on_event(&event);
            }
            if self.log_capacity == 0 {
                continue;
            }
            if self.log.len() == self.log_capacity {
                self.log.pop_front();
            }
            self.log.push_back(event);
        }
    }

    /// Take the logged events, oldest first.
    pub fn drain_log(&mut self) -> Vec<GameEvent> {
        self.log.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<GameEvent>>>, impl GameObserver) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |e: &GameEvent| sink.borrow_mut().push(e.clone()))
    }

    #[test]
    fn test_events_wait_for_flush() {
        let mut bus = EventBus::new();
        let (seen, observer) = recorder();
        bus.subscribe(observer);

        bus.raise(GameEvent::BoardUpdated);
        assert!(seen.borrow().is_empty());

        bus.flush();
        assert_eq!(*seen.borrow(), vec![GameEvent::BoardUpdated]);
    }

    #[test]
    fn test_delivery_order() {
        let mut bus = EventBus::new();
        let (seen, observer) = recorder();
        bus.subscribe(observer);

        bus.raise(GameEvent::BoardUpdated);
        bus.pending_mut().push(GameEvent::ScoreUpdated(4));
        bus.flush();

        assert_eq!(
            *seen.borrow(),
            vec![GameEvent::BoardUpdated, GameEvent::ScoreUpdated(4)]
        );
        assert_eq!(bus.drain_log().len(), 2);
        assert!(bus.drain_log().is_empty());
    }

    #[test]
    fn test_log_keeps_most_recent() {
        let mut bus = EventBus::with_log_capacity(3);
        let (seen, observer) = recorder();
        bus.subscribe(observer);

        for score in 0..10 {
            bus.raise(GameEvent::ScoreUpdated(score));
        }
        bus.flush();

        assert_eq!(seen.borrow().len(), 10);
        assert_eq!(
            bus.drain_log(),
            vec![
                GameEvent::ScoreUpdated(7),
                GameEvent::ScoreUpdated(8),
                GameEvent::ScoreUpdated(9),
            ]
        );
    }

    #[test]
    fn test_default_log_is_bounded() {
        let mut bus = EventBus::new();
        assert_eq!(bus.log_capacity(), DEFAULT_LOG_CAPACITY);
        for _ in 0..(DEFAULT_LOG_CAPACITY * 4) {
            bus.raise(GameEvent::BoardUpdated);
            bus.flush();
        }
        assert_eq!(bus.drain_log().len(), DEFAULT_LOG_CAPACITY);
    }

    #[test]
    fn test_zero_capacity_disables_log() {
        let mut bus = EventBus::with_log_capacity(0);
        let (seen, observer) = recorder();
        bus.subscribe(observer);
        bus.raise(GameEvent::DeckChanged);
        bus.flush();
        assert_eq!(seen.borrow().len(), 1);
        assert!(bus.drain_log().is_empty());
    }

    #[test]
    fn test_unsubscribe() {
        let mut bus = EventBus::new();
        let (seen, observer) = recorder();
        let id = bus.subscribe(observer);
        assert_eq!(bus.observer_count(), 1);

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));

        bus.raise(GameEvent::DeckChanged);
        bus.flush();
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_ids_are_distinct() {
        let mut bus = EventBus::new();
        let a = bus.subscribe(|_: &GameEvent| {});
        let b = bus.subscribe(|_: &GameEvent| {});
        assert_ne!(a, b);
        assert_eq!(format!("{}", a), "Observer(0)");
    }
}
