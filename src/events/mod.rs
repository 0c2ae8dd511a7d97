//! Session notifications.
//!
//! ## Key Components
//!
//! - [`GameEvent`]: What changed (turn started, score, board, phase, deck)
//! - [`GameObserver`]: Callback interface; closures implement it
//! - [`EventBus`]: Observer registry with an ordered pending buffer
//!
//! ## Example Usage
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use tile_draft::events::{EventBus, GameEvent};
//!
//! let mut bus = EventBus::new();
//! let count = Rc::new(RefCell::new(0));
//! let sink = Rc::clone(&count);
//! bus.subscribe(move |_: &GameEvent| *sink.borrow_mut() += 1);
//!
//! bus.raise(GameEvent::BoardUpdated);
//! bus.raise(GameEvent::ScoreUpdated(3));
//! bus.flush();
//! assert_eq!(*count.borrow(), 2);
//! ```

mod bus;
mod event;

pub use bus::{EventBus, GameObserver, ObserverId, DEFAULT_LOG_CAPACITY};
pub use event::GameEvent;
