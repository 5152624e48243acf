//! Progress events for long-running library operations.
//!
//! Mutating bulk operations (toggles, preset application, imports)
//! publish an ordered `start -> progress* -> complete|error` sequence on
//! a named scope. Subscribers receive every event over an mpsc channel;
//! dropped subscribers are pruned on the next publish.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Which operation family an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventScope {
    Toggle,
    Preset,
    Import,
}

impl EventScope {
    pub fn as_str(self) -> &'static str {
        match self {
            EventScope::Toggle => "toggle",
            EventScope::Preset => "preset",
            EventScope::Import => "import",
        }
    }
}

/// Lifecycle stage of one bulk operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressPhase {
    /// The operation started and will process `total` items.
    Start { total: usize },
    /// One item is being processed.
    Progress {
        processed: usize,
        total: usize,
        message: String,
    },
    /// The operation finished; failures (if any) are summarized.
    Complete { summary: String },
    /// The operation failed; work already done is not rolled back.
    Error { message: String },
}

impl ProgressPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressPhase::Start { .. } => "start",
            ProgressPhase::Progress { .. } => "progress",
            ProgressPhase::Complete { .. } => "complete",
            ProgressPhase::Error { .. } => "error",
        }
    }

    /// Whether this phase ends the operation's event sequence.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProgressPhase::Complete { .. } | ProgressPhase::Error { .. }
        )
    }
}

/// One progress notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEvent {
    pub scope: EventScope,
    pub phase: ProgressPhase,
}

impl LibraryEvent {
    pub(crate) fn start(scope: EventScope, total: usize) -> Self {
        Self {
            scope,
            phase: ProgressPhase::Start { total },
        }
    }

    pub(crate) fn progress(
        scope: EventScope,
        processed: usize,
        total: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            scope,
            phase: ProgressPhase::Progress {
                processed,
                total,
                message: message.into(),
            },
        }
    }

    pub(crate) fn complete(scope: EventScope, summary: impl Into<String>) -> Self {
        Self {
            scope,
            phase: ProgressPhase::Complete {
                summary: summary.into(),
            },
        }
    }

    pub(crate) fn error(scope: EventScope, message: impl Into<String>) -> Self {
        Self {
            scope,
            phase: ProgressPhase::Error {
                message: message.into(),
            },
        }
    }

    /// Channel-style event name, e.g. `preset://apply_progress`.
    pub fn name(&self) -> String {
        format!("{}://apply_{}", self.scope.as_str(), self.phase.as_str())
    }
}

/// Fan-out registry for [`LibraryEvent`]s.
#[derive(Debug, Default)]
pub(crate) struct EventBus {
    subscribers: Mutex<Vec<Sender<LibraryEvent>>>,
}

impl EventBus {
    pub(crate) fn subscribe(&self) -> EventSubscription {
        let (tx, rx) = std::sync::mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        EventSubscription { receiver: rx }
    }

    /// Deliver `event` to every live subscriber, dropping closed channels.
    pub(crate) fn publish(&self, event: LibraryEvent) {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|tx| tx.send(event.clone()).is_ok());
    }
}

/// A receiver handle for library progress events.
///
/// Every subscriber sees the full ordered sequence of each operation;
/// dropping the subscription unregisters it.
#[derive(Debug)]
pub struct EventSubscription {
    receiver: Receiver<LibraryEvent>,
}

impl EventSubscription {
    /// Block until the next event, or `None` once the library is gone.
    pub fn recv(&self) -> Option<LibraryEvent> {
        self.receiver.recv().ok()
    }

    pub fn try_recv(&self) -> Option<LibraryEvent> {
        self.receiver.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<LibraryEvent> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Drain everything currently queued without blocking.
    pub fn drain(&self) -> Vec<LibraryEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names_follow_scope_and_phase() {
        let event = LibraryEvent::start(EventScope::Preset, 3);
        assert_eq!(event.name(), "preset://apply_start");

        let event = LibraryEvent::progress(EventScope::Toggle, 1, 3, "Processing: A (1/3)");
        assert_eq!(event.name(), "toggle://apply_progress");

        let event = LibraryEvent::error(EventScope::Import, "boom");
        assert_eq!(event.name(), "import://apply_error");
        assert!(event.phase.is_terminal());
    }

    #[test]
    fn every_subscriber_sees_the_full_sequence() {
        let bus = EventBus::default();
        let first = bus.subscribe();
        let second = bus.subscribe();

        bus.publish(LibraryEvent::start(EventScope::Toggle, 2));
        bus.publish(LibraryEvent::progress(EventScope::Toggle, 1, 2, "one"));
        bus.publish(LibraryEvent::progress(EventScope::Toggle, 2, 2, "two"));
        bus.publish(LibraryEvent::complete(EventScope::Toggle, "done"));

        let seen_first = first.drain();
        let seen_second = second.drain();
        assert_eq!(seen_first.len(), 4);
        assert_eq!(seen_first, seen_second);
        assert!(seen_first.last().unwrap().phase.is_terminal());
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let bus = EventBus::default();
        let kept = bus.subscribe();
        let dropped = bus.subscribe();
        drop(dropped);

        bus.publish(LibraryEvent::start(EventScope::Preset, 1));
        assert_eq!(
            bus.subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len(),
            1
        );
        assert_eq!(kept.drain().len(), 1);
    }
}
