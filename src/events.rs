// SPDX-License-Identifier: MPL-2.0
//! Outbound notifications raised by the review widget.
//!
//! The embedding application owns the receiving half and drains it whenever
//! it likes. Sending never blocks; a dropped receiver silently discards events.

use crate::ui::selection::SelectionRect;
use tokio::sync::mpsc;

/// Event published to the embedding application.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// A rubber-band selection finished, in content coordinates.
    AreaSelected(SelectionRect),

    /// Something went wrong that the user should hear about.
    ErrorOccurred(String),

    /// The displayed position changed, in elapsed seconds.
    VideoPositionChanged(f64),
}

/// Sending half handed to the player.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<PlayerEvent>,
}

impl EventSender {
    pub fn send(&self, event: PlayerEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("event receiver dropped");
        }
    }
}

/// Receiving half kept by the host.
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::UnboundedReceiver<PlayerEvent>,
}

impl EventReceiver {
    /// Takes every event queued so far without waiting.
    pub fn drain(&mut self) -> Vec<PlayerEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(mpsc::error::TryRecvError::Empty)
                | Err(mpsc::error::TryRecvError::Disconnected) => break,
            }
        }
        events
    }

    /// Waits for the next event. Returns `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<PlayerEvent> {
        self.rx.recv().await
    }
}

/// Creates a connected sender/receiver pair.
pub fn channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, EventReceiver { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_events_in_order() {
        let (tx, mut rx) = channel();
        tx.send(PlayerEvent::VideoPositionChanged(0.1));
        tx.send(PlayerEvent::ErrorOccurred("boom".into()));

        assert_eq!(
            rx.drain(),
            vec![
                PlayerEvent::VideoPositionChanged(0.1),
                PlayerEvent::ErrorOccurred("boom".into()),
            ]
        );
        assert!(rx.drain().is_empty());
    }

    #[test]
    fn send_after_receiver_dropped_is_harmless() {
        let (tx, rx) = channel();
        drop(rx);
        tx.send(PlayerEvent::VideoPositionChanged(1.0));
    }

    #[tokio::test]
    async fn recv_ends_when_senders_are_gone() {
        let (tx, mut rx) = channel();
        tx.send(PlayerEvent::VideoPositionChanged(2.0));
        drop(tx);

        assert_eq!(rx.recv().await, Some(PlayerEvent::VideoPositionChanged(2.0)));
        assert_eq!(rx.recv().await, None);
    }
}
