//! Event Emitter: hands ordered events to the external bus (§4.3).
//!
//! The matcher is synchronous (§6): `submit`/`cancel` return only after every
//! event produced by that admission has been enqueued here. If the buffer is
//! full the default behavior is backpressure — the calling thread blocks,
//! events are never dropped. A bounded-wait variant is offered for callers
//! that would rather surface `BackpressureTimeout` than stall indefinitely.

use crate::engine::event::Event;
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::time::{Duration, Instant};
use tracing::{error, trace};

/// Implemented by anything that can accept an ordered event stream for one
/// symbol. A single emitter instance is owned by one writer; emission order
/// is the admission order the matcher produced.
pub trait EventEmitter: Send + Sync {
    /// Enqueues `event`, blocking if the buffer is full.
    fn emit(&self, event: Event);

    /// Enqueues `event`, blocking for at most `timeout`. Returns `false` on
    /// timeout, in which case the caller should surface `BackpressureTimeout`.
    fn try_emit_within(&self, event: Event, timeout: Duration) -> bool;
}

/// A bounded-channel emitter backed by `std::sync::mpsc`, mirroring the
/// synchronous producer/consumer split used elsewhere in this lineage for
/// handing events off to a consumer thread.
pub struct ChannelEventEmitter {
    sender: SyncSender<Event>,
}

impl ChannelEventEmitter {
    /// Creates a bounded channel with `capacity` slots and returns the
    /// emitter paired with the receiving end, which the caller hands to
    /// whatever consumes events for the external bus.
    pub fn new(capacity: usize) -> (Self, Receiver<Event>) {
        let (sender, receiver) = mpsc::sync_channel(capacity);
        (Self { sender }, receiver)
    }
}

impl EventEmitter for ChannelEventEmitter {
    fn emit(&self, event: Event) {
        let sequence = event.sequence();
        if self.sender.send(event).is_err() {
            error!(sequence, "event emitter's receiver has been dropped");
        } else {
            trace!(sequence, "event enqueued to emitter");
        }
    }

    fn try_emit_within(&self, event: Event, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut pending = event;
        loop {
            match self.sender.try_send(pending) {
                Ok(()) => return true,
                Err(TrySendError::Full(returned)) => {
                    if Instant::now() >= deadline {
                        return false;
                    }
                    pending = returned;
                    std::thread::yield_now();
                }
                Err(TrySendError::Disconnected(_)) => {
                    error!("event emitter's receiver has been dropped");
                    return false;
                }
            }
        }
    }
}

/// A `tokio::sync::mpsc`-backed emitter for embedders that already run a
/// Tokio runtime and want their bus consumer as an async task rather than a
/// dedicated thread, mirroring the teacher lineage's `BookManagerTokio`
/// alongside its std-channel counterpart. `emit` bridges into async via
/// `blocking_send`, so it must not be called from within the runtime's own
/// worker threads (the matcher itself performs no async I/O, per §5).
pub struct TokioEventEmitter {
    sender: tokio::sync::mpsc::Sender<Event>,
    handle: tokio::runtime::Handle,
}

impl TokioEventEmitter {
    /// Creates a bounded channel with `capacity` slots, bound to the calling
    /// thread's current Tokio runtime, and returns the emitter paired with
    /// the receiving end.
    pub fn new(capacity: usize) -> (Self, tokio::sync::mpsc::Receiver<Event>) {
        let (sender, receiver) = tokio::sync::mpsc::channel(capacity);
        let handle = tokio::runtime::Handle::current();
        (Self { sender, handle }, receiver)
    }
}

impl EventEmitter for TokioEventEmitter {
    fn emit(&self, event: Event) {
        let sequence = event.sequence();
        if self.sender.blocking_send(event).is_err() {
            error!(sequence, "event emitter's receiver has been dropped");
        } else {
            trace!(sequence, "event enqueued to emitter");
        }
    }

    fn try_emit_within(&self, event: Event, timeout: Duration) -> bool {
        let sender = self.sender.clone();
        self.handle
            .block_on(async move { tokio::time::timeout(timeout, sender.send(event)).await })
            .map(|result| result.is_ok())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ids::SymbolId;
    use crate::engine::order::{OrderKind, OrderStatus, Side};
    use crate::engine::ids::{OrderId, UserId};

    fn sample_event(sequence: u64) -> Event {
        Event::OrderUpdate {
            symbol: SymbolId::from("X"),
            sequence,
            timestamp_ns: 0,
            order_id: OrderId::from("o1"),
            user_id: UserId::from("u1"),
            side: Side::Buy,
            order_type: OrderKind::Limit { price: 1 },
            price: Some(1),
            original_quantity: 1,
            filled_quantity: 0,
            status: OrderStatus::Pending,
            reason: None,
        }
    }

    #[test]
    fn events_are_received_in_emission_order() {
        let (emitter, receiver) = ChannelEventEmitter::new(4);
        emitter.emit(sample_event(1));
        emitter.emit(sample_event(2));
        emitter.emit(sample_event(3));

        let sequences: Vec<u64> = (0..3).map(|_| receiver.recv().unwrap().sequence()).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
    }

    #[test]
    fn try_emit_within_times_out_when_buffer_stays_full() {
        let (emitter, _receiver) = ChannelEventEmitter::new(1);
        assert!(emitter.try_emit_within(sample_event(1), Duration::from_millis(1)));
        assert!(!emitter.try_emit_within(sample_event(2), Duration::from_millis(1)));
    }

    #[tokio::test]
    async fn tokio_emitter_delivers_events_in_order() {
        let (emitter, mut receiver) = TokioEventEmitter::new(4);
        let emitter = std::sync::Arc::new(emitter);
        let blocking = emitter.clone();
        tokio::task::spawn_blocking(move || {
            blocking.emit(sample_event(1));
            blocking.emit(sample_event(2));
        })
        .await
        .unwrap();

        assert_eq!(receiver.recv().await.unwrap().sequence(), 1);
        assert_eq!(receiver.recv().await.unwrap().sequence(), 2);
    }
}
