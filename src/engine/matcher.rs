//! The matcher: admits incoming orders, drives price-time priority matching
//! against the book, and emits the resulting event stream (§4.2).

use crate::engine::book::Book;
use crate::engine::config::EngineConfig;
use crate::engine::emitter::EventEmitter;
use crate::engine::error::{CancelError, SubmitError};
use crate::engine::event::{Acknowledgment, Event};
use crate::engine::ids::{OrderId, SymbolId, UserId};
use crate::engine::order::{CancelReason, Order, OrderKind, OrderStatus, Quantity, Side};
use crate::engine::sequencer::{now_ns, Sequencer};
use std::sync::Mutex;
use tracing::{debug, error, instrument, trace};

/// A new order as submitted by a caller, before admission assigns it a
/// sequence number and terminal status.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub id: OrderId,
    pub user_id: UserId,
    pub side: Side,
    pub kind: OrderKind,
    pub quantity: Quantity,
}

/// The single-writer engine for one symbol: owns the book, the sequence
/// counter, and the handle to the event emitter. Mutating operations
/// (`submit`, `cancel`, `bulk_load`) are serialized through `write_lock`,
/// matching the "single writer, many readers" contract in §5.
pub struct Engine<E: EventEmitter> {
    symbol: SymbolId,
    config: EngineConfig,
    book: Book,
    sequencer: Sequencer,
    emitter: E,
    write_lock: Mutex<()>,
}

impl<E: EventEmitter> Engine<E> {
    pub fn new(symbol: SymbolId, config: EngineConfig, emitter: E) -> Self {
        Self {
            symbol,
            config,
            book: Book::new(),
            sequencer: Sequencer::new(),
            emitter,
            write_lock: Mutex::new(()),
        }
    }

    pub fn symbol(&self) -> &SymbolId {
        &self.symbol
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    #[instrument(skip(self, new_order), fields(symbol = %self.symbol, order_id = %new_order.id))]
    pub fn submit(&self, new_order: NewOrder) -> Result<Acknowledgment, SubmitError> {
        if new_order.quantity == 0 || !self.config.is_valid_quantity(new_order.quantity) {
            return Err(SubmitError::InvalidQuantity);
        }
        if let OrderKind::Limit { price } = new_order.kind {
            if price == 0 || !self.config.is_valid_price(price) {
                return Err(SubmitError::InvalidPrice);
            }
        }

        let _guard = self.write_lock.lock().expect("matcher write lock poisoned");

        if self.book.contains(&new_order.id) {
            return Err(SubmitError::DuplicateOrder(new_order.id));
        }

        let now = now_ns();
        // The order's admission sequence is only meaningful once we know
        // whether it ends up resting; it is assigned below, at the same
        // point its own terminal event is emitted, so every sequence number
        // the counter hands out corresponds to exactly one emitted event
        // (property 5: no gaps in the emitted sequence).
        let mut taker = Order {
            id: new_order.id,
            user_id: new_order.user_id,
            side: new_order.side,
            kind: new_order.kind,
            original_quantity: new_order.quantity,
            filled_quantity: 0,
            status: OrderStatus::Pending,
            sequence: 0,
            created_at_ns: now,
            updated_at_ns: now,
            cancel_reason: None,
        };

        self.run_matching_loop(&mut taker);

        match (taker.kind, taker.residual() > 0) {
            (OrderKind::Limit { .. }, true) => {
                if taker.filled_quantity > 0 {
                    taker.status = OrderStatus::Partial;
                }
                self.assign_sequence_and_emit(&mut taker);
                self.book.insert(taker.clone());
            }
            (OrderKind::Market, true) => {
                taker.mark_cancelled(CancelReason::InsufficientLiquidity, now_ns());
                self.assign_sequence_and_emit(&mut taker);
            }
            (_, false) => {
                self.assign_sequence_and_emit(&mut taker);
            }
        }

        debug!(sequence = taker.sequence, status = ?taker.status, "order admitted");

        Ok(Acknowledgment {
            order_id: taker.id.clone(),
            sequence: taker.sequence,
            status: taker.status,
            reason: taker.cancel_reason,
        })
    }

    /// Drives the taker against the opposite side of the book until it has
    /// no residual, the opposite side is exhausted, or price compatibility
    /// fails. Does not insert the taker's residual or emit its terminal
    /// ORDER_UPDATE; the caller (`submit`) does that once the loop ends.
    fn run_matching_loop(&self, taker: &mut Order) {
        let opposite = taker.side.opposite();

        loop {
            if taker.residual() == 0 {
                break;
            }
            let Some(level_price) = self.book.best(opposite) else { break };

            let compatible = match taker.kind {
                OrderKind::Market => true,
                OrderKind::Limit { price } => match taker.side {
                    Side::Buy => price >= level_price,
                    Side::Sell => price <= level_price,
                },
            };
            if !compatible {
                break;
            }

            let Some(level) = self.book.level_at(opposite, level_price) else { break };

            let Some(maker_id) = level.front_id() else {
                self.book.remove_level_if_empty(opposite, level_price);
                continue;
            };

            let trade_price = level_price;
            let now = now_ns();
            let taker_residual_before = taker.residual();

            let applied = level.update_front(|maker| {
                let fill_qty = taker_residual_before.min(maker.residual());
                maker.apply_fill(fill_qty, now);
                (fill_qty, maker.clone())
            });

            let Some((fill_qty, maker_after)) = applied else {
                self.book.remove_level_if_empty(opposite, level_price);
                continue;
            };

            if fill_qty == 0 {
                error!(order_id = %maker_id, "matched level yielded a zero-quantity fill");
                panic!("internal invariant violation: zero-quantity fill at price {trade_price}");
            }

            taker.apply_fill(fill_qty, now);

            let sequence = self.sequencer.next();
            self.emitter.emit(Event::Trade {
                symbol: self.symbol.clone(),
                sequence,
                timestamp_ns: now,
                price: trade_price,
                quantity: fill_qty,
                taker_order_id: taker.id.clone(),
                maker_order_id: maker_after.id.clone(),
                taker_user_id: taker.user_id.clone(),
                maker_user_id: maker_after.user_id.clone(),
                taker_side: taker.side,
            });
            trace!(sequence, price = trade_price, quantity = fill_qty, "trade matched");

            if maker_after.is_terminal() {
                let popped = level.pop_front_if_filled();
                if popped.is_none() {
                    error!(order_id = %maker_after.id, "maker marked filled but not at head of level");
                    panic!("internal invariant violation: filled maker not removable from level head");
                }
                self.book.forget(&maker_after.id);
                self.book.remove_level_if_empty(opposite, level_price);
            }

            let update_sequence = self.sequencer.next();
            self.emit_event(Event::OrderUpdate {
                symbol: self.symbol.clone(),
                sequence: update_sequence,
                timestamp_ns: now,
                order_id: maker_after.id.clone(),
                user_id: maker_after.user_id.clone(),
                side: maker_after.side,
                order_type: maker_after.kind,
                price: maker_after.price(),
                original_quantity: maker_after.original_quantity,
                filled_quantity: maker_after.filled_quantity,
                status: maker_after.status,
                reason: maker_after.cancel_reason,
            });

            if taker.is_terminal() {
                break;
            }
        }
    }

    fn emit_event(&self, event: Event) {
        self.emitter.emit(event);
    }

    /// Assigns this admission's own sequence number (used for time priority
    /// if the order ends up resting) and emits its terminal ORDER_UPDATE
    /// with that same number, so the value is never "spent" without a
    /// corresponding event.
    fn assign_sequence_and_emit(&self, order: &mut Order) {
        let sequence = self.sequencer.next();
        order.sequence = sequence;
        self.emitter.emit(Event::OrderUpdate {
            symbol: self.symbol.clone(),
            sequence,
            timestamp_ns: now_ns(),
            order_id: order.id.clone(),
            user_id: order.user_id.clone(),
            side: order.side,
            order_type: order.kind,
            price: order.price(),
            original_quantity: order.original_quantity,
            filled_quantity: order.filled_quantity,
            status: order.status,
            reason: order.cancel_reason,
        });
    }

    #[instrument(skip(self), fields(symbol = %self.symbol, order_id = %order_id))]
    pub fn cancel(&self, order_id: OrderId) -> Result<Acknowledgment, CancelError> {
        let _guard = self.write_lock.lock().expect("matcher write lock poisoned");

        let Some(mut order) = self.book.remove(&order_id) else {
            return Err(CancelError::NotFound(order_id));
        };

        let now = now_ns();
        order.mark_cancelled(CancelReason::Requested, now);
        let sequence = self.sequencer.next();
        self.emitter.emit(Event::OrderUpdate {
            symbol: self.symbol.clone(),
            sequence,
            timestamp_ns: now,
            order_id: order.id.clone(),
            user_id: order.user_id.clone(),
            side: order.side,
            order_type: order.kind,
            price: order.price(),
            original_quantity: order.original_quantity,
            filled_quantity: order.filled_quantity,
            status: order.status,
            reason: order.cancel_reason,
        });

        debug!(sequence, "order cancelled");

        Ok(Acknowledgment { order_id: order.id, sequence, status: order.status, reason: order.cancel_reason })
    }

    /// Inserts `orders` directly into the book at their stored price/side
    /// with their residual quantity, bypassing matching and admission
    /// validation. Semantically equivalent to sequential `submit` with
    /// matching disabled (§6). Preserves the orders' original sequence
    /// numbers: callers must ensure `orders` is sorted ascending by
    /// sequence, and must call this before any live `submit`/`cancel`.
    pub fn bulk_load(&self, orders: Vec<Order>) {
        let _guard = self.write_lock.lock().expect("matcher write lock poisoned");
        let mut max_sequence = 0;
        for order in orders {
            if !matches!(order.status, OrderStatus::Pending | OrderStatus::Partial) {
                continue;
            }
            max_sequence = max_sequence.max(order.sequence);
            self.book.insert(order);
        }
        if max_sequence > 0 {
            self.sequencer.fast_forward(max_sequence);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::emitter::ChannelEventEmitter;
    use std::sync::mpsc::Receiver;

    fn engine() -> (Engine<ChannelEventEmitter>, Receiver<Event>) {
        let (emitter, receiver) = ChannelEventEmitter::new(64);
        let engine = Engine::new(SymbolId::from("TEST"), EngineConfig::default(), emitter);
        (engine, receiver)
    }

    fn new_order(id: &str, side: Side, kind: OrderKind, qty: Quantity) -> NewOrder {
        NewOrder { id: OrderId::from(id), user_id: UserId::from("u"), side, kind, quantity: qty }
    }

    #[test]
    fn resting_limit_order_becomes_maker_with_pending_status() {
        let (engine, receiver) = engine();
        let ack = engine
            .submit(new_order("b1", Side::Buy, OrderKind::Limit { price: 100 }, 5))
            .unwrap();
        assert_eq!(ack.status, OrderStatus::Pending);
        assert_eq!(engine.book().best(Side::Buy), Some(100));

        let event = receiver.recv().unwrap();
        assert!(matches!(event, Event::OrderUpdate { status: OrderStatus::Pending, .. }));
    }

    #[test]
    fn crossing_limit_fills_against_resting_maker() {
        let (engine, receiver) = engine();
        engine.submit(new_order("s1", Side::Sell, OrderKind::Limit { price: 100 }, 5)).unwrap();
        let _ = receiver.recv().unwrap();

        let ack = engine
            .submit(new_order("b1", Side::Buy, OrderKind::Limit { price: 100 }, 3))
            .unwrap();
        assert_eq!(ack.status, OrderStatus::Filled);

        let trade = receiver.recv().unwrap();
        match trade {
            Event::Trade { price, quantity, maker_order_id, .. } => {
                assert_eq!(price, 100);
                assert_eq!(quantity, 3);
                assert_eq!(maker_order_id, OrderId::from("s1"));
            }
            other => panic!("expected Trade, got {other:?}"),
        }

        let maker_update = receiver.recv().unwrap();
        assert!(matches!(maker_update, Event::OrderUpdate { status: OrderStatus::Partial, .. }));
        assert_eq!(engine.book().level_at(Side::Sell, 100).unwrap().volume(), 2);
    }

    #[test]
    fn market_order_with_insufficient_liquidity_cancels_remainder() {
        let (engine, receiver) = engine();
        engine.submit(new_order("s1", Side::Sell, OrderKind::Limit { price: 100 }, 1)).unwrap();
        let _ = receiver.recv().unwrap();

        let ack = engine.submit(new_order("b1", Side::Buy, OrderKind::Market, 3)).unwrap();
        assert_eq!(ack.status, OrderStatus::Cancelled);
        assert_eq!(ack.reason, Some(CancelReason::InsufficientLiquidity));
    }

    #[test]
    fn duplicate_order_id_is_rejected_without_consuming_a_sequence() {
        let (engine, receiver) = engine();
        engine.submit(new_order("b1", Side::Buy, OrderKind::Limit { price: 100 }, 1)).unwrap();
        let first_ack_sequence = receiver.recv().unwrap().sequence();

        let err = engine
            .submit(new_order("b1", Side::Buy, OrderKind::Limit { price: 100 }, 1))
            .unwrap_err();
        assert_eq!(err, SubmitError::DuplicateOrder(OrderId::from("b1")));
        assert_eq!(first_ack_sequence, 1);
    }

    #[test]
    fn cancel_is_idempotent_second_call_returns_not_found() {
        let (engine, receiver) = engine();
        engine.submit(new_order("b1", Side::Buy, OrderKind::Limit { price: 100 }, 1)).unwrap();
        let _ = receiver.recv().unwrap();

        engine.cancel(OrderId::from("b1")).unwrap();
        let _ = receiver.recv().unwrap();
        let err = engine.cancel(OrderId::from("b1")).unwrap_err();
        assert_eq!(err, CancelError::NotFound(OrderId::from("b1")));
    }
}
