//! Event schema emitted by the matcher (§6) and the synchronous
//! acknowledgment returned to the caller of `submit`/`cancel`.

use crate::engine::ids::{OrderId, SymbolId, UserId};
use crate::engine::order::{CancelReason, OrderKind, OrderStatus, Price, Quantity, Side};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_kind")]
pub enum Event {
    #[serde(rename = "TRADE")]
    Trade {
        symbol: SymbolId,
        sequence: u64,
        timestamp_ns: u64,
        price: Price,
        quantity: Quantity,
        taker_order_id: OrderId,
        maker_order_id: OrderId,
        taker_user_id: UserId,
        maker_user_id: UserId,
        taker_side: Side,
    },
    #[serde(rename = "ORDER_UPDATE")]
    OrderUpdate {
        symbol: SymbolId,
        sequence: u64,
        timestamp_ns: u64,
        order_id: OrderId,
        user_id: UserId,
        side: Side,
        order_type: OrderKind,
        price: Option<Price>,
        original_quantity: Quantity,
        filled_quantity: Quantity,
        status: OrderStatus,
        reason: Option<CancelReason>,
    },
}

impl Event {
    pub fn sequence(&self) -> u64 {
        match self {
            Event::Trade { sequence, .. } => *sequence,
            Event::OrderUpdate { sequence, .. } => *sequence,
        }
    }
}

/// Returned synchronously by `submit`/`cancel` once all resulting events have
/// been enqueued to the emitter.
#[derive(Debug, Clone, PartialEq)]
pub struct Acknowledgment {
    pub order_id: OrderId,
    pub sequence: u64,
    pub status: OrderStatus,
    pub reason: Option<CancelReason>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trade_and_order_update_expose_their_sequence_number() {
        let trade = Event::Trade {
            symbol: SymbolId::from("X"),
            sequence: 5,
            timestamp_ns: 0,
            price: 1,
            quantity: 1,
            taker_order_id: OrderId::from("t"),
            maker_order_id: OrderId::from("m"),
            taker_user_id: UserId::from("u1"),
            maker_user_id: UserId::from("u2"),
            taker_side: Side::Buy,
        };
        assert_eq!(trade.sequence(), 5);
    }
}
