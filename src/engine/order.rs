//! Order domain types: side, kind, status and the `Order` record itself.
//!
//! Price and quantity are fixed-precision integers ("ticks" and "lots"); this
//! module performs no floating point arithmetic and interprets no currency or
//! unit scale. That choice belongs entirely to the caller.

use crate::engine::ids::{OrderId, UserId};
use serde::{Deserialize, Serialize};

pub type Price = u128;
pub type Quantity = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderKind {
    Limit { price: Price },
    Market,
}

impl OrderKind {
    pub fn price(&self) -> Option<Price> {
        match self {
            OrderKind::Limit { price } => Some(*price),
            OrderKind::Market => None,
        }
    }

    pub fn is_limit(&self) -> bool {
        matches!(self, OrderKind::Limit { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Partial,
    Filled,
    Cancelled,
}

/// Why a CANCELLED order was cancelled. Carried on the acknowledgment and the
/// ORDER_UPDATE event's `reason` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CancelReason {
    Requested,
    InsufficientLiquidity,
}

/// A resting or in-flight order.
///
/// `sequence` is assigned at admission (§4.2) and never changes afterward; it
/// is the tie-breaker for time priority, never the wall-clock timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub side: Side,
    pub kind: OrderKind,
    pub original_quantity: Quantity,
    pub filled_quantity: Quantity,
    pub status: OrderStatus,
    pub sequence: u64,
    pub created_at_ns: u64,
    pub updated_at_ns: u64,
    pub cancel_reason: Option<CancelReason>,
}

impl Order {
    pub fn residual(&self) -> Quantity {
        self.original_quantity - self.filled_quantity
    }

    pub fn price(&self) -> Option<Price> {
        self.kind.price()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, OrderStatus::Filled | OrderStatus::Cancelled)
    }

    /// Applies a fill and recomputes status. Never introduces rounding: the
    /// caller supplies the exact fill quantity to add.
    pub fn apply_fill(&mut self, fill_qty: Quantity, now_ns: u64) {
        debug_assert!(fill_qty <= self.residual(), "fill exceeds residual");
        self.filled_quantity += fill_qty;
        self.updated_at_ns = now_ns;
        self.status = if self.filled_quantity == self.original_quantity {
            OrderStatus::Filled
        } else {
            OrderStatus::Partial
        };
    }

    pub fn mark_cancelled(&mut self, reason: CancelReason, now_ns: u64) {
        self.status = OrderStatus::Cancelled;
        self.cancel_reason = Some(reason);
        self.updated_at_ns = now_ns;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order(original: Quantity) -> Order {
        Order {
            id: OrderId::from("o1"),
            user_id: UserId::from("u1"),
            side: Side::Buy,
            kind: OrderKind::Limit { price: 100 },
            original_quantity: original,
            filled_quantity: 0,
            status: OrderStatus::Pending,
            sequence: 1,
            created_at_ns: 0,
            updated_at_ns: 0,
            cancel_reason: None,
        }
    }

    #[test]
    fn partial_fill_yields_partial_status_and_nonzero_residual() {
        let mut order = sample_order(10);
        order.apply_fill(4, 1);
        assert_eq!(order.status, OrderStatus::Partial);
        assert_eq!(order.residual(), 6);
    }

    #[test]
    fn exact_fill_yields_filled_status_and_zero_residual() {
        let mut order = sample_order(10);
        order.apply_fill(10, 1);
        assert_eq!(order.status, OrderStatus::Filled);
        assert_eq!(order.residual(), 0);
    }

    #[test]
    fn cancel_records_reason_and_timestamp() {
        let mut order = sample_order(10);
        order.mark_cancelled(CancelReason::Requested, 7);
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(order.cancel_reason, Some(CancelReason::Requested));
        assert_eq!(order.updated_at_ns, 7);
    }
}
