//! A single price level: an insertion-ordered queue of resting orders at one
//! price on one side of the book.
//!
//! Readers copy the subset they need out from under a brief read lock (§5
//! strategy (a)); writers hold the write lock for the duration of a mutation.
//! Volume is never cached incrementally — it is always recomputed from the
//! residuals of the orders actually present, per the reconciliation rule in
//! the design notes: the volume invariant is the source of truth, not a
//! counter maintained alongside it.

use crate::engine::ids::OrderId;
use crate::engine::order::{Order, Price, Quantity};
use std::collections::VecDeque;
use std::sync::RwLock;

#[derive(Debug)]
pub struct PriceLevel {
    price: Price,
    orders: RwLock<VecDeque<Order>>,
}

impl PriceLevel {
    pub fn new(price: Price) -> Self {
        Self {
            price,
            orders: RwLock::new(VecDeque::new()),
        }
    }

    pub fn price(&self) -> Price {
        self.price
    }

    /// Appends at the tail, enforcing time priority among orders at this price.
    pub fn push_back(&self, order: Order) {
        self.orders.write().expect("price level lock poisoned").push_back(order);
    }

    /// Removes the order with the given id from anywhere in the queue.
    pub fn remove(&self, order_id: &OrderId) -> Option<Order> {
        let mut guard = self.orders.write().expect("price level lock poisoned");
        let pos = guard.iter().position(|o| &o.id == order_id)?;
        guard.remove(pos)
    }

    /// Mutates the head order in place via `f`, returning its value after the
    /// mutation. Used by the matcher to apply a fill to the oldest resting
    /// order without removing and re-inserting it.
    pub fn update_front<R>(&self, f: impl FnOnce(&mut Order) -> R) -> Option<R> {
        let mut guard = self.orders.write().expect("price level lock poisoned");
        guard.front_mut().map(f)
    }

    /// Removes the head order iff it is filled. Returns it when removed.
    pub fn pop_front_if_filled(&self) -> Option<Order> {
        let mut guard = self.orders.write().expect("price level lock poisoned");
        if guard.front().is_some_and(Order::is_terminal) {
            guard.pop_front()
        } else {
            None
        }
    }

    pub fn front_id(&self) -> Option<OrderId> {
        self.orders.read().expect("price level lock poisoned").front().map(|o| o.id.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.orders.read().expect("price level lock poisoned").is_empty()
    }

    pub fn order_count(&self) -> usize {
        self.orders.read().expect("price level lock poisoned").len()
    }

    /// Sum of residuals of orders currently resting at this level.
    pub fn volume(&self) -> Quantity {
        self.orders
            .read()
            .expect("price level lock poisoned")
            .iter()
            .map(Order::residual)
            .sum()
    }

    /// A point-in-time copy of the resting orders, oldest first.
    pub fn snapshot_orders(&self) -> Vec<Order> {
        self.orders.read().expect("price level lock poisoned").iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ids::UserId;
    use crate::engine::order::{OrderKind, OrderStatus, Side};

    fn order(id: &str, qty: Quantity, seq: u64) -> Order {
        Order {
            id: OrderId::from(id),
            user_id: UserId::from("u"),
            side: Side::Buy,
            kind: OrderKind::Limit { price: 100 },
            original_quantity: qty,
            filled_quantity: 0,
            status: OrderStatus::Pending,
            sequence: seq,
            created_at_ns: 0,
            updated_at_ns: 0,
            cancel_reason: None,
        }
    }

    #[test]
    fn volume_is_sum_of_residuals_not_a_separate_counter() {
        let level = PriceLevel::new(100);
        level.push_back(order("a", 3, 1));
        level.push_back(order("b", 2, 2));
        assert_eq!(level.volume(), 5);

        level.update_front(|o| o.apply_fill(1, 10));
        assert_eq!(level.volume(), 4);
    }

    #[test]
    fn remove_from_middle_preserves_remaining_order() {
        let level = PriceLevel::new(100);
        level.push_back(order("a", 1, 1));
        level.push_back(order("b", 2, 2));
        level.push_back(order("c", 3, 3));

        let removed = level.remove(&OrderId::from("b")).unwrap();
        assert_eq!(removed.id, OrderId::from("b"));
        assert_eq!(level.volume(), 4);
        let remaining: Vec<_> = level.snapshot_orders().into_iter().map(|o| o.id).collect();
        assert_eq!(remaining, vec![OrderId::from("a"), OrderId::from("c")]);
    }

    #[test]
    fn pop_front_if_filled_only_removes_when_terminal() {
        let level = PriceLevel::new(100);
        level.push_back(order("a", 1, 1));
        assert!(level.pop_front_if_filled().is_none());

        level.update_front(|o| o.apply_fill(1, 1));
        let popped = level.pop_front_if_filled().unwrap();
        assert_eq!(popped.id, OrderId::from("a"));
        assert!(level.is_empty());
    }
}
