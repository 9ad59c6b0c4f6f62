//! The ordered book: two price-indexed maps (bids, asks) plus a secondary
//! index from order id to its resting location.
//!
//! Strategy (a) from §5: the price-indexed maps are concurrent skip lists
//! (one per side) and the secondary index is a concurrent hash map, so
//! readers can walk a consistent snapshot without taking a lock while all
//! mutation is serialized through the single writer that owns this `Book`
//! (see `engine::matcher`).

use crate::engine::ids::OrderId;
use crate::engine::level::PriceLevel;
use crate::engine::order::{Order, Price, Quantity, Side};
use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelView {
    pub price: Price,
    pub volume: Quantity,
}

/// The two-sided order book for a single symbol.
///
/// Bids and asks are both stored in natural ascending order; best-bid is the
/// highest price (the last entry) and best-ask is the lowest price (the
/// first entry). `order_locations` lets `remove`/`lookup` go straight to the
/// owning level instead of scanning both sides.
pub struct Book {
    bids: SkipMap<Price, Arc<PriceLevel>>,
    asks: SkipMap<Price, Arc<PriceLevel>>,
    order_locations: DashMap<OrderId, (Side, Price)>,
}

impl Default for Book {
    fn default() -> Self {
        Self::new()
    }
}

impl Book {
    pub fn new() -> Self {
        Self {
            bids: SkipMap::new(),
            asks: SkipMap::new(),
            order_locations: DashMap::new(),
        }
    }

    fn side_map(&self, side: Side) -> &SkipMap<Price, Arc<PriceLevel>> {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    /// Inserts a resting order. Preconditions (enforced by the matcher, not
    /// re-validated here): order is LIMIT, has residual quantity > 0, and its
    /// id is not already indexed.
    pub fn insert(&self, order: Order) {
        let side = order.side;
        let price = order.price().expect("insert requires a LIMIT order");
        let order_id = order.id.clone();

        let level = self
            .side_map(side)
            .get_or_insert(price, Arc::new(PriceLevel::new(price)))
            .value()
            .clone();
        level.push_back(order);
        self.order_locations.insert(order_id.clone(), (side, price));
        trace!(order_id = %order_id, price, ?side, "order inserted into book");
    }

    /// Removes an order by id. Deletes the level entirely if it becomes
    /// empty. Returns `None` if the id is not currently live, which is not an
    /// error at this layer.
    pub fn remove(&self, order_id: &OrderId) -> Option<Order> {
        let (_, (side, price)) = self.order_locations.remove(order_id)?;
        let level_entry = self.side_map(side).get(&price)?;
        let level = level_entry.value().clone();
        let removed = level.remove(order_id);
        if level.is_empty() {
            self.side_map(side).remove(&price);
        }
        trace!(order_id = %order_id, price, ?side, "order removed from book");
        removed
    }

    /// Best price on `side`, or `None` if that side is empty.
    pub fn best(&self, side: Side) -> Option<Price> {
        match side {
            // SkipMap is ascending; best bid (highest price) is the last entry.
            Side::Buy => self.bids.iter().next_back().map(|entry| *entry.key()),
            // best ask (lowest price) is the first entry.
            Side::Sell => self.asks.iter().next().map(|entry| *entry.key()),
        }
    }

    pub fn spread(&self) -> Option<Price> {
        match (self.best(Side::Buy), self.best(Side::Sell)) {
            (Some(bid), Some(ask)) => Some(ask.saturating_sub(bid)),
            _ => None,
        }
    }

    /// Up to `depth` levels starting at the best price, in priority order.
    pub fn iterate(&self, side: Side, depth: usize) -> Vec<LevelView> {
        match side {
            Side::Buy => self
                .bids
                .iter()
                .rev()
                .take(depth)
                .map(|entry| LevelView { price: *entry.key(), volume: entry.value().volume() })
                .collect(),
            Side::Sell => self
                .asks
                .iter()
                .take(depth)
                .map(|entry| LevelView { price: *entry.key(), volume: entry.value().volume() })
                .collect(),
        }
    }

    /// The price level at `price` on `side`, if one currently exists.
    pub fn level_at(&self, side: Side, price: Price) -> Option<Arc<PriceLevel>> {
        self.side_map(side).get(&price).map(|entry| entry.value().clone())
    }

    /// A value copy of the order, if it is currently live in the book.
    pub fn lookup(&self, order_id: &OrderId) -> Option<Order> {
        let (side, price) = *self.order_locations.get(order_id)?;
        let level = self.side_map(side).get(&price)?.value().clone();
        level.snapshot_orders().into_iter().find(|o| &o.id == order_id)
    }

    pub fn contains(&self, order_id: &OrderId) -> bool {
        self.order_locations.contains_key(order_id)
    }

    /// Drops the secondary index entry for an order that the matcher has
    /// already popped out of its level's `VecDeque` (a fully-filled maker).
    /// Unlike `remove`, this does not touch the level itself — the caller is
    /// expected to have removed it there already and to follow up with
    /// `remove_level_if_empty`.
    pub fn forget(&self, order_id: &OrderId) {
        self.order_locations.remove(order_id);
    }

    /// Removes the level at `price` on `side` iff it is empty. Used by the
    /// matcher after a maker is fully consumed.
    pub fn remove_level_if_empty(&self, side: Side, price: Price) {
        if let Some(entry) = self.side_map(side).get(&price) {
            if entry.value().is_empty() {
                self.side_map(side).remove(&price);
            }
        }
    }

    pub fn size(&self) -> usize {
        self.order_locations.len()
    }
}
