//! Read-only projections over a running engine (§4.4, §6).
//!
//! Every call here returns a point-in-time result consistent with a single
//! writer epoch: a reader copies the subset it needs out from under the
//! book's internal locks, so it never observes a level whose volume doesn't
//! match the sum of its orders' residuals.

use crate::engine::book::LevelView;
use crate::engine::emitter::EventEmitter;
use crate::engine::ids::OrderId;
use crate::engine::matcher::Engine;
use crate::engine::order::{Order, Price, Side};

impl<E: EventEmitter> Engine<E> {
    pub fn best_bid(&self) -> Option<Price> {
        self.book().best(Side::Buy)
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.book().best(Side::Sell)
    }

    /// `best_ask - best_bid`, defined only when both sides are non-empty.
    pub fn spread(&self) -> Option<Price> {
        self.book().spread()
    }

    /// Up to `levels` price levels on each side, best price first.
    pub fn depth(&self, levels: usize) -> Depth {
        Depth {
            bids: self.book().iterate(Side::Buy, levels),
            asks: self.book().iterate(Side::Sell, levels),
        }
    }

    pub fn lookup(&self, order_id: &OrderId) -> Option<Order> {
        self.book().lookup(order_id)
    }

    pub fn size(&self) -> usize {
        self.book().size()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Depth {
    pub bids: Vec<LevelView>,
    pub asks: Vec<LevelView>,
}
