//! Per-symbol engine configuration (§10.2).
//!
//! Each engine takes a small, explicit configuration struct rather than
//! reading a global. The struct derives `serde::Deserialize` so a collaborator
//! embedding this crate can produce it from its own TOML/YAML loader; the
//! core itself has no file- or env-based config loader.

use crate::engine::order::{Price, Quantity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// When set, prices must be exact multiples of this, else `InvalidPrice`.
    #[serde(default)]
    pub tick_size: Option<Price>,
    /// When set, quantities must be exact multiples of this, else `InvalidQuantity`.
    #[serde(default)]
    pub lot_size: Option<Quantity>,
    #[serde(default)]
    pub min_order_size: Option<Quantity>,
    #[serde(default)]
    pub max_order_size: Option<Quantity>,
    /// Capacity of the Event Emitter's bounded buffer.
    #[serde(default = "EngineConfig::default_emitter_capacity")]
    pub emitter_capacity: usize,
}

impl EngineConfig {
    fn default_emitter_capacity() -> usize {
        1024
    }

    pub fn is_valid_price(&self, price: Price) -> bool {
        match self.tick_size {
            Some(tick) if tick > 0 => price % tick == 0,
            _ => true,
        }
    }

    pub fn is_valid_quantity(&self, quantity: Quantity) -> bool {
        let respects_lot = match self.lot_size {
            Some(lot) if lot > 0 => quantity % lot == 0,
            _ => true,
        };
        let within_min = self.min_order_size.is_none_or(|min| quantity >= min);
        let within_max = self.max_order_size.is_none_or(|max| quantity <= max);
        respects_lot && within_min && within_max
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_size: None,
            lot_size: None,
            min_order_size: None,
            max_order_size: None,
            emitter_capacity: Self::default_emitter_capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_size_rejects_non_multiples() {
        let config = EngineConfig { tick_size: Some(5), ..Default::default() };
        assert!(config.is_valid_price(10));
        assert!(!config.is_valid_price(11));
    }

    #[test]
    fn order_size_bounds_are_inclusive() {
        let config = EngineConfig { min_order_size: Some(1), max_order_size: Some(100), ..Default::default() };
        assert!(config.is_valid_quantity(1));
        assert!(config.is_valid_quantity(100));
        assert!(!config.is_valid_quantity(0));
        assert!(!config.is_valid_quantity(101));
    }

    #[test]
    fn defaults_accept_everything() {
        let config = EngineConfig::default();
        assert!(config.is_valid_price(u128::MAX));
        assert!(config.is_valid_quantity(0));
    }
}
