//! Error taxonomy for the matching core.
//!
//! Manual `Display`/`Error` impls, matching the surrounding lineage's style
//! rather than a derive macro. Validation errors (§7) fail fast before any
//! sequence number is consumed. Once a sequence number is assigned, the
//! admission is committed: any subsequent internal-invariant violation is a
//! bug, not a recoverable error, and is handled by `fail_loudly` (see
//! `engine::matcher`) rather than by a `Result` variant here.

use crate::engine::ids::{OrderId, SymbolId};
use std::fmt;

/// Errors returned by `submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubmitError {
    InvalidQuantity,
    InvalidPrice,
    DuplicateOrder(OrderId),
    UnknownSymbol(SymbolId),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::InvalidQuantity => write!(f, "order quantity must be greater than zero"),
            SubmitError::InvalidPrice => write!(f, "limit order price must be greater than zero"),
            SubmitError::DuplicateOrder(id) => write!(f, "order id {id} is already live"),
            SubmitError::UnknownSymbol(symbol) => write!(f, "symbol {symbol} is not registered"),
        }
    }
}

impl std::error::Error for SubmitError {}

/// Errors returned by `cancel`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CancelError {
    NotFound(OrderId),
    UnknownSymbol(SymbolId),
}

impl fmt::Display for CancelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelError::NotFound(id) => write!(f, "order {id} is absent or already terminal"),
            CancelError::UnknownSymbol(symbol) => write!(f, "symbol {symbol} is not registered"),
        }
    }
}

impl std::error::Error for CancelError {}

/// Errors returned by the symbol registry (§4.6). These are an engineering
/// safety rail on top of the core's own error taxonomy, not part of §7.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistryError {
    DuplicateSymbol(SymbolId),
    UnknownSymbol(SymbolId),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateSymbol(symbol) => write!(f, "symbol {symbol} is already registered"),
            RegistryError::UnknownSymbol(symbol) => write!(f, "symbol {symbol} is not registered"),
        }
    }
}

impl std::error::Error for RegistryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_name_the_offending_identifier() {
        let err = SubmitError::DuplicateOrder(OrderId::from("o1"));
        assert!(err.to_string().contains("o1"));
    }
}
