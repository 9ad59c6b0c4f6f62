//! A price-time priority matching engine core for a single tradable symbol.
//!
//! The crate owns an ordered book, a deterministic matcher, and a sequenced
//! event stream. It does not own persistence, the outbound event bus
//! transport, the network front-end, or process supervision — those are
//! collaborators that embed this crate.
//!
//! Start with [`engine::Engine`] for a single symbol, or [`SymbolRegistry`]
//! to multiplex several symbols behind one handle.

pub mod engine;
pub mod prelude;
pub mod registry;
pub mod utils;

pub use registry::SymbolRegistry;
