//! Convenience re-export of the types most callers need.

pub use crate::engine::{
    Acknowledgment, Book, CancelError, CancelReason, ChannelEventEmitter, Depth, Engine,
    EngineConfig, Event, EventEmitter, EventSerializer, JsonEventSerializer, LevelView, NewOrder,
    Order, OrderId, OrderKind, OrderStatus, Price, Quantity, RegistryError, SerializationError,
    Sequencer, Side, SubmitError, SymbolId, TokioEventEmitter, UserId,
};
pub use crate::registry::SymbolRegistry;
