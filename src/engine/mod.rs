//! The matching engine core: book, matcher, event emitter, sequencer and the
//! read-only snapshot view, all scoped to a single symbol.

pub mod book;
pub mod config;
pub mod emitter;
pub mod error;
pub mod event;
pub mod ids;
pub mod level;
pub mod matcher;
pub mod order;
pub mod sequencer;
pub mod serialization;
pub mod snapshot;

pub use book::{Book, LevelView};
pub use config::EngineConfig;
pub use emitter::{ChannelEventEmitter, EventEmitter, TokioEventEmitter};
pub use error::{CancelError, RegistryError, SubmitError};
pub use event::{Acknowledgment, Event};
pub use ids::{OrderId, SymbolId, UserId};
pub use matcher::{Engine, NewOrder};
pub use order::{CancelReason, Order, OrderKind, OrderStatus, Price, Quantity, Side};
pub use sequencer::Sequencer;
pub use serialization::{EventSerializer, JsonEventSerializer, SerializationError};
pub use snapshot::Depth;
