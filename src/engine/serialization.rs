//! Wire encoding for events handed to the external bus (§10.3).
//!
//! Only the encoding is in scope here; actually transporting the bytes is a
//! collaborator's job (§1). `JsonEventSerializer` is the default; a
//! `bincode`-backed serializer is available behind the `bincode` feature.

use crate::engine::event::Event;
use std::fmt;

#[derive(Debug)]
pub struct SerializationError(String);

impl fmt::Display for SerializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to serialize event: {}", self.0)
    }
}

impl std::error::Error for SerializationError {}

pub trait EventSerializer {
    fn serialize(&self, event: &Event) -> Result<Vec<u8>, SerializationError>;
    fn deserialize(&self, bytes: &[u8]) -> Result<Event, SerializationError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonEventSerializer;

impl EventSerializer for JsonEventSerializer {
    fn serialize(&self, event: &Event) -> Result<Vec<u8>, SerializationError> {
        serde_json::to_vec(event).map_err(|e| SerializationError(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Event, SerializationError> {
        serde_json::from_slice(bytes).map_err(|e| SerializationError(e.to_string()))
    }
}

#[cfg(feature = "bincode")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BincodeEventSerializer;

#[cfg(feature = "bincode")]
impl EventSerializer for BincodeEventSerializer {
    fn serialize(&self, event: &Event) -> Result<Vec<u8>, SerializationError> {
        bincode::serde::encode_to_vec(event, bincode::config::standard())
            .map_err(|e| SerializationError(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Event, SerializationError> {
        bincode::serde::decode_from_slice(bytes, bincode::config::standard())
            .map(|(event, _)| event)
            .map_err(|e| SerializationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ids::{OrderId, SymbolId, UserId};
    use crate::engine::order::{OrderKind, OrderStatus, Side};

    fn sample_event() -> Event {
        Event::OrderUpdate {
            symbol: SymbolId::from("X"),
            sequence: 1,
            timestamp_ns: 0,
            order_id: OrderId::from("o1"),
            user_id: UserId::from("u1"),
            side: Side::Buy,
            order_type: OrderKind::Limit { price: 100 },
            price: Some(100),
            original_quantity: 1,
            filled_quantity: 0,
            status: OrderStatus::Pending,
            reason: None,
        }
    }

    #[test]
    fn json_serializer_round_trips_an_order_update() {
        let serializer = JsonEventSerializer;
        let event = sample_event();
        let bytes = serializer.serialize(&event).unwrap();
        let decoded = serializer.deserialize(&bytes).unwrap();
        assert_eq!(decoded, event);
    }

    #[cfg(feature = "bincode")]
    #[test]
    fn bincode_serializer_round_trips_an_order_update() {
        let serializer = BincodeEventSerializer;
        let event = sample_event();
        let bytes = serializer.serialize(&event).unwrap();
        let decoded = serializer.deserialize(&bytes).unwrap();
        assert_eq!(decoded, event);
    }
}
