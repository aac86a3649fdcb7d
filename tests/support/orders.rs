//! Shared test fixtures: a minimal orders domain.

use dispatched_rust::{Envelope, JsonEnvelope, Metadata};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

pub const PLACE_ORDER: &str = "orders.place-order";
pub const ORDER_PLACED: &str = "orders.order-placed";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub order_id: Uuid,
    pub total_pence: u64,
}

/// An inbound place-order command envelope as a transport would deliver it.
pub fn place_order_command(order_id: Uuid) -> JsonEnvelope {
    let metadata = Metadata::builder()
        .with_id(Uuid::new_v4())
        .with_name(PLACE_ORDER)
        .with_client_correlation_id("client-corr-1")
        .with_user_id("user-1")
        .with_session_id("session-1")
        .build()
        .unwrap();

    Envelope::new(
        metadata,
        json!({ "orderId": order_id.to_string(), "totalPence": 1250 }),
    )
}

/// Re-wrap a typed envelope as a JSON-payload envelope for appending or
/// returning through the dispatch boundary.
pub fn to_json_envelope<T: Serialize>(envelope: Envelope<T>) -> JsonEnvelope {
    let (metadata, payload) = envelope.into_parts();
    Envelope::new(metadata, serde_json::to_value(payload).unwrap())
}
