use std::fmt;

use near_sdk::serde::{Deserialize, Serialize};
#[cfg(not(feature = "no_emit"))]
use near_sdk::env;
use near_sdk::AccountId;

use dubiex_sdk_dex_types::*;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "near_sdk::serde")]
pub struct Event {
    #[serde(flatten)] // due to tagging options, this adds a "type" key and a "data" key
    pub data: EventType,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&serde_json::to_string(self).map_err(|_| fmt::Error)?)
    }
}

impl From<EventType> for Event {
    fn from(data: EventType) -> Self {
        Self { data }
    }
}

// we tag this with type/content and flatten it into the event struct. this is
// because serde sometimes has trouble figuring out which enum member the json
// corresponds to
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "near_sdk::serde", tag = "type", content = "data")]
pub enum EventType {
    #[serde(rename = "order_created")]
    OrderCreated(OrderCreatedEvent),
    #[serde(rename = "order_updated")]
    OrderUpdated(OrderUpdatedEvent),
    #[serde(rename = "order_filled")]
    OrderFilled(OrderFilledEvent),
    #[serde(rename = "order_cancelled")]
    OrderCancelled(OrderCancelledEvent),
    #[serde(rename = "circuit_breaker_activated")]
    CircuitBreakerActivated,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "near_sdk::serde")]
pub struct OrderCreatedEvent {
    pub maker: AccountId,
    pub order_id: OrderId,
    /// Maker value, taker value and pair alias of the new order. Decode with
    /// [unpack_order_data].
    pub packed_data: PackedData,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "near_sdk::serde")]
pub struct OrderUpdatedEvent {
    pub maker: AccountId,
    pub order_id: OrderId,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "near_sdk::serde")]
pub struct OrderFilledEvent {
    pub maker: AccountId,
    pub order_id: OrderId,
    pub taker: AccountId,
    /// Filled maker value, filled taker value and pair alias.
    pub packed_data: PackedData,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "near_sdk::serde")]
pub struct OrderCancelledEvent {
    pub maker: AccountId,
    pub order_id: OrderId,
}

/// Write `event` to the transaction log as one JSON line.
#[cfg(not(feature = "no_emit"))]
pub fn emit_event(event: &Event) {
    env::log_str(&event.to_string());
}

#[cfg(feature = "no_emit")]
pub fn emit_event(_event: &Event) {}
