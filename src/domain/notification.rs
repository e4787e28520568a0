use chrono::{DateTime, Utc};

use crate::domain::value::DeliveryStatus;

/// Point in time reported by the gateway, normalized to UTC.
pub type Timestamp = DateTime<Utc>;

/// SMS received on one of your numbers, pushed to the webhook.
///
/// Every field is populated; parsing fails as a whole otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub received_at: Timestamp,
    pub destination_address: String,
    pub sender_address: String,
    pub message: String,
    pub message_id: String,
}

/// Delivery report for a message you sent, pushed to the webhook.
///
/// A notification may carry several delivery-info records; only the first one is read.
/// Further records are ignored rather than merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryNotification {
    pub status: DeliveryStatus,
    pub code: String,
    pub message_id: String,
    pub sender_address: String,
    pub address: String,
    pub created_at: Timestamp,
    pub sent_at: Timestamp,
    pub parts: u32,
    pub direction: String,
    pub message: String,
}
