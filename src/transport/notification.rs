use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::scalar::TransportScalar;
use crate::domain::{DeliveryNotification, DeliveryStatus, InboundMessage, Timestamp};

/// Body did not match the notification shape it was parsed as.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid notification JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid {field} timestamp: {value}")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("invalid parts count: {value}")]
    InvalidParts { value: String },

    #[error("deliveryInfo list is empty")]
    EmptyDeliveryInfo,
}

#[derive(Debug, Deserialize)]
struct InboundMessageDocument {
    #[serde(rename = "inboundSMSMessageNotification")]
    notification: InboundMessageNotification,
}

#[derive(Debug, Deserialize)]
struct InboundMessageNotification {
    #[serde(rename = "inboundSMSMessage")]
    message: InboundMessageJson,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InboundMessageJson {
    date_time: String,
    destination_address: String,
    message: String,
    message_id: String,
    sender_address: String,
}

#[derive(Debug, Deserialize)]
struct DeliveryDocument {
    #[serde(rename = "deliveryInfoNotification")]
    notification: DeliveryInfoNotification,
}

#[derive(Debug, Deserialize)]
struct DeliveryInfoNotification {
    // Object or array; decoded in two steps so trailing records are never inspected.
    #[serde(rename = "deliveryInfo")]
    delivery_info: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeliveryInfoJson {
    delivery_status: String,
    code: TransportScalar,
    message_id: String,
    sender_address: String,
    address: String,
    created_date_time: String,
    sent_date_time: String,
    parts: TransportScalar,
    direction: String,
    message: String,
}

/// Parse an inbound-message webhook body
/// (`inboundSMSMessageNotification.inboundSMSMessage`).
pub fn parse_inbound_message(raw: impl AsRef<[u8]>) -> Result<InboundMessage, ParseError> {
    let document: InboundMessageDocument = serde_json::from_slice(raw.as_ref())?;
    let contents = document.notification.message;

    Ok(InboundMessage {
        received_at: parse_timestamp("dateTime", &contents.date_time)?,
        destination_address: contents.destination_address,
        sender_address: contents.sender_address,
        message: contents.message,
        message_id: contents.message_id,
    })
}

/// Parse a delivery-status webhook body (`deliveryInfoNotification.deliveryInfo`).
///
/// When `deliveryInfo` is an array only its first record is read; the rest are ignored.
pub fn parse_delivery_notification(
    raw: impl AsRef<[u8]>,
) -> Result<DeliveryNotification, ParseError> {
    let document: DeliveryDocument = serde_json::from_slice(raw.as_ref())?;
    let first = match document.notification.delivery_info {
        Value::Array(records) => records
            .into_iter()
            .next()
            .ok_or(ParseError::EmptyDeliveryInfo)?,
        record => record,
    };
    let contents = DeliveryInfoJson::deserialize(first)?;

    let parts = contents
        .parts
        .as_str()
        .trim()
        .parse::<u32>()
        .map_err(|_| ParseError::InvalidParts {
            value: contents.parts.as_str().to_owned(),
        })?;

    Ok(DeliveryNotification {
        status: DeliveryStatus::new(contents.delivery_status),
        code: contents.code.into_string(),
        message_id: contents.message_id,
        sender_address: contents.sender_address,
        address: contents.address,
        created_at: parse_timestamp("createdDateTime", &contents.created_date_time)?,
        sent_at: parse_timestamp("sentDateTime", &contents.sent_date_time)?,
        parts,
        direction: contents.direction,
        message: contents.message,
    })
}

/// Accepts RFC 3339, ISO 8601 with a `+0000` offset, and `Fri May 13 16:14:50 UTC 2011`.
fn parse_timestamp(field: &'static str, value: &str) -> Result<Timestamp, ParseError> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, "%a %b %d %H:%M:%S UTC %Y") {
        return Ok(parsed.and_utc());
    }
    Err(ParseError::InvalidTimestamp {
        field,
        value: value.to_owned(),
    })
}
