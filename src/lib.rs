//! Typed async Rust client and webhook receiver for the SMSified OneAPI gateway.
//!
//! The crate is split into a domain layer of validated types, a private transport layer for
//! paths, form encoding and notification decoding, a client layer issuing authenticated
//! requests, and a server layer that receives gateway callbacks.
//!
//! Gateway answers are returned as a [`Response`] envelope: HTTP errors and transport failures
//! are data on the envelope, not `Err` values. Only local configuration problems are errors.
//!
//! ```rust,no_run
//! use smsified::{Address, MessageText, SendSms, SmsifiedClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SmsifiedClient::builder()
//!         .username("user")
//!         .password("secret")
//!         .sender_address("tel:+15555550100")
//!         .build()?;
//!     let request = SendSms::to(Address::new("tel:+15555550199")?, MessageText::new("hello")?);
//!     let response = client.send_sms(request).await?;
//!     println!("{:?} {:?}", response.status(), response.resource_id());
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
pub mod server;
mod transport;

pub use client::{ClientConfig, Credentials, SmsifiedClient, SmsifiedClientBuilder, SmsifiedError};
pub use domain::{
    Address, ConfigurationError, DeliveryNotification, DeliveryStatus, HttpResult, InboundMessage,
    KnownDeliveryStatus, MessageId, MessageText, Password, PhoneNumber, RequestId, Response,
    SendOptions, SendSms, SubscriptionId, SubscriptionOptions, Timestamp, Username,
};
pub use server::{
    DEFAULT_MAX_BODY_BYTES, Dispatcher, ListenerConfig, ListenerError, Notification,
    WebhookListener, router,
};
pub use transport::{ParseError, parse_delivery_notification, parse_inbound_message, wire_name};
