//! Domain layer: strong types with validation and invariants (no I/O).

mod notification;
mod request;
mod response;
mod validation;
mod value;

pub use notification::{DeliveryNotification, InboundMessage, Timestamp};
pub use request::{SendOptions, SendSms, SubscriptionOptions};
pub use response::{HttpResult, Response};
pub use validation::ConfigurationError;
pub use value::{
    Address, DeliveryStatus, KnownDeliveryStatus, MessageId, MessageText, Password, PhoneNumber,
    RequestId, SubscriptionId, Username,
};
