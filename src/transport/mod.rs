//! Transport layer: URL paths, form encoding and wire-format decoding.

mod envelope;
mod form;
mod messaging;
mod notification;
mod scalar;
mod subscriptions;

pub use envelope::decode_data;
pub use form::wire_name;
pub use messaging::{
    delivery_infos_path, encode_send_sms_form, message_path, search_messages_path,
    send_sms_path,
};
pub use notification::{ParseError, parse_delivery_notification, parse_inbound_message};
pub use subscriptions::{
    create_inbound_subscription_path, create_outbound_subscription_path,
    encode_create_inbound_subscription_form, encode_subscription_form,
    inbound_subscription_path, list_inbound_subscriptions_path,
    list_outbound_subscriptions_path, outbound_subscription_path,
};
