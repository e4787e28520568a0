use crate::domain::validation::ConfigurationError;
use crate::domain::value::{Address, MessageText};

/// Optional fields for an outbound send request.
///
/// `extra` carries any further gateway option keyed in snake_case
/// (for example `("sender_name", "Acme")`); keys are converted to wire names on encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    pub notify_url: Option<String>,
    pub client_correlator: Option<String>,
    pub callback_data: Option<String>,
    pub sender_name: Option<String>,
    pub extra: Vec<(String, String)>,
}

/// Optional fields for creating or updating a subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionOptions {
    pub notify_url: Option<String>,
    pub client_correlator: Option<String>,
    pub callback_data: Option<String>,
    pub extra: Vec<(String, String)>,
}

impl SubscriptionOptions {
    /// Options with only a callback URL set.
    pub fn notify_url(url: impl Into<String>) -> Self {
        Self {
            notify_url: Some(url.into()),
            ..Default::default()
        }
    }
}

/// Outbound SMS to one or more recipients.
///
/// Recipients are sent in the order given; the gateway receives one `address` field per
/// recipient.
#[derive(Debug, Clone)]
pub struct SendSms {
    addresses: Vec<Address>,
    message: MessageText,
    sender_address: Option<Address>,
    options: SendOptions,
}

impl SendSms {
    /// Build a request. Fails with [`ConfigurationError::Missing`] when `addresses` is empty.
    pub fn new(addresses: Vec<Address>, message: MessageText) -> Result<Self, ConfigurationError> {
        if addresses.is_empty() {
            return Err(ConfigurationError::Missing {
                field: Address::FIELD,
            });
        }
        Ok(Self {
            addresses,
            message,
            sender_address: None,
            options: SendOptions::default(),
        })
    }

    /// Single-recipient shorthand.
    pub fn to(address: Address, message: MessageText) -> Self {
        Self {
            addresses: vec![address],
            message,
            sender_address: None,
            options: SendOptions::default(),
        }
    }

    /// Send from this address instead of the client's default sender.
    pub fn from(mut self, sender_address: Address) -> Self {
        self.sender_address = Some(sender_address);
        self
    }

    /// Replace the optional fields.
    pub fn with_options(mut self, options: SendOptions) -> Self {
        self.options = options;
        self
    }

    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    pub fn message(&self) -> &MessageText {
        &self.message
    }

    pub fn sender_address(&self) -> Option<&Address> {
        self.sender_address.as_ref()
    }

    pub fn options(&self) -> &SendOptions {
        &self.options
    }
}
