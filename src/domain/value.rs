use std::fmt;

use phonenumber::country;

use crate::domain::validation::ConfigurationError;

#[derive(Clone, PartialEq, Eq, Hash)]
/// SMSified account username.
///
/// Invariant: non-empty after trimming.
pub struct Username(String);

impl Username {
    /// Configuration field name (`username`).
    pub const FIELD: &'static str = "username";

    /// Create a validated [`Username`].
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigurationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ConfigurationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated username.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Username").field(&self.0).finish()
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// SMSified account password.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct Password(String);

impl Password {
    /// Configuration field name (`password`).
    pub const FIELD: &'static str = "password";

    /// Create a validated [`Password`].
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigurationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ConfigurationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Gateway address of a handset or a provisioned number, e.g. `14155551212` or
/// `tel:+14155551212`.
///
/// Invariant: non-empty after trimming. The gateway decides what it accepts; this type
/// does not normalize. Parse into [`PhoneNumber`] first if you want E.164 `tel:` URIs.
pub struct Address(String);

impl Address {
    /// Form field name used for recipients (`address`).
    pub const FIELD: &'static str = "address";

    /// Create a validated (non-empty) address.
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigurationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ConfigurationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Raw (trimmed) value as sent to the gateway.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<PhoneNumber> for Address {
    /// Convert an already-parsed phone number into a `tel:` URI address.
    fn from(value: PhoneNumber) -> Self {
        Self(format!("tel:{}", value.e164))
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// Equality, ordering, and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ConfigurationError::Empty {
                field: Address::FIELD,
            });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ConfigurationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164, parsed })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// The parsed phone number from the `phonenumber` crate.
    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message text (`message`).
///
/// Invariant: non-empty after trimming. The original value (including whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    /// Form field name used by the gateway (`message`).
    pub const FIELD: &'static str = "message";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigurationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ConfigurationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Field name used in errors and query strings.
            pub const FIELD: &'static str = $field;

            /// Wrap a gateway-issued identifier. Only emptiness is checked.
            pub fn new(value: impl Into<String>) -> Result<Self, ConfigurationError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(ConfigurationError::Empty { field: Self::FIELD });
                }
                Ok(Self(trimmed.to_owned()))
            }

            /// Borrow the identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_id!(
    /// Id of a single sent or received message (`messageId`).
    MessageId,
    "message_id"
);

opaque_id!(
    /// Id of an outbound send request, the last segment of its `resourceURL`.
    RequestId,
    "request_id"
);

opaque_id!(
    /// Id of an inbound or outbound subscription (`subscriptionId`).
    SubscriptionId,
    "subscription_id"
);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Delivery status reported by the gateway (`deliveryStatus`).
///
/// This value is preserved as-is even when it is unknown to this crate.
pub struct DeliveryStatus(String);

impl DeliveryStatus {
    /// Wrap a status string exactly as received.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the status as provided by the gateway.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map this status to a known variant, if one exists.
    pub fn known(&self) -> Option<KnownDeliveryStatus> {
        KnownDeliveryStatus::from_wire(&self.0)
    }
}

impl PartialEq<&str> for DeliveryStatus {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// OneAPI delivery statuses the gateway is documented to send.
pub enum KnownDeliveryStatus {
    DeliveredToTerminal,
    DeliveredToNetwork,
    DeliveryUncertain,
    DeliveryImpossible,
    MessageWaiting,
    DeliveryNotificationNotSupported,
}

impl KnownDeliveryStatus {
    /// Convert a wire status string into a known variant.
    pub fn from_wire(value: &str) -> Option<Self> {
        Some(match value {
            "DeliveredToTerminal" => Self::DeliveredToTerminal,
            "DeliveredToNetwork" => Self::DeliveredToNetwork,
            "DeliveryUncertain" => Self::DeliveryUncertain,
            "DeliveryImpossible" => Self::DeliveryImpossible,
            "MessageWaiting" => Self::MessageWaiting,
            "DeliveryNotificationNotSupported" => Self::DeliveryNotificationNotSupported,
            _ => return None,
        })
    }

    /// Whether the message reached the network or the handset.
    pub fn is_delivered(self) -> bool {
        matches!(self, Self::DeliveredToTerminal | Self::DeliveredToNetwork)
    }

    /// Whether no further notification is expected for this message.
    pub fn is_final(self) -> bool {
        !matches!(self, Self::MessageWaiting)
    }
}
