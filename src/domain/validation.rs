use std::fmt;

/// Rejected client configuration or per-call input.
///
/// Always returned before any network activity takes place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Required field was not supplied.
    Missing { field: &'static str },
    /// Field was supplied but empty (or blank, for trimmed fields).
    Empty { field: &'static str },
    /// Base URI is not an absolute `http`/`https` URL without query or fragment.
    InvalidBaseUri { input: String },
    /// Input could not be parsed as a phone number.
    InvalidPhoneNumber { input: String },
}

impl ConfigurationError {
    /// Name of the offending field, when the error is about a single field.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Missing { field } | Self::Empty { field } => Some(field),
            Self::InvalidBaseUri { .. } => Some("base_uri"),
            Self::InvalidPhoneNumber { .. } => None,
        }
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "{field} required"),
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidBaseUri { input } => write!(f, "invalid base uri: {input}"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
        }
    }
}

impl std::error::Error for ConfigurationError {}

#[cfg(test)]
mod tests {
    use super::ConfigurationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ConfigurationError::Missing { field: "username" };
        assert_eq!(err.to_string(), "username required");

        let err = ConfigurationError::Empty { field: "message" };
        assert_eq!(err.to_string(), "message must not be empty");

        let err = ConfigurationError::InvalidBaseUri {
            input: "nope".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid base uri: nope");

        let err = ConfigurationError::InvalidPhoneNumber {
            input: "bad".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid phone number: bad");
    }

    #[test]
    fn field_names_the_offending_input() {
        assert_eq!(
            ConfigurationError::Missing { field: "password" }.field(),
            Some("password")
        );
        assert_eq!(
            ConfigurationError::InvalidBaseUri {
                input: String::new()
            }
            .field(),
            Some("base_uri")
        );
    }
}
