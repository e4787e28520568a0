use std::fmt;
use std::sync::Arc;

use crate::domain::{DeliveryNotification, InboundMessage};
use crate::transport::{parse_delivery_notification, parse_inbound_message};

type IncomingMessageHandler = Arc<dyn Fn(InboundMessage) + Send + Sync>;
type DeliveryNotificationHandler = Arc<dyn Fn(DeliveryNotification) + Send + Sync>;
type UnknownHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Result of classifying a webhook body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    IncomingMessage(InboundMessage),
    DeliveryNotification(DeliveryNotification),
    Unknown,
}

impl Notification {
    /// Try the inbound-message shape first, then the delivery-notification shape.
    /// Anything else is [`Notification::Unknown`].
    pub fn classify(body: &str) -> Self {
        if let Ok(message) = parse_inbound_message(body) {
            return Self::IncomingMessage(message);
        }
        if let Ok(notification) = parse_delivery_notification(body) {
            return Self::DeliveryNotification(notification);
        }
        Self::Unknown
    }
}

/// Routes webhook requests to the registered handlers.
///
/// Handlers are registered once, before the listener starts, and are only read afterwards.
/// A slot left empty is skipped silently.
///
/// ```rust
/// use smsified::Dispatcher;
///
/// let dispatcher = Dispatcher::new()
///     .on_incoming_message(|msg| println!("{} says {}", msg.sender_address, msg.message))
///     .on_unknown(|body| println!("unknown: {body}"));
/// assert!(!dispatcher.handle("GET", ""));
/// assert!(dispatcher.handle("POST", "foobar"));
/// ```
#[derive(Clone, Default)]
pub struct Dispatcher {
    on_incoming_message: Option<IncomingMessageHandler>,
    on_delivery_notification: Option<DeliveryNotificationHandler>,
    on_unknown: Option<UnknownHandler>,
}

impl Dispatcher {
    /// Dispatcher with no handlers registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with each parsed inbound message.
    pub fn on_incoming_message<F>(mut self, handler: F) -> Self
    where
        F: Fn(InboundMessage) + Send + Sync + 'static,
    {
        self.on_incoming_message = Some(Arc::new(handler));
        self
    }

    /// Called with each parsed delivery notification.
    pub fn on_delivery_notification<F>(mut self, handler: F) -> Self
    where
        F: Fn(DeliveryNotification) + Send + Sync + 'static,
    {
        self.on_delivery_notification = Some(Arc::new(handler));
        self
    }

    /// Called with the raw body of any POST matching neither notification shape.
    pub fn on_unknown<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_unknown = Some(Arc::new(handler));
        self
    }

    /// Classify one request and invoke exactly one handler.
    ///
    /// Returns `false` without classifying for any method other than `POST`, and `true`
    /// otherwise, including when the body was unknown or no handler was registered for its
    /// kind.
    pub fn handle(&self, method: &str, body: &str) -> bool {
        if method != "POST" {
            tracing::debug!(method, "ignoring non-POST webhook request");
            return false;
        }

        match Notification::classify(body) {
            Notification::IncomingMessage(message) => {
                tracing::debug!(message_id = %message.message_id, "dispatching incoming message");
                if let Some(handler) = &self.on_incoming_message {
                    handler(message);
                }
            }
            Notification::DeliveryNotification(notification) => {
                tracing::debug!(
                    message_id = %notification.message_id,
                    status = notification.status.as_str(),
                    "dispatching delivery notification"
                );
                if let Some(handler) = &self.on_delivery_notification {
                    handler(notification);
                }
            }
            Notification::Unknown => {
                tracing::debug!(len = body.len(), "dispatching unknown webhook body");
                if let Some(handler) = &self.on_unknown {
                    handler(body);
                }
            }
        }
        true
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("on_incoming_message", &self.on_incoming_message.is_some())
            .field(
                "on_delivery_notification",
                &self.on_delivery_notification.is_some(),
            )
            .field("on_unknown", &self.on_unknown.is_some())
            .finish()
    }
}
