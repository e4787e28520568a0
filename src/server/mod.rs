//! Webhook receiver: classifies gateway callbacks and acknowledges every request.

mod dispatcher;
mod listener;

pub use dispatcher::{Dispatcher, Notification};
pub use listener::{
    DEFAULT_MAX_BODY_BYTES, ListenerConfig, ListenerError, WebhookListener, router,
};
