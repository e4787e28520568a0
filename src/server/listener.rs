use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::State;
use axum::http::{Method, StatusCode};
use serde::Deserialize;
use tokio::net::TcpListener;

use super::dispatcher::Dispatcher;

/// Bodies above this size are dropped before dispatch, matching axum's `DefaultBodyLimit`.
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Where the webhook receiver listens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListenerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest request body read; a longer body is dispatched as empty.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Failure to start or run the webhook listener.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("failed to bind webhook listener to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("webhook listener failed: {0}")]
    Serve(#[source] io::Error),
}

#[derive(Debug)]
struct Receiver {
    dispatcher: Dispatcher,
    max_body_bytes: usize,
}

/// Router answering every request with an empty `200 OK` after handing method and body
/// to `dispatcher`.
///
/// Bodies longer than `max_body_bytes` are not buffered; they are dispatched as an empty
/// body. The status never depends on the dispatch outcome; the gateway retries only on
/// non-2xx.
pub fn router(dispatcher: Dispatcher, max_body_bytes: usize) -> Router {
    Router::new().fallback(receive).with_state(Arc::new(Receiver {
        dispatcher,
        max_body_bytes,
    }))
}

async fn receive(State(receiver): State<Arc<Receiver>>, method: Method, body: Body) -> StatusCode {
    tracing::info!(%method, "webhook request received");
    let bytes = match to_bytes(body, receiver.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(
                error = %err,
                limit = receiver.max_body_bytes,
                "failed to read webhook body"
            );
            Default::default()
        }
    };
    let content = String::from_utf8_lossy(&bytes);
    let handled = receiver.dispatcher.handle(method.as_str(), &content);
    tracing::debug!(handled, "webhook request processed");
    StatusCode::OK
}

/// HTTP receiver for gateway callbacks, bound and ready to serve.
///
/// Runs on the caller's tokio runtime; stop it by resolving the signal passed to
/// [`WebhookListener::serve_with_shutdown`].
pub struct WebhookListener {
    router: Router,
    listener: TcpListener,
}

impl WebhookListener {
    /// Bind the listening socket. Port `0` picks a free port.
    pub async fn bind(
        config: &ListenerConfig,
        dispatcher: Dispatcher,
    ) -> Result<Self, ListenerError> {
        let addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ListenerError::Bind { addr, source })?;

        Ok(Self {
            router: router(dispatcher, config.max_body_bytes),
            listener,
        })
    }

    /// Address actually bound, including the port picked for port `0`.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until the process ends or an I/O error occurs.
    pub async fn serve(self) -> Result<(), ListenerError> {
        self.log_start();
        axum::serve(self.listener, self.router)
            .await
            .map_err(ListenerError::Serve)
    }

    /// Serve until `signal` resolves, then finish in-flight requests and return.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<(), ListenerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.log_start();
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(signal)
            .await
            .map_err(ListenerError::Serve)?;
        tracing::info!("webhook listener stopped");
        Ok(())
    }

    fn log_start(&self) {
        match self.listener.local_addr() {
            Ok(addr) => tracing::info!(%addr, "webhook listener started"),
            Err(err) => tracing::warn!(error = %err, "webhook listener started on unknown address"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;

    const INBOUND: &str = r#"{"inboundSMSMessageNotification":{"inboundSMSMessage":{"dateTime":"2011-05-11T18:05:54.546Z","destinationAddress":"16575550100","message":"Inbound test","messageId":"ef795d3dac56a62fef3ff1852b0c123a","senderAddress":"14075550100"}}}"#;

    fn counting_router() -> (Router, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let incoming = Arc::clone(&seen);
        let unknown = Arc::clone(&seen);
        let dispatcher = Dispatcher::new()
            .on_incoming_message(move |msg| {
                incoming
                    .lock()
                    .unwrap()
                    .push(format!("incoming:{}", msg.message));
            })
            .on_unknown(move |body| {
                unknown.lock().unwrap().push(format!("unknown:{body}"));
            });
        (router(dispatcher, DEFAULT_MAX_BODY_BYTES), seen)
    }

    async fn send(app: Router, method: Method, uri: &str, body: impl Into<Body>) -> StatusCode {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(body.into())
            .unwrap();
        app.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn post_inbound_message_is_dispatched_and_acknowledged() {
        let (app, seen) = counting_router();
        let status = send(app, Method::POST, "/", INBOUND).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(*seen.lock().unwrap(), vec!["incoming:Inbound test"]);
    }

    #[tokio::test]
    async fn unknown_body_on_any_path_is_acknowledged() {
        let (app, seen) = counting_router();
        let status = send(app, Method::POST, "/callbacks/sms", "foobar").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(*seen.lock().unwrap(), vec!["unknown:foobar"]);
    }

    #[tokio::test]
    async fn non_post_requests_are_acknowledged_without_dispatch() {
        let (app, seen) = counting_router();
        assert_eq!(
            send(app.clone(), Method::GET, "/", Body::empty()).await,
            StatusCode::OK
        );
        assert_eq!(
            send(app, Method::DELETE, "/anything", INBOUND).await,
            StatusCode::OK
        );
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_utf8_body_is_still_acknowledged() {
        let (app, seen) = counting_router();
        let status = send(app, Method::POST, "/", vec![0xff_u8, 0xfe, 0x00]).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(seen.lock().unwrap().len(), 1);
        assert!(seen.lock().unwrap()[0].starts_with("unknown:"));
    }

    #[tokio::test]
    async fn oversized_body_is_dispatched_empty_and_acknowledged() {
        let sizes = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&sizes);
        let dispatcher = Dispatcher::new().on_unknown(move |body| {
            recorded.lock().unwrap().push(body.len());
        });
        let app = router(dispatcher, 64);

        let status = send(app.clone(), Method::POST, "/", vec![b'x'; 65]).await;
        assert_eq!(status, StatusCode::OK);
        let status = send(app, Method::POST, "/", vec![b'x'; 64]).await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(*sizes.lock().unwrap(), vec![0, 64]);
    }

    #[tokio::test]
    async fn bind_reports_address_and_failures() {
        let config = ListenerConfig {
            host: "127.0.0.1".to_owned(),
            port: 0,
            ..ListenerConfig::default()
        };
        let listener = WebhookListener::bind(&config, Dispatcher::new())
            .await
            .unwrap();
        let port = listener.local_addr().unwrap().port();
        assert_ne!(port, 0);

        let taken = ListenerConfig {
            port,
            ..config.clone()
        };
        let err = WebhookListener::bind(&taken, Dispatcher::new())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ListenerError::Bind { .. }));
    }

    #[test]
    fn config_defaults_match_receiver_example() {
        let config: ListenerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ListenerConfig::default());
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_body_bytes, 2 * 1024 * 1024);

        let config: ListenerConfig = serde_json::from_str(r#"{"max_body_bytes": 1024}"#).unwrap();
        assert_eq!(config.max_body_bytes, 1024);
    }
}
