//! Receives gateway callbacks and answers every inbound message with "Pong".

use smsified::{
    Address, Dispatcher, ListenerConfig, MessageText, SendOptions, SendSms, SmsifiedClient,
    WebhookListener,
};
use tracing_subscriber::EnvFilter;

fn tel(address: &str) -> String {
    if address.starts_with("tel:") {
        address.to_owned()
    } else {
        format!("tel:+{}", address.trim_start_matches('+'))
    }
}

async fn pong(client: SmsifiedClient, to: String, from: String) {
    let request = match (Address::new(tel(&to)), Address::new(tel(&from)), MessageText::new("Pong")) {
        (Ok(to), Ok(from), Ok(text)) => SendSms::to(to, text).from(from).with_options(SendOptions {
            notify_url: std::env::var("SMSIFIED_NOTIFY_URL").ok(),
            ..SendOptions::default()
        }),
        _ => {
            tracing::warn!(%to, %from, "cannot reply to message");
            return;
        }
    };
    match client.send_sms(request).await {
        Ok(response) => tracing::info!(status = ?response.status(), data = ?response.data(), "pong sent"),
        Err(err) => tracing::warn!(error = %err, "pong not sent"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let client = SmsifiedClient::builder()
        .username(std::env::var("SMSIFIED_USERNAME")?)
        .password(std::env::var("SMSIFIED_PASSWORD")?)
        .build()?;

    let dispatcher = Dispatcher::new()
        .on_incoming_message(move |msg| {
            tracing::info!(
                sender = %msg.sender_address,
                destination = %msg.destination_address,
                message = %msg.message,
                "message received"
            );
            tokio::spawn(pong(
                client.clone(),
                msg.sender_address,
                msg.destination_address,
            ));
        })
        .on_delivery_notification(|notification| {
            tracing::info!(?notification, "delivery notification");
        })
        .on_unknown(|content| {
            tracing::info!(%content, "unknown callback received");
        });

    let listener = WebhookListener::bind(&ListenerConfig::default(), dispatcher).await?;
    println!("Hit CTRL-C to stop");
    listener
        .serve_with_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
