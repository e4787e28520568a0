use std::io;

use smsified::{Address, ClientConfig, MessageText, SendOptions, SendSms, SmsifiedClient};
use tracing_subscriber::EnvFilter;

fn required(name: &str) -> io::Result<String> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,smsified=debug")),
        )
        .init();

    let config = ClientConfig {
        username: Some(required("SMSIFIED_USERNAME")?),
        password: Some(required("SMSIFIED_PASSWORD")?),
        base_uri: std::env::var("SMSIFIED_BASE_URI").ok(),
        sender_address: Some(required("SMSIFIED_SENDER")?),
        destination_address: None,
    };
    let address = required("SMSIFIED_ADDRESS")?;
    let message = std::env::var("SMSIFIED_MESSAGE")
        .unwrap_or_else(|_| "Hello from the smsified demo.".to_owned());

    let client = SmsifiedClient::new(config)?;
    let request = SendSms::to(Address::new(address)?, MessageText::new(message)?).with_options(
        SendOptions {
            notify_url: std::env::var("SMSIFIED_NOTIFY_URL").ok(),
            ..SendOptions::default()
        },
    );

    let response = client.send_sms(request).await?;
    println!(
        "status: {:?}, request id: {:?}, data: {:?}",
        response.status(),
        response.resource_id(),
        response.data()
    );
    if let Some(error) = &response.transport().error {
        println!("transport error: {error}");
    }

    Ok(())
}
