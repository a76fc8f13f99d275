use std::io;

use itexmo::{ItexmoClient, MessageText, RawPhoneNumber, SendMessage};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let phone_raw = std::env::var("ITEXMO_PHONE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "ITEXMO_PHONE environment variable is required",
        )
    })?;
    let message = std::env::var("ITEXMO_MESSAGE")
        .unwrap_or_else(|_| "Hello from the itexmo demo.".to_owned());

    let client = ItexmoClient::from_env()?;
    let phone = RawPhoneNumber::new(phone_raw)?;
    let text = MessageText::new(message)?;

    let result = client.send(SendMessage::one(phone, text)).await?;
    println!(
        "success: {}, message: {}, outcome: {:?}",
        result.success, result.message, result.outcome
    );

    Ok(())
}
