use std::io;

use itexmo::{ItexmoClient, MessageText, RawPhoneNumber, SendOtp};
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
    let code = std::env::var("ITEXMO_OTP").unwrap_or_else(|_| "123456".to_owned());

    let client = ItexmoClient::from_env()?;
    let phone = RawPhoneNumber::new(phone_raw)?;
    let text = MessageText::new(format!("Your verification code is {code}"))?;

    let result = client.send_otp(SendOtp::new(phone, text)).await?;
    println!(
        "success: {}, message: {}, status_code: {:?}",
        result.success,
        result.message,
        result.status_code()
    );

    Ok(())
}
