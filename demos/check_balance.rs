use itexmo::ItexmoClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = ItexmoClient::from_env()?;
    let result = client.check_balance().await?;

    println!(
        "success: {}, message: {}, messages_left: {:?}",
        result.success,
        result.message,
        result.messages_left()
    );

    Ok(())
}
