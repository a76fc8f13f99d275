use std::io;

use itexmo::{ItexmoClient, SendBatch};
use tracing_subscriber::EnvFilter;

/// Reads `ITEXMO_BATCH` as `number=message` pairs separated by `;`.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let raw = std::env::var("ITEXMO_BATCH").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "ITEXMO_BATCH environment variable is required (number=message;...)",
        )
    })?;
    let pairs = raw
        .split(';')
        .filter(|pair| !pair.trim().is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((number, message)) => Ok((number.trim(), message)),
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("expected number=message, got {pair:?}"),
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let client = ItexmoClient::from_env()?;
    let batch = SendBatch::from_pairs(pairs)?;

    let result = client.send_batch(batch).await?;
    println!(
        "success: {}, message: {}, data: {:?}",
        result.success, result.message, result.data
    );

    Ok(())
}
