//! Application registration with a bridge.

use log::info;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::errors::Error;
use crate::response::Envelope;
use crate::transport::Transport;

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Deserialize)]
struct Registered {
    username: String,
}

/// Ask the bridge for a new access token.
///
/// The bridge refuses with error 101 until its link button has been pressed
/// within the last 30 seconds. No retry happens here.
pub async fn register(transport: &Transport, address: &str, device_type: &str) -> Result<String> {
    let url = format!("http://{}/api", address);
    let body = transport
        .post("register", &url, &json!({"devicetype": device_type}))
        .await?;
    let username = parse_registration(&body)?;
    info!("registered with bridge at {}", address);
    Ok(username)
}

fn parse_registration(body: &str) -> Result<String> {
    let entries: Vec<Value> =
        serde_json::from_str(body).map_err(|e| Error::decode("registration reply", e))?;
    let Some(first) = entries.into_iter().next() else {
        return Err(Error::EmptyReply);
    };

    let raw = first.to_string();
    match serde_json::from_value::<Envelope<Registered>>(first) {
        Ok(Envelope::Success { success }) => Ok(success.username),
        Ok(Envelope::Error { error }) => Err(error.into()),
        Err(_) => Err(Error::UnexpectedReply(raw)),
    }
}
