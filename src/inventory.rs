//! Light inventory retrieval.

use std::collections::BTreeMap;

use log::info;

use crate::errors::Error;
use crate::light::{Light, LightRecord};
use crate::response::rejection;
use crate::transport::Transport;

type Result<T> = std::result::Result<T, Error>;

/// Fetch every light the bridge knows, sorted by id.
///
/// The bridge answers with an object keyed by light id; the id is moved from
/// the key into each [`Light`]. An empty object yields an empty list.
pub async fn fetch_lights(transport: &Transport, address: &str, token: &str) -> Result<Vec<Light>> {
    let url = format!("http://{}/api/{}/lights", address, token);
    let body = transport.get("getLights", &url).await?;
    let lights = parse_lights(&body)?;
    info!("loaded {} light(s) from {}", lights.len(), address);
    Ok(lights)
}

fn parse_lights(body: &str) -> Result<Vec<Light>> {
    match serde_json::from_str::<BTreeMap<String, LightRecord>>(body) {
        Ok(records) => Ok(records
            .into_iter()
            .map(|(id, record)| Light::from_record(id, record))
            .collect()),
        Err(err) => Err(rejection(body).unwrap_or_else(|| Error::decode("light list", err))),
    }
}
