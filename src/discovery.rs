//! Bridge discovery via the cloud lookup service.

use log::info;
use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::transport::Transport;

type Result<T> = std::result::Result<T, Error>;

/// A bridge listed by the discovery service.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredBridge {
    /// Bridge id, when the service reports one
    pub id: Option<String>,
    /// Address of the bridge on the local network
    #[serde(rename = "internalipaddress")]
    pub address: String,
}

/// List every bridge the discovery service knows for this network.
///
/// An empty list is a valid answer here; [`discover_bridge`] turns it into
/// [`Error::NoBridgeFound`].
///
/// # Examples
///
/// ```ignore
/// let transport = Transport::new(&ClientConfig::default())?;
/// for bridge in discover_bridges(&transport, ClientConfig::DISCOVERY_URL).await? {
///     println!("{} at {}", bridge.id.unwrap_or_default(), bridge.address);
/// }
/// ```
pub async fn discover_bridges(transport: &Transport, url: &str) -> Result<Vec<DiscoveredBridge>> {
    let body = transport.get("discover", url).await?;
    parse_discovery(&body)
}

/// Resolve the address of the first bridge the discovery service lists.
pub async fn discover_bridge(transport: &Transport, url: &str) -> Result<DiscoveredBridge> {
    let bridge = discover_bridges(transport, url)
        .await?
        .into_iter()
        .next()
        .ok_or(Error::NoBridgeFound)?;
    info!("found bridge at {}", bridge.address);
    Ok(bridge)
}

fn parse_discovery(body: &str) -> Result<Vec<DiscoveredBridge>> {
    serde_json::from_str(body).map_err(|e| Error::decode("discovery reply", e))
}
