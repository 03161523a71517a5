//! State updates for individual lights.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::delta::StateDelta;
use crate::errors::Error;
use crate::response::{BridgeFault, Envelope};
use crate::transport::Transport;

type Result<T> = std::result::Result<T, Error>;

/// What the bridge reported for a state update.
///
/// The bridge acknowledges each field separately and may apply some while
/// rejecting others (an out-of-range hue does not stop `on` from applying).
/// Rejected fields are reported here as warnings, not as a failed call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateAck {
    /// Resource addresses the bridge confirmed, e.g. `/lights/1/state/on`
    pub applied: Vec<String>,
    /// Fields the bridge rejected
    pub warnings: Vec<BridgeFault>,
}

impl StateAck {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Send a partial state update to one light.
///
/// Only transport failures are errors. Any completed reply counts, whatever
/// its HTTP status; a reply that cannot be decoded is logged and yields an
/// empty [`StateAck`].
pub async fn set_state(
    transport: &Transport,
    address: &str,
    token: &str,
    light_id: &str,
    delta: &StateDelta,
) -> Result<StateAck> {
    let url = format!("http://{}/api/{}/lights/{}/state", address, token, light_id);
    let body = serde_json::to_value(delta).map_err(|e| Error::encode("state update", e))?;
    debug!("light {} <- {}", light_id, body);

    let reply = transport.put("setState", &url, &body).await?;
    let ack = parse_ack(&reply);
    for fault in &ack.warnings {
        warn!(
            "light {}: bridge rejected {} ({})",
            light_id, fault.address, fault.description
        );
    }
    Ok(ack)
}

fn parse_ack(body: &str) -> StateAck {
    let entries: Vec<Envelope> = match serde_json::from_str(body) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("could not decode state acknowledgement: {}", e);
            return StateAck::default();
        }
    };

    let mut ack = StateAck::default();
    for entry in entries {
        match entry {
            Envelope::Success { success } => {
                if let Some(fields) = success.as_object() {
                    ack.applied.extend(fields.keys().cloned());
                }
            }
            Envelope::Error { error } => ack.warnings.push(error),
        }
    }
    ack
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_applied() {
        let ack = parse_ack(
            r#"[{"success": {"/lights/1/state/on": true}},
                {"success": {"/lights/1/state/bri": 254}}]"#,
        );
        assert_eq!(
            ack.applied,
            vec!["/lights/1/state/on", "/lights/1/state/bri"]
        );
        assert!(ack.is_clean());
    }

    #[test]
    fn test_partial_failure() {
        let ack = parse_ack(
            r#"[{"success": {"/lights/1/state/on": true}},
                {"error": {"type": 7, "address": "/lights/1/state/hue",
                           "description": "invalid value, 70000, for parameter, hue"}}]"#,
        );
        assert_eq!(ack.applied, vec!["/lights/1/state/on"]);
        assert_eq!(ack.warnings.len(), 1);
        assert_eq!(ack.warnings[0].code, 7);
        assert_eq!(ack.warnings[0].address, "/lights/1/state/hue");
    }

    #[test]
    fn test_undecodable_reply_is_not_an_error() {
        let ack = parse_ack("<html>oops</html>");
        assert!(ack.applied.is_empty());
        assert!(ack.is_clean());
    }
}
