//! Reply envelopes shared by the bridge endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::Error;

/// An error entry reported by the bridge.
///
/// The bridge sends these inside reply arrays, one per failed write or for
/// a whole rejected request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeFault {
    /// Numeric error type, e.g. 101 for "link button not pressed"
    #[serde(rename = "type", default)]
    pub code: u16,
    /// Resource the error refers to
    #[serde(default)]
    pub address: String,
    pub description: String,
}

impl From<BridgeFault> for Error {
    fn from(fault: BridgeFault) -> Self {
        Error::bridge(fault.code, &fault.address, &fault.description)
    }
}

/// One entry of a bridge reply array.
///
/// Each entry is either a success or an error envelope. Decoding tries the
/// variants in order.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T = Value> {
    Success { success: T },
    Error { error: BridgeFault },
}

/// First error entry of a reply array, if the body is one.
///
/// A rejected request (for example an unknown token) comes back this way
/// instead of in the shape the endpoint normally returns.
pub(crate) fn rejection(body: &str) -> Option<Error> {
    let entries: Vec<Envelope> = serde_json::from_str(body).ok()?;
    entries.into_iter().find_map(|entry| match entry {
        Envelope::Error { error } => Some(error.into()),
        Envelope::Success { .. } => None,
    })
}
