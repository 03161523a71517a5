//! Individual lights known to a bridge.

use serde::{Deserialize, Serialize};

use crate::status::LightState;

/// A single light as listed by the bridge.
///
/// The bridge assigns the id and keeps it stable for the lifetime of the
/// pairing. Lights order by id, compared as strings.
///
/// # Example
///
/// ```
/// use hue_voice_rs::{Light, LightState};
///
/// let light = Light::new("1", Some("Desk"), LightState::new(true));
/// assert_eq!(light.id(), "1");
/// assert_eq!(light.name(), Some("Desk"));
/// assert!(light.state().is_on());
/// ```
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Light {
    id: String,
    name: Option<String>,
    state: LightState,
}

/// Value half of the `/lights` mapping. The id lives in the key.
#[derive(Debug, Deserialize)]
pub(crate) struct LightRecord {
    pub name: Option<String>,
    pub state: LightState,
}

impl Light {
    pub fn new(id: &str, name: Option<&str>, state: LightState) -> Self {
        Light {
            id: id.to_string(),
            name: name.map(String::from),
            state,
        }
    }

    pub(crate) fn from_record(id: String, record: LightRecord) -> Self {
        Light {
            id,
            name: record.name,
            state: record.state,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn state(&self) -> &LightState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut LightState {
        &mut self.state
    }
}
