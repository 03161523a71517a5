//! Partial light state updates.

use serde::{Deserialize, Serialize};

use crate::types::{Brightness, Hue, PowerMode, Saturation};

/// A partial state update to send to a single light.
///
/// Only the fields that were set are serialized. A missing field tells the
/// bridge to leave that attribute alone; it is never sent as zero.
///
/// # Examples
///
/// ```
/// use hue_voice_rs::StateDelta;
///
/// let delta = StateDelta::new(false);
/// assert_eq!(serde_json::to_string(&delta).unwrap(), r#"{"on":false}"#);
/// ```
///
/// ```
/// use hue_voice_rs::{Brightness, Hue, Saturation, StateDelta};
///
/// let mut delta = StateDelta::new(true);
/// delta.hue(&Hue::RED);
/// delta.saturation(&Saturation::new());
/// delta.brightness(&Brightness::new());
/// assert_eq!(
///     serde_json::to_value(&delta).unwrap(),
///     serde_json::json!({"on": true, "hue": 65280, "sat": 254, "bri": 254})
/// );
/// ```
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct StateDelta {
    pub(crate) on: bool,
    pub(crate) hue: Option<u16>,
    #[serde(rename = "sat")]
    pub(crate) saturation: Option<u8>,
    #[serde(rename = "bri")]
    pub(crate) brightness: Option<u8>,
}

impl StateDelta {
    /// Create a delta that only sets the power state.
    pub fn new(on: bool) -> Self {
        StateDelta {
            on,
            hue: None,
            saturation: None,
            brightness: None,
        }
    }

    pub fn power(&mut self, power: &PowerMode) {
        self.on = power.is_on();
    }

    pub fn hue(&mut self, hue: &Hue) {
        self.hue = Some(hue.value);
    }

    pub fn saturation(&mut self, saturation: &Saturation) {
        self.saturation = Some(saturation.value);
    }

    pub fn brightness(&mut self, brightness: &Brightness) {
        self.brightness = Some(brightness.value);
    }

    pub fn on(&self) -> bool {
        self.on
    }

    pub fn get_hue(&self) -> Option<Hue> {
        self.hue.map(Hue::new)
    }

    pub fn get_saturation(&self) -> Option<Saturation> {
        self.saturation.map(Saturation::create_or)
    }

    pub fn get_brightness(&self) -> Option<Brightness> {
        self.brightness.map(Brightness::create_or)
    }

    /// Names of the fields this delta will send, in wire form.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields = vec!["on"];
        if self.hue.is_some() {
            fields.push("hue");
        }
        if self.saturation.is_some() {
            fields.push("sat");
        }
        if self.brightness.is_some() {
            fields.push("bri");
        }
        fields
    }
}

impl From<&PowerMode> for StateDelta {
    fn from(power: &PowerMode) -> Self {
        StateDelta::new(power.is_on())
    }
}
