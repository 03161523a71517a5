//! Light state as reported by the bridge.

use serde::{Deserialize, Serialize};

use crate::delta::StateDelta;
use crate::types::{Brightness, Hue, PowerMode, Saturation};

/// The state of a single light.
///
/// Lamps without color support report no hue or saturation, and plugs report
/// no brightness either, so those fields are optional.
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct LightState {
    on: bool,
    #[serde(rename = "bri")]
    brightness: Option<u8>,
    hue: Option<u16>,
    #[serde(rename = "sat")]
    saturation: Option<u8>,
    reachable: Option<bool>,
}

impl LightState {
    pub fn new(on: bool) -> Self {
        LightState {
            on,
            ..Default::default()
        }
    }

    /// Check if the light is on.
    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn power(&self) -> PowerMode {
        PowerMode::from(self.on)
    }

    pub fn brightness(&self) -> Option<Brightness> {
        self.brightness.map(Brightness::create_or)
    }

    pub fn hue(&self) -> Option<Hue> {
        self.hue.map(Hue::new)
    }

    pub fn saturation(&self) -> Option<Saturation> {
        self.saturation.map(Saturation::create_or)
    }

    /// Whether the bridge can currently reach the light, if it said so.
    pub fn reachable(&self) -> Option<bool> {
        self.reachable
    }

    /// Patch this state with the fields present in a delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_voice_rs::{Hue, LightState, StateDelta};
    ///
    /// let mut state = LightState::new(false);
    /// let mut delta = StateDelta::new(true);
    /// delta.hue(&Hue::BLUE);
    /// state.apply(&delta);
    ///
    /// assert!(state.is_on());
    /// assert_eq!(state.hue(), Some(Hue::BLUE));
    /// assert!(state.brightness().is_none());
    /// ```
    pub fn apply(&mut self, delta: &StateDelta) {
        self.on = delta.on;
        if delta.hue.is_some() {
            self.hue = delta.hue;
        }
        if delta.saturation.is_some() {
            self.saturation = delta.saturation;
        }
        if delta.brightness.is_some() {
            self.brightness = delta.brightness;
        }
    }
}
