//! Brightness control for Hue lights.

use serde::{Deserialize, Serialize};

/// Brightness level as the bridge counts it, from 0 to 254.
///
/// On the bridge, 0 is the dimmest level the lamp can emit, not "off".
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(transparent)]
pub struct Brightness {
    pub(crate) value: u8,
}

impl Default for Brightness {
    fn default() -> Self {
        Self::new()
    }
}

impl Brightness {
    const MAX: u8 = 254;

    /// Full brightness.
    pub fn new() -> Self {
        Brightness { value: Self::MAX }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Returns None if value is outside valid range (0-254).
    ///
    /// ```
    /// use hue_voice_rs::Brightness;
    ///
    /// assert_eq!(Brightness::create(100).unwrap().value(), 100);
    /// assert!(Brightness::create(255).is_none());
    /// ```
    pub fn create(value: u8) -> Option<Self> {
        if value <= Self::MAX {
            Some(Brightness { value })
        } else {
            None
        }
    }

    /// Clamps to 254 if value is out of range.
    pub fn create_or(value: u8) -> Self {
        Brightness {
            value: value.min(Self::MAX),
        }
    }
}
