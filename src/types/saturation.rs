//! Color saturation for Hue lights.

use serde::{Deserialize, Serialize};

/// Saturation from 0 (white) to 254 (fully colored).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(transparent)]
pub struct Saturation {
    pub(crate) value: u8,
}

impl Default for Saturation {
    fn default() -> Self {
        Self::new()
    }
}

impl Saturation {
    const MAX: u8 = 254;

    /// Fully saturated.
    pub fn new() -> Self {
        Saturation { value: Self::MAX }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Returns None if value is outside valid range (0-254).
    ///
    /// ```
    /// use hue_voice_rs::Saturation;
    ///
    /// assert!(Saturation::create(254).is_some());
    /// assert!(Saturation::create(255).is_none());
    /// ```
    pub fn create(value: u8) -> Option<Self> {
        if value <= Self::MAX {
            Some(Saturation { value })
        } else {
            None
        }
    }

    /// Clamps to 254 if value is out of range.
    pub fn create_or(value: u8) -> Self {
        Saturation {
            value: value.min(Self::MAX),
        }
    }
}
