//! Hue angle as the bridge encodes it.

use serde::{Deserialize, Serialize};

/// Hue position on the color wheel, 0 to 65535.
///
/// Both 0 and 65535 are red, 25500 is green and 46920 is blue.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(transparent)]
pub struct Hue {
    pub(crate) value: u16,
}

impl Hue {
    pub const RED: Hue = Hue { value: 65280 };
    pub const GREEN: Hue = Hue { value: 25500 };
    pub const BLUE: Hue = Hue { value: 46920 };

    /// Every `u16` is a valid hue.
    pub fn new(value: u16) -> Self {
        Hue { value }
    }

    pub fn value(&self) -> u16 {
        self.value
    }

    /// Convert from degrees (0-360) on the color wheel.
    ///
    /// Returns `None` for angles above 360.
    ///
    /// ```
    /// use hue_voice_rs::Hue;
    ///
    /// assert_eq!(Hue::from_degrees(0).unwrap().value(), 0);
    /// assert_eq!(Hue::from_degrees(360).unwrap().value(), 65535);
    /// assert!(Hue::from_degrees(361).is_none());
    /// ```
    pub fn from_degrees(degrees: u16) -> Option<Self> {
        if degrees > 360 {
            return None;
        }
        let value = (u32::from(degrees) * u32::from(u16::MAX) / 360) as u16;
        Some(Hue { value })
    }

    /// Convert to degrees on the color wheel.
    pub fn degrees(&self) -> u16 {
        (u32::from(self.value) * 360 / u32::from(u16::MAX)) as u16
    }
}
