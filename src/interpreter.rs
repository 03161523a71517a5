//! Mapping recognized speech to light commands.

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, IntoStaticStr};

use crate::delta::StateDelta;
use crate::status::LightState;
use crate::types::{Brightness, Hue, Saturation};

/// A spoken command and the phrase that triggers it.
///
/// Variants are matched in declaration order and the first trigger found in
/// the transcript wins. New phrases that contain an existing one (for
/// example "turn on red") must be declared before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, IntoStaticStr)]
pub enum VoiceCommand {
    #[strum(serialize = "turn on")]
    TurnOn,
    #[strum(serialize = "turn off")]
    TurnOff,
    #[strum(serialize = "turn red")]
    TurnRed,
    #[strum(serialize = "turn blue")]
    TurnBlue,
    #[strum(serialize = "turn green")]
    TurnGreen,
}

impl VoiceCommand {
    /// Substring that selects this command.
    pub fn trigger(&self) -> &'static str {
        self.into()
    }

    /// Find the first command whose trigger occurs in the transcript.
    ///
    /// The transcript is lowercased first.
    ///
    /// ```
    /// use hue_voice_rs::VoiceCommand;
    ///
    /// assert_eq!(VoiceCommand::parse("Please TURN ON the lamp"), Some(VoiceCommand::TurnOn));
    /// assert_eq!(VoiceCommand::parse("do a backflip"), None);
    /// ```
    pub fn parse(transcript: &str) -> Option<Self> {
        let transcript = transcript.to_lowercase();
        Self::iter().find(|cmd| transcript.contains(cmd.trigger()))
    }

    /// The state change this command asks for.
    ///
    /// Power commands carry no hue or saturation, so the bridge keeps the
    /// color it has now, and go to full brightness. Color commands set all
    /// four fields.
    pub fn delta(&self) -> StateDelta {
        let (on, color) = match self {
            VoiceCommand::TurnOn => (true, None),
            VoiceCommand::TurnOff => (false, None),
            VoiceCommand::TurnRed => (true, Some(Hue::RED)),
            VoiceCommand::TurnBlue => (true, Some(Hue::BLUE)),
            VoiceCommand::TurnGreen => (true, Some(Hue::GREEN)),
        };

        let mut delta = StateDelta::new(on);
        if let Some(hue) = color {
            delta.hue(&hue);
            delta.saturation(&Saturation::new());
        }
        delta.brightness(&Brightness::new());
        delta
    }
}

/// Turn a transcript into a state change, or `None` if no phrase matches.
///
/// The light's current state is not copied into the change: fields a
/// command leaves out stay as they are on the bridge, even when the cached
/// state is stale.
///
/// # Examples
///
/// ```
/// use hue_voice_rs::{LightState, interpret};
///
/// let delta = interpret("turn red", &LightState::new(false)).unwrap();
/// assert_eq!(
///     serde_json::to_value(&delta).unwrap(),
///     serde_json::json!({"on": true, "hue": 65280, "sat": 254, "bri": 254})
/// );
/// ```
pub fn interpret(transcript: &str, _current: &LightState) -> Option<StateDelta> {
    VoiceCommand::parse(transcript).map(|cmd| cmd.delta())
}
