//! # hue_voice_rs
//!
//! An async Rust client for Philips Hue bridges, with a small phrase matcher
//! that turns recognized speech into light commands.
//!
//! The crate covers the bridge side of a voice-controlled lighting setup:
//! finding the bridge, pairing with it, listing its lights and pushing state
//! changes. Audio capture and speech recognition are left to the caller,
//! which hands over a transcript string.
//!
//! ## Quick Start
//!
//! ```ignore
//! use hue_voice_rs::{BridgeSession, ClientConfig};
//!
//! async fn control_light() -> Result<(), hue_voice_rs::Error> {
//!     let mut session = BridgeSession::new(ClientConfig::from_env())?;
//!     session.discover().await?;
//!
//!     // Press the link button on the bridge first.
//!     session.register().await?;
//!     session.refresh_lights().await?;
//!
//!     // Transcript from the speech recognizer.
//!     session.apply_voice_command("please turn red").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Discovery**: Locate the bridge through the cloud lookup service with [`discover_bridge`]
//! - **Registration**: Pair an application and obtain its access token with [`register`]
//! - **Inventory**: List lights and their states, sorted by id, with [`fetch_lights`]
//! - **Partial updates**: Change only the fields you set using [`StateDelta`]
//! - **Voice commands**: Map phrases to state changes with [`interpret`] and [`VoiceCommand`]
//! - **Sessions**: Tie it all together, with precondition checks and a
//!   user-facing last error, in [`BridgeSession`]
//!
//! ## Communication
//!
//! Discovery uses `https://discovery.meethue.com/`. Everything else is plain
//! HTTP against the bridge's `/api` endpoint on the local network. Every
//! request has a timeout (8 seconds unless configured otherwise), and nothing
//! is retried automatically.

mod auth;
mod command;
mod config;
mod delta;
mod discovery;
mod errors;
mod history;
mod interpreter;
mod inventory;
mod light;
mod response;
mod session;
mod status;
mod transport;
mod types;

// Re-export public API
pub use auth::register;
pub use command::{StateAck, set_state};
pub use config::ClientConfig;
pub use delta::StateDelta;
pub use discovery::{DiscoveredBridge, discover_bridge, discover_bridges};
pub use errors::{Error, ErrorKind};
pub use history::{HistoryEntry, HistorySummary, MessageHistory, MessageType};
pub use interpreter::{VoiceCommand, interpret};
pub use inventory::fetch_lights;
pub use light::Light;
pub use response::BridgeFault;
pub use session::{BridgeSession, SessionSnapshot};
pub use status::LightState;
pub use transport::Transport;
pub use types::{Brightness, Hue, PowerMode, Saturation};
