//! Session state and orchestration for a single bridge.

use futures::future::join_all;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::auth;
use crate::command::{self, StateAck};
use crate::config::ClientConfig;
use crate::delta::StateDelta;
use crate::discovery::{self, DiscoveredBridge};
use crate::errors::Error;
use crate::history::MessageHistory;
use crate::interpreter::VoiceCommand;
use crate::inventory;
use crate::light::Light;
use crate::transport::Transport;

type Result<T> = std::result::Result<T, Error>;

/// A read-only view of a session for display.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub bridge_address: Option<String>,
    /// Whether an access token is held. The token itself is not exposed.
    pub registered: bool,
    pub lights: Vec<Light>,
    pub last_error: Option<String>,
}

/// Connection state for one bridge and one application user.
///
/// A session starts empty. [`discover`](Self::discover) fills in the bridge
/// address, [`register`](Self::register) obtains the access token, and only
/// then can lights be listed or changed. Calling an operation before its
/// prerequisites exist fails with a precondition error and sends nothing.
///
/// Every failed operation stores a user-facing message in
/// [`last_error`](Self::last_error), replacing the previous one. The next
/// successful operation clears it. No operation is retried.
///
/// # Example
///
/// ```no_run
/// use hue_voice_rs::{BridgeSession, ClientConfig};
///
/// # async fn run() -> Result<(), hue_voice_rs::Error> {
/// let mut session = BridgeSession::new(ClientConfig::default())?;
/// session.discover().await?;
/// // Press the link button on the bridge, then:
/// session.register().await?;
/// session.refresh_lights().await?;
/// session.apply_voice_command("turn blue").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BridgeSession {
    config: ClientConfig,
    transport: Transport,
    bridge_address: Option<String>,
    access_token: Option<String>,
    last_error: Option<String>,
    lights: Vec<Light>,
}

impl BridgeSession {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = Transport::new(&config)?;
        Ok(BridgeSession {
            config,
            transport,
            bridge_address: None,
            access_token: None,
            last_error: None,
            lights: Vec::new(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn bridge_address(&self) -> Option<&str> {
        self.bridge_address.as_deref()
    }

    /// Use a known bridge address instead of running discovery.
    pub fn set_bridge_address(&mut self, address: &str) {
        self.bridge_address = Some(address.to_string());
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Use a token obtained earlier instead of registering again.
    pub fn set_access_token(&mut self, token: &str) {
        self.access_token = Some(token.to_string());
    }

    pub fn is_registered(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Cached lights, sorted by id.
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn light(&self, id: &str) -> Option<&Light> {
        self.lights.iter().find(|light| light.id() == id)
    }

    /// Resolve the bridge address through the discovery service.
    ///
    /// Replaces any address set before.
    pub async fn discover(&mut self) -> Result<DiscoveredBridge> {
        let result =
            discovery::discover_bridge(&self.transport, &self.config.discovery_url).await;
        let bridge = self.track(result)?;
        self.bridge_address = Some(bridge.address.clone());
        Ok(bridge)
    }

    /// List every bridge the discovery service reports, without changing
    /// the session.
    pub async fn list_bridges(&mut self) -> Result<Vec<DiscoveredBridge>> {
        let result =
            discovery::discover_bridges(&self.transport, &self.config.discovery_url).await;
        self.track(result)
    }

    /// Register this application with the bridge and keep the token.
    ///
    /// Fails with a bridge error while the link button has not been pressed;
    /// call again after the user has pressed it.
    pub async fn register(&mut self) -> Result<()> {
        let result = match self.bridge_address.as_deref() {
            Some(address) => {
                auth::register(&self.transport, address, &self.config.device_type).await
            }
            None => Err(Error::MissingBridgeAddress),
        };
        let token = self.track(result)?;
        info!("access token obtained");
        self.access_token = Some(token);
        Ok(())
    }

    /// Replace the cached lights with the bridge's current list.
    pub async fn refresh_lights(&mut self) -> Result<&[Light]> {
        let result = match self.credentials() {
            Ok((address, token)) => inventory::fetch_lights(&self.transport, address, token).await,
            Err(e) => Err(e),
        };
        self.lights = self.track(result)?;
        Ok(&self.lights)
    }

    /// Send a state change to one light.
    ///
    /// On success the cached state of that light is patched with the fields
    /// the delta carried; nothing else in the cache changes until the next
    /// refresh.
    pub async fn set_light(&mut self, id: &str, delta: &StateDelta) -> Result<StateAck> {
        let result = match self.credentials() {
            Ok((address, token)) => {
                command::set_state(&self.transport, address, token, id, delta).await
            }
            Err(e) => Err(e),
        };
        let ack = self.track(result)?;
        self.patch(id, delta);
        Ok(ack)
    }

    /// Interpret a transcript and apply it to the first light.
    ///
    /// Returns the delta that was sent, or `None` when the transcript holds
    /// no known phrase. Unknown phrases send nothing and are not errors.
    pub async fn apply_voice_command(&mut self, transcript: &str) -> Result<Option<StateDelta>> {
        let target = match self.voice_target() {
            Ok(target) => target,
            Err(e) => return self.track(Err(e)),
        };
        let Some(cmd) = VoiceCommand::parse(transcript) else {
            info!("no command in {:?}", transcript);
            return Ok(None);
        };

        let delta = cmd.delta();
        info!("{} -> light {}", cmd, target.id());
        self.set_light(target.id(), &delta).await?;
        Ok(Some(delta))
    }

    /// Interpret a transcript and apply it to every cached light at once.
    ///
    /// Every light gets the same delta. Lights that accepted the change are
    /// patched even if others failed; the first failure is returned.
    pub async fn apply_voice_command_to_all(
        &mut self,
        transcript: &str,
    ) -> Result<Option<VoiceCommand>> {
        if let Err(e) = self.voice_target() {
            return self.track(Err(e));
        }
        let Some(cmd) = VoiceCommand::parse(transcript) else {
            info!("no command in {:?}", transcript);
            return Ok(None);
        };

        let delta = cmd.delta();
        let updates: Vec<(String, StateDelta)> = self
            .lights
            .iter()
            .map(|light| (light.id().to_string(), delta))
            .collect();
        let results = self.fan_out(&updates).await?;

        let mut first_error = None;
        for ((id, delta), result) in updates.iter().zip(results) {
            match result {
                Ok(_) => self.patch(id, delta),
                Err(e) => {
                    warn!("light {} did not take {}: {}", id, cmd, e);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => self.track(Err(e)),
            None => {
                self.last_error = None;
                Ok(Some(cmd))
            }
        }
    }

    /// Forget the token, keeping the bridge address, so the application can
    /// register again.
    pub fn forget_token(&mut self) {
        self.access_token = None;
    }

    /// Return to the empty state.
    pub fn reset(&mut self) {
        self.bridge_address = None;
        self.access_token = None;
        self.last_error = None;
        self.lights.clear();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            bridge_address: self.bridge_address.clone(),
            registered: self.is_registered(),
            lights: self.lights.clone(),
            last_error: self.last_error.clone(),
        }
    }

    pub async fn history(&self) -> MessageHistory {
        self.transport.history().await
    }

    /// Returns the session snapshot together with the exchange history summary.
    pub async fn diagnostics(&self) -> Value {
        let mut diag = serde_json::to_value(self.snapshot()).unwrap_or(Value::Null);
        let history = self.transport.history().await;
        diag["history"] = serde_json::to_value(history.summary()).unwrap_or(Value::Null);
        diag["config"] = json!({
            "discovery_url": self.config.discovery_url,
            "device_type": self.config.device_type,
            "timeout_secs": self.config.timeout.as_secs(),
        });
        diag
    }

    fn credentials(&self) -> Result<(&str, &str)> {
        let address = self
            .bridge_address
            .as_deref()
            .ok_or(Error::MissingBridgeAddress)?;
        let token = self
            .access_token
            .as_deref()
            .ok_or(Error::MissingAccessToken)?;
        Ok((address, token))
    }

    /// The light voice commands act on, after checking credentials.
    fn voice_target(&self) -> Result<Light> {
        self.credentials()?;
        self.lights.first().cloned().ok_or(Error::NoLights)
    }

    async fn fan_out(&self, updates: &[(String, StateDelta)]) -> Result<Vec<Result<StateAck>>> {
        let (address, token) = self.credentials()?;
        let transport = &self.transport;
        Ok(join_all(
            updates
                .iter()
                .map(|(id, delta)| command::set_state(transport, address, token, id, delta)),
        )
        .await)
    }

    fn patch(&mut self, id: &str, delta: &StateDelta) {
        if let Some(light) = self.lights.iter_mut().find(|light| light.id() == id) {
            light.state_mut().apply(delta);
        }
    }

    fn track<T>(&mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.last_error = None,
            Err(e) => {
                warn!("{}", e);
                self.last_error = Some(e.user_message());
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::status::LightState;

    fn session() -> BridgeSession {
        BridgeSession::new(ClientConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_register_requires_address() {
        let mut session = session();
        let err = session.register().await.unwrap_err();
        assert_eq!(err, Error::MissingBridgeAddress);
        assert_eq!(session.last_error(), Some(err.to_string().as_str()));
        assert!(!session.is_registered());
    }

    #[tokio::test]
    async fn test_refresh_requires_token() {
        let mut session = session();
        session.set_bridge_address("192.0.2.10");
        let err = session.refresh_lights().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Precondition);
        assert_eq!(err, Error::MissingAccessToken);
    }

    #[tokio::test]
    async fn test_set_light_requires_token() {
        let mut session = session();
        session.set_bridge_address("192.0.2.10");
        let err = session
            .set_light("1", &StateDelta::new(true))
            .await
            .unwrap_err();
        assert_eq!(err, Error::MissingAccessToken);
        assert!(session.history().await.is_empty());
    }

    #[tokio::test]
    async fn test_voice_command_requires_lights() {
        let mut session = session();
        session.set_bridge_address("192.0.2.10");
        session.set_access_token("token");
        let err = session.apply_voice_command("turn on").await.unwrap_err();
        assert_eq!(err, Error::NoLights);
        assert!(session.last_error().is_some());
    }

    #[tokio::test]
    async fn test_unknown_phrase_sends_nothing() {
        let mut session = session();
        session.set_bridge_address("192.0.2.10");
        session.set_access_token("token");
        session.lights = vec![Light::new("1", None, LightState::new(false))];

        let delta = session.apply_voice_command("do a backflip").await.unwrap();
        assert!(delta.is_none());
        assert!(session.history().await.is_empty());
    }

    #[test]
    fn test_reset_and_forget() {
        let mut session = session();
        session.set_bridge_address("192.0.2.10");
        session.set_access_token("token");
        session.last_error = Some("boom".into());

        session.forget_token();
        assert!(!session.is_registered());
        assert_eq!(session.bridge_address(), Some("192.0.2.10"));

        session.reset();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.bridge_address, None);
        assert!(!snapshot.registered);
        assert!(snapshot.lights.is_empty());
        assert_eq!(snapshot.last_error, None);
    }

    #[test]
    fn test_snapshot_hides_token() {
        let mut session = session();
        session.set_access_token("secret-token");
        let text = serde_json::to_string(&session.snapshot()).unwrap();
        assert!(!text.contains("secret-token"));
        assert!(text.contains(r#""registered":true"#));
    }
}
