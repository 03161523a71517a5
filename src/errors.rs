/// Broad classification of an [`Error`].
///
/// Callers that only need to decide how to react (retry the request, ask the
/// user to press the link button, run discovery first) can match on this
/// instead of on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ErrorKind {
    /// The request never completed: connection failure or timeout.
    Network,
    /// A reply arrived but was not usable: wrong shape, or a non-success
    /// status where a body was expected.
    Decode,
    /// A well-formed reply that does not make sense for the request, such as
    /// an empty registration array.
    Protocol,
    /// The bridge answered with an error envelope.
    Bridge,
    /// The session is missing the state the operation needs.
    Precondition,
}

/// All error types that can occur when talking to a Hue bridge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP request failed before a reply was received (includes timeouts).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server replied with a non-success status code.
    #[error("unexpected http status {status} for {operation}")]
    HttpStatus { status: u16, operation: String },

    /// A reply body could not be decoded into the expected shape.
    #[error("failed to decode {context}: {err}")]
    Decode {
        context: String,
        err: serde_json::Error,
    },

    /// A request body could not be encoded.
    #[error("failed to encode {context}: {err}")]
    Encode {
        context: String,
        err: serde_json::Error,
    },

    /// The discovery service returned an empty list.
    #[error("no bridge found on the network")]
    NoBridgeFound,

    /// The registration reply was an empty array.
    #[error("bridge sent an empty registration reply")]
    EmptyReply,

    /// The reply carried neither a success nor an error envelope.
    #[error("bridge reply had neither success nor error: {0}")]
    UnexpectedReply(String),

    /// The bridge rejected the request with an error envelope.
    #[error("bridge error {code} at {address}: {description}")]
    Bridge {
        code: u16,
        address: String,
        description: String,
    },

    /// No bridge address is known yet; run discovery first.
    #[error("no bridge address; discover a bridge first")]
    MissingBridgeAddress,

    /// No access token is known yet; register with the bridge first.
    #[error("not registered with the bridge; no access token")]
    MissingAccessToken,

    /// The light inventory is empty.
    #[error("no lights known; refresh the light list first")]
    NoLights,
}

impl Error {
    /// Create a new decode error
    pub fn decode(context: &str, err: serde_json::Error) -> Self {
        Error::Decode {
            context: context.to_string(),
            err,
        }
    }

    /// Create a new encode error
    pub fn encode(context: &str, err: serde_json::Error) -> Self {
        Error::Encode {
            context: context.to_string(),
            err,
        }
    }

    /// Create a new bridge error from an error envelope
    pub fn bridge(code: u16, address: &str, description: &str) -> Self {
        Error::Bridge {
            code,
            address: address.to_string(),
            description: description.to_string(),
        }
    }

    /// Map this error onto its [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Network(_) => ErrorKind::Network,
            Error::HttpStatus { .. }
            | Error::Decode { .. }
            | Error::Encode { .. }
            | Error::NoBridgeFound
            | Error::UnexpectedReply(_) => ErrorKind::Decode,
            Error::EmptyReply => ErrorKind::Protocol,
            Error::Bridge { .. } => ErrorKind::Bridge,
            Error::MissingBridgeAddress
            | Error::MissingAccessToken
            | Error::NoLights => ErrorKind::Precondition,
        }
    }

    /// Message suitable for showing to a user.
    ///
    /// Bridge errors show only the bridge's own description, which is what
    /// the bridge intends to be displayed (e.g. "link button not pressed").
    pub fn user_message(&self) -> String {
        match self {
            Error::Bridge { description, .. } => description.clone(),
            other => other.to_string(),
        }
    }

    /// True if the bridge refused registration because its link button
    /// has not been pressed.
    pub fn is_link_button_not_pressed(&self) -> bool {
        matches!(self, Error::Bridge { code, .. } if *code == LINK_BUTTON_NOT_PRESSED)
    }
}

/// Bridge error type for "link button not pressed".
pub(crate) const LINK_BUTTON_NOT_PRESSED: u16 = 101;

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
