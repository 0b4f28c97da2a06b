use std::fmt;

/// Phase-one failure: the HTTP call never produced a usable envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request could not be sent or the connection failed.
    Connect(String),
    /// The backend answered with a non-success HTTP status.
    Status(u16),
    /// The response body did not decode as the expected shape.
    Decode(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Connect(msg) => write!(f, "request failed: {msg}"),
            TransportError::Status(code) => write!(f, "backend HTTP {code}"),
            TransportError::Decode(msg) => write!(f, "response decode failed: {msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

/// Phase-two failure: the subscription did not deliver a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The stream could not be opened or dropped mid-exchange.
    Connect(String),
    /// The backend reported an error on the stream.
    Remote(String),
    /// A message arrived but was not a valid payload.
    Malformed(String),
    /// The stream closed before delivering a payload.
    Closed,
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Connect(msg) => write!(f, "stream failed: {msg}"),
            StreamError::Remote(msg) => write!(f, "backend stream error: {msg}"),
            StreamError::Malformed(msg) => write!(f, "malformed stream payload: {msg}"),
            StreamError::Closed => write!(f, "stream closed before payload"),
        }
    }
}

impl std::error::Error for StreamError {}

/// Any failure terminating a `load()`. The phase is preserved so callers
/// can surface transport and stream problems distinctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    Transport(TransportError),
    Stream(StreamError),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(e) => write!(f, "phase one: {e}"),
            FetchError::Stream(e) => write!(f, "phase two: {e}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Transport(e) => Some(e),
            FetchError::Stream(e) => Some(e),
        }
    }
}

impl From<TransportError> for FetchError {
    fn from(e: TransportError) -> Self {
        FetchError::Transport(e)
    }
}

impl From<StreamError> for FetchError {
    fn from(e: StreamError) -> Self {
        FetchError::Stream(e)
    }
}
