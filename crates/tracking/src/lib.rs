use core::fmt;

use actors::actor::ActorError;
use skyweave::ApiError;

pub mod controller;
pub mod monitor;
pub mod poller;
pub mod session;
pub mod statistics;

#[derive(Debug)]
pub enum TrackingError {
    /// The session actor is gone and can no longer be reached.
    Session(ActorError),
    /// A backend call made on behalf of the caller failed.
    Backend(ApiError),
    AlreadyStreaming,
    NotStreaming,
}

impl fmt::Display for TrackingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Session(why) => write!(f, "session unavailable: {}", why),
            Self::Backend(why) => write!(f, "{}", why),
            Self::AlreadyStreaming => write!(f, "a streaming session is already active"),
            Self::NotStreaming => write!(f, "no streaming session is active"),
        }
    }
}

impl std::error::Error for TrackingError {}

impl From<ActorError> for TrackingError {
    fn from(why: ActorError) -> Self {
        Self::Session(why)
    }
}

impl From<ApiError> for TrackingError {
    fn from(why: ApiError) -> Self {
        Self::Backend(why)
    }
}

pub type TrackingResult<T> = Result<T, TrackingError>;
