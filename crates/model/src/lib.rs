use core::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub mod coordinate;
pub mod render;
pub mod statistics;
pub mod trail;

/// Which detection feed(s) a streaming session consumes. A configuration
/// choice, not a protocol variant: switching modes restarts the session's
/// poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMode {
    Trail,
    Landslide,
    Combined,
}

impl DetectionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trail => "trail",
            Self::Landslide => "landslide",
            Self::Combined => "combined",
        }
    }
}

impl fmt::Display for DetectionMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health of the detection backend as seen by the probe loop. `Checking`
/// only before the first probe completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BackendStatus {
    Checking,
    Online,
    Offline,
}

impl BackendStatus {
    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }
}

impl fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Checking => "checking",
            Self::Online => "online",
            Self::Offline => "offline",
        };
        f.write_str(name)
    }
}
