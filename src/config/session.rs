// src/config/session.rs
// Session retention policy for the context store

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use super::helpers::env_or;

/// What happens to a user's document contexts when their last connection closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionRetention {
    /// Drop the user's session once no open connection serves them
    #[default]
    ReleaseOnDisconnect,
    /// Keep sessions for the lifetime of the process
    Retain,
}

impl SessionRetention {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionRetention::ReleaseOnDisconnect => "release_on_disconnect",
            SessionRetention::Retain => "retain",
        }
    }

    pub fn releases_on_disconnect(&self) -> bool {
        matches!(self, SessionRetention::ReleaseOnDisconnect)
    }
}

impl fmt::Display for SessionRetention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionRetention {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "release_on_disconnect" | "release" => Ok(SessionRetention::ReleaseOnDisconnect),
            "retain" | "keep" => Ok(SessionRetention::Retain),
            other => Err(anyhow!("Unknown session retention policy: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub retention: SessionRetention,
}

impl SessionConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let raw = env_or(
            "DOC_EDITOR_SESSION_RETENTION",
            SessionRetention::default().as_str(),
        );
        Ok(Self {
            retention: raw.parse()?,
        })
    }
}
