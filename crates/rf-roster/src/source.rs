//! Roster source selection

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where a roster comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Live player list over HTTP
    #[default]
    Api,
    /// Built-in test players
    Fixture,
}

impl SourceKind {
    /// The other source
    pub fn toggle(self) -> Self {
        match self {
            Self::Api => Self::Fixture,
            Self::Fixture => Self::Api,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api => write!(f, "api"),
            Self::Fixture => write!(f, "fixture"),
        }
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "api" => Ok(Self::Api),
            "fixture" | "test" => Ok(Self::Fixture),
            other => Err(format!("unknown roster source '{}' (expected api or fixture)", other)),
        }
    }
}
