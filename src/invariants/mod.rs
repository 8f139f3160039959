//! Invariant Config
//!
//! Static, versioned configuration consulted by VALIDATE phases and by
//! external guardian tooling:
//!   - `PauseState`:     expected pause flags per module
//!   - `SafeAddressSet`: names exempt from guardian sweep/pause actions
//!
//! Nothing in the lifecycle mutates this data.

pub mod errors;
mod pause_state;
mod safe_addresses;

pub use errors::InvariantConfigError;
pub use pause_state::{PauseFlags, PauseLookup, PauseState};
pub use safe_addresses::SafeAddressSet;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Only config version this build understands
pub const INVARIANT_CONFIG_VERSION: u32 = 1;

/// Config bundled with the binary, used when no file is given
const BUNDLED_CONFIG: &str = include_str!("default_invariants.json");

/// Pause state and safe address set, as loaded from one versioned file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvariantConfig {
    /// Config schema version
    pub version: u32,
    /// Expected pause flags
    pub pause_state: PauseState,
    /// Guardian allow-list
    pub safe_addresses: SafeAddressSet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInvariantConfig {
    version: u32,
    #[serde(default)]
    pause_state: PauseState,
    #[serde(default)]
    safe_addresses: Vec<String>,
}

impl Default for InvariantConfig {
    fn default() -> Self {
        Self {
            version: INVARIANT_CONFIG_VERSION,
            pause_state: PauseState::new(),
            safe_addresses: SafeAddressSet::default(),
        }
    }
}

impl InvariantConfig {
    /// Parse a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, InvariantConfigError> {
        let raw: RawInvariantConfig = serde_json::from_str(json)?;
        if raw.version != INVARIANT_CONFIG_VERSION {
            return Err(InvariantConfigError::UnsupportedVersion(raw.version));
        }
        Ok(Self {
            version: raw.version,
            pause_state: raw.pause_state,
            safe_addresses: SafeAddressSet::new(raw.safe_addresses)?,
        })
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, InvariantConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|source| InvariantConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json(&json)
    }

    /// The config shipped with this crate (matches the dev deployment).
    pub fn bundled() -> Result<Self, InvariantConfigError> {
        Self::from_json(BUNDLED_CONFIG)
    }
}
