//! Application identity and platform capability configuration
//!
//! The application identity a host interpreter reports (name, version, patch
//! level) is an explicit value passed at process start rather than
//! process-wide mutable state. Platform wait capabilities are likewise an
//! explicit input to the reaper, so a capability gap is visible at the call
//! site instead of being compiled away.

use crate::{CoreError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Application identity, set once at process start
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    /// Short application name
    pub name: String,
    /// Long, natural-language application name
    #[serde(default)]
    pub long_name: Option<String>,
    /// Version string
    pub version: String,
    /// Patch level
    #[serde(default)]
    pub patch_level: u32,
}

impl AppInfo {
    /// Validate the identity fields with field-path error messages
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Configuration(
                "appInfo.name: cannot be empty".to_string(),
            ));
        }
        if self.version.trim().is_empty() {
            return Err(CoreError::Configuration(
                "appInfo.version: cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load application identity from a TOML file path
pub fn load_app_info_from_toml_path(path: impl AsRef<Path>) -> Result<AppInfo> {
    let data = fs::read_to_string(&path).map_err(|e| {
        CoreError::Configuration(format!("Failed to read config {:?}: {}", path.as_ref(), e))
    })?;
    load_app_info_from_toml_str(&data)
}

/// Load application identity from a TOML string
pub fn load_app_info_from_toml_str(input: &str) -> Result<AppInfo> {
    let info: AppInfo = toml::from_str(input)
        .map_err(|e| CoreError::Configuration(format!("TOML parse error: {e}")))?;
    info.validate()?;
    Ok(info)
}

/// Availability of wait primitives on the host platform.
///
/// These are external inputs to the reaper, not something it probes per call.
/// A request that needs an unavailable capability fails with an
/// `UnsupportedOption` error naming the option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformCapabilities {
    /// Non-blocking wait (`--no-hang`) is available
    pub nonblocking_wait: bool,
    /// Process-group wait targets (`--process-group`) are available
    pub group_wait: bool,
    /// Stop-tracking (`--include-stopped`) is available
    pub stop_tracking: bool,
}

impl PlatformCapabilities {
    /// Every capability available
    pub const fn full() -> Self {
        Self {
            nonblocking_wait: true,
            group_wait: true,
            stop_tracking: true,
        }
    }

    /// Capabilities of the build target
    pub fn detect() -> Self {
        if cfg!(unix) {
            Self::full()
        } else {
            Self {
                nonblocking_wait: false,
                group_wait: false,
                stop_tracking: false,
            }
        }
    }
}

impl Default for PlatformCapabilities {
    fn default() -> Self {
        Self::detect()
    }
}
