// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! User settings.

use super::device::DeviceProfile;
use super::viewport::ViewportKey;
use serde::{Deserialize, Serialize};

/// Persisted user options. Missing fields fall back to their defaults, so
/// stored overrides are merged on top of `Settings::default()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Verbose diagnostics on the debug log channel.
    pub debug_mode: bool,
    /// Share one viewport across all devices under the `global` key.
    pub use_global_viewport: bool,
}

impl Settings {
    /// The key viewports are read and written under on this device.
    pub fn viewport_key(&self, device: &DeviceProfile) -> ViewportKey {
        if self.use_global_viewport {
            ViewportKey::Global
        } else {
            ViewportKey::Device(device.key())
        }
    }

    /// Log level matching `debug_mode`.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.debug_mode {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }
}
