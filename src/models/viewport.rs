// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Viewport records and the keys they are stored under.
//!
//! A record is the camera of one canvas view: the pan translation and the
//! zoom level. Records are always replaced whole, never patched field by
//! field.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key used when per-device scoping is disabled.
pub const GLOBAL_KEY: &str = "global";

/// Pan translation and zoom level of a canvas camera.
///
/// `zoom` is stored as `tZoom` to match the canvas file layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportRecord {
    pub tx: f64,
    pub ty: f64,
    #[serde(rename = "tZoom")]
    pub zoom: f64,
}

impl ViewportRecord {
    /// Create a record from a translation and zoom level.
    pub fn new(tx: f64, ty: f64, zoom: f64) -> Self {
        Self { tx, ty, zoom }
    }

    /// True when every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.tx.is_finite() && self.ty.is_finite() && self.zoom.is_finite()
    }
}

/// Identifies whose viewport a record belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewportKey {
    /// A device fingerprint such as `linux_desktop_1920x1080@1x`.
    Device(String),
    /// Shared by every device.
    Global,
}

impl ViewportKey {
    /// The string used as the key inside the `viewports` mapping.
    pub fn as_str(&self) -> &str {
        match self {
            ViewportKey::Device(id) => id,
            ViewportKey::Global => GLOBAL_KEY,
        }
    }
}

impl fmt::Display for ViewportKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
