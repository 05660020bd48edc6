// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Device fingerprinting.
//!
//! Viewports are scoped per device so a laptop and a phone syncing the same
//! canvas keep their own cameras. The fingerprint is built from the
//! platform, a coarse form factor and the logical screen size.

use std::fmt;

/// Coarse class of the running device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFactor {
    Desktop,
    Tablet,
    Phone,
}

impl FormFactor {
    /// Classify a logical screen size.
    pub fn classify(platform: &str, width: u32, height: u32) -> Self {
        let short_side = width.min(height);
        let mobile = matches!(platform, "android" | "ios");
        if !mobile {
            FormFactor::Desktop
        } else if short_side < 600 {
            FormFactor::Phone
        } else {
            FormFactor::Tablet
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormFactor::Desktop => "desktop",
            FormFactor::Tablet => "tablet",
            FormFactor::Phone => "phone",
        }
    }
}

/// Everything that goes into a device key.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceProfile {
    pub platform: String,
    pub form_factor: FormFactor,
    /// Logical screen width.
    pub width: u32,
    /// Logical screen height.
    pub height: u32,
    pub pixel_ratio: f32,
}

impl DeviceProfile {
    /// Build a profile for the current platform and the given screen.
    pub fn detect(width: u32, height: u32, pixel_ratio: f32) -> Self {
        let platform = std::env::consts::OS.to_string();
        let form_factor = FormFactor::classify(&platform, width, height);
        Self {
            platform,
            form_factor,
            width,
            height,
            pixel_ratio,
        }
    }

    /// The device key, e.g. `linux_desktop_1920x1080@1x`.
    pub fn key(&self) -> String {
        format!(
            "{}_{}_{}x{}@{}x",
            self.platform,
            self.form_factor.as_str(),
            self.width,
            self.height,
            format_ratio(self.pixel_ratio)
        )
    }
}

impl fmt::Display for DeviceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Pixel ratio rounded to two decimals, without trailing zeros.
fn format_ratio(ratio: f32) -> String {
    let rounded = (f64::from(ratio) * 100.0).round() / 100.0;
    format!("{}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(platform: &str, width: u32, height: u32, ratio: f32) -> DeviceProfile {
        DeviceProfile {
            platform: platform.to_string(),
            form_factor: FormFactor::classify(platform, width, height),
            width,
            height,
            pixel_ratio: ratio,
        }
    }

    #[test]
    fn test_desktop_key() {
        assert_eq!(
            profile("linux", 1920, 1080, 1.0).key(),
            "linux_desktop_1920x1080@1x"
        );
    }

    #[test]
    fn test_fractional_ratio() {
        assert_eq!(
            profile("windows", 2560, 1440, 1.25).key(),
            "windows_desktop_2560x1440@1.25x"
        );
        assert_eq!(profile("macos", 1512, 982, 2.0).key(), "macos_desktop_1512x982@2x");
    }

    #[test]
    fn test_form_factors() {
        assert_eq!(FormFactor::classify("ios", 390, 844), FormFactor::Phone);
        assert_eq!(FormFactor::classify("ios", 820, 1180), FormFactor::Tablet);
        assert_eq!(FormFactor::classify("android", 1280, 800), FormFactor::Tablet);
        assert_eq!(FormFactor::classify("linux", 1366, 768), FormFactor::Desktop);
    }

    #[test]
    fn test_detect_uses_current_platform() {
        let device = DeviceProfile::detect(1920, 1080, 1.0);
        assert_eq!(device.platform, std::env::consts::OS);
    }
}
