// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Settings persistence.
//!
//! Settings are stored as YAML in the user's configuration directory.

use crate::models::settings::Settings;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// The host's key-value settings facility.
pub trait SettingsStore {
    /// Stored settings, or `None` when nothing was ever saved.
    fn load(&self) -> Result<Option<Settings>>;

    fn save(&mut self, settings: &Settings) -> Result<()>;
}

/// Load settings, falling back to defaults when nothing usable is stored.
pub fn load_or_default(store: &dyn SettingsStore) -> Settings {
    match store.load() {
        Ok(Some(settings)) => settings,
        Ok(None) => Settings::default(),
        Err(e) => {
            log::warn!("Using default settings: {:#}", e);
            Settings::default()
        }
    }
}

/// Settings in a YAML file.
#[derive(Debug, Clone)]
pub struct YamlSettingsStore {
    path: PathBuf,
}

impl YamlSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/canvas-viewports/settings.yaml`, or the working
    /// directory when the platform has no config dir.
    pub fn default_location() -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join("canvas-viewports").join("settings.yaml"))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SettingsStore for YamlSettingsStore {
    fn load(&self) -> Result<Option<Settings>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let yaml = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let settings = serde_yaml::from_str(&yaml)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(Some(settings))
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let yaml = serde_yaml::to_string(settings)?;
        std::fs::write(&self.path, yaml)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

/// Settings held in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    pub stored: Option<Settings>,
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Option<Settings>> {
        Ok(self.stored)
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        self.stored = Some(*settings);
        Ok(())
    }
}
