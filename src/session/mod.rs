// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session context tying the classifier, the store and the applier to a host.
//!
//! A `Session` lives from plugin activation (`init`) to deactivation
//! (`teardown`) and owns all mutable state: settings, device identity, the
//! remembered set of open canvases and at most one pending camera restore.
//! The host is reached only through the `Host` trait.

pub mod applier;
pub mod classifier;

use crate::io::document::DocumentHandle;
use crate::io::settings::{self, SettingsStore};
use crate::io::store;
use crate::models::device::DeviceProfile;
use crate::models::settings::Settings;
use crate::models::viewport::ViewportKey;
use applier::{ApplyPhase, CameraApply, LiveCanvas};
use classifier::{ActivationEvent, Classification, OpenCanvasSet, OpenCanvasTracker};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// What the session needs from the application hosting the canvases.
pub trait Host {
    /// Paths of every open canvas view.
    fn open_canvas_paths(&self) -> Vec<PathBuf>;

    /// Path of the focused canvas view, if a canvas has focus.
    fn active_canvas_path(&self) -> Option<PathBuf>;

    /// The live view showing `path`.
    fn live_canvas(&mut self, path: &Path) -> Option<&mut dyn LiveCanvas>;

    fn read_file(&self, path: &Path) -> std::io::Result<String>;

    fn write_file(&mut self, path: &Path, text: &str) -> std::io::Result<()>;

    /// Show a short transient message to the user.
    fn notice(&mut self, message: &str);
}

/// Receives the user-invocable commands at startup.
pub trait CommandRegistry {
    fn register_command(&mut self, id: &'static str, name: &'static str, command: Command);
}

/// User-invocable actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    SaveViewport,
    RestoreViewport,
    DeleteViewport,
}

impl Command {
    pub const ALL: [Command; 3] = [
        Command::SaveViewport,
        Command::RestoreViewport,
        Command::DeleteViewport,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Command::SaveViewport => "save-canvas-viewport",
            Command::RestoreViewport => "restore-canvas-viewport",
            Command::DeleteViewport => "delete-canvas-viewport",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::SaveViewport => "Save canvas viewport",
            Command::RestoreViewport => "Restore canvas viewport",
            Command::DeleteViewport => "Delete canvas viewport",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }
}

/// `DocumentHandle` over a host's file access.
struct HostDocument<'a, H: Host + ?Sized> {
    host: &'a mut H,
    path: PathBuf,
}

impl<H: Host + ?Sized> DocumentHandle for HostDocument<'_, H> {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> std::io::Result<String> {
        self.host.read_file(&self.path)
    }

    fn write(&mut self, text: &str) -> std::io::Result<()> {
        self.host.write_file(&self.path, text)
    }
}

/// A scheduled restore. Command-driven restores announce success.
#[derive(Debug)]
struct PendingRestore {
    apply: CameraApply,
    announce: bool,
}

/// Plugin-lifetime state.
#[derive(Debug)]
pub struct Session {
    settings: Settings,
    device: DeviceProfile,
    tracker: OpenCanvasTracker,
    pending: Option<PendingRestore>,
}

impl Session {
    /// Start a session: load settings once and apply the log level.
    pub fn init(store: &dyn SettingsStore, device: DeviceProfile) -> Self {
        let settings = settings::load_or_default(store);
        log::set_max_level(settings.log_level());
        log::info!(
            "Canvas viewports active for {} (global: {})",
            device,
            settings.use_global_viewport
        );
        Self {
            settings,
            device,
            tracker: OpenCanvasTracker::new(),
            pending: None,
        }
    }

    /// End the session, forgetting open canvases and any pending restore.
    pub fn teardown(&mut self) {
        self.tracker.reset();
        self.pending = None;
        log::debug!("Session torn down");
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Persist new settings and apply them.
    pub fn update_settings(
        &mut self,
        store: &mut dyn SettingsStore,
        settings: Settings,
    ) -> anyhow::Result<()> {
        self.settings = settings;
        log::set_max_level(settings.log_level());
        store.save(&settings)
    }

    pub fn device(&self) -> &DeviceProfile {
        &self.device
    }

    /// The screen changed; later operations use the new device key.
    pub fn set_device(&mut self, device: DeviceProfile) {
        if device != self.device {
            log::debug!("Device changed: {} -> {}", self.device, device);
            self.device = device;
        }
    }

    pub fn viewport_key(&self) -> ViewportKey {
        self.settings.viewport_key(&self.device)
    }

    /// Whether a restore is scheduled or in progress.
    pub fn has_pending_restore(&self) -> bool {
        self.pending.is_some()
    }

    /// Handle a "file became active" signal.
    ///
    /// The open set is read from the host here, after the signal fired.
    /// Genuine opens with a saved record schedule a camera restore.
    pub fn on_activation<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        event: Option<ActivationEvent>,
        now: Instant,
    ) -> Classification {
        let current: OpenCanvasSet = host.open_canvas_paths().into_iter().collect();
        let verdict = self.tracker.observe(event.as_ref(), current);
        let Some(event) = event.filter(|_| verdict.is_genuine_open) else {
            return verdict;
        };

        let key = self.viewport_key();
        let doc = HostDocument {
            host,
            path: event.path.clone(),
        };
        match store::load(&doc, &key) {
            Some(record) => {
                log::debug!("Restoring {} on open", event.path.display());
                self.pending = Some(PendingRestore {
                    apply: CameraApply::schedule(event.path, record, now),
                    announce: false,
                });
            }
            None => {
                log::debug!("No viewport saved for {} in {}", key, event.path.display());
                self.pending = None;
            }
        }
        verdict
    }

    /// Hand the commands to the host.
    pub fn register_commands(&self, registry: &mut dyn CommandRegistry) {
        for command in Command::ALL {
            registry.register_command(command.id(), command.name(), command);
        }
    }

    /// Commands need at least one open canvas.
    pub fn is_command_enabled<H: Host + ?Sized>(&self, host: &H) -> bool {
        !host.open_canvas_paths().is_empty()
    }

    /// Run a user command against the active canvas.
    pub fn run_command<H: Host + ?Sized>(&mut self, host: &mut H, command: Command, now: Instant) {
        let Some(path) = target_canvas(host) else {
            host.notice("No canvas open");
            return;
        };
        log::debug!("Running {} on {}", command.id(), path.display());
        match command {
            Command::SaveViewport => self.save_viewport(host, path),
            Command::RestoreViewport => self.restore_viewport(host, path, now),
            Command::DeleteViewport => self.delete_viewport(host, path),
        }
    }

    fn save_viewport<H: Host + ?Sized>(&mut self, host: &mut H, path: PathBuf) {
        let Some(record) = host.live_canvas(&path).and_then(|canvas| canvas.camera()) else {
            host.notice("Failed to save viewport: canvas is not ready");
            return;
        };
        let key = self.viewport_key();
        let mut doc = HostDocument {
            host: &mut *host,
            path: path.clone(),
        };
        match store::save(&mut doc, &key, record) {
            Ok(()) => {
                log::info!("Saved viewport for {} in {}", key, path.display());
                host.notice(&format!("Viewport saved ({})", key));
            }
            Err(e) => {
                log::error!("Failed to save viewport to {}: {}", path.display(), e);
                host.notice(&format!("Failed to save viewport: {}", e));
            }
        }
    }

    fn restore_viewport<H: Host + ?Sized>(&mut self, host: &mut H, path: PathBuf, now: Instant) {
        let key = self.viewport_key();
        let doc = HostDocument {
            host: &mut *host,
            path: path.clone(),
        };
        match store::load(&doc, &key) {
            Some(record) => {
                self.pending = Some(PendingRestore {
                    apply: CameraApply::schedule(path, record, now),
                    announce: true,
                });
            }
            None => host.notice(&format!("No saved viewport for {}", key)),
        }
    }

    fn delete_viewport<H: Host + ?Sized>(&mut self, host: &mut H, path: PathBuf) {
        let key = self.viewport_key();
        let mut doc = HostDocument {
            host: &mut *host,
            path: path.clone(),
        };
        match store::delete(&mut doc, &key) {
            Ok(true) => {
                log::info!("Deleted viewport for {} from {}", key, path.display());
                host.notice("Viewport deleted");
            }
            Ok(false) => host.notice(&format!("No saved viewport for {}", key)),
            Err(e) => {
                log::error!("Failed to delete viewport from {}: {}", path.display(), e);
                host.notice(&format!("Failed to delete viewport: {}", e));
            }
        }
    }

    /// Drive the pending restore. Returns how long until it needs another
    /// tick, or `None` when nothing is pending.
    pub fn tick<H: Host + ?Sized>(&mut self, host: &mut H, now: Instant) -> Option<Duration> {
        let pending = self.pending.as_mut()?;
        let path = pending.apply.path().to_path_buf();
        let phase = pending.apply.poll(now, host.live_canvas(&path)).clone();
        match phase {
            ApplyPhase::AwaitingCanvasAttach { .. } | ApplyPhase::Applying => {
                return pending.apply.wake_in(now);
            }
            ApplyPhase::Done => {
                log::info!("Restored viewport for {}", path.display());
                if pending.announce {
                    host.notice("Viewport restored");
                }
            }
            ApplyPhase::Abandoned => {}
            ApplyPhase::Failed(reason) => {
                host.notice(&format!("Failed to restore viewport: {}", reason));
            }
        }
        self.pending = None;
        None
    }
}

/// The focused canvas, or the first open one.
fn target_canvas<H: Host + ?Sized>(host: &H) -> Option<PathBuf> {
    let open = host.open_canvas_paths();
    host.active_canvas_path()
        .filter(|path| open.contains(path))
        .or_else(|| open.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::settings::MemorySettingsStore;

    #[test]
    fn test_command_ids_roundtrip() {
        for command in Command::ALL {
            assert_eq!(Command::from_id(command.id()), Some(command));
        }
        assert_eq!(Command::from_id("unknown"), None);
    }

    #[test]
    fn test_register_commands() {
        struct Registry(Vec<(&'static str, Command)>);
        impl CommandRegistry for Registry {
            fn register_command(&mut self, id: &'static str, _name: &'static str, command: Command) {
                self.0.push((id, command));
            }
        }

        let session = Session::init(&MemorySettingsStore::default(), DeviceProfile::detect(800, 600, 1.0));
        let mut registry = Registry(Vec::new());
        session.register_commands(&mut registry);
        assert_eq!(
            registry.0.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
            vec![
                "save-canvas-viewport",
                "restore-canvas-viewport",
                "delete-canvas-viewport"
            ]
        );
    }

    #[test]
    fn test_init_merges_stored_settings() {
        let store = MemorySettingsStore {
            stored: Some(Settings {
                debug_mode: false,
                use_global_viewport: true,
            }),
        };
        let session = Session::init(&store, DeviceProfile::detect(800, 600, 1.0));
        assert_eq!(session.viewport_key(), ViewportKey::Global);
    }

    #[test]
    fn test_update_settings_persists() {
        let mut store = MemorySettingsStore::default();
        let device = DeviceProfile::detect(800, 600, 1.0);
        let mut session = Session::init(&store, device.clone());
        assert_eq!(session.viewport_key(), ViewportKey::Device(device.key()));

        let updated = Settings {
            debug_mode: false,
            use_global_viewport: true,
        };
        session.update_settings(&mut store, updated).unwrap();
        assert_eq!(store.stored, Some(updated));
        assert_eq!(session.viewport_key(), ViewportKey::Global);
    }
}
