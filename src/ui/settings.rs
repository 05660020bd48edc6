// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Settings window.

use crate::models::device::DeviceProfile;
use crate::models::settings::Settings;

/// Show the settings window. Returns the edited settings when an option
/// was toggled.
pub fn show(
    ctx: &egui::Context,
    open: &mut bool,
    settings: Settings,
    device: &DeviceProfile,
) -> Option<Settings> {
    let mut edited = settings;
    egui::Window::new("Settings")
        .open(open)
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            ui.checkbox(&mut edited.use_global_viewport, "Use global viewport")
                .on_hover_text("Share one saved viewport across all devices");
            ui.checkbox(&mut edited.debug_mode, "Debug mode")
                .on_hover_text("Write verbose diagnostics to the log");

            ui.separator();
            ui.label(egui::RichText::new("This device").strong());
            ui.monospace(device.key());
            ui.label(
                egui::RichText::new(format!(
                    "Viewports are saved under: {}",
                    edited.viewport_key(device)
                ))
                .weak(),
            );
        });

    (edited != settings).then_some(edited)
}
