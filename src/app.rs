// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! The application is a small canvas host: it opens canvas documents in
//! tabs, raises activation signals the way a real host does (on open, on
//! tab switch and after reloading a document that changed on disk), and
//! hands those signals and the user's commands to the viewport `Session`.

use crate::io::document::{to_canvas_text, write_atomic};
use crate::io::settings::YamlSettingsStore;
use crate::models::canvas::CanvasNode;
use crate::models::device::DeviceProfile;
use crate::session::applier::LiveCanvas;
use crate::session::classifier::ActivationEvent;
use crate::session::{Command, CommandRegistry, Host, Session};
use crate::ui::canvas::{self, CanvasAction, CanvasView};
use crate::ui::notices::Notices;
use crate::ui::{settings, toolbar};
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Open canvases and everything the session reaches through `Host`.
#[derive(Default)]
pub struct Workspace {
    views: Vec<CanvasView>,
    active: Option<usize>,
    notices: Notices,
    /// Documents written since the last frame; reloaded like external edits.
    pending_reloads: Vec<PathBuf>,
}

impl Workspace {
    fn index_of(&self, path: &Path) -> Option<usize> {
        self.views.iter().position(|v| v.path() == path)
    }
}

impl Host for Workspace {
    fn open_canvas_paths(&self) -> Vec<PathBuf> {
        self.views.iter().map(|v| v.path().to_path_buf()).collect()
    }

    fn active_canvas_path(&self) -> Option<PathBuf> {
        self.active
            .and_then(|idx| self.views.get(idx))
            .map(|v| v.path().to_path_buf())
    }

    fn live_canvas(&mut self, path: &Path) -> Option<&mut dyn LiveCanvas> {
        self.views
            .iter_mut()
            .find(|v| v.path() == path)
            .map(|v| v as &mut dyn LiveCanvas)
    }

    fn read_file(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write_file(&mut self, path: &Path, text: &str) -> std::io::Result<()> {
        write_atomic(path, text)?;
        if self.index_of(path).is_some() && !self.pending_reloads.iter().any(|p| p == path) {
            self.pending_reloads.push(path.to_path_buf());
        }
        Ok(())
    }

    fn notice(&mut self, message: &str) {
        log::info!("Notice: {}", message);
        self.notices.push(message);
    }
}

/// Commands as registered by the session, in menu order.
#[derive(Default)]
struct CommandMenu {
    entries: Vec<(&'static str, &'static str, Command)>,
}

impl CommandRegistry for CommandMenu {
    fn register_command(&mut self, id: &'static str, name: &'static str, command: Command) {
        log::debug!("Registered command {}", id);
        self.entries.push((id, name, command));
    }
}

/// Keyboard shortcut bound to a command.
fn shortcut(command: Command) -> egui::KeyboardShortcut {
    let key = match command {
        Command::SaveViewport => egui::Key::S,
        Command::RestoreViewport => egui::Key::R,
        Command::DeleteViewport => egui::Key::D,
    };
    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND | egui::Modifiers::SHIFT, key)
}

/// Main application state.
pub struct CanvasViewportsApp {
    workspace: Workspace,
    session: Session,
    settings_store: YamlSettingsStore,
    commands: CommandMenu,
    show_settings: bool,
}

impl CanvasViewportsApp {
    /// Create the application and open any canvases given on the command line.
    pub fn new(cc: &eframe::CreationContext<'_>, paths: Vec<PathBuf>) -> Self {
        let settings_store = YamlSettingsStore::default_location();
        let device = startup_device(&cc.egui_ctx);
        let session = Session::init(&settings_store, device);

        let mut commands = CommandMenu::default();
        session.register_commands(&mut commands);

        let mut app = Self {
            workspace: Workspace::default(),
            session,
            settings_store,
            commands,
            show_settings: false,
        };
        for path in paths {
            app.open_canvas(path);
        }
        app
    }

    /// Open a canvas in a new tab, or focus it if it is already open.
    fn open_canvas(&mut self, path: PathBuf) {
        if let Some(idx) = self.workspace.index_of(&path) {
            self.activate(idx);
            return;
        }
        match CanvasView::open(&path) {
            Ok(view) => {
                log::info!("Opened {}", path.display());
                self.workspace.views.push(view);
                self.activate(self.workspace.views.len() - 1);
            }
            Err(e) => {
                log::error!("Failed to open canvas: {:#}", e);
                self.workspace.notice(&format!("Could not open {}", path.display()));
            }
        }
    }

    /// Focus a tab and raise the activation signal for it.
    fn activate(&mut self, idx: usize) {
        self.workspace.active = Some(idx);
        let event = self
            .workspace
            .views
            .get(idx)
            .map(|v| ActivationEvent::for_path(v.path()));
        self.session
            .on_activation(&mut self.workspace, event, Instant::now());
    }

    fn close_tab(&mut self, idx: usize) {
        if idx >= self.workspace.views.len() {
            return;
        }
        let view = self.workspace.views.remove(idx);
        log::info!("Closed {}", view.path().display());

        if self.workspace.views.is_empty() {
            self.workspace.active = None;
            self.session
                .on_activation(&mut self.workspace, None, Instant::now());
            return;
        }
        let next = match self.workspace.active {
            Some(active) if active > idx => active - 1,
            Some(active) if active < idx => active,
            _ => idx.min(self.workspace.views.len() - 1),
        };
        self.activate(next);
    }

    /// Reload documents written since the last frame. The host re-signals
    /// activation for the focused canvas, as it does after in-place edits.
    fn process_reloads(&mut self) {
        let reloads = std::mem::take(&mut self.workspace.pending_reloads);
        for path in reloads {
            let Some(idx) = self.workspace.index_of(&path) else {
                continue;
            };
            if let Err(e) = self.workspace.views[idx].reload() {
                log::error!("{:#}", e);
                continue;
            }
            if self.workspace.active == Some(idx) {
                self.activate(idx);
            }
        }
    }

    /// Append a text card to the canvas document on disk.
    fn add_card(&mut self, path: &Path, x: f64, y: f64) -> Result<()> {
        let text = self.workspace.read_file(path)?;
        let mut root: Value = if text.trim().is_empty() {
            Value::Object(serde_json::Map::new())
        } else {
            serde_json::from_str(&text).context("canvas is not valid JSON")?
        };
        let Some(object) = root.as_object_mut() else {
            anyhow::bail!("canvas root is not an object");
        };
        let nodes = object
            .entry("nodes")
            .or_insert_with(|| Value::Array(Vec::new()));
        let Some(nodes) = nodes.as_array_mut() else {
            anyhow::bail!("canvas nodes are not a list");
        };

        let id = format!("card-{}", nodes.len() + 1);
        let node = CanvasNode::text_card(id, x, y, "New card".to_string());
        nodes.push(serde_json::to_value(node)?);

        let text = to_canvas_text(&root)?;
        self.workspace.write_file(path, &text)?;
        Ok(())
    }

    fn run_command(&mut self, command: Command) {
        self.session
            .run_command(&mut self.workspace, command, Instant::now());
    }

    /// Drive the pending restore and flush requests from live canvases.
    fn tick(&mut self, ctx: &egui::Context) {
        if let Some(wait) = self.session.tick(&mut self.workspace, Instant::now()) {
            ctx.request_repaint_after(wait);
        }
        for view in &mut self.workspace.views {
            if view.take_viewport_changed() {
                log::debug!("Viewport of {} changed", view.path().display());
            }
            if view.take_frame_request() {
                ctx.request_repaint();
            }
        }
    }
}

/// Device profile from the monitor the window is on, or `None` while the
/// monitor size is not known. Window size and UI zoom never enter the key.
fn detect_device(ctx: &egui::Context) -> Option<DeviceProfile> {
    let (monitor_size, native_ppp) =
        ctx.input(|i| (i.viewport().monitor_size, i.viewport().native_pixels_per_point));
    let fallback_ppp = ctx.pixels_per_point() / ctx.zoom_factor();
    device_from_monitor(monitor_size, native_ppp.unwrap_or(fallback_ppp))
}

fn device_from_monitor(monitor_size: Option<egui::Vec2>, pixel_ratio: f32) -> Option<DeviceProfile> {
    let size = monitor_size.filter(|s| s.x > 0.0 && s.y > 0.0)?;
    Some(DeviceProfile::detect(
        size.x.round() as u32,
        size.y.round() as u32,
        pixel_ratio,
    ))
}

/// Profile used until the monitor reports its size.
fn startup_device(ctx: &egui::Context) -> DeviceProfile {
    detect_device(ctx).unwrap_or_else(|| {
        let size = ctx.screen_rect().size();
        let pixel_ratio = ctx.pixels_per_point() / ctx.zoom_factor();
        DeviceProfile::detect(size.x.round() as u32, size.y.round() as u32, pixel_ratio)
    })
}

impl eframe::App for CanvasViewportsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(device) = detect_device(ctx) {
            self.session.set_device(device);
        }
        self.process_reloads();

        let commands_enabled = self.session.is_command_enabled(&self.workspace);

        // Keyboard shortcuts
        if !ctx.wants_keyboard_input() {
            let triggered: Vec<Command> = self
                .commands
                .entries
                .iter()
                .map(|(_, _, command)| *command)
                .filter(|command| ctx.input_mut(|i| i.consume_shortcut(&shortcut(*command))))
                .collect();
            for command in triggered {
                self.run_command(command);
            }
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Canvas...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Canvas", &["canvas"])
                            .pick_file()
                        {
                            self.open_canvas(path);
                        }
                        ui.close_menu();
                    }
                    let has_active = self.workspace.active.is_some();
                    if ui.add_enabled(has_active, egui::Button::new("Close Canvas")).clicked() {
                        if let Some(idx) = self.workspace.active {
                            self.close_tab(idx);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Settings...").clicked() {
                        self.show_settings = true;
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Viewport", |ui| {
                    let mut clicked = None;
                    for (_, name, command) in &self.commands.entries {
                        let button = egui::Button::new(*name)
                            .shortcut_text(ctx.format_shortcut(&shortcut(*command)));
                        if ui.add_enabled(commands_enabled, button).clicked() {
                            clicked = Some(*command);
                        }
                    }
                    if let Some(command) = clicked {
                        self.run_command(command);
                        ui.close_menu();
                    }
                });
            });
        });

        // Tabs
        let tab_action = egui::TopBottomPanel::top("tabs")
            .show(ctx, |ui| {
                toolbar::show(ui, &self.workspace.views, self.workspace.active)
            })
            .inner;
        match tab_action {
            toolbar::TabAction::Activate(idx) => self.activate(idx),
            toolbar::TabAction::Close(idx) => self.close_tab(idx),
            toolbar::TabAction::None => {}
        }

        // Settings window
        let mut show_settings = self.show_settings;
        if let Some(updated) = settings::show(
            ctx,
            &mut show_settings,
            self.session.settings(),
            self.session.device(),
        ) {
            if let Err(e) = self
                .session
                .update_settings(&mut self.settings_store, updated)
            {
                log::error!("Failed to save settings: {:#}", e);
                self.workspace.notice("Failed to save settings");
            }
        }
        self.show_settings = show_settings;

        // Main canvas (center)
        let canvas_action = egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let active = self.workspace.active;
                match active.and_then(|idx| self.workspace.views.get_mut(idx)) {
                    Some(view) => Some((view.path().to_path_buf(), canvas::show(ui, view))),
                    None => {
                        ui.centered_and_justified(|ui| {
                            ui.label(
                                egui::RichText::new("File → Open Canvas... to begin")
                                    .color(egui::Color32::from_gray(150)),
                            );
                        });
                        None
                    }
                }
            })
            .inner;

        if let Some((path, CanvasAction::AddCard(x, y))) = canvas_action {
            if let Err(e) = self.add_card(&path, x, y) {
                log::error!("Failed to add card: {:#}", e);
                self.workspace.notice("Could not add card");
            }
        }

        self.tick(ctx);
        self.workspace.notices.show(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.session.teardown();
    }
}
