// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Canvas view: drawing, pan/zoom interaction and the live camera.
//!
//! A `CanvasView` is one open canvas document. It only counts as attached
//! once it has been laid out in a frame; until then it has no usable camera
//! and reports no zoom.

use crate::models::canvas::CanvasScene;
use crate::models::viewport::ViewportRecord;
use crate::session::applier::LiveCanvas;
use crate::util::geometry::{canvas_to_screen, clamp_zoom, screen_to_canvas, zoom_about, zoom_scale};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Zoom levels per scroll point.
const SCROLL_ZOOM_STEP: f64 = 1.0 / 200.0;

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    /// Double-click on empty space, in canvas coordinates.
    AddCard(f64, f64),
}

/// One open canvas document.
pub struct CanvasView {
    path: PathBuf,
    scene: CanvasScene,
    camera: ViewportRecord,
    attached: bool,
    viewport_changed: bool,
    frame_requested: bool,
}

impl CanvasView {
    /// Open the canvas at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("opening {}", path.display()))?;
        Ok(Self {
            scene: CanvasScene::parse(&text),
            path,
            camera: ViewportRecord::new(0.0, 0.0, 0.0),
            attached: false,
            viewport_changed: false,
            frame_requested: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn title(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn scene(&self) -> &CanvasScene {
        &self.scene
    }

    /// Re-read the document after it changed on disk. The camera stays.
    pub fn reload(&mut self) -> Result<()> {
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reloading {}", self.path.display()))?;
        self.scene = CanvasScene::parse(&text);
        Ok(())
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Camera as currently shown, attached or not.
    pub fn current_camera(&self) -> ViewportRecord {
        self.camera
    }

    /// True once after a viewport change was signalled.
    pub fn take_viewport_changed(&mut self) -> bool {
        std::mem::take(&mut self.viewport_changed)
    }

    /// True once after a redraw was requested.
    pub fn take_frame_request(&mut self) -> bool {
        std::mem::take(&mut self.frame_requested)
    }
}

impl LiveCanvas for CanvasView {
    fn zoom(&self) -> Option<f64> {
        self.attached.then_some(self.camera.zoom)
    }

    fn camera(&self) -> Option<ViewportRecord> {
        self.attached.then_some(self.camera)
    }

    fn zoom_by(&mut self, delta: f64) -> Result<()> {
        if !delta.is_finite() {
            anyhow::bail!("invalid zoom change {}", delta);
        }
        self.camera.zoom = clamp_zoom(self.camera.zoom + delta);
        Ok(())
    }

    fn pan_to(&mut self, tx: f64, ty: f64) -> Result<()> {
        if !tx.is_finite() || !ty.is_finite() {
            anyhow::bail!("invalid pan target ({}, {})", tx, ty);
        }
        self.camera.tx = tx;
        self.camera.ty = ty;
        Ok(())
    }

    fn mark_viewport_changed(&mut self) {
        self.viewport_changed = true;
    }

    fn request_frame(&mut self) {
        self.frame_requested = true;
    }
}

/// Display a canvas and handle pan, zoom and double-click.
pub fn show(ui: &mut egui::Ui, view: &mut CanvasView) -> CanvasAction {
    let mut action = CanvasAction::None;
    let (response, painter) =
        ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
    let rect = response.rect;
    let center = (f64::from(rect.center().x), f64::from(rect.center().y));

    painter.rect_filled(rect, 0.0, egui::Color32::from_gray(30));

    // Pan by dragging
    if response.dragged() {
        let delta = response.drag_delta();
        let scale = zoom_scale(view.camera.zoom);
        view.camera.tx -= f64::from(delta.x) / scale;
        view.camera.ty -= f64::from(delta.y) / scale;
    }

    // Zoom around the pointer
    if response.hovered() {
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll != 0.0 {
            if let Some(pointer) = response.hover_pos() {
                view.camera = zoom_about(
                    &view.camera,
                    center,
                    (f64::from(pointer.x), f64::from(pointer.y)),
                    f64::from(scroll) * SCROLL_ZOOM_STEP,
                );
            }
        }
    }

    if response.double_clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            let (x, y) = screen_to_canvas(&view.camera, center, f64::from(pos.x), f64::from(pos.y));
            let on_node = view
                .scene
                .nodes
                .iter()
                .any(|n| x >= n.x && x <= n.x + n.width && y >= n.y && y <= n.y + n.height);
            if !on_node {
                action = CanvasAction::AddCard(x, y);
            }
        }
    }

    draw_scene(&painter, view, center);

    // Status line
    painter.text(
        rect.left_bottom() + egui::vec2(8.0, -8.0),
        egui::Align2::LEFT_BOTTOM,
        format!(
            "x {:.0}  y {:.0}  zoom {:.2}",
            view.camera.tx, view.camera.ty, view.camera.zoom
        ),
        egui::FontId::monospace(12.0),
        egui::Color32::from_gray(150),
    );

    // Laid out at least once: the camera is now usable.
    view.attached = true;

    action
}

/// Draw edges, then nodes on top.
fn draw_scene(painter: &egui::Painter, view: &CanvasView, center: (f64, f64)) {
    let scale = zoom_scale(view.camera.zoom);
    let to_screen = |x: f64, y: f64| {
        let (sx, sy) = canvas_to_screen(&view.camera, center, x, y);
        egui::pos2(sx as f32, sy as f32)
    };

    for edge in &view.scene.edges {
        let (Some(from), Some(to)) = (view.scene.node(&edge.from_node), view.scene.node(&edge.to_node))
        else {
            continue;
        };
        let (fx, fy) = from.center();
        let (tx, ty) = to.center();
        painter.line_segment(
            [to_screen(fx, fy), to_screen(tx, ty)],
            egui::Stroke::new(2.0, egui::Color32::from_gray(120)),
        );
    }

    for node in &view.scene.nodes {
        let min = to_screen(node.x, node.y);
        let max = to_screen(node.x + node.width, node.y + node.height);
        let node_rect = egui::Rect::from_min_max(min, max);
        painter.rect(
            node_rect,
            6.0,
            egui::Color32::from_gray(50),
            egui::Stroke::new(1.5, egui::Color32::from_gray(160)),
        );

        let font_size = (14.0 * scale) as f32;
        if font_size >= 6.0 {
            painter.text(
                node_rect.center(),
                egui::Align2::CENTER_CENTER,
                node.label(),
                egui::FontId::proportional(font_size),
                egui::Color32::from_gray(220),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_with(text: &str) -> (tempfile::TempDir, CanvasView) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.canvas");
        std::fs::write(&path, text).unwrap();
        let view = CanvasView::open(&path).unwrap();
        (dir, view)
    }

    #[test]
    fn test_unattached_view_has_no_camera() {
        let (_dir, view) = view_with("{}");
        assert!(!view.is_attached());
        assert_eq!(view.zoom(), None);
        assert_eq!(view.camera(), None);
        assert_eq!(view.title(), "board");
    }

    #[test]
    fn test_camera_operations() {
        let (_dir, mut view) = view_with("{}");
        view.attached = true;
        view.zoom_by(-1.5).unwrap();
        view.pan_to(30.0, -10.0).unwrap();
        assert_eq!(view.camera(), Some(ViewportRecord::new(30.0, -10.0, -1.5)));
        assert!(view.pan_to(f64::NAN, 0.0).is_err());

        view.mark_viewport_changed();
        view.request_frame();
        assert!(view.take_viewport_changed());
        assert!(!view.take_viewport_changed());
        assert!(view.take_frame_request());
    }

    #[test]
    fn test_reload_keeps_camera() {
        let (_dir, mut view) = view_with("{}");
        view.attached = true;
        view.pan_to(5.0, 5.0).unwrap();
        std::fs::write(
            view.path(),
            r#"{"nodes":[{"id":"a","type":"text","text":"hi","x":0,"y":0,"width":10,"height":10}]}"#,
        )
        .unwrap();
        view.reload().unwrap();
        assert_eq!(view.scene().nodes.len(), 1);
        assert_eq!(view.current_camera().tx, 5.0);
    }
}
