// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Tab bar of open canvases.

use super::canvas::CanvasView;

/// Result of tab bar interaction.
pub enum TabAction {
    None,
    Activate(usize),
    Close(usize),
}

/// Display one tab per open canvas.
pub fn show(ui: &mut egui::Ui, views: &[CanvasView], active: Option<usize>) -> TabAction {
    let mut action = TabAction::None;
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 4.0;

        if views.is_empty() {
            ui.label(egui::RichText::new("No canvas open").italics().weak());
            return;
        }

        for (idx, view) in views.iter().enumerate() {
            let selected = active == Some(idx);
            if ui
                .selectable_label(selected, view.title())
                .on_hover_text(view.path().display().to_string())
                .clicked()
                && !selected
            {
                action = TabAction::Activate(idx);
            }
            if ui.small_button("✕").clicked() {
                action = TabAction::Close(idx);
            }
            ui.separator();
        }
    });
    action
}
