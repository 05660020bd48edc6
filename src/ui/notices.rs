// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Transient notices shown in the corner of the window.

use std::time::{Duration, Instant};

/// How long a notice stays on screen.
const NOTICE_LIFETIME: Duration = Duration::from_secs(4);

#[derive(Debug, Default)]
pub struct Notices {
    items: Vec<(String, Instant)>,
}

impl Notices {
    pub fn push(&mut self, message: impl Into<String>) {
        self.items.push((message.into(), Instant::now() + NOTICE_LIFETIME));
    }

    /// Drop expired notices.
    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|(_, expires)| *expires > now);
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|(message, _)| message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Draw the notices, newest at the bottom.
    pub fn show(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        self.prune(now);
        if self.items.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("notices"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for message in self.messages() {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.label(message);
                    });
                }
            });

        if let Some(next) = self.items.iter().map(|(_, expires)| *expires).min() {
            ctx.request_repaint_after(next.saturating_duration_since(now));
        }
    }
}
