// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Camera application.
//!
//! Right after an activation the canvas view may not be attached yet, so
//! applying a record is a small state machine driven by the host's frame
//! loop: wait out a short deferral, check once for a usable canvas, then
//! zoom, pan and request a redraw. There is no retry loop; if the canvas is
//! still not ready after the deferral the apply is abandoned.

use crate::models::viewport::ViewportRecord;
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Minimal deferral before the first and only attempt.
pub const ATTACH_DEFERRAL: Duration = Duration::from_millis(16);

/// Camera operations of a live canvas view.
pub trait LiveCanvas {
    /// Current zoom level, or `None` while the view is not initialised.
    fn zoom(&self) -> Option<f64>;

    /// Current camera, or `None` while the view is not initialised.
    fn camera(&self) -> Option<ViewportRecord>;

    /// Change zoom by `delta` using the canvas's own zoom step.
    fn zoom_by(&mut self, delta: f64) -> Result<()>;

    /// Move the camera centre to an absolute position.
    fn pan_to(&mut self, tx: f64, ty: f64) -> Result<()>;

    fn mark_viewport_changed(&mut self);

    /// Ask for a redraw on the next frame.
    fn request_frame(&mut self);
}

/// Where an apply stands.
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyPhase {
    AwaitingCanvasAttach { ready_at: Instant },
    Applying,
    Done,
    /// The canvas never became usable.
    Abandoned,
    /// The canvas rejected a camera operation.
    Failed(String),
}

impl ApplyPhase {
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            ApplyPhase::Done | ApplyPhase::Abandoned | ApplyPhase::Failed(_)
        )
    }
}

/// A pending camera restore for one canvas.
#[derive(Debug, Clone)]
pub struct CameraApply {
    path: PathBuf,
    record: ViewportRecord,
    phase: ApplyPhase,
}

impl CameraApply {
    /// Schedule `record` for the canvas at `path`.
    pub fn schedule(path: impl Into<PathBuf>, record: ViewportRecord, now: Instant) -> Self {
        Self {
            path: path.into(),
            record,
            phase: ApplyPhase::AwaitingCanvasAttach {
                ready_at: now + ATTACH_DEFERRAL,
            },
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self) -> ViewportRecord {
        self.record
    }

    pub fn phase(&self) -> &ApplyPhase {
        &self.phase
    }

    /// Time until the next transition, if one is still pending.
    pub fn wake_in(&self, now: Instant) -> Option<Duration> {
        match self.phase {
            ApplyPhase::AwaitingCanvasAttach { ready_at } => {
                Some(ready_at.saturating_duration_since(now))
            }
            ApplyPhase::Applying => Some(Duration::ZERO),
            _ => None,
        }
    }

    /// Advance the state machine. `canvas` is the live view for `path`, if
    /// the host has one.
    pub fn poll(&mut self, now: Instant, canvas: Option<&mut dyn LiveCanvas>) -> &ApplyPhase {
        if let ApplyPhase::AwaitingCanvasAttach { ready_at } = self.phase {
            if now < ready_at {
                return &self.phase;
            }
            self.phase = ApplyPhase::Applying;
        }
        if self.phase != ApplyPhase::Applying {
            return &self.phase;
        }

        let Some(canvas) = canvas else {
            log::debug!("No live canvas for {}, abandoning restore", self.path.display());
            self.phase = ApplyPhase::Abandoned;
            return &self.phase;
        };
        let Some(current_zoom) = canvas.zoom() else {
            log::debug!(
                "Canvas {} not initialised, abandoning restore",
                self.path.display()
            );
            self.phase = ApplyPhase::Abandoned;
            return &self.phase;
        };

        self.phase = match apply_camera(canvas, current_zoom, self.record) {
            Ok(()) => {
                log::debug!("Applied {:?} to {}", self.record, self.path.display());
                ApplyPhase::Done
            }
            Err(e) => {
                log::error!("Failed to apply viewport to {}: {:#}", self.path.display(), e);
                ApplyPhase::Failed(format!("{:#}", e))
            }
        };
        &self.phase
    }
}

/// Zoom first: pan targets are in the space of the post-zoom transform.
fn apply_camera(
    canvas: &mut dyn LiveCanvas,
    current_zoom: f64,
    record: ViewportRecord,
) -> Result<()> {
    canvas.zoom_by(record.zoom - current_zoom)?;
    canvas.pan_to(record.tx, record.ty)?;
    canvas.mark_viewport_changed();
    canvas.request_frame();
    Ok(())
}
