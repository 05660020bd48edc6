// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Open-event classification.
//!
//! Hosts signal "file became active" both when the user opens a canvas and
//! when an edit inside an open canvas (paste, delete) makes the host reload
//! it. Only the first kind should restore the saved camera; restoring on the
//! second would yank the view away from where the user is working.
//!
//! An activation is a genuine open iff the file is a canvas and its path was
//! not among the canvases open at the previous activation.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// File extension of canvas documents.
pub const CANVAS_EXTENSION: &str = "canvas";

/// A "file became active" notification from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationEvent {
    pub path: PathBuf,
    pub extension: String,
}

impl ActivationEvent {
    pub fn new(path: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            extension: extension.into(),
        }
    }

    /// Build an event taking the extension from the path.
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_string();
        Self { path, extension }
    }

    pub fn is_canvas(&self) -> bool {
        self.extension.eq_ignore_ascii_case(CANVAS_EXTENSION)
    }
}

/// Paths of the canvas views the host reports as open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenCanvasSet(BTreeSet<PathBuf>);

impl OpenCanvasSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.0.contains(path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.0.iter()
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for OpenCanvasSet {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Verdict for one activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub is_genuine_open: bool,
}

impl Classification {
    pub const GENUINE: Self = Self {
        is_genuine_open: true,
    };
    pub const SPURIOUS: Self = Self {
        is_genuine_open: false,
    };
}

/// Classify an activation against the canvases that were open before it.
pub fn classify(activated: Option<&ActivationEvent>, previous: &OpenCanvasSet) -> Classification {
    match activated {
        Some(event) if event.is_canvas() && !previous.contains(&event.path) => {
            Classification::GENUINE
        }
        _ => Classification::SPURIOUS,
    }
}

/// Remembers the open canvases between activations.
#[derive(Debug, Default)]
pub struct OpenCanvasTracker {
    remembered: OpenCanvasSet,
}

impl OpenCanvasTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `activated`, then replace the remembered set with `current`.
    ///
    /// `current` must be taken after the activation fired, so a canvas that
    /// was closed and reopened between two activations is not in it twice.
    /// The set is replaced whatever the verdict.
    pub fn observe(
        &mut self,
        activated: Option<&ActivationEvent>,
        current: OpenCanvasSet,
    ) -> Classification {
        let verdict = classify(activated, &self.remembered);
        log::debug!(
            "Activation {:?}: genuine={} (previously open: {}, now open: {})",
            activated.map(|e| e.path.display().to_string()),
            verdict.is_genuine_open,
            self.remembered.len(),
            current.len()
        );
        self.remembered = current;
        verdict
    }

    pub fn remembered(&self) -> &OpenCanvasSet {
        &self.remembered
    }

    /// Forget every open canvas.
    pub fn reset(&mut self) {
        self.remembered = OpenCanvasSet::new();
    }
}
