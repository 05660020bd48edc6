// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Viewport persistence inside the canvas document.
//!
//! Each operation re-reads the full document right before touching it and
//! writes the whole document back, so it always starts from what is on
//! disk now. Overlapping calls are last-write-wins.

use crate::error::{Result, StoreError};
use crate::io::document::{CanvasDocument, DocumentHandle};
use crate::models::viewport::{ViewportKey, ViewportRecord};

/// Read the record stored under `key`.
///
/// Never fails: unreadable or malformed documents read as "nothing saved".
pub fn load<D: DocumentHandle + ?Sized>(doc: &D, key: &ViewportKey) -> Option<ViewportRecord> {
    match read_document(doc).and_then(|canvas| canvas.viewport(key.as_str())) {
        Ok(record) => {
            log::debug!(
                "Loaded viewport for {} from {}: {:?}",
                key,
                doc.path().display(),
                record
            );
            record
        }
        Err(e) => {
            log::debug!("No viewport loaded from {}: {}", doc.path().display(), e);
            None
        }
    }
}

/// Store `record` under `key`, replacing any previous entry.
///
/// On failure the document is left as it was.
pub fn save<D: DocumentHandle + ?Sized>(
    doc: &mut D,
    key: &ViewportKey,
    record: ViewportRecord,
) -> Result<()> {
    let mut canvas = read_document(doc)?;
    canvas.set_viewport(key.as_str(), record)?;
    let text = canvas.to_text()?;
    doc.write(&text).map_err(StoreError::Write)?;
    log::debug!(
        "Saved viewport for {} to {}: {:?}",
        key,
        doc.path().display(),
        record
    );
    Ok(())
}

/// Remove the record stored under `key`.
///
/// Returns `false` without writing anything when there is no such record.
pub fn delete<D: DocumentHandle + ?Sized>(doc: &mut D, key: &ViewportKey) -> Result<bool> {
    let mut canvas = read_document(doc)?;
    if !canvas.remove_viewport(key.as_str())? {
        log::debug!(
            "No viewport for {} in {}, nothing to delete",
            key,
            doc.path().display()
        );
        return Ok(false);
    }
    let text = canvas.to_text()?;
    doc.write(&text).map_err(StoreError::Write)?;
    log::debug!("Deleted viewport for {} from {}", key, doc.path().display());
    Ok(true)
}

fn read_document<D: DocumentHandle + ?Sized>(doc: &D) -> Result<CanvasDocument> {
    let text = doc.read().map_err(StoreError::Read)?;
    CanvasDocument::parse(&text)
}
