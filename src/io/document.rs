// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Canvas document access.
//!
//! `DocumentHandle` is raw text access to one canvas file. `CanvasDocument`
//! wraps the parsed JSON and exposes only the `viewports` mapping; every
//! other field is carried through untouched.

use crate::error::{Result, StoreError};
use crate::models::viewport::ViewportRecord;
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Top-level field holding the per-key viewport records.
pub const VIEWPORTS_FIELD: &str = "viewports";

/// Read/write access to the text of one canvas file.
pub trait DocumentHandle {
    /// Identifier of the document, used in log messages.
    fn path(&self) -> &Path;

    fn read(&self) -> std::io::Result<String>;

    /// Replace the whole document. Implementations must not leave a
    /// partially written file behind on failure.
    fn write(&mut self, text: &str) -> std::io::Result<()>;
}

/// A canvas file on disk.
#[derive(Debug, Clone)]
pub struct FileDocument {
    path: PathBuf,
}

impl FileDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentHandle for FileDocument {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> std::io::Result<String> {
        std::fs::read_to_string(&self.path)
    }

    fn write(&mut self, text: &str) -> std::io::Result<()> {
        write_atomic(&self.path, text)
    }
}

/// Write `text` to a temporary sibling file and rename it over `path`.
///
/// A symlinked `path` is resolved so the link survives, and the existing
/// file's permissions carry over to the replacement.
pub fn write_atomic(path: &Path, text: &str) -> std::io::Result<()> {
    let target = match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => std::fs::canonicalize(path)?,
        _ => path.to_path_buf(),
    };
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(text.as_bytes())?;
    tmp.flush()?;
    if let Ok(meta) = std::fs::metadata(&target) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(())
}

/// An in-memory document. Counts writes and can be told to reject them.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    path: PathBuf,
    text: String,
    writes: usize,
    fail_writes: bool,
}

impl MemoryDocument {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            writes: 0,
            fail_writes: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl DocumentHandle for MemoryDocument {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> std::io::Result<String> {
        Ok(self.text.clone())
    }

    fn write(&mut self, text: &str) -> std::io::Result<()> {
        if self.fail_writes {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "document is read-only",
            ));
        }
        self.text = text.to_string();
        self.writes += 1;
        Ok(())
    }
}

/// Serialize a value the way canvas files are laid out: tab indentation.
pub fn to_canvas_text<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Parsed canvas document.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasDocument {
    root: Map<String, Value>,
}

impl CanvasDocument {
    /// Parse document text. Blank text is an empty canvas.
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self { root: Map::new() });
        }
        match serde_json::from_str(text).map_err(StoreError::Parse)? {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(StoreError::NotAnObject),
        }
    }

    /// Serialize with tab indentation, field order preserved.
    pub fn to_text(&self) -> Result<String> {
        to_canvas_text(&self.root).map_err(StoreError::Serialize)
    }

    /// True when the document carries a `viewports` field at all.
    pub fn has_viewports(&self) -> bool {
        self.root.contains_key(VIEWPORTS_FIELD)
    }

    /// Keys that have a stored entry.
    pub fn viewport_keys(&self) -> Vec<String> {
        match self.root.get(VIEWPORTS_FIELD) {
            Some(Value::Object(map)) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// The record stored under `key`.
    ///
    /// An entry that is not a well-formed record reads as absent.
    pub fn viewport(&self, key: &str) -> Result<Option<ViewportRecord>> {
        let entry = match self.viewports()? {
            Some(map) => map.get(key),
            None => None,
        };
        let Some(entry) = entry else {
            return Ok(None);
        };
        match serde_json::from_value::<ViewportRecord>(entry.clone()) {
            Ok(record) if record.is_finite() => Ok(Some(record)),
            Ok(_) => {
                log::debug!("Ignoring non-finite viewport under {}", key);
                Ok(None)
            }
            Err(e) => {
                log::debug!("Ignoring malformed viewport under {}: {}", key, e);
                Ok(None)
            }
        }
    }

    /// Store `record` under `key`, replacing any previous entry whole.
    pub fn set_viewport(&mut self, key: &str, record: ViewportRecord) -> Result<()> {
        // JSON has no NaN or infinity; serde_json would write null.
        if !record.is_finite() {
            return Err(StoreError::NonFinite);
        }
        let value = serde_json::to_value(record).map_err(StoreError::Serialize)?;
        let entry = self
            .root
            .entry(VIEWPORTS_FIELD)
            .or_insert_with(|| Value::Object(Map::new()));
        match entry {
            Value::Object(map) => {
                map.insert(key.to_string(), value);
                Ok(())
            }
            _ => Err(StoreError::MalformedViewports),
        }
    }

    /// Remove the entry under `key`. Drops the `viewports` field once it is
    /// empty. Returns whether an entry was removed.
    pub fn remove_viewport(&mut self, key: &str) -> Result<bool> {
        let removed = match self.root.get_mut(VIEWPORTS_FIELD) {
            None => return Ok(false),
            Some(Value::Object(map)) => {
                let removed = map.shift_remove(key).is_some();
                if removed && map.is_empty() {
                    self.root.shift_remove(VIEWPORTS_FIELD);
                }
                removed
            }
            Some(_) => return Err(StoreError::MalformedViewports),
        };
        Ok(removed)
    }

    fn viewports(&self) -> Result<Option<&Map<String, Value>>> {
        match self.root.get(VIEWPORTS_FIELD) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(_) => Err(StoreError::MalformedViewports),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"nodes":[{"id":"a","x":0}],"edges":[],"custom":{"keep":true}}"#;

    #[test]
    fn test_blank_text_is_empty_canvas() {
        let doc = CanvasDocument::parse("  \n").unwrap();
        assert!(!doc.has_viewports());
        assert_eq!(doc.to_text().unwrap(), "{}");
    }

    #[test]
    fn test_rejects_non_object_root() {
        assert!(matches!(
            CanvasDocument::parse("[1, 2]"),
            Err(StoreError::NotAnObject)
        ));
        assert!(matches!(
            CanvasDocument::parse("{oops"),
            Err(StoreError::Parse(_))
        ));
    }

    #[test]
    fn test_unknown_fields_survive_set_and_remove() {
        let mut doc = CanvasDocument::parse(SAMPLE).unwrap();
        doc.set_viewport("global", ViewportRecord::new(1.0, 2.0, 0.5))
            .unwrap();
        let text = doc.to_text().unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["custom"]["keep"], Value::Bool(true));
        assert_eq!(value["nodes"][0]["id"], Value::String("a".to_string()));

        assert!(doc.remove_viewport("global").unwrap());
        assert_eq!(doc, CanvasDocument::parse(SAMPLE).unwrap());
    }

    #[test]
    fn test_field_order_is_preserved() {
        let mut doc = CanvasDocument::parse(SAMPLE).unwrap();
        doc.set_viewport("k", ViewportRecord::new(0.0, 0.0, 0.0)).unwrap();
        let text = doc.to_text().unwrap();
        let nodes = text.find("\"nodes\"").unwrap();
        let custom = text.find("\"custom\"").unwrap();
        let viewports = text.find("\"viewports\"").unwrap();
        assert!(nodes < custom && custom < viewports);
        assert!(text.contains("\n\t\"nodes\""));
    }

    #[test]
    fn test_malformed_entry_reads_as_absent() {
        let doc = CanvasDocument::parse(
            r#"{"viewports":{"bad":{"tx":"left","ty":0,"tZoom":0},"good":{"tx":1,"ty":2,"tZoom":3}}}"#,
        )
        .unwrap();
        assert_eq!(doc.viewport("bad").unwrap(), None);
        assert_eq!(
            doc.viewport("good").unwrap(),
            Some(ViewportRecord::new(1.0, 2.0, 3.0))
        );
        assert_eq!(doc.viewport_keys(), vec!["bad".to_string(), "good".to_string()]);
    }

    #[test]
    fn test_non_object_viewports_is_an_error() {
        let mut doc = CanvasDocument::parse(r#"{"viewports":[]}"#).unwrap();
        assert!(matches!(doc.viewport("k"), Err(StoreError::MalformedViewports)));
        assert!(matches!(
            doc.set_viewport("k", ViewportRecord::new(0.0, 0.0, 0.0)),
            Err(StoreError::MalformedViewports)
        ));
        assert!(matches!(
            doc.remove_viewport("k"),
            Err(StoreError::MalformedViewports)
        ));
    }

    #[test]
    fn test_memory_document_write_failure_keeps_text() {
        let mut doc = MemoryDocument::new("a.canvas", "{}");
        doc.set_fail_writes(true);
        assert!(doc.write("changed").is_err());
        assert_eq!(doc.text(), "{}");
        assert_eq!(doc.writes(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.canvas");
        std::fs::write(&path, "{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let mut doc = FileDocument::new(&path);
        crate::io::store::save(
            &mut doc,
            &crate::models::viewport::ViewportKey::Global,
            ViewportRecord::new(1.0, 2.0, 0.0),
        )
        .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_through_symlink_keeps_link() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real.canvas");
        let link = dir.path().join("link.canvas");
        std::fs::write(&real, "{}").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        write_atomic(&link, "{\"nodes\":[]}").unwrap();

        assert!(std::fs::symlink_metadata(&link)
            .unwrap()
            .file_type()
            .is_symlink());
        assert_eq!(std::fs::read_to_string(&real).unwrap(), "{\"nodes\":[]}");
    }

    #[test]
    fn test_file_document_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.canvas");
        std::fs::write(&path, "{}").unwrap();

        let mut doc = FileDocument::new(&path);
        doc.write("{\"nodes\":[]}").unwrap();
        assert_eq!(doc.read().unwrap(), "{\"nodes\":[]}");
        assert_eq!(doc.path(), path.as_path());
    }
}
