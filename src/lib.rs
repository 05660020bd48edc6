// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Canvas Viewports - per-device camera persistence for canvas documents.
//!
//! The pan position and zoom level of a canvas view are stored inside the
//! canvas file itself, under a `viewports` field keyed by device, so they
//! travel with whatever syncs the file. The camera is restored when a canvas
//! is genuinely opened, and left alone when the host merely reloads a canvas
//! after an edit.

pub mod app;
pub mod error;
pub mod io;
pub mod models;
pub mod session;
pub mod ui;
pub mod util;
