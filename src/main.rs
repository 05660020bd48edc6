// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Canvas Viewports - a canvas host that remembers where you were looking.
//!
//! Opens canvas documents given on the command line or through the File
//! menu and saves/restores their camera per device.

use anyhow::Result;
use canvas_viewports::app::CanvasViewportsApp;
use std::path::PathBuf;

fn main() -> Result<()> {
    // Initialize logging; debug mode raises the max level at runtime
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .filter_module("canvas_viewports", log::LevelFilter::Debug)
        .parse_default_env()
        .init();

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Canvas Viewports"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Canvas Viewports",
        options,
        Box::new(|cc| Ok(Box::new(CanvasViewportsApp::new(cc, paths)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
