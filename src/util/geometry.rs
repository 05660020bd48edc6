// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the coordinate transformations between canvas
//! coordinates and screen coordinates for a camera centred on `(tx, ty)`
//! with a logarithmic zoom level (`scale = 2^zoom`).

use crate::models::viewport::ViewportRecord;

/// Lowest zoom level a canvas camera accepts.
pub const MIN_ZOOM: f64 = -4.0;

/// Highest zoom level a canvas camera accepts.
pub const MAX_ZOOM: f64 = 1.0;

/// Linear scale factor for a zoom level.
pub fn zoom_scale(zoom: f64) -> f64 {
    zoom.exp2()
}

pub fn clamp_zoom(zoom: f64) -> f64 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Convert canvas coordinates to screen coordinates.
///
/// `viewport_center` is the screen position of the middle of the view.
pub fn canvas_to_screen(
    camera: &ViewportRecord,
    viewport_center: (f64, f64),
    x: f64,
    y: f64,
) -> (f64, f64) {
    let scale = zoom_scale(camera.zoom);
    (
        (x - camera.tx) * scale + viewport_center.0,
        (y - camera.ty) * scale + viewport_center.1,
    )
}

/// Convert screen coordinates to canvas coordinates.
pub fn screen_to_canvas(
    camera: &ViewportRecord,
    viewport_center: (f64, f64),
    x: f64,
    y: f64,
) -> (f64, f64) {
    let scale = zoom_scale(camera.zoom);
    (
        (x - viewport_center.0) / scale + camera.tx,
        (y - viewport_center.1) / scale + camera.ty,
    )
}

/// Camera after zooming by `delta` while keeping the canvas point under
/// `anchor` (screen coordinates) fixed.
pub fn zoom_about(
    camera: &ViewportRecord,
    viewport_center: (f64, f64),
    anchor: (f64, f64),
    delta: f64,
) -> ViewportRecord {
    let zoom = clamp_zoom(camera.zoom + delta);
    let (ax, ay) = screen_to_canvas(camera, viewport_center, anchor.0, anchor.1);
    let scale = zoom_scale(zoom);
    ViewportRecord {
        tx: ax - (anchor.0 - viewport_center.0) / scale,
        ty: ay - (anchor.1 - viewport_center.1) / scale,
        zoom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_canvas_screen_roundtrip() {
        let camera = ViewportRecord::new(120.0, -40.0, 0.5);
        let center = (640.0, 360.0);

        let (sx, sy) = canvas_to_screen(&camera, center, 300.0, 75.0);
        let (cx, cy) = screen_to_canvas(&camera, center, sx, sy);

        assert_relative_eq!(cx, 300.0, epsilon = 1e-9);
        assert_relative_eq!(cy, 75.0, epsilon = 1e-9);
    }

    #[test]
    fn test_camera_centre_maps_to_viewport_centre() {
        let camera = ViewportRecord::new(10.0, 20.0, -1.0);
        let (sx, sy) = canvas_to_screen(&camera, (400.0, 300.0), 10.0, 20.0);
        assert_eq!((sx, sy), (400.0, 300.0));
    }

    #[test]
    fn test_zoom_about_keeps_anchor_fixed() {
        let camera = ViewportRecord::new(0.0, 0.0, 0.0);
        let center = (400.0, 300.0);
        let anchor = (500.0, 350.0);
        let before = screen_to_canvas(&camera, center, anchor.0, anchor.1);

        let zoomed = zoom_about(&camera, center, anchor, 0.5);
        let after = screen_to_canvas(&zoomed, center, anchor.0, anchor.1);

        assert_relative_eq!(zoomed.zoom, 0.5);
        assert_relative_eq!(before.0, after.0, epsilon = 1e-9);
        assert_relative_eq!(before.1, after.1, epsilon = 1e-9);
    }

    #[test]
    fn test_zoom_is_clamped() {
        assert_eq!(clamp_zoom(3.0), MAX_ZOOM);
        assert_eq!(clamp_zoom(-9.0), MIN_ZOOM);
        assert_relative_eq!(zoom_scale(1.0), 2.0);
    }
}
