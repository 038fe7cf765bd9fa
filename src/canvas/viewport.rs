// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{Point, Vector};

pub const MIN_ZOOM: f64 = 0.25;
pub const MAX_ZOOM: f64 = 2.0;
pub const ZOOM_STEP: f64 = 1.1;

/// Pan/zoom transform between screen space and diagram-local space.
///
/// `origin` is the screen position of the surface's top-left corner; it is passed per call because
/// the surface can move (terminal resize) without the viewport changing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pan: Vector,
    zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    pub const fn new() -> Self {
        Self {
            pan: Vector::ZERO,
            zoom: 1.0,
        }
    }

    pub fn pan(&self) -> Vector {
        self.pan
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn screen_to_local(&self, screen: Point, origin: Point) -> Point {
        Point::new(
            (screen.x - origin.x - self.pan.x) / self.zoom,
            (screen.y - origin.y - self.pan.y) / self.zoom,
        )
    }

    pub fn local_to_screen(&self, local: Point, origin: Point) -> Point {
        Point::new(
            local.x * self.zoom + self.pan.x + origin.x,
            local.y * self.zoom + self.pan.y + origin.y,
        )
    }

    /// Converts a screen-space displacement into a local-space one.
    pub fn screen_delta_to_local(&self, delta: Vector) -> Vector {
        delta / self.zoom
    }

    pub fn pan_by(&mut self, delta: Vector) {
        self.pan += delta;
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_zoom(zoom);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / ZOOM_STEP);
    }

    /// Zooms by `factor` while keeping the local point under `screen` fixed on screen.
    pub fn zoom_about(&mut self, screen: Point, origin: Point, factor: f64) {
        let anchor = self.screen_to_local(screen, origin);
        self.set_zoom(self.zoom * factor);
        let moved = self.local_to_screen(anchor, origin);
        self.pan += screen - moved;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return 1.0;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Viewport, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
    use crate::model::{Point, Vector};

    fn assert_close(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn screen_to_local_applies_origin_pan_and_zoom() {
        let mut viewport = Viewport::new();
        viewport.pan_by(Vector::new(20.0, -10.0));
        viewport.set_zoom(2.0);

        let local = viewport.screen_to_local(Point::new(130.0, 90.0), Point::new(10.0, 0.0));
        assert_close(local, Point::new(50.0, 50.0));
    }

    #[rstest]
    #[case(0.25, Vector::new(0.0, 0.0))]
    #[case(1.0, Vector::new(-33.5, 12.25))]
    #[case(1.7, Vector::new(400.0, -250.0))]
    #[case(2.0, Vector::new(1.0, 1.0))]
    fn local_round_trips_through_screen(#[case] zoom: f64, #[case] pan: Vector) {
        let mut viewport = Viewport::new();
        viewport.set_zoom(zoom);
        viewport.pan_by(pan);
        let origin = Point::new(7.0, 3.0);

        for local in [
            Point::new(0.0, 0.0),
            Point::new(123.4, -56.7),
            Point::new(-1000.0, 999.0),
        ] {
            let screen = viewport.local_to_screen(local, origin);
            assert_close(viewport.screen_to_local(screen, origin), local);
        }
    }

    #[test]
    fn zoom_stays_clamped_under_repeated_steps() {
        let mut viewport = Viewport::new();
        for _ in 0..100 {
            viewport.zoom_in();
            assert!(viewport.zoom() <= MAX_ZOOM);
        }
        assert_eq!(viewport.zoom(), MAX_ZOOM);

        for _ in 0..100 {
            viewport.zoom_out();
            assert!(viewport.zoom() >= MIN_ZOOM);
        }
        assert_eq!(viewport.zoom(), MIN_ZOOM);
    }

    #[test]
    fn single_zoom_step_multiplies_by_factor() {
        let mut viewport = Viewport::new();
        viewport.zoom_in();
        assert!((viewport.zoom() - ZOOM_STEP).abs() < 1e-12);
    }

    #[test]
    fn zoom_about_keeps_pointer_anchored() {
        let mut viewport = Viewport::new();
        let origin = Point::new(0.0, 0.0);
        let pointer = Point::new(240.0, 160.0);
        let before = viewport.screen_to_local(pointer, origin);

        viewport.zoom_about(pointer, origin, ZOOM_STEP);

        assert_close(viewport.screen_to_local(pointer, origin), before);
    }

    #[test]
    fn reset_restores_identity() {
        let mut viewport = Viewport::new();
        viewport.pan_by(Vector::new(5.0, 5.0));
        viewport.zoom_out();
        viewport.reset();
        assert_eq!(viewport, Viewport::new());
    }
}
