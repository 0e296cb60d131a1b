//! Pure geometry utilities for the canvas.
//!
//! Containment tests and absolute⇄relative coordinate conversion. A node
//! bounded to a parent group stores its position relative to the group's
//! origin; everything here is a single addition or subtraction because
//! containment depth is capped at one level.

use serde::{Deserialize, Serialize};

/// A point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A measured width/height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.origin.x
            && p.x <= self.origin.x + self.size.width
            && p.y >= self.origin.y
            && p.y <= self.origin.y + self.size.height
    }
}

/// Convert a parent-relative position to an absolute one.
pub fn to_absolute(relative: Point, parent: Point) -> Point {
    Point::new(relative.x + parent.x, relative.y + parent.y)
}

/// Convert an absolute position to one relative to `parent`.
pub fn to_relative(absolute: Point, parent: Point) -> Point {
    Point::new(absolute.x - parent.x, absolute.y - parent.y)
}

/// The canvas viewport handed to/from the persistence collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

/// Screen→canvas mapping for the current pan/zoom state.
/// Used to turn the last-known pointer position into a paste anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTransform {
    /// Canvas-space translation of the viewport origin.
    pub offset: Point,
    pub zoom: f32,
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self {
            offset: Point::default(),
            zoom: 1.0,
        }
    }
}

impl CanvasTransform {
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.offset.x) / self.zoom,
            (screen.y - self.offset.y) / self.zoom,
        )
    }

    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point::new(
            canvas.x * self.zoom + self.offset.x,
            canvas.y * self.zoom + self.offset.y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_edges_inclusive() {
        let r = Rect::new(Point::new(10.0, 20.0), Size::new(100.0, 50.0));
        assert!(r.contains(Point::new(10.0, 20.0)));
        assert!(r.contains(Point::new(110.0, 70.0)));
        assert!(r.contains(Point::new(60.0, 45.0)));
        assert!(!r.contains(Point::new(9.9, 45.0)));
        assert!(!r.contains(Point::new(60.0, 70.1)));
    }

    #[test]
    fn relative_absolute_roundtrip() {
        let parent = Point::new(300.0, 120.0);
        let abs = Point::new(352.5, 180.25);
        let rel = to_relative(abs, parent);
        assert_eq!(rel, Point::new(52.5, 60.25));
        let back = to_absolute(rel, parent);
        assert!((back.x - abs.x).abs() < f32::EPSILON);
        assert!((back.y - abs.y).abs() < f32::EPSILON);
    }

    #[test]
    fn screen_to_canvas_respects_zoom_and_offset() {
        let t = CanvasTransform {
            offset: Point::new(100.0, 50.0),
            zoom: 2.0,
        };
        let canvas = t.screen_to_canvas(Point::new(300.0, 250.0));
        assert_eq!(canvas, Point::new(100.0, 100.0));
        let screen = t.canvas_to_screen(canvas);
        assert_eq!(screen, Point::new(300.0, 250.0));
    }
}
