// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Scene-space geometry primitives.
//!
//! Layout output arrives in points with a bottom-left origin; the scene uses a top-left
//! origin. [`SceneTransform`] performs the vertical flip and the dpi rescale in one step.

/// Native dpi of the layout engine's coordinate space (points per inch).
pub const DOT_DEFAULT_DPI: f64 = 72.0;

/// Wing length of a synthesized arrowhead, in scene units.
pub const ARROW_WING_LENGTH: f64 = 15.0;

/// Half-angle between an arrowhead wing and the reversed end tangent, in radians.
pub const ARROW_HALF_ANGLE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn top_mid(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y)
    }

    pub fn bottom_mid(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height)
    }

    pub fn left_mid(&self) -> Point {
        Point::new(self.x, self.y + self.height / 2.0)
    }

    pub fn right_mid(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height / 2.0)
    }
}

/// One segment of an element's outline or an edge's routed path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSeg {
    MoveTo(Point),
    LineTo(Point),
    /// Cubic Bézier: two control points followed by the segment end point.
    CubicTo(Point, Point, Point),
}

/// Maps layout coordinates (points, bottom-left origin) into scene coordinates
/// (top-left origin, scaled by `requested_dpi / DOT_DEFAULT_DPI`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneTransform {
    scale: f64,
    top_y: f64,
}

impl SceneTransform {
    /// `top_y` is the layout bounding box's upper-right y coordinate, in points.
    pub fn new(scale: f64, top_y: f64) -> Self {
        Self { scale, top_y }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn to_scene(&self, p: Point) -> Point {
        Point::new(p.x * self.scale, (self.top_y - p.y) * self.scale)
    }

    /// Rescales a layout-space length without flipping.
    pub fn to_scene_length(&self, len: f64) -> f64 {
        len * self.scale
    }
}

/// Synthesizes the arrowhead polygon for a path ending at `tip`.
///
/// `reference` is the last point before `tip` along the path; the triangle opens
/// backwards along the `reference -> tip` tangent. A degenerate tangent (coincident
/// points) falls back to a leftward-opening head.
pub fn arrowhead(tip: Point, reference: Point) -> [Point; 4] {
    let dx = tip.x - reference.x;
    let dy = tip.y - reference.y;
    let back = if dx == 0.0 && dy == 0.0 {
        std::f64::consts::PI
    } else {
        dy.atan2(dx) + std::f64::consts::PI
    };

    let wing = |angle: f64| {
        Point::new(
            tip.x + ARROW_WING_LENGTH * angle.cos(),
            tip.y + ARROW_WING_LENGTH * angle.sin(),
        )
    };

    [
        tip,
        wing(back - ARROW_HALF_ANGLE),
        wing(back + ARROW_HALF_ANGLE),
        tip,
    ]
}
