//! Spotlight mask shapes and their SVG cutout paths.
//!
//! The mask is a backdrop covering the whole canvas with a hole punched
//! over the highlighted target. Both the backdrop and the hole are
//! expressed as subpaths of a single path drawn with the `evenodd` fill
//! rule, so one draw call paints the backdrop with its cutout and no
//! second compositing pass is needed.

use serde::{Deserialize, Serialize};
use svg::node::element as svg_element;

use crate::{color::Color, geometry::Rect};

/// The shape of the spotlight cutout over a step's target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskShape {
    /// Exact bounding box of the target.
    Rectangle,
    /// Bounding box with rounded corners. The corner radius is clamped so
    /// opposing corners never overlap.
    #[default]
    RoundedRectangle,
    /// A circle centered on the target. The diameter equals the target's
    /// smaller dimension, so a round control is always fully enclosed on
    /// its shorter axis; the longer axis may be clipped, matching
    /// spotlight semantics.
    Circle,
}

/// A computed mask: one even-odd path covering `canvas` with a cutout
/// over the target.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskPath {
    shape: MaskShape,
    data: String,
}

impl MaskPath {
    /// The shape the cutout was generated from.
    pub fn shape(&self) -> MaskShape {
        self.shape
    }

    /// The raw SVG path data (`d` attribute).
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Renders the mask as a filled SVG path element.
    pub fn to_svg(&self, backdrop: &Color) -> svg_element::Path {
        svg_element::Path::new()
            .set("d", self.data.clone())
            .set("fill", backdrop)
            .set("fill-rule", "evenodd")
            .set("stroke", "none")
    }
}

/// Clamps a requested corner radius so that opposing corners of a
/// `width` x `height` rectangle never overlap, which would otherwise
/// produce a self-intersecting or degenerate path.
pub fn clamp_corner_radius(requested: f32, width: f32, height: f32) -> f32 {
    requested.min(width / 2.0).min(height / 2.0).max(0.0)
}

/// Computes the even-odd cutout path for `shape` over `target`, with the
/// backdrop covering all of `canvas`.
///
/// `corner_radius` only affects [`MaskShape::RoundedRectangle`].
pub fn mask_path(shape: MaskShape, target: Rect, canvas: Rect, corner_radius: f32) -> MaskPath {
    let mut data = rect_subpath(canvas);
    data.push(' ');
    let cutout = match shape {
        MaskShape::Rectangle => rect_subpath(target),
        MaskShape::RoundedRectangle => {
            let radius = clamp_corner_radius(corner_radius, target.width(), target.height());
            rounded_rect_subpath(target, radius)
        }
        MaskShape::Circle => {
            let center = target.center();
            let radius = target.size().min_dimension() / 2.0;
            circle_subpath(center.x(), center.y(), radius)
        }
    };
    data.push_str(&cutout);

    MaskPath { shape, data }
}

fn rect_subpath(rect: Rect) -> String {
    format!(
        "M {} {} L {} {} L {} {} L {} {} Z",
        rect.x(),
        rect.y(), // top-left
        rect.right(),
        rect.y(), // top-right
        rect.right(),
        rect.bottom(), // bottom-right
        rect.x(),
        rect.bottom() // bottom-left
    )
}

fn rounded_rect_subpath(rect: Rect, radius: f32) -> String {
    let (x, y) = (rect.x(), rect.y());
    let (right, bottom) = (rect.right(), rect.bottom());

    // Clockwise from the top-left corner, one arc per corner.
    format!(
        "M {} {} L {} {} A {r} {r} 0 0 1 {} {} L {} {} A {r} {r} 0 0 1 {} {} \
         L {} {} A {r} {r} 0 0 1 {} {} L {} {} A {r} {r} 0 0 1 {} {} Z",
        x + radius,
        y,
        right - radius,
        y,
        right,
        y + radius,
        right,
        bottom - radius,
        right - radius,
        bottom,
        x + radius,
        bottom,
        x,
        bottom - radius,
        x,
        y + radius,
        x + radius,
        y,
        r = radius
    )
}

fn circle_subpath(cx: f32, cy: f32, radius: f32) -> String {
    // A full circle as two half-circle arcs; a single 360-degree arc
    // command is degenerate in SVG.
    format!(
        "M {} {} A {r} {r} 0 1 0 {} {} A {r} {r} 0 1 0 {} {} Z",
        cx - radius,
        cy,
        cx + radius,
        cy,
        cx - radius,
        cy,
        r = radius
    )
}
