//! Pure placement math: tooltip anchor box, arrow box, and step-number
//! badge position for a highlighted target.
//!
//! Everything here is deterministic and side-effect free; given the same
//! target, viewport, margin and arrow size, the same placement comes out.
//! This is the natural unit-test surface of the engine.

use serde::Serialize;

use waymark_core::geometry::{Point, Rect};

/// Radius of the step-number badge.
pub const BADGE_RADIUS: f32 = 14.0;

/// Diameter of the step-number badge.
pub const BADGE_DIAMETER: f32 = BADGE_RADIUS * 2.0;

/// Which side of the target the tooltip is placed on.
///
/// The tooltip goes to the side with more available space: a target in
/// the upper half of the viewport gets its tooltip below, and vice
/// versa. An exact-middle tie favors `Top`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalSide {
    Top,
    Bottom,
}

/// Which horizontal edge of the tooltip is pinned.
///
/// `Left` pins the tooltip's right edge (a `right` offset from the
/// viewport's right side); `Right` pins the tooltip's left edge. The
/// decision is independent of the vertical side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAnchor {
    Left,
    Right,
}

/// Offsets anchoring the tooltip inside the viewport.
///
/// Exactly one of `top`/`bottom` and one of `left`/`right` is set,
/// matching the chosen [`VerticalSide`] and [`HorizontalAnchor`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TooltipBox {
    pub top: Option<f32>,
    pub bottom: Option<f32>,
    pub left: Option<f32>,
    pub right: Option<f32>,
    /// Upper bound on the tooltip's width so it never requests more
    /// horizontal space than the viewport allows.
    pub max_width: f32,
}

/// Offsets anchoring the tooltip arrow.
///
/// The arrow sits between the target and the tooltip, offset from the
/// tooltip's target-facing edge by twice the arrow size, and inherits
/// the tooltip's horizontal anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ArrowBox {
    pub top: Option<f32>,
    pub bottom: Option<f32>,
    pub left: Option<f32>,
    pub right: Option<f32>,
    pub size: f32,
}

/// Top-left position of the step-number badge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BadgeBox {
    pub x: f32,
    pub y: f32,
    pub diameter: f32,
}

/// The complete computed placement for one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    vertical: VerticalSide,
    horizontal: HorizontalAnchor,
    tooltip: TooltipBox,
    arrow: Option<ArrowBox>,
    badge: BadgeBox,
}

impl Placement {
    /// The side of the target the tooltip was placed on.
    pub fn vertical(&self) -> VerticalSide {
        self.vertical
    }

    /// The pinned horizontal edge.
    pub fn horizontal(&self) -> HorizontalAnchor {
        self.horizontal
    }

    /// The tooltip anchor box.
    pub fn tooltip(&self) -> TooltipBox {
        self.tooltip
    }

    /// The arrow box, or `None` when the arrow is disabled
    /// (`arrow_size == 0`).
    pub fn arrow(&self) -> Option<ArrowBox> {
        self.arrow
    }

    /// The step-number badge position.
    pub fn badge(&self) -> BadgeBox {
        self.badge
    }
}

/// Computes tooltip, arrow and badge placement for `target` within
/// `viewport`.
///
/// `target` is the already-padded highlight rectangle; `viewport` is the
/// full viewport rectangle (origin at zero). `margin` separates the
/// tooltip from the target, and `arrow_size == 0` disables the arrow.
pub fn tooltip_placement(
    target: Rect,
    viewport: Rect,
    margin: f32,
    arrow_size: f32,
) -> Placement {
    let center = target.center();

    let vertical = vertical_side(center, viewport);
    let horizontal = horizontal_anchor(center, viewport);

    let mut tooltip = TooltipBox::default();
    let mut arrow = ArrowBox {
        size: arrow_size,
        ..ArrowBox::default()
    };

    match vertical {
        VerticalSide::Bottom => {
            let top = target.bottom() + margin;
            tooltip.top = Some(top);
            arrow.top = Some(top - arrow_size * 2.0);
        }
        VerticalSide::Top => {
            let bottom = viewport.height() - target.y() + margin;
            tooltip.bottom = Some(bottom);
            arrow.bottom = Some(bottom - arrow_size * 2.0);
        }
    }

    match horizontal {
        HorizontalAnchor::Right => {
            // Pin the left edge near the target's left edge, floored at
            // the margin so the tooltip never touches the viewport edge.
            let left = target.x().max(margin);
            tooltip.left = Some(left);
            tooltip.max_width = viewport.width() - left - margin;
            arrow.left = Some(left + margin);
        }
        HorizontalAnchor::Left => {
            let right = (viewport.width() - target.right()).max(margin);
            tooltip.right = Some(right);
            tooltip.max_width = viewport.width() - right - margin;
            arrow.right = Some(right + margin);
        }
    }

    Placement {
        vertical,
        horizontal,
        tooltip,
        arrow: (arrow_size > 0.0).then_some(arrow),
        badge: badge_box(target, viewport),
    }
}

fn vertical_side(center: Point, viewport: Rect) -> VerticalSide {
    let to_top = center.y();
    let to_bottom = viewport.height() - center.y();
    if to_bottom > to_top {
        VerticalSide::Bottom
    } else {
        VerticalSide::Top
    }
}

fn horizontal_anchor(center: Point, viewport: Rect) -> HorizontalAnchor {
    let to_left = center.x();
    let to_right = viewport.width() - center.x();
    if to_right > to_left {
        HorizontalAnchor::Right
    } else {
        HorizontalAnchor::Left
    }
}

fn badge_box(target: Rect, viewport: Rect) -> BadgeBox {
    let mut x = target.x() - BADGE_RADIUS;
    if x < 0.0 {
        // Off the left edge: flip to the target's right edge instead.
        x = target.right() - BADGE_RADIUS;
    }
    x = x.min(viewport.width() - BADGE_DIAMETER);

    BadgeBox {
        x,
        y: target.y() - BADGE_RADIUS,
        diameter: BADGE_DIAMETER,
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    const MARGIN: f32 = 13.0;
    const ARROW: f32 = 6.0;

    fn viewport() -> Rect {
        Rect::new(0.0, 0.0, 400.0, 800.0)
    }

    fn place(target: Rect) -> Placement {
        tooltip_placement(target, viewport(), MARGIN, ARROW)
    }

    #[test]
    fn test_quadrant_top_left() {
        let placement = place(Rect::new(20.0, 20.0, 60.0, 60.0));
        assert_eq!(placement.vertical(), VerticalSide::Bottom);
        assert_eq!(placement.horizontal(), HorizontalAnchor::Right);

        let tooltip = placement.tooltip();
        assert_approx_eq!(f32, tooltip.top.unwrap(), 80.0 + MARGIN);
        assert_approx_eq!(f32, tooltip.left.unwrap(), 20.0);
        assert!(tooltip.bottom.is_none());
        assert!(tooltip.right.is_none());
        assert_approx_eq!(f32, tooltip.max_width, 400.0 - 20.0 - MARGIN);
    }

    #[test]
    fn test_quadrant_bottom_right() {
        let placement = place(Rect::new(320.0, 700.0, 60.0, 60.0));
        assert_eq!(placement.vertical(), VerticalSide::Top);
        assert_eq!(placement.horizontal(), HorizontalAnchor::Left);

        let tooltip = placement.tooltip();
        assert_approx_eq!(f32, tooltip.bottom.unwrap(), 800.0 - 700.0 + MARGIN);
        assert_approx_eq!(f32, tooltip.right.unwrap(), 20.0);
        assert_approx_eq!(f32, tooltip.max_width, 400.0 - 20.0 - MARGIN);
    }

    #[test]
    fn test_quadrant_top_right() {
        let placement = place(Rect::new(320.0, 20.0, 60.0, 60.0));
        assert_eq!(placement.vertical(), VerticalSide::Bottom);
        assert_eq!(placement.horizontal(), HorizontalAnchor::Left);
    }

    #[test]
    fn test_quadrant_bottom_left() {
        let placement = place(Rect::new(20.0, 700.0, 60.0, 60.0));
        assert_eq!(placement.vertical(), VerticalSide::Top);
        assert_eq!(placement.horizontal(), HorizontalAnchor::Right);
    }

    #[test]
    fn test_exact_middle_tie_favors_top() {
        // Center lands exactly on the viewport's vertical midpoint.
        let placement = place(Rect::new(170.0, 370.0, 60.0, 60.0));
        assert_eq!(placement.vertical(), VerticalSide::Top);
    }

    #[test]
    fn test_anchor_offset_floored_at_margin() {
        // Target flush against the left viewport edge.
        let placement = place(Rect::new(0.0, 100.0, 40.0, 40.0));
        assert_approx_eq!(f32, placement.tooltip().left.unwrap(), MARGIN);

        // Target flush against the right viewport edge.
        let placement = place(Rect::new(360.0, 100.0, 40.0, 40.0));
        assert_approx_eq!(f32, placement.tooltip().right.unwrap(), MARGIN);
    }

    #[test]
    fn test_max_width_positive_for_targets_inside_viewport() {
        let targets = [
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(390.0, 790.0, 10.0, 10.0),
            Rect::new(5.0, 750.0, 30.0, 30.0),
            Rect::new(180.0, 390.0, 40.0, 20.0),
            Rect::new(350.0, 10.0, 50.0, 50.0),
        ];
        for target in targets {
            assert!(viewport().contains_rect(target));
            let placement = place(target);
            assert!(
                placement.tooltip().max_width > 0.0,
                "max_width must stay positive for {target:?}"
            );
        }
    }

    #[test]
    fn test_arrow_inherits_anchor_and_offset() {
        let placement = place(Rect::new(20.0, 20.0, 60.0, 60.0));
        let arrow = placement.arrow().unwrap();
        let tooltip = placement.tooltip();
        assert_approx_eq!(f32, arrow.top.unwrap(), tooltip.top.unwrap() - ARROW * 2.0);
        assert_approx_eq!(f32, arrow.left.unwrap(), tooltip.left.unwrap() + MARGIN);
        assert!(arrow.right.is_none());
        assert!(arrow.bottom.is_none());
    }

    #[test]
    fn test_zero_arrow_size_disables_arrow() {
        let placement =
            tooltip_placement(Rect::new(20.0, 20.0, 60.0, 60.0), viewport(), MARGIN, 0.0);
        assert!(placement.arrow().is_none());
    }

    #[test]
    fn test_badge_tracks_target_top_left() {
        let placement = place(Rect::new(100.0, 200.0, 60.0, 60.0));
        let badge = placement.badge();
        assert_approx_eq!(f32, badge.x, 100.0 - BADGE_RADIUS);
        assert_approx_eq!(f32, badge.y, 200.0 - BADGE_RADIUS);
    }

    #[test]
    fn test_badge_flips_to_right_edge_when_off_screen() {
        let placement = place(Rect::new(5.0, 200.0, 60.0, 60.0));
        let badge = placement.badge();
        // 5 - 14 < 0, so the badge flips to the target's right edge.
        assert_approx_eq!(f32, badge.x, 65.0 - BADGE_RADIUS);
    }

    #[test]
    fn test_badge_clamped_to_viewport() {
        let placement = place(Rect::new(-10.0, 200.0, 420.0, 60.0));
        let badge = placement.badge();
        assert_approx_eq!(f32, badge.x, 400.0 - BADGE_DIAMETER);
        assert!(badge.x + badge.diameter <= 400.0);
    }
}
