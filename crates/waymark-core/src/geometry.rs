//! Geometric value types used throughout the tour engine.
//!
//! All coordinates are in viewport space: the origin is the top-left
//! corner of the viewport, `x` grows rightward and `y` grows downward.

use serde::{Deserialize, Serialize};

/// A point in viewport coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point.
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point.
    pub fn y(self) -> f32 {
        self.y
    }

    /// Checks if both coordinates are zero.
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Moves the point by the given offsets, returning a new point.
    pub fn translate(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// The dimensions of an element or of the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size.
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size.
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns true if either dimension is zero.
    ///
    /// A zero-sized measurement means the underlying element has not yet
    /// completed its layout pass.
    pub fn is_zero(self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Returns the smaller of the two dimensions.
    pub fn min_dimension(self) -> f32 {
        self.width.min(self.height)
    }
}

/// An axis-aligned rectangle in viewport coordinates.
///
/// Used for measured step targets, the viewport itself, and mask bounds.
/// Immutable value type; all transformations return a new rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Rect {
    /// Creates a new rectangle from its top-left corner and dimensions.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle covering `size` with its top-left corner at the
    /// origin. Used for viewport rectangles.
    pub fn from_size(size: Size) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: size.width(),
            height: size.height(),
        }
    }

    /// Returns the x-coordinate of the left edge.
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the top edge.
    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns the width of the rectangle.
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height of the rectangle.
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns the x-coordinate of the right edge.
    pub fn right(self) -> f32 {
        self.x + self.width
    }

    /// Returns the y-coordinate of the bottom edge.
    pub fn bottom(self) -> f32 {
        self.y + self.height
    }

    /// Returns the center point of the rectangle.
    pub fn center(self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Returns the dimensions of the rectangle.
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns true if either dimension is zero.
    pub fn is_zero_sized(self) -> bool {
        self.size().is_zero()
    }

    /// Returns true if `point` lies inside the rectangle (edges included).
    pub fn contains(self, point: Point) -> bool {
        point.x() >= self.x
            && point.x() <= self.right()
            && point.y() >= self.y
            && point.y() <= self.bottom()
    }

    /// Returns true if `other` lies entirely inside this rectangle.
    pub fn contains_rect(self, other: Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Moves the rectangle by the given offsets.
    pub fn translate(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Grows the rectangle outward by `padding` on every side.
    ///
    /// A negative padding shrinks the rectangle; dimensions are floored at
    /// zero so a large negative padding cannot invert the rectangle.
    pub fn inflate(self, padding: f32) -> Self {
        Self {
            x: self.x - padding,
            y: self.y - padding,
            width: (self.width + padding * 2.0).max(0.0),
            height: (self.height + padding * 2.0).max(0.0),
        }
    }

    /// Grows the rectangle by per-side insets.
    pub fn inflate_insets(self, insets: Insets) -> Self {
        Self {
            x: self.x - insets.left(),
            y: self.y - insets.top(),
            width: (self.width + insets.horizontal_sum()).max(0.0),
            height: (self.height + insets.vertical_sum()).max(0.0),
        }
    }
}

/// Spacing around an element with potentially different values per side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    /// Creates new insets with specified values for each side.
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates uniform insets with the same value for all sides.
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Returns the top inset value.
    pub fn top(self) -> f32 {
        self.top
    }

    /// Returns the right inset value.
    pub fn right(self) -> f32 {
        self.right
    }

    /// Returns the bottom inset value.
    pub fn bottom(self) -> f32 {
        self.bottom
    }

    /// Returns the left inset value.
    pub fn left(self) -> f32 {
        self.left
    }

    /// Returns the sum of left and right insets.
    pub fn horizontal_sum(self) -> f32 {
        self.left + self.right
    }

    /// Returns the sum of top and bottom insets.
    pub fn vertical_sum(self) -> f32 {
        self.top + self.bottom
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_new_and_accessors() {
        let point = Point::new(3.5, 4.2);
        assert_approx_eq!(f32, point.x(), 3.5);
        assert_approx_eq!(f32, point.y(), 4.2);
    }

    #[test]
    fn test_point_is_zero() {
        assert!(Point::default().is_zero());
        assert!(!Point::new(1.0, 0.0).is_zero());
        assert!(!Point::new(0.0, 1.0).is_zero());
    }

    #[test]
    fn test_point_translate() {
        let point = Point::new(2.0, 3.0).translate(1.5, -1.0);
        assert_approx_eq!(f32, point.x(), 3.5);
        assert_approx_eq!(f32, point.y(), 2.0);
    }

    #[test]
    fn test_size_is_zero() {
        assert!(Size::default().is_zero());
        assert!(Size::new(10.0, 0.0).is_zero());
        assert!(Size::new(0.0, 10.0).is_zero());
        assert!(!Size::new(1.0, 1.0).is_zero());
    }

    #[test]
    fn test_size_min_dimension() {
        assert_approx_eq!(f32, Size::new(30.0, 20.0).min_dimension(), 20.0);
        assert_approx_eq!(f32, Size::new(5.0, 20.0).min_dimension(), 5.0);
    }

    #[test]
    fn test_rect_edges_and_center() {
        let rect = Rect::new(10.0, 20.0, 40.0, 60.0);
        assert_approx_eq!(f32, rect.right(), 50.0);
        assert_approx_eq!(f32, rect.bottom(), 80.0);
        assert_approx_eq!(f32, rect.center().x(), 30.0);
        assert_approx_eq!(f32, rect.center().y(), 50.0);
    }

    #[test]
    fn test_rect_from_size() {
        let rect = Rect::from_size(Size::new(400.0, 800.0));
        assert_approx_eq!(f32, rect.x(), 0.0);
        assert_approx_eq!(f32, rect.y(), 0.0);
        assert_approx_eq!(f32, rect.width(), 400.0);
        assert_approx_eq!(f32, rect.height(), 800.0);
    }

    #[test]
    fn test_rect_contains_point() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(rect.contains(Point::new(30.0, 30.0)));
        assert!(rect.contains(Point::new(20.0, 15.0)));
        assert!(!rect.contains(Point::new(9.9, 15.0)));
        assert!(!rect.contains(Point::new(20.0, 30.1)));
    }

    #[test]
    fn test_rect_contains_rect() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains_rect(Rect::new(10.0, 10.0, 20.0, 20.0)));
        assert!(outer.contains_rect(outer));
        assert!(!outer.contains_rect(Rect::new(90.0, 90.0, 20.0, 20.0)));
    }

    #[test]
    fn test_rect_translate() {
        let rect = Rect::new(1.0, 2.0, 4.0, 4.0).translate(3.0, -1.0);
        assert_approx_eq!(f32, rect.x(), 4.0);
        assert_approx_eq!(f32, rect.y(), 1.0);
        assert_approx_eq!(f32, rect.width(), 4.0);
    }

    #[test]
    fn test_rect_inflate() {
        let rect = Rect::new(10.0, 10.0, 20.0, 30.0).inflate(5.0);
        assert_approx_eq!(f32, rect.x(), 5.0);
        assert_approx_eq!(f32, rect.y(), 5.0);
        assert_approx_eq!(f32, rect.width(), 30.0);
        assert_approx_eq!(f32, rect.height(), 40.0);
    }

    #[test]
    fn test_rect_inflate_never_inverts() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0).inflate(-20.0);
        assert_approx_eq!(f32, rect.width(), 0.0);
        assert_approx_eq!(f32, rect.height(), 0.0);
    }

    #[test]
    fn test_rect_inflate_insets() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0).inflate_insets(Insets::new(
            1.0, 2.0, 3.0, 4.0,
        ));
        assert_approx_eq!(f32, rect.x(), 6.0); // 10 - 4 (left)
        assert_approx_eq!(f32, rect.y(), 9.0); // 10 - 1 (top)
        assert_approx_eq!(f32, rect.width(), 26.0); // 20 + 2 + 4
        assert_approx_eq!(f32, rect.height(), 24.0); // 20 + 1 + 3
    }

    #[test]
    fn test_insets_sums() {
        let insets = Insets::new(1.0, 2.0, 3.0, 4.0);
        assert_approx_eq!(f32, insets.horizontal_sum(), 6.0);
        assert_approx_eq!(f32, insets.vertical_sum(), 4.0);
    }

    #[test]
    fn test_insets_uniform() {
        let insets = Insets::uniform(5.0);
        assert_approx_eq!(f32, insets.top(), 5.0);
        assert_approx_eq!(f32, insets.right(), 5.0);
        assert_approx_eq!(f32, insets.bottom(), 5.0);
        assert_approx_eq!(f32, insets.left(), 5.0);
    }
}
