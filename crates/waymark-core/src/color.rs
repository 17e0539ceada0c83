//! Color handling for the spotlight backdrop.

use std::{
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::DynamicColor;

/// Wrapper around the `DynamicColor` type from the color crate.
///
/// Parses CSS color strings such as `"#0008"`, `"rgba(0, 0, 0, 0.4)"` or
/// `"black"`, and renders back to a CSS string for the SVG attributes the
/// mask layer is drawn with.
#[derive(Clone, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a CSS color string.
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Color { color }),
            Err(err) => Err(format!("Invalid color '{color_str}': {err}")),
        }
    }
}

impl Default for Color {
    /// The default backdrop: black at roughly 40% opacity.
    fn default() -> Self {
        Self::new("rgba(0, 0, 0, 0.4)").unwrap()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        svg::node::Value::from(color.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_named_color() {
        let color = Color::new("black").unwrap();
        assert!(!color.to_string().is_empty());
    }

    #[test]
    fn test_parses_rgba() {
        assert!(Color::new("rgba(0, 0, 0, 0.4)").is_ok());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(Color::new("not-a-color").is_err());
    }

    #[test]
    fn test_default_is_translucent_black() {
        // Round-trips through the parser, so it must at least be valid.
        let color = Color::default();
        assert!(Color::new(&color.to_string()).is_ok());
    }
}
