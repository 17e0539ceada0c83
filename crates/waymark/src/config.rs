//! Configuration types for the tour engine.
//!
//! This module provides the configuration structures that control mask
//! rendering, tooltip placement and transition timing. All types implement
//! [`serde::Deserialize`] for flexible loading from external sources.
//!
//! # Overview
//!
//! - [`TourConfig`] - Resolved engine configuration with defaults applied.
//! - [`TourConfigOverrides`] - Sparse overrides merged over a base config,
//!   preferring the override when both are set.
//! - [`AnimationSpec`] - Transition timing; purely visual interpolation
//!   data with no effect on the final computed geometry.
//!
//! Several options were renamed in an earlier release; the old names are
//! still accepted through `serde` aliases, and [`TourConfig::merged`]
//! implements the same prefer-the-new-name resolution for programmatic
//! overrides.

use serde::Deserialize;

use waymark_core::color::Color;

use crate::error::WaymarkError;

/// Engine-wide tour configuration.
///
/// Per-step attributes (`border_radius`, `highlight_padding`) override the
/// engine-wide values here when set on the step itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TourConfig {
    /// Mask fill, as a CSS color string.
    #[serde(alias = "overlay_color")]
    backdrop_color: String,

    /// Default corner radius for rounded-rectangle masks.
    border_radius: f32,

    /// Offset between the highlighted target and the tooltip.
    #[serde(alias = "tooltip_margin")]
    margin: f32,

    /// Size of the tooltip arrow; `0` disables the arrow.
    arrow_size: f32,

    /// Default inflation of the measured target rectangle.
    #[serde(alias = "mask_padding")]
    highlight_padding: f32,

    /// Engine-wide vertical shift applied to every measured rectangle,
    /// for hosts whose measurements exclude a status bar or similar.
    vertical_offset: f32,

    /// When true, a press on the backdrop stops the tour.
    stop_on_outside_click: bool,

    /// Settle delay after a scroll command returns, before measuring.
    /// The underlying layout system does not synchronously guarantee
    /// post-scroll measurements are ready.
    settle_delay_ms: u64,

    /// Transition timing forwarded to the renderer.
    #[serde(alias = "animation_config")]
    animation: AnimationSpec,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            backdrop_color: "rgba(0, 0, 0, 0.4)".to_owned(),
            border_radius: 4.0,
            margin: 13.0,
            arrow_size: 6.0,
            highlight_padding: 4.0,
            vertical_offset: 0.0,
            stop_on_outside_click: false,
            settle_delay_ms: 400,
            animation: AnimationSpec::default(),
        }
    }
}

impl TourConfig {
    /// Returns the parsed backdrop [`Color`].
    ///
    /// # Errors
    ///
    /// Returns [`WaymarkError::Config`] if the configured color string
    /// cannot be parsed.
    pub fn backdrop_color(&self) -> Result<Color, WaymarkError> {
        Color::new(&self.backdrop_color)
            .map_err(|err| WaymarkError::Config(format!("invalid backdrop color: {err}")))
    }

    /// Default corner radius for rounded-rectangle masks.
    pub fn border_radius(&self) -> f32 {
        self.border_radius
    }

    /// Tooltip offset from the highlighted target.
    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// Tooltip arrow size; `0` disables the arrow.
    pub fn arrow_size(&self) -> f32 {
        self.arrow_size
    }

    /// Default inflation of the measured target rectangle.
    pub fn highlight_padding(&self) -> f32 {
        self.highlight_padding
    }

    /// Engine-wide vertical shift applied to measured rectangles.
    pub fn vertical_offset(&self) -> f32 {
        self.vertical_offset
    }

    /// Whether pressing the backdrop stops the tour.
    pub fn stop_on_outside_click(&self) -> bool {
        self.stop_on_outside_click
    }

    /// Settle delay after scrolling, in milliseconds.
    pub fn settle_delay_ms(&self) -> u64 {
        self.settle_delay_ms
    }

    /// Transition timing for the renderer.
    pub fn animation(&self) -> AnimationSpec {
        self.animation
    }

    /// Merges sparse `overrides` over this configuration, preferring the
    /// override wherever one is set.
    pub fn merged(&self, overrides: &TourConfigOverrides) -> Self {
        Self {
            backdrop_color: overrides
                .backdrop_color
                .clone()
                .unwrap_or_else(|| self.backdrop_color.clone()),
            border_radius: overrides.border_radius.unwrap_or(self.border_radius),
            margin: overrides.margin.unwrap_or(self.margin),
            arrow_size: overrides.arrow_size.unwrap_or(self.arrow_size),
            highlight_padding: overrides
                .highlight_padding
                .unwrap_or(self.highlight_padding),
            vertical_offset: overrides.vertical_offset.unwrap_or(self.vertical_offset),
            stop_on_outside_click: overrides
                .stop_on_outside_click
                .unwrap_or(self.stop_on_outside_click),
            settle_delay_ms: overrides.settle_delay_ms.unwrap_or(self.settle_delay_ms),
            animation: overrides.animation.unwrap_or(self.animation),
        }
    }
}

/// Sparse configuration overrides.
///
/// Every field is optional; unset fields fall back to the base
/// [`TourConfig`] in [`TourConfig::merged`]. The same legacy aliases as
/// [`TourConfig`] are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TourConfigOverrides {
    #[serde(alias = "overlay_color")]
    pub backdrop_color: Option<String>,
    pub border_radius: Option<f32>,
    #[serde(alias = "tooltip_margin")]
    pub margin: Option<f32>,
    pub arrow_size: Option<f32>,
    #[serde(alias = "mask_padding")]
    pub highlight_padding: Option<f32>,
    pub vertical_offset: Option<f32>,
    pub stop_on_outside_click: Option<bool>,
    pub settle_delay_ms: Option<u64>,
    #[serde(alias = "animation_config")]
    pub animation: Option<AnimationSpec>,
}

/// Transition timing parameters.
///
/// Forwarded to the rendering collaborator verbatim; the engine computes
/// the same final geometry regardless of these values.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimationSpec {
    /// Duration of mask and tooltip transitions, in milliseconds.
    pub duration_ms: u64,
    /// Easing curve applied by the renderer.
    pub easing: Easing,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            duration_ms: 400,
            easing: Easing::EaseInOut,
        }
    }
}

/// Easing curves understood by the default renderers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = TourConfig::default();
        assert_approx_eq!(f32, config.margin(), 13.0);
        assert_approx_eq!(f32, config.arrow_size(), 6.0);
        assert!(!config.stop_on_outside_click());
        assert!(config.backdrop_color().is_ok());
    }

    #[test]
    fn test_invalid_backdrop_color_is_a_config_error() {
        let config: TourConfig =
            serde_json::from_str(r#"{"backdrop_color": "definitely-not-a-color"}"#).unwrap();
        assert!(config.backdrop_color().is_err());
    }

    #[test]
    fn test_legacy_aliases_accepted() {
        let config: TourConfig = serde_json::from_str(
            r#"{"overlay_color": "black", "tooltip_margin": 20.0, "mask_padding": 2.0}"#,
        )
        .unwrap();
        assert_approx_eq!(f32, config.margin(), 20.0);
        assert_approx_eq!(f32, config.highlight_padding(), 2.0);
        assert!(config.backdrop_color().is_ok());
    }

    #[test]
    fn test_merged_prefers_overrides() {
        let base = TourConfig::default();
        let overrides = TourConfigOverrides {
            margin: Some(24.0),
            stop_on_outside_click: Some(true),
            ..TourConfigOverrides::default()
        };
        let merged = base.merged(&overrides);
        assert_approx_eq!(f32, merged.margin(), 24.0);
        assert!(merged.stop_on_outside_click());
        // Untouched fields keep the base values.
        assert_approx_eq!(f32, merged.arrow_size(), base.arrow_size());
        assert_eq!(merged.settle_delay_ms(), base.settle_delay_ms());
    }
}
