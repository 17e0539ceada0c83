//! The step registry: all known steps across all tours.
//!
//! Step-bearing UI elements register themselves on mount (or when their
//! identifying props change) and deregister on unmount. The registry owns
//! the steps; no single UI node does. Mutation is last-write-wins per key,
//! which is safe because each `(tour, name)` key is owned by exactly one
//! registrant.

use std::sync::{Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use waymark_core::mask::MaskShape;

use crate::host::ElementHandle;

/// One highlightable target within a tour.
///
/// Identity is `(tour, name)`, unique within a running process. Steps
/// sharing a tour key form that tour, ordered by [`Step::order`]; order
/// ties are broken by registration order and should be avoided by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    tour: String,
    name: String,
    order: i32,
    content: String,
    visible: bool,
    mask_shape: MaskShape,
    border_radius: Option<f32>,
    highlight_padding: Option<f32>,
    target: ElementHandle,
}

impl Step {
    /// Creates a visible step with the default mask shape and no
    /// per-step overrides.
    pub fn new(
        tour: impl Into<String>,
        name: impl Into<String>,
        order: i32,
        target: ElementHandle,
    ) -> Self {
        Self {
            tour: tour.into(),
            name: name.into(),
            order,
            content: String::new(),
            visible: true,
            mask_shape: MaskShape::default(),
            border_radius: None,
            highlight_padding: None,
            target,
        }
    }

    /// Sets the opaque tooltip payload (builder style).
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Sets step visibility. Invisible steps stay registered but are
    /// excluded from navigation.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Sets the spotlight mask shape for this step.
    pub fn with_mask_shape(mut self, shape: MaskShape) -> Self {
        self.mask_shape = shape;
        self
    }

    /// Overrides the engine-wide corner radius for this step.
    pub fn with_border_radius(mut self, radius: f32) -> Self {
        self.border_radius = Some(radius);
        self
    }

    /// Overrides the engine-wide highlight padding for this step.
    pub fn with_highlight_padding(mut self, padding: f32) -> Self {
        self.highlight_padding = Some(padding);
        self
    }

    /// The tour this step belongs to.
    pub fn tour(&self) -> &str {
        &self.tour
    }

    /// The step's unique name within its tour.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position in the tour sequence (ascending).
    pub fn order(&self) -> i32 {
        self.order
    }

    /// The opaque text payload interpreted by the tooltip consumer.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether this step participates in navigation.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// The spotlight mask shape.
    pub fn mask_shape(&self) -> MaskShape {
        self.mask_shape
    }

    /// Per-step corner radius override, if any.
    pub fn border_radius(&self) -> Option<f32> {
        self.border_radius
    }

    /// Per-step highlight padding override, if any.
    pub fn highlight_padding(&self) -> Option<f32> {
        self.highlight_padding
    }

    /// The layout-host handle of the element this step highlights.
    pub fn target(&self) -> &ElementHandle {
        &self.target
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct StepKey {
    tour: String,
    name: String,
}

/// Holds all registered steps, keyed by `(tour, name)`.
///
/// Backed by an insertion-ordered map so that re-registering a step keeps
/// its original registration slot: order ties remain stable across prop
/// updates of a mounted element.
#[derive(Default)]
pub struct StepRegistry {
    steps: Mutex<IndexMap<StepKey, Step>>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the step at `(tour, name)`. Last write wins;
    /// there is no merging of attributes.
    pub fn register(&self, step: Step) {
        debug!(tour = step.tour(), step = step.name(); "Registering step");
        let key = StepKey {
            tour: step.tour.clone(),
            name: step.name.clone(),
        };
        self.lock().insert(key, step);
    }

    /// Removes the step if present; no-op otherwise.
    pub fn unregister(&self, tour: &str, name: &str) {
        let key = StepKey {
            tour: tour.to_owned(),
            name: name.to_owned(),
        };
        if self.lock().shift_remove(&key).is_some() {
            debug!(tour, step = name; "Unregistered step");
        }
    }

    /// Returns the step registered at `(tour, name)`, visible or not.
    pub fn step(&self, tour: &str, name: &str) -> Option<Step> {
        let key = StepKey {
            tour: tour.to_owned(),
            name: name.to_owned(),
        };
        self.lock().get(&key).cloned()
    }

    /// Returns the visible steps of `tour`, sorted ascending by order.
    ///
    /// Stable and deterministic; recomputed from scratch on every call.
    /// Step counts are small (typically well under fifty), so no
    /// incremental index is maintained.
    pub fn ordered_steps(&self, tour: &str) -> Vec<Step> {
        let mut steps: Vec<Step> = self
            .lock()
            .values()
            .filter(|step| step.tour() == tour && step.visible())
            .cloned()
            .collect();
        steps.sort_by_key(Step::order);
        steps
    }

    /// Returns the distinct tour keys that currently have steps.
    pub fn tours(&self) -> Vec<String> {
        let mut tours: Vec<String> = Vec::new();
        for step in self.lock().values() {
            if !tours.iter().any(|tour| tour == step.tour()) {
                tours.push(step.tour().to_owned());
            }
        }
        tours
    }

    /// Total number of registered steps, across all tours, visible or not.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<StepKey, Step>> {
        self.steps.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
