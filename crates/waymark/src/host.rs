//! The boundary to the platform layout/measurement system.
//!
//! The engine never talks to a UI toolkit directly; everything it needs
//! from the platform is behind [`LayoutHost`]. The engine is generic over
//! the host, so tests (and headless renderers) can drive the whole
//! pipeline deterministically.

use std::{
    collections::HashMap,
    future::Future,
    sync::{Mutex, MutexGuard, PoisonError},
};

use serde::{Deserialize, Serialize};

use waymark_core::geometry::{Rect, Size};

/// Opaque identifier of a measurable UI element, issued by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle(u64);

impl ElementHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// Opaque identifier of a scrollable container, issued by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScrollHandle(u64);

impl ScrollHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// Services the engine consumes from the rendering/layout collaborator.
pub trait LayoutHost {
    /// Measures `element` in viewport coordinates.
    ///
    /// Returns `None` while the element is unknown to the host. A
    /// zero-sized rectangle means "mounted but not yet laid out"; callers
    /// poll again on the next frame in both cases.
    fn measure(&self, element: &ElementHandle) -> Option<Rect>;

    /// Current viewport dimensions.
    fn viewport(&self) -> Size;

    /// Asks the host to scroll `element` into view inside `container`.
    ///
    /// Completion of the returned future does not guarantee post-scroll
    /// measurements are ready; the engine applies a settle delay on top.
    fn scroll_into_view(
        &self,
        container: &ScrollHandle,
        element: &ElementHandle,
    ) -> impl Future<Output = ()> + Send;

    /// Defers to the next render/animation tick.
    fn next_frame(&self) -> impl Future<Output = ()> + Send;
}

/// A [`LayoutHost`] backed by a static table of rectangles.
///
/// Every operation completes immediately: `next_frame` yields once to the
/// scheduler and `scroll_into_view` is a no-op. Useful for headless
/// rendering and as the test double for the engine's async pipeline.
pub struct StaticLayoutHost {
    viewport: Size,
    rects: Mutex<HashMap<ElementHandle, Rect>>,
    frames: Mutex<u64>,
}

impl StaticLayoutHost {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            rects: Mutex::new(HashMap::new()),
            frames: Mutex::new(0),
        }
    }

    /// Sets (or replaces) the measurement the host reports for `element`.
    pub fn place(&self, element: ElementHandle, rect: Rect) {
        self.lock_rects().insert(element, rect);
    }

    /// Removes the measurement for `element`, making it unmeasurable.
    pub fn remove(&self, element: &ElementHandle) {
        self.lock_rects().remove(element);
    }

    /// Number of frames the engine has awaited so far.
    pub fn frames_elapsed(&self) -> u64 {
        *self.frames.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_rects(&self) -> MutexGuard<'_, HashMap<ElementHandle, Rect>> {
        self.rects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LayoutHost for StaticLayoutHost {
    fn measure(&self, element: &ElementHandle) -> Option<Rect> {
        self.lock_rects().get(element).copied()
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn scroll_into_view(
        &self,
        _container: &ScrollHandle,
        _element: &ElementHandle,
    ) -> impl Future<Output = ()> + Send {
        std::future::ready(())
    }

    fn next_frame(&self) -> impl Future<Output = ()> + Send {
        *self.frames.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        tokio::task::yield_now()
    }
}
