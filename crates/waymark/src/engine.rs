//! The tour engine: navigation state machine and placement pipeline.
//!
//! One engine instance per application is the intended lifetime; pass it
//! around explicitly (or through your UI framework's context mechanism)
//! rather than a hidden global, so isolated instances stay possible for
//! tests.
//!
//! The engine cooperates with the platform through deferred continuations
//! (next-frame ticks and timers) on a single logical thread; there is no
//! parallel execution inside a transition. Each transition is stamped
//! with a generation number, and a placement result is applied only if
//! its generation is still the latest issued, so an in-flight transition
//! superseded by a later call abandons instead of clobbering state.

use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
};
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::watch;

use waymark_core::{
    color::Color,
    geometry::Rect,
    mask::{MaskPath, mask_path},
};

use crate::{
    awaitable::{AwaitableState, StateObserver},
    config::{AnimationSpec, TourConfig},
    error::WaymarkError,
    events::{EventBus, ListenerId, ListenerResult, TourEvent},
    host::{LayoutHost, ScrollHandle},
    placement::{ArrowBox, BadgeBox, TooltipBox, tooltip_placement},
    registry::{Step, StepRegistry},
};

/// Cap on the start-retry loop, in frames. Bounds the wait for a tour
/// whose steps may never mount, while tolerating normal mount latency.
const MAX_START_ATTEMPTS: u32 = 120;

/// Everything the rendering collaborator needs to draw one step.
///
/// Published over a watch channel on every completed transition and on
/// every viewport change. The animation spec is interpolation data for
/// the renderer only; it never affects the computed geometry.
#[derive(Debug, Clone)]
pub struct RenderFrame {
    mask: MaskPath,
    backdrop: Color,
    highlight: Rect,
    tooltip: TooltipBox,
    arrow: Option<ArrowBox>,
    badge: BadgeBox,
    step: Step,
    step_number: usize,
    total_steps: usize,
    animation: AnimationSpec,
}

impl RenderFrame {
    /// The even-odd cutout path for the backdrop mask.
    pub fn mask(&self) -> &MaskPath {
        &self.mask
    }

    /// The mask fill color.
    pub fn backdrop(&self) -> &Color {
        &self.backdrop
    }

    /// The padded highlight rectangle the mask and tooltip were computed
    /// from.
    pub fn highlight(&self) -> Rect {
        self.highlight
    }

    /// The tooltip anchor box.
    pub fn tooltip(&self) -> TooltipBox {
        self.tooltip
    }

    /// The arrow box, unless the arrow is disabled.
    pub fn arrow(&self) -> Option<ArrowBox> {
        self.arrow
    }

    /// The step-number badge position.
    pub fn badge(&self) -> BadgeBox {
        self.badge
    }

    /// The step this frame highlights.
    pub fn step(&self) -> &Step {
        &self.step
    }

    /// 1-indexed position of the step in its tour.
    pub fn step_number(&self) -> usize {
        self.step_number
    }

    /// Number of visible steps in the tour.
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn is_first_step(&self) -> bool {
        self.step_number == 1
    }

    pub fn is_last_step(&self) -> bool {
        self.step_number == self.total_steps
    }

    /// Transition timing for the renderer's interpolation.
    pub fn animation(&self) -> AnimationSpec {
        self.animation
    }
}

#[derive(Default)]
struct EngineState {
    active_tour: Option<String>,
    current_step: Option<Step>,
}

/// The tour engine.
///
/// Owns the active-tour/current-step state, runs the navigation state
/// machine (`Idle -> Starting -> Active -> Idle`), performs the
/// measure/scroll/settle/place pipeline on every transition, and emits
/// lifecycle events.
pub struct TourEngine<H: LayoutHost> {
    host: H,
    config: TourConfig,
    backdrop: Color,
    registry: Arc<StepRegistry>,
    events: EventBus,
    visibility: AwaitableState<bool>,
    frame_tx: watch::Sender<Option<RenderFrame>>,
    state: Mutex<EngineState>,
    scroll: Mutex<Option<ScrollHandle>>,
    generation: AtomicU64,
}

impl<H: LayoutHost> TourEngine<H> {
    /// Creates an engine over `host` with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WaymarkError::Config`] if the configured backdrop color
    /// cannot be parsed.
    pub fn new(config: TourConfig, host: H) -> Result<Self, WaymarkError> {
        let backdrop = config.backdrop_color()?;
        let (frame_tx, _) = watch::channel(None);
        Ok(Self {
            host,
            config,
            backdrop,
            registry: Arc::new(StepRegistry::new()),
            events: EventBus::new(),
            visibility: AwaitableState::new(false),
            frame_tx,
            state: Mutex::new(EngineState::default()),
            scroll: Mutex::new(None),
            generation: AtomicU64::new(0),
        })
    }

    /// The step registry; step-bearing UI elements register themselves
    /// here on mount and deregister on unmount.
    pub fn registry(&self) -> Arc<StepRegistry> {
        Arc::clone(&self.registry)
    }

    /// Subscribes `listener` to tour lifecycle events.
    pub fn on<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&TourEvent) -> ListenerResult + Send + Sync + 'static,
    {
        self.events.on(listener)
    }

    /// Removes an event subscription.
    pub fn off(&self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    /// A receiver for published render frames. `None` until the first
    /// transition completes.
    pub fn subscribe_frames(&self) -> watch::Receiver<Option<RenderFrame>> {
        self.frame_tx.subscribe()
    }

    /// Hands the visibility cell's observer end to the rendering
    /// collaborator. Once taken, `start`/`stop` suspend until the
    /// renderer acknowledges each visibility change.
    pub fn visibility_observer(&self) -> StateObserver<bool> {
        self.visibility.observer()
    }

    /// Whether the tour overlay is (requested) visible.
    pub fn visible(&self) -> bool {
        self.visibility.desired()
    }

    /// The key of the active tour, if any.
    pub fn active_tour(&self) -> Option<String> {
        self.lock_state().active_tour.clone()
    }

    /// The current step, if a tour is active.
    pub fn current_step(&self) -> Option<Step> {
        self.lock_state().current_step.clone()
    }

    /// 1-indexed position of the current step in its tour.
    pub fn current_step_number(&self) -> Option<usize> {
        self.position().map(|(_, _, index)| index + 1)
    }

    /// Number of visible steps in the active tour, zero when idle.
    pub fn total_steps_number(&self) -> usize {
        match self.active_tour() {
            Some(tour) => self.registry.ordered_steps(&tour).len(),
            None => 0,
        }
    }

    pub fn is_first_step(&self) -> Option<bool> {
        self.position().map(|(_, _, index)| index == 0)
    }

    pub fn is_last_step(&self) -> Option<bool> {
        self.position()
            .map(|(_, steps, index)| index + 1 == steps.len())
    }

    /// Starts `tour` at its first visible step.
    pub async fn start(&self, tour: &str) -> Result<(), WaymarkError> {
        self.start_from(tour, None, None).await
    }

    /// Starts `tour`, optionally at a named step and with a scrollable
    /// container the targets live in.
    ///
    /// Retries across frames while the tour has no resolvable step
    /// (steps may still be mounting), up to a bounded number of
    /// attempts. On success the visibility flip is awaited: when this
    /// returns `Ok`, the mask is in its final resting state, not merely
    /// requested.
    ///
    /// # Errors
    ///
    /// [`WaymarkError::TourAlreadyActive`] when a tour is running (the
    /// engine never swaps tours implicitly), or
    /// [`WaymarkError::StartRetriesExhausted`] when no step resolved
    /// within the retry budget; the engine is left idle and no event is
    /// emitted.
    pub async fn start_from(
        &self,
        tour: &str,
        from_step: Option<&str>,
        scroll: Option<ScrollHandle>,
    ) -> Result<(), WaymarkError> {
        if let Some(active) = self.active_tour() {
            warn!(tour, active = active.as_str(); "Refusing to start: a tour is already active");
            return Err(WaymarkError::TourAlreadyActive { active });
        }

        *self.lock_scroll() = scroll;
        info!(tour; "Starting tour");

        let mut attempts: u32 = 0;
        let step = loop {
            let steps = self.registry.ordered_steps(tour);
            let resolved = match from_step {
                Some(name) => steps.iter().find(|step| step.name() == name).cloned(),
                None => steps.first().cloned(),
            };
            if let Some(step) = resolved {
                break step;
            }

            attempts += 1;
            if attempts >= MAX_START_ATTEMPTS {
                warn!(tour, attempts; "Tour start aborted: no visible steps registered");
                return Err(WaymarkError::StartRetriesExhausted {
                    tour: tour.to_owned(),
                    attempts,
                });
            }
            self.host.next_frame().await;
        };

        self.lock_state().active_tour = Some(tour.to_owned());
        self.events.emit(&TourEvent::Start {
            tour: tour.to_owned(),
        });

        if self.run_pipeline(step).await {
            self.visibility.set(true).await;
        }
        Ok(())
    }

    /// Stops the active tour: awaited visibility flip, state reset, and
    /// a `Stop` event whose `completed` flag reports whether the step
    /// being left was the last in order.
    ///
    /// Calling `stop` while idle is a safe no-op; it still clears the
    /// scroll-container association but emits no event.
    pub async fn stop(&self) {
        let Some(tour) = self.active_tour() else {
            *self.lock_scroll() = None;
            return;
        };
        let completed = self.is_last_step().unwrap_or(false);

        self.visibility.set(false).await;

        // Invalidate any in-flight transition before clearing state.
        self.generation.fetch_add(1, Ordering::SeqCst);
        {
            let mut state = self.lock_state();
            state.active_tour = None;
            state.current_step = None;
        }
        *self.lock_scroll() = None;

        info!(tour = tour.as_str(), completed; "Tour stopped");
        self.events.emit(&TourEvent::Stop { tour, completed });
    }

    /// Advances to the next step. On the last step this stops the tour,
    /// which is treated as completion, not an error.
    pub async fn go_to_next(&self) {
        let Some((tour, steps, index)) = self.position() else {
            return;
        };
        if index + 1 < steps.len() {
            self.navigate(tour, steps[index + 1].clone(), index + 2).await;
        } else {
            self.stop().await;
        }
    }

    /// Goes back to the previous step; a no-op on the first step.
    pub async fn go_to_prev(&self) {
        let Some((tour, steps, index)) = self.position() else {
            return;
        };
        if index > 0 {
            self.navigate(tour, steps[index - 1].clone(), index).await;
        }
    }

    /// Jumps to the 1-indexed step `n`; out-of-range `n` is a no-op.
    pub async fn go_to_nth(&self, n: usize) {
        let Some((tour, steps, _)) = self.position() else {
            return;
        };
        if n == 0 || n > steps.len() {
            return;
        }
        self.navigate(tour, steps[n - 1].clone(), n).await;
    }

    /// Backdrop press hook for the rendering collaborator. Stops the
    /// tour when `stop_on_outside_click` is configured.
    pub async fn handle_backdrop_press(&self) {
        if self.config.stop_on_outside_click() {
            self.stop().await;
        }
    }

    /// Recomputes the current step's placement after a viewport change
    /// (resize or rotation).
    pub async fn viewport_changed(&self) {
        let Some(step) = self.current_step() else {
            return;
        };
        debug!(step = step.name(); "Viewport changed, replacing current step");
        self.run_pipeline(step).await;
    }

    async fn navigate(&self, tour: String, step: Step, step_number: usize) {
        self.events.emit(&TourEvent::StepChange {
            tour,
            step: step.clone(),
            step_number,
        });
        self.run_pipeline(step).await;
    }

    /// The per-transition pipeline: record the step, scroll, settle,
    /// measure (frame-throttled, unbounded), place, publish.
    ///
    /// Returns false when the transition was superseded before its
    /// result could be published. A measurement that never resolves
    /// leaves the previously published frame showing; that degenerate
    /// case is silent by design.
    async fn run_pipeline(&self, step: Step) -> bool {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.lock_state().current_step = Some(step.clone());
        debug!(tour = step.tour(), step = step.name(); "Transitioning to step");

        let scroll = *self.lock_scroll();
        if let Some(container) = scroll {
            self.host.scroll_into_view(&container, step.target()).await;
            // The layout system gives no synchronous guarantee that
            // post-scroll measurements are ready.
            tokio::time::sleep(Duration::from_millis(self.config.settle_delay_ms())).await;
            if self.is_stale(generation) {
                return false;
            }
        }

        let measured = loop {
            if self.is_stale(generation) {
                return false;
            }
            match self.host.measure(step.target()) {
                Some(rect) if !rect.is_zero_sized() => break rect,
                // Unknown or zero-sized: not laid out yet, poll again
                // next frame.
                _ => self.host.next_frame().await,
            }
        };

        let padding = step
            .highlight_padding()
            .unwrap_or(self.config.highlight_padding());
        let highlight = measured
            .inflate(padding)
            .translate(0.0, self.config.vertical_offset());
        let viewport = Rect::from_size(self.host.viewport());

        let radius = step.border_radius().unwrap_or(self.config.border_radius());
        let mask = mask_path(step.mask_shape(), highlight, viewport, radius);
        let placement = tooltip_placement(
            highlight,
            viewport,
            self.config.margin(),
            self.config.arrow_size(),
        );

        let steps = self.registry.ordered_steps(step.tour());
        let step_number = steps
            .iter()
            .position(|candidate| candidate.name() == step.name())
            .map_or(0, |index| index + 1);

        let frame = RenderFrame {
            mask,
            backdrop: self.backdrop.clone(),
            highlight,
            tooltip: placement.tooltip(),
            arrow: placement.arrow(),
            badge: placement.badge(),
            step: step.clone(),
            step_number,
            total_steps: steps.len(),
            animation: self.config.animation(),
        };

        if self.is_stale(generation) {
            debug!(step = step.name(); "Discarding superseded placement");
            return false;
        }
        self.frame_tx.send_replace(Some(frame));
        debug!(step = step.name(), step_number; "Published render frame");
        true
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }

    fn position(&self) -> Option<(String, Vec<Step>, usize)> {
        let (tour, current) = {
            let state = self.lock_state();
            (state.active_tour.clone()?, state.current_step.clone()?)
        };
        let steps = self.registry.ordered_steps(&tour);
        let index = steps.iter().position(|step| step.name() == current.name())?;
        Some((tour, steps, index))
    }

    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_scroll(&self) -> MutexGuard<'_, Option<ScrollHandle>> {
        self.scroll.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
