//! Waymark - a guided-tour engine for spotlight walkthroughs.
//!
//! Waymark drives a user through a sequence of highlighted UI regions
//! ("tour steps"), computing a spotlight mask and a non-overlapping
//! tooltip position for the active step. The actual drawing is left to a
//! rendering collaborator; the engine owns the step registry, the
//! navigation state machine, the placement geometry, and the async
//! coordination with the platform's layout/measurement pass.
//!
//! # Examples
//!
//! ```rust
//! use waymark::{
//!     ElementHandle, Step, StaticLayoutHost, TourEngine, config::TourConfig,
//! };
//! use waymark::geometry::{Rect, Size};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), waymark::WaymarkError> {
//! let host = StaticLayoutHost::new(Size::new(400.0, 800.0));
//! let target = ElementHandle::new(1);
//! host.place(target, Rect::new(20.0, 20.0, 60.0, 60.0));
//!
//! let engine = TourEngine::new(TourConfig::default(), host)?;
//! engine
//!     .registry()
//!     .register(Step::new("onboarding", "compose", 1, target).with_content("Tap to compose"));
//!
//! engine.start("onboarding").await?;
//! let frame = engine.subscribe_frames().borrow().clone().expect("frame published");
//! assert_eq!(frame.step().name(), "compose");
//!
//! engine.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod config;

mod awaitable;
mod engine;
mod error;
mod events;
mod host;
mod placement;
mod registry;

pub use waymark_core::{color, geometry, mask};

pub use awaitable::{AwaitableState, StateObserver};
pub use engine::{RenderFrame, TourEngine};
pub use error::WaymarkError;
pub use events::{EventBus, ListenerId, ListenerResult, TourEvent};
pub use host::{ElementHandle, LayoutHost, ScrollHandle, StaticLayoutHost};
pub use placement::{
    ArrowBox, BADGE_DIAMETER, BADGE_RADIUS, BadgeBox, HorizontalAnchor, Placement, TooltipBox,
    VerticalSide, tooltip_placement,
};
pub use registry::{Step, StepRegistry};
