//! Error types for Waymark operations.
//!
//! This module provides the main error type [`WaymarkError`]. None of the
//! variants are fatal to the host application: every failure path leaves
//! the engine in its last-known-good state, and degraded behavior means
//! "the tour does not visibly advance", never a crash.

use thiserror::Error;

/// The main error type for Waymark operations.
#[derive(Debug, Error)]
pub enum WaymarkError {
    /// `start` was requested for a tour that still had no visible steps
    /// after exhausting the bounded retry loop. The engine stays idle and
    /// no `start` event is emitted.
    #[error("no visible steps registered for tour `{tour}` after {attempts} attempts")]
    StartRetriesExhausted { tour: String, attempts: u32 },

    /// `start` was called while another tour is active. The engine never
    /// swaps tours implicitly; call `stop()` first.
    #[error("tour `{active}` is already active; call stop() before starting another tour")]
    TourAlreadyActive { active: String },

    /// A step was referenced by name but is not registered for the tour.
    #[error("unknown step `{name}` in tour `{tour}`")]
    UnknownStep { tour: String, name: String },

    /// Invalid engine configuration, e.g. an unparseable backdrop color.
    #[error("configuration error: {0}")]
    Config(String),
}
