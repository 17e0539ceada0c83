//! Waymark core types and definitions.
//!
//! This crate provides the foundational types for the Waymark guided-tour
//! engine. It includes:
//!
//! - **Geometry**: basic geometric value types ([`geometry`] module)
//! - **Colors**: CSS color-string handling ([`color::Color`])
//! - **Masks**: spotlight mask shapes and their SVG cutout paths
//!   ([`mask`] module)
//!
//! Everything in this crate is pure data and pure functions; all I/O and
//! async coordination lives in the `waymark` engine crate.

pub mod color;
pub mod geometry;
pub mod mask;
