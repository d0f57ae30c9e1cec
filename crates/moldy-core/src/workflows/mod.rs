//! # Workflows Module
//!
//! High-level procedures assembled from the engine, intended as the entry points for
//! applications.
//!
//! - [`batch`] - Converts every selected frame of a multi-frame input, in parallel
//!   when the `parallel` feature is enabled
//! - [`verify`] - Checks that a structure survives a Z-matrix round trip

pub mod batch;
pub mod verify;
