//! # Moldy Core Library
//!
//! Geometric conversion between the two molecular structure representations used by
//! the Moldy editor: Z-matrix internal coordinates (bond length, bond angle and
//! dihedral angle relative to previously placed atoms) and absolute Cartesian
//! coordinates.
//!
//! ## Architecture
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`ZMatrix`, `Molecule`, the
//!   element mass table), vector and rotation primitives, and text I/O for `.zmat` and
//!   `.xyz` files.
//!
//! - **[`engine`]: The Conversion Algorithms.** The Z-matrix builder, the Cartesian
//!   extractor with nearest-neighbor reference selection, geometric measurements and
//!   the error taxonomy shared by all of them.
//!
//! - **[`workflows`]: The Public API.** Batch conversion of multi-frame inputs and
//!   round-trip verification, composed from the engine.
//!
//! Every conversion takes its input by reference and returns a freshly owned result;
//! no state is shared between calls.

pub mod core;
pub mod engine;
pub mod workflows;
