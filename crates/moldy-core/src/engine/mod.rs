//! # Engine Module
//!
//! The conversion algorithms between Z-matrix and Cartesian coordinates.
//!
//! - [`builder`] - Places atoms sequentially from bond, angle and dihedral constraints
//! - [`extractor`] - Infers internal coordinates from absolute positions, choosing
//!   reference atoms by a greedy nearest-neighbor chain
//! - [`measure`] - Distances, bond angles, dihedrals and angle arcs between atoms
//! - [`config`] - Settings shared by the batch and verification workflows
//! - [`progress`] - Callback-based progress reporting for long batches
//! - [`error`] - The error taxonomy returned by every conversion
//!
//! The two directions are not exact inverses: the extractor may pick different
//! reference atoms than the Z-matrix it was built from, so only the geometry (up to a
//! rigid motion) survives a round trip.

pub mod builder;
pub mod config;
pub mod error;
pub mod extractor;
pub mod measure;
pub mod progress;
