//! # Core Module
//!
//! Fundamental building blocks for representing molecules in both coordinate systems.
//!
//! - **Molecular Representation** ([`models`]) - Atom records, Z-matrices, Cartesian
//!   molecules and the element mass table
//! - **Vector Mathematics** ([`utils`]) - Unit vectors, Euler–Rodrigues rotations,
//!   bond/dihedral angles and spherical interpolation
//! - **File I/O** ([`io`]) - Reading and writing `.zmat` and `.xyz` text files

pub mod io;
pub mod models;
pub mod utils;
