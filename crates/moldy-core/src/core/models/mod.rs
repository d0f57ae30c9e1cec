//! # Core Models Module
//!
//! Data structures shared by both coordinate representations.
//!
//! - [`element`] - Element symbols and the standard atomic mass table
//! - [`atom`] - Atom records: Z-matrix rows with tagged internal coordinates and
//!   Cartesian atoms with absolute positions
//! - [`zmatrix`] - Ordered Z-matrix with structural validation
//! - [`molecule`] - Ordered Cartesian molecule with dummy removal and
//!   center-of-mass recentering
//!
//! ```ignore
//! use moldy::core::models::atom::{InternalCoordinates, Reference, ZmatrixAtom};
//! use moldy::core::models::zmatrix::ZMatrix;
//!
//! let zmatrix = ZMatrix::new(vec![
//!     ZmatrixAtom::new("H", InternalCoordinates::Origin)?,
//!     ZmatrixAtom::new("H", InternalCoordinates::Bond { bond: Reference::new(0, 0.74) })?,
//! ]);
//! zmatrix.validate()?;
//! ```

pub mod atom;
pub mod element;
pub mod molecule;
pub mod zmatrix;
