//! Provides input/output functionality for molecular text formats.
//!
//! The `.zmat` and `.xyz` formats are the boundary where 1-based atom numbers and
//! degrees are translated to the 0-based indices and radians used everywhere else.
//! Both formats implement the [`traits::MolecularFile`] trait.

pub mod format;
pub mod traits;
pub mod xyz;
pub mod zmat;
