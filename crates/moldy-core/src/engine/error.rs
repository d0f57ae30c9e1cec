use crate::core::models::molecule::MoleculeError;
use crate::core::models::zmatrix::ZmatrixError;
use crate::core::utils::geometry::GeometryError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Molecule contains no atoms")]
    EmptyMolecule,

    #[error("Malformed Z-matrix: {source}")]
    Zmatrix {
        #[from]
        source: ZmatrixError,
    },

    #[error("Degenerate geometry at atom {atom}: {source}")]
    DegenerateGeometry {
        atom: usize,
        #[source]
        source: GeometryError,
    },

    #[error(transparent)]
    Molecule(#[from] MoleculeError),
}
