use crate::core::models::molecule::Molecule;
use crate::core::utils::geometry::{self, GeometryError};
use nalgebra::Point3;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Number of segments an angle arc is split into.
pub const ARC_SEGMENTS: usize = 12;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeasureError {
    #[error("Atom index {index} is out of range for a molecule with {len} atom(s)")]
    AtomOutOfRange { index: usize, len: usize },
    #[error("Measurements take 2, 3 or 4 atoms, got {0}")]
    UnsupportedAtomCount(usize),
    #[error("Atom {0} is selected more than once")]
    RepeatedAtom(usize),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// A geometric quantity measured on a molecule. Angles are stored in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    Distance(f64),
    Angle(f64),
    Dihedral(f64),
}

impl Measurement {
    /// Value in display units: Angstroms for distances, degrees for angles.
    pub fn display_value(&self) -> f64 {
        match self {
            Self::Distance(d) => *d,
            Self::Angle(a) | Self::Dihedral(a) => a.to_degrees(),
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Self::Distance(_) => "Å",
            Self::Angle(_) | Self::Dihedral(_) => "°",
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Distance(_) => "distance",
            Self::Angle(_) => "angle",
            Self::Dihedral(_) => "dihedral",
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Distance(_) => write!(f, "{:.4} {}", self.display_value(), self.unit()),
            Self::Angle(_) | Self::Dihedral(_) => {
                write!(f, "{:.1}{}", self.display_value(), self.unit())
            }
        }
    }
}

/// Measures the quantity selected by `atoms` (0-based indices).
///
/// - two atoms: the distance between them;
/// - three atoms: the angle at the first atom between the rays to the other two;
/// - four atoms: the dihedral of the chain, with the same sign convention as the
///   Z-matrix extractor.
pub fn measure(molecule: &Molecule, atoms: &[usize]) -> Result<Measurement, MeasureError> {
    let points = selected_positions(molecule, atoms)?;
    let measurement = match points.as_slice() {
        [a, b] => Measurement::Distance(nalgebra::distance(a, b)),
        [vertex, a, b] => Measurement::Angle(geometry::bond_angle(vertex, a, b)?),
        [a, b, c, d] => Measurement::Dihedral(geometry::dihedral_angle(a, b, c, d)?),
        _ => return Err(MeasureError::UnsupportedAtomCount(atoms.len())),
    };
    debug!(?atoms, %measurement, "Measured {}.", measurement.kind());
    Ok(measurement)
}

fn selected_positions(
    molecule: &Molecule,
    atoms: &[usize],
) -> Result<Vec<Point3<f64>>, MeasureError> {
    if !(2..=4).contains(&atoms.len()) {
        return Err(MeasureError::UnsupportedAtomCount(atoms.len()));
    }
    for (i, index) in atoms.iter().enumerate() {
        if atoms[..i].contains(index) {
            return Err(MeasureError::RepeatedAtom(*index));
        }
    }
    atoms
        .iter()
        .map(|&index| {
            molecule
                .get(index)
                .map(|atom| atom.position)
                .ok_or(MeasureError::AtomOutOfRange {
                    index,
                    len: molecule.len(),
                })
        })
        .collect()
}

/// A fan of points tracing a bond angle, for drawing it next to the structure.
#[derive(Debug, Clone, PartialEq)]
pub struct AngleArc {
    pub vertex: Point3<f64>,
    /// `ARC_SEGMENTS + 1` points from the `a` ray to the `b` ray.
    pub samples: Vec<Point3<f64>>,
    /// Where a value label should be placed (the arc midpoint).
    pub label_anchor: Point3<f64>,
}

impl AngleArc {
    /// Consecutive sample pairs; each forms a triangle with the vertex.
    pub fn segments(&self) -> impl Iterator<Item = (&Point3<f64>, &Point3<f64>)> {
        self.samples.iter().zip(self.samples.iter().skip(1))
    }
}

/// Builds the arc for the angle at `vertex` between the rays to `a` and `b`.
///
/// # Errors
///
/// Fails with a [`GeometryError`] when either ray has zero length or the rays are
/// parallel or anti-parallel.
pub fn angle_arc(
    vertex: &Point3<f64>,
    a: &Point3<f64>,
    b: &Point3<f64>,
) -> Result<AngleArc, GeometryError> {
    let q = a - vertex;
    let r = b - vertex;
    let samples = (0..=ARC_SEGMENTS)
        .map(|step| {
            let t = step as f64 / ARC_SEGMENTS as f64;
            geometry::slerp(&q, &r, t).map(|offset| vertex + offset)
        })
        .collect::<Result<Vec<_>, _>>()?;
    let label_anchor = vertex + geometry::slerp(&q, &r, 0.5)?;

    Ok(AngleArc {
        vertex: *vertex,
        samples,
        label_anchor,
    })
}
