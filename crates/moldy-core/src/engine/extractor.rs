use super::error::ConversionError;
use crate::core::models::atom::{InternalCoordinates, Reference, ZmatrixAtom};
use crate::core::models::molecule::Molecule;
use crate::core::models::zmatrix::ZMatrix;
use crate::core::utils::geometry::{self, GeometryError};
use nalgebra::Point3;
use std::cmp::Ordering;
use tracing::{instrument, trace};

/// Converts Cartesian coordinates into a Z-matrix.
///
/// Reference atoms come from the already processed prefix (atoms with a smaller
/// index) by a greedy nearest-neighbor chain: the bond partner is the prefix atom
/// closest to the current atom, the angle partner is the remaining prefix atom closest
/// to the bond partner, and the dihedral partner is the remaining prefix atom closest
/// to the angle partner. Ties go to the lower index. The chain is a distance
/// heuristic and does not necessarily follow the chemical bonding graph.
///
/// The resulting Z-matrix uses 0-based references and radians, matching the input
/// expected by [`zmatrix_to_cartesian`](super::builder::zmatrix_to_cartesian).
///
/// # Errors
///
/// - [`ConversionError::EmptyMolecule`] for a molecule without atoms.
/// - [`ConversionError::DegenerateGeometry`] when an atom coincides with its bond
///   partner or its reference chain is collinear.
#[instrument(skip_all, name = "cartesian_to_zmatrix", fields(atoms = molecule.len()))]
pub fn cartesian_to_zmatrix(molecule: &Molecule) -> Result<ZMatrix, ConversionError> {
    if molecule.is_empty() {
        return Err(ConversionError::EmptyMolecule);
    }

    let positions = molecule.positions();
    molecule
        .iter()
        .enumerate()
        .map(|(index, atom)| {
            let chain = reference_chain(&positions, index);
            let internal = internal_coordinates(&positions, index, &chain)
                .map_err(|source| ConversionError::DegenerateGeometry { atom: index, source })?;
            trace!(atom = index, symbol = %atom.symbol, ?chain, "Selected reference atoms.");
            Ok(ZmatrixAtom::with_mass(&atom.symbol, internal, atom.mass))
        })
        .collect()
}

/// Picks up to three distinct reference atoms for `index` from the atoms before it.
fn reference_chain(positions: &[Point3<f64>], index: usize) -> Vec<usize> {
    let depth = index.min(3);
    let mut remaining: Vec<usize> = (0..index).collect();
    let mut chain = Vec::with_capacity(depth);
    let mut target = positions[index];

    for _ in 0..depth {
        let Some(next) = nearest(&remaining, positions, &target) else {
            break;
        };
        remaining.retain(|&candidate| candidate != next);
        chain.push(next);
        target = positions[next];
    }
    chain
}

fn nearest(candidates: &[usize], positions: &[Point3<f64>], target: &Point3<f64>) -> Option<usize> {
    candidates.iter().copied().min_by(|&a, &b| {
        let da = nalgebra::distance_squared(&positions[a], target);
        let db = nalgebra::distance_squared(&positions[b], target);
        da.partial_cmp(&db).unwrap_or(Ordering::Equal)
    })
}

fn internal_coordinates(
    positions: &[Point3<f64>],
    index: usize,
    chain: &[usize],
) -> Result<InternalCoordinates, GeometryError> {
    let position = &positions[index];

    let bond = |reference: usize| -> Result<Reference, GeometryError> {
        let q = position - positions[reference];
        // A zero-length bond leaves every later angle undefined.
        geometry::unit_vector(&q)?;
        Ok(Reference::new(reference, q.norm()))
    };
    let angle = |vertex: usize, far: usize| -> Result<Reference, GeometryError> {
        let value = geometry::bond_angle(&positions[vertex], position, &positions[far])?;
        Ok(Reference::new(far, value))
    };

    // `reference_chain` never yields more than three atoms.
    Ok(match *chain {
        [] => InternalCoordinates::Origin,
        [r1] => InternalCoordinates::Bond { bond: bond(r1)? },
        [r1, r2] => InternalCoordinates::BondAngle {
            bond: bond(r1)?,
            angle: angle(r1, r2)?,
        },
        [r1, r2, r3, ..] => InternalCoordinates::Full {
            bond: bond(r1)?,
            angle: angle(r1, r2)?,
            dihedral: Reference::new(
                r3,
                geometry::dihedral_angle(position, &positions[r1], &positions[r2], &positions[r3])?,
            ),
        },
    })
}
