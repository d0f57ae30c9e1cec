use super::error::ConversionError;
use crate::core::models::atom::{CartesianAtom, InternalCoordinates};
use crate::core::models::molecule::Molecule;
use crate::core::models::zmatrix::ZMatrix;
use crate::core::utils::geometry::{self, GeometryError};
use nalgebra::{Point3, Vector3};
use tracing::{debug, instrument, trace};

/// Converts a Z-matrix into Cartesian coordinates.
///
/// Atoms are placed strictly in order: the first at the origin, the second on the
/// +X axis, the third in the XY plane, and every later atom from its bond, angle and
/// dihedral constraints. Dummy (`X`) atoms take part in placement and are removed
/// afterwards, then the molecule is translated so its center of mass is at the origin.
///
/// # Errors
///
/// - [`ConversionError::EmptyMolecule`] for an empty Z-matrix.
/// - [`ConversionError::Zmatrix`] when a row has the wrong number of coordinates for
///   its position or references an atom that is not placed yet.
/// - [`ConversionError::DegenerateGeometry`] when reference atoms coincide or are
///   collinear, leaving a direction or rotation axis undefined.
/// - [`ConversionError::Molecule`] when the remaining atoms have zero total mass.
#[instrument(skip_all, name = "zmatrix_to_cartesian", fields(atoms = zmatrix.len()))]
pub fn zmatrix_to_cartesian(zmatrix: &ZMatrix) -> Result<Molecule, ConversionError> {
    if zmatrix.is_empty() {
        return Err(ConversionError::EmptyMolecule);
    }
    zmatrix.validate()?;

    let mut positions: Vec<Point3<f64>> = Vec::with_capacity(zmatrix.len());
    for (index, atom) in zmatrix.iter().enumerate() {
        let position = place_atom(&positions, &atom.internal)
            .map_err(|source| ConversionError::DegenerateGeometry { atom: index, source })?;
        trace!(atom = index, symbol = %atom.symbol, ?position, "Placed atom.");
        positions.push(position);
    }

    let mut molecule: Molecule = zmatrix
        .iter()
        .zip(positions)
        .map(|(atom, position)| CartesianAtom::with_mass(&atom.symbol, position, atom.mass))
        .collect();

    let before = molecule.len();
    molecule.remove_dummy_atoms();
    if molecule.len() != before {
        debug!(removed = before - molecule.len(), "Removed dummy atoms.");
    }

    let shift = molecule.recenter()?;
    debug!(?shift, "Moved center of mass to the origin.");
    Ok(molecule)
}

/// Computes the position of one atom from already placed atoms.
///
/// Callers must have validated that every reference index is below `placed.len()`.
fn place_atom(
    placed: &[Point3<f64>],
    internal: &InternalCoordinates,
) -> Result<Point3<f64>, GeometryError> {
    match *internal {
        InternalCoordinates::Origin => Ok(Point3::origin()),
        InternalCoordinates::Bond { bond } => Ok(Point3::new(bond.value, 0.0, 0.0)),
        InternalCoordinates::BondAngle { bond, angle } => {
            let q = placed[bond.atom];
            let r = placed[angle.atom];

            // The first two atoms lie on the X axis, so turning about Z keeps the
            // new bond in the XY plane at the requested angle.
            let d = geometry::unit_vector(&(r - q))? * bond.value;
            let d = geometry::rotation_matrix(&Vector3::z(), angle.value)? * d;
            Ok(q + d)
        }
        InternalCoordinates::Full {
            bond,
            angle,
            dihedral,
        } => {
            let q = placed[bond.atom];
            let r = placed[angle.atom];
            let s = placed[dihedral.atom];

            let a = r - q;
            let b = r - s;
            let d = geometry::unit_vector(&a)? * bond.value;

            // Angle first (about the plane normal), then dihedral (about the bond axis).
            let normal = a.cross(&b);
            let d = geometry::rotation_matrix(&normal, angle.value)? * d;
            let d = geometry::rotation_matrix(&a, dihedral.value)? * d;
            Ok(q + d)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::{Reference, ZmatrixAtom};
    use crate::core::models::zmatrix::ZmatrixError;
    use std::f64::consts::PI;

    const TOL: f64 = 1e-9;

    fn row(symbol: &str, internal: InternalCoordinates) -> ZmatrixAtom {
        ZmatrixAtom::new(symbol, internal).unwrap()
    }

    fn bond(atom: usize, value: f64) -> InternalCoordinates {
        InternalCoordinates::Bond {
            bond: Reference::new(atom, value),
        }
    }

    fn bond_angle(b: (usize, f64), a: (usize, f64)) -> InternalCoordinates {
        InternalCoordinates::BondAngle {
            bond: Reference::new(b.0, b.1),
            angle: Reference::new(a.0, a.1.to_radians()),
        }
    }

    fn full(b: (usize, f64), a: (usize, f64), d: (usize, f64)) -> InternalCoordinates {
        InternalCoordinates::Full {
            bond: Reference::new(b.0, b.1),
            angle: Reference::new(a.0, a.1.to_radians()),
            dihedral: Reference::new(d.0, d.1.to_radians()),
        }
    }

    fn peroxide(dihedral_degrees: f64) -> ZMatrix {
        ZMatrix::new(vec![
            row("H", InternalCoordinates::Origin),
            row("O", bond(0, 0.9)),
            row("O", bond_angle((1, 1.4), (0, 105.0))),
            row("H", full((2, 0.9), (1, 105.0), (0, dihedral_degrees))),
        ])
    }

    fn dist(molecule: &Molecule, i: usize, j: usize) -> f64 {
        nalgebra::distance(&molecule.atoms()[i].position, &molecule.atoms()[j].position)
    }

    fn angle_deg(molecule: &Molecule, vertex: usize, a: usize, b: usize) -> f64 {
        let p = |i: usize| molecule.atoms()[i].position;
        geometry::bond_angle(&p(vertex), &p(a), &p(b))
            .unwrap()
            .to_degrees()
    }

    #[test]
    fn single_atom_sits_at_origin() {
        let zmatrix = ZMatrix::new(vec![row("He", InternalCoordinates::Origin)]);
        let molecule = zmatrix_to_cartesian(&zmatrix).unwrap();
        assert_eq!(molecule.len(), 1);
        assert!(molecule.atoms()[0].position.coords.norm() < TOL);
    }

    #[test]
    fn peroxide_preserves_requested_distances_and_angles() {
        let molecule = zmatrix_to_cartesian(&peroxide(120.0)).unwrap();
        assert_eq!(molecule.len(), 4);
        assert!((dist(&molecule, 0, 1) - 0.9).abs() < TOL);
        assert!((dist(&molecule, 1, 2) - 1.4).abs() < TOL);
        assert!((dist(&molecule, 2, 3) - 0.9).abs() < TOL);
        assert!((angle_deg(&molecule, 1, 2, 0) - 105.0).abs() < 1e-7);
        assert!((angle_deg(&molecule, 2, 3, 1) - 105.0).abs() < 1e-7);
    }

    #[test]
    fn output_is_centered_on_center_of_mass() {
        let molecule = zmatrix_to_cartesian(&peroxide(60.0)).unwrap();
        assert!(molecule.center_of_mass().unwrap().coords.norm() < TOL);
    }

    #[test]
    fn positive_dihedral_is_reproduced_with_sign() {
        for degrees in [60.0, -60.0, 120.0, -150.0] {
            let molecule = zmatrix_to_cartesian(&peroxide(degrees)).unwrap();
            let p = |i: usize| molecule.atoms()[i].position;
            let measured = geometry::dihedral_angle(&p(3), &p(2), &p(1), &p(0))
                .unwrap()
                .to_degrees();
            assert!(
                (measured - degrees).abs() < 1e-7,
                "requested {degrees}, measured {measured}"
            );
        }
    }

    #[test]
    fn third_atom_may_bond_to_the_first_atom() {
        let zmatrix = ZMatrix::new(vec![
            row("O", InternalCoordinates::Origin),
            row("H", bond(0, 0.96)),
            row("H", bond_angle((0, 0.96), (1, 104.5))),
        ]);
        let molecule = zmatrix_to_cartesian(&zmatrix).unwrap();
        assert!((dist(&molecule, 0, 2) - 0.96).abs() < TOL);
        assert!((angle_deg(&molecule, 0, 1, 2) - 104.5).abs() < 1e-7);
    }

    #[test]
    fn dummy_atoms_are_stripped_after_placement() {
        // A dummy above the C=O axis anchors the dihedral of the last hydrogen.
        let zmatrix = ZMatrix::new(vec![
            row("C", InternalCoordinates::Origin),
            row("O", bond(0, 1.2)),
            row("X", bond_angle((0, 1.0), (1, 90.0))),
            row("H", full((0, 1.1), (1, 120.0), (2, 0.0))),
            row("H", full((0, 1.1), (1, 120.0), (2, 180.0))),
        ]);
        let molecule = zmatrix_to_cartesian(&zmatrix).unwrap();

        let symbols: Vec<_> = molecule.iter().map(|a| a.symbol.as_str()).collect();
        assert_eq!(symbols, ["C", "O", "H", "H"]);
        assert!((dist(&molecule, 0, 2) - 1.1).abs() < TOL);
        assert!((dist(&molecule, 0, 3) - 1.1).abs() < TOL);
        assert!((angle_deg(&molecule, 0, 2, 3) - 120.0).abs() < 1e-7);
        assert!(molecule.center_of_mass().unwrap().coords.norm() < TOL);
    }

    #[test]
    fn empty_zmatrix_is_rejected() {
        assert_eq!(
            zmatrix_to_cartesian(&ZMatrix::default()),
            Err(ConversionError::EmptyMolecule)
        );
    }

    #[test]
    fn wrong_arity_is_reported_as_malformed() {
        let zmatrix = ZMatrix::new(vec![
            row("H", InternalCoordinates::Origin),
            row("H", bond_angle((0, 0.74), (0, 90.0))),
        ]);
        assert!(matches!(
            zmatrix_to_cartesian(&zmatrix),
            Err(ConversionError::Zmatrix {
                source: ZmatrixError::Malformed { atom: 1, .. }
            })
        ));
    }

    #[test]
    fn forward_reference_is_reported() {
        let zmatrix = ZMatrix::new(vec![
            row("H", InternalCoordinates::Origin),
            row("O", bond(0, 1.0)),
            row("H", bond_angle((3, 1.0), (0, 90.0))),
        ]);
        assert!(matches!(
            zmatrix_to_cartesian(&zmatrix),
            Err(ConversionError::Zmatrix {
                source: ZmatrixError::InvalidReference {
                    atom: 2,
                    reference: 3
                }
            })
        ));
    }

    #[test]
    fn collinear_references_are_degenerate() {
        let zmatrix = ZMatrix::new(vec![
            row("C", InternalCoordinates::Origin),
            row("C", bond(0, 1.2)),
            row("C", bond_angle((1, 1.2), (0, 180.0))),
            row("H", full((2, 1.0), (1, 109.5), (0, 60.0))),
        ]);
        assert!(matches!(
            zmatrix_to_cartesian(&zmatrix),
            Err(ConversionError::DegenerateGeometry { atom: 3, .. })
        ));
    }

    #[test]
    fn coincident_first_atoms_are_degenerate() {
        let zmatrix = ZMatrix::new(vec![
            row("H", InternalCoordinates::Origin),
            row("H", bond(0, 0.0)),
            row("H", bond_angle((0, 1.0), (1, 90.0))),
        ]);
        assert!(matches!(
            zmatrix_to_cartesian(&zmatrix),
            Err(ConversionError::DegenerateGeometry { atom: 2, .. })
        ));
    }

    #[test]
    fn only_dummy_atoms_have_no_center_of_mass() {
        let zmatrix = ZMatrix::new(vec![
            row("X", InternalCoordinates::Origin),
            row("X", bond(0, 1.0)),
        ]);
        assert!(matches!(
            zmatrix_to_cartesian(&zmatrix),
            Err(ConversionError::Molecule(_))
        ));
    }

    #[test]
    fn straight_angle_at_third_atom_is_allowed() {
        let zmatrix = ZMatrix::new(vec![
            row("O", InternalCoordinates::Origin),
            row("C", bond(0, 1.16)),
            row("O", bond_angle((1, 1.16), (0, 180.0))),
        ]);
        let molecule = zmatrix_to_cartesian(&zmatrix).unwrap();
        assert!((dist(&molecule, 0, 2) - 2.32).abs() < TOL);
        assert!((angle_deg(&molecule, 1, 0, 2) - PI.to_degrees()).abs() < 1e-6);
    }
}
