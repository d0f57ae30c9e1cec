use super::atom::CartesianAtom;
use super::element;
use crate::core::utils::geometry;
use nalgebra::{Point3, Vector3};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoleculeError {
    #[error("Cannot compute a center of mass: total mass of {atoms} atom(s) is zero")]
    ZeroMass { atoms: usize },
}

/// An ordered list of atoms with absolute Cartesian positions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Molecule {
    atoms: Vec<CartesianAtom>,
}

impl Molecule {
    pub fn new(atoms: Vec<CartesianAtom>) -> Self {
        Self { atoms }
    }

    pub fn atoms(&self) -> &[CartesianAtom] {
        &self.atoms
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CartesianAtom> {
        self.atoms.iter()
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CartesianAtom> {
        self.atoms.get(index)
    }

    pub fn push(&mut self, atom: CartesianAtom) {
        self.atoms.push(atom);
    }

    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.atoms.iter().map(|a| a.position).collect()
    }

    /// Drops every placeholder (`X`) atom, keeping the remaining order.
    pub fn remove_dummy_atoms(&mut self) {
        self.atoms.retain(|atom| !atom.is_dummy());
    }

    /// Consuming form of [`Molecule::remove_dummy_atoms`].
    pub fn without_dummy_atoms(mut self) -> Self {
        self.remove_dummy_atoms();
        self
    }

    /// Mass-weighted centroid of the atom positions.
    ///
    /// # Errors
    ///
    /// Returns [`MoleculeError::ZeroMass`] when the masses sum to zero, which includes
    /// the empty molecule and molecules made only of dummy atoms.
    pub fn center_of_mass(&self) -> Result<Point3<f64>, MoleculeError> {
        let positions = self.positions();
        let masses: Vec<f64> = self.atoms.iter().map(|a| a.mass).collect();
        geometry::mass_weighted_center(&positions, &masses).ok_or(MoleculeError::ZeroMass {
            atoms: self.atoms.len(),
        })
    }

    /// Translates all atoms so the center of mass sits at the origin.
    ///
    /// Returns the translation that was applied.
    ///
    /// # Errors
    ///
    /// Returns [`MoleculeError::ZeroMass`] if the center of mass is undefined; the
    /// molecule is left untouched in that case.
    pub fn recenter(&mut self) -> Result<Vector3<f64>, MoleculeError> {
        let shift = -self.center_of_mass()?.coords;
        for atom in &mut self.atoms {
            atom.position += shift;
        }
        Ok(shift)
    }

    /// Compact formula of the molecule; see [`element::formula`].
    pub fn formula(&self) -> String {
        element::formula(self.atoms.iter().map(|a| a.symbol.as_str()))
    }
}

impl FromIterator<CartesianAtom> for Molecule {
    fn from_iter<I: IntoIterator<Item = CartesianAtom>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Molecule {
    type Item = &'a CartesianAtom;
    type IntoIter = std::slice::Iter<'a, CartesianAtom>;

    fn into_iter(self) -> Self::IntoIter {
        self.atoms.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(symbol: &str, x: f64, y: f64, z: f64) -> CartesianAtom {
        CartesianAtom::new(symbol, Point3::new(x, y, z)).unwrap()
    }

    fn water_with_dummy() -> Molecule {
        Molecule::new(vec![
            atom("O", 0.0, 0.0, 0.0),
            atom("X", 0.0, 0.0, 1.0),
            atom("H", 0.96, 0.0, 0.0),
            atom("H", -0.24, 0.93, 0.0),
        ])
    }

    #[test]
    fn remove_dummy_atoms_keeps_order_of_remaining_atoms() {
        let molecule = water_with_dummy().without_dummy_atoms();
        let symbols: Vec<_> = molecule.iter().map(|a| a.symbol.as_str()).collect();
        assert_eq!(symbols, ["O", "H", "H"]);
        assert_eq!(molecule.atoms()[1].position, Point3::new(0.96, 0.0, 0.0));
    }

    #[test]
    fn center_of_mass_ignores_zero_mass_dummies() {
        let with_dummy = water_with_dummy().center_of_mass().unwrap();
        let without = water_with_dummy()
            .without_dummy_atoms()
            .center_of_mass()
            .unwrap();
        assert!((with_dummy - without).norm() < 1e-12);
    }

    #[test]
    fn recenter_moves_center_of_mass_to_origin() {
        let mut molecule = Molecule::new(vec![atom("C", 1.0, 2.0, 3.0), atom("O", 2.2, 2.0, 3.0)]);
        molecule.recenter().unwrap();
        let center = molecule.center_of_mass().unwrap();
        assert!(center.coords.norm() < 1e-12);
        let bond = nalgebra::distance(&molecule.atoms()[0].position, &molecule.atoms()[1].position);
        assert!((bond - 1.2).abs() < 1e-12);
    }

    #[test]
    fn zero_mass_molecule_cannot_be_centered() {
        let mut molecule = Molecule::new(vec![atom("X", 1.0, 0.0, 0.0)]);
        assert_eq!(
            molecule.recenter(),
            Err(MoleculeError::ZeroMass { atoms: 1 })
        );
        assert_eq!(molecule.atoms()[0].position, Point3::new(1.0, 0.0, 0.0));
        assert_eq!(
            Molecule::default().center_of_mass(),
            Err(MoleculeError::ZeroMass { atoms: 0 })
        );
    }

    #[test]
    fn formula_counts_elements_in_order_of_appearance() {
        assert_eq!(water_with_dummy().formula(), "OH2");
        let peroxide = Molecule::new(vec![
            atom("H", 0.0, 0.0, 0.0),
            atom("O", 1.0, 0.0, 0.0),
            atom("O", 2.0, 0.0, 0.0),
            atom("H", 3.0, 0.0, 0.0),
        ]);
        assert_eq!(peroxide.formula(), "H2O2");
        assert_eq!(Molecule::default().formula(), "");
    }
}
