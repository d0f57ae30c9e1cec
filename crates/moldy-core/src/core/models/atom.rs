use super::element::{self, ElementError};
use nalgebra::Point3;

/// A constraint tying an atom to one previously placed atom.
///
/// `atom` is the 0-based index of the referenced atom. `value` is a distance for the
/// bond slot and an angle in radians for the angle and dihedral slots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reference {
    pub atom: usize,
    pub value: f64,
}

impl Reference {
    pub fn new(atom: usize, value: f64) -> Self {
        Self { atom, value }
    }
}

/// The internal coordinates of one Z-matrix row.
///
/// The variant encodes how many constraints the row carries: the first atom has none,
/// the second only a bond, the third a bond and an angle, and every later atom all
/// three.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InternalCoordinates {
    /// Unconstrained; the atom anchors the structure at the origin.
    Origin,
    /// Distance to one earlier atom.
    Bond { bond: Reference },
    /// Distance plus the bond angle at the bonded atom.
    BondAngle { bond: Reference, angle: Reference },
    /// Distance, bond angle and signed dihedral angle.
    Full {
        bond: Reference,
        angle: Reference,
        dihedral: Reference,
    },
}

impl InternalCoordinates {
    /// Number of filled slots (0 to 3).
    pub fn arity(&self) -> usize {
        match self {
            Self::Origin => 0,
            Self::Bond { .. } => 1,
            Self::BondAngle { .. } => 2,
            Self::Full { .. } => 3,
        }
    }

    pub fn bond(&self) -> Option<&Reference> {
        match self {
            Self::Origin => None,
            Self::Bond { bond } | Self::BondAngle { bond, .. } | Self::Full { bond, .. } => {
                Some(bond)
            }
        }
    }

    pub fn angle(&self) -> Option<&Reference> {
        match self {
            Self::BondAngle { angle, .. } | Self::Full { angle, .. } => Some(angle),
            _ => None,
        }
    }

    pub fn dihedral(&self) -> Option<&Reference> {
        match self {
            Self::Full { dihedral, .. } => Some(dihedral),
            _ => None,
        }
    }

    /// All filled slots in bond, angle, dihedral order.
    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        [self.bond(), self.angle(), self.dihedral()]
            .into_iter()
            .flatten()
    }

    /// Applies `f` to the angle and dihedral values, leaving distances untouched.
    ///
    /// Used at the text boundary to switch between degrees and radians.
    pub fn map_angles(self, f: impl Fn(f64) -> f64) -> Self {
        let convert = |r: Reference| Reference::new(r.atom, f(r.value));
        match self {
            Self::Origin | Self::Bond { .. } => self,
            Self::BondAngle { bond, angle } => Self::BondAngle {
                bond,
                angle: convert(angle),
            },
            Self::Full {
                bond,
                angle,
                dihedral,
            } => Self::Full {
                bond,
                angle: convert(angle),
                dihedral: convert(dihedral),
            },
        }
    }
}

/// One row of a Z-matrix: an element, its internal coordinates and its mass.
#[derive(Debug, Clone, PartialEq)]
pub struct ZmatrixAtom {
    pub symbol: String,
    pub internal: InternalCoordinates,
    /// Atomic mass in atomic mass units.
    pub mass: f64,
}

impl ZmatrixAtom {
    /// Creates a row whose mass is taken from the element table.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::Unknown`] if `symbol` is not a known element or `X`.
    pub fn new(symbol: &str, internal: InternalCoordinates) -> Result<Self, ElementError> {
        let mass = element::atomic_mass(symbol)?;
        Ok(Self {
            symbol: element::canonical_symbol(symbol),
            internal,
            mass,
        })
    }

    pub fn with_mass(symbol: &str, internal: InternalCoordinates, mass: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            internal,
            mass,
        }
    }

    pub fn is_dummy(&self) -> bool {
        element::is_dummy(&self.symbol)
    }
}

/// An atom with an absolute position in Angstroms.
#[derive(Debug, Clone, PartialEq)]
pub struct CartesianAtom {
    pub symbol: String,
    pub position: Point3<f64>,
    /// Atomic mass in atomic mass units.
    pub mass: f64,
}

impl CartesianAtom {
    /// Creates an atom whose mass is taken from the element table.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::Unknown`] if `symbol` is not a known element or `X`.
    pub fn new(symbol: &str, position: Point3<f64>) -> Result<Self, ElementError> {
        let mass = element::atomic_mass(symbol)?;
        Ok(Self {
            symbol: element::canonical_symbol(symbol),
            position,
            mass,
        })
    }

    pub fn with_mass(symbol: &str, position: Point3<f64>, mass: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            position,
            mass,
        }
    }

    pub fn is_dummy(&self) -> bool {
        element::is_dummy(&self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> InternalCoordinates {
        InternalCoordinates::Full {
            bond: Reference::new(2, 0.9),
            angle: Reference::new(1, 1.8),
            dihedral: Reference::new(0, -2.0),
        }
    }

    #[test]
    fn arity_counts_filled_slots() {
        let r = Reference::new(0, 1.0);
        assert_eq!(InternalCoordinates::Origin.arity(), 0);
        assert_eq!(InternalCoordinates::Bond { bond: r }.arity(), 1);
        assert_eq!(InternalCoordinates::BondAngle { bond: r, angle: r }.arity(), 2);
        assert_eq!(full().arity(), 3);
    }

    #[test]
    fn slot_accessors_follow_variant() {
        let coords = full();
        assert_eq!(coords.bond().map(|r| r.atom), Some(2));
        assert_eq!(coords.angle().map(|r| r.atom), Some(1));
        assert_eq!(coords.dihedral().map(|r| r.atom), Some(0));
        assert_eq!(coords.references().count(), 3);

        let origin = InternalCoordinates::Origin;
        assert!(origin.bond().is_none());
        assert_eq!(origin.references().count(), 0);
    }

    #[test]
    fn map_angles_leaves_distance_untouched() {
        let doubled = full().map_angles(|v| v * 2.0);
        assert_eq!(doubled.bond(), Some(&Reference::new(2, 0.9)));
        assert_eq!(doubled.angle(), Some(&Reference::new(1, 3.6)));
        assert_eq!(doubled.dihedral(), Some(&Reference::new(0, -4.0)));
    }

    #[test]
    fn zmatrix_atom_looks_up_mass_and_canonicalizes_symbol() {
        let atom = ZmatrixAtom::new("o", InternalCoordinates::Origin).unwrap();
        assert_eq!(atom.symbol, "O");
        assert_eq!(atom.mass, 15.9994);
        assert!(!atom.is_dummy());
    }

    #[test]
    fn unknown_symbol_is_rejected() {
        let result = CartesianAtom::new("Zz", Point3::origin());
        assert_eq!(result, Err(ElementError::Unknown("Zz".into())));
    }

    #[test]
    fn dummy_atoms_are_recognized() {
        let atom = CartesianAtom::new("X", Point3::new(1.0, 0.0, 0.0)).unwrap();
        assert!(atom.is_dummy());
        assert_eq!(atom.mass, 0.0);
    }
}
