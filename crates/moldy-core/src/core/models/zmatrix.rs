use super::atom::ZmatrixAtom;
use super::element;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ZmatrixError {
    #[error("Z-matrix contains no atoms")]
    Empty,
    #[error("Atom {atom} must have {expected} internal coordinate(s), found {found}")]
    Malformed {
        atom: usize,
        expected: usize,
        found: usize,
    },
    #[error("Atom {atom} references atom {reference}, which is not placed before it")]
    InvalidReference { atom: usize, reference: usize },
    #[error("Atom {atom} references atom {reference} more than once")]
    DuplicateReference { atom: usize, reference: usize },
}

/// An ordered list of Z-matrix rows.
///
/// Row order is significant: every reference points strictly backwards, so the rows
/// form an acyclic chain that can be placed front to back. Angles are in radians.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ZMatrix {
    atoms: Vec<ZmatrixAtom>,
}

impl ZMatrix {
    pub fn new(atoms: Vec<ZmatrixAtom>) -> Self {
        Self { atoms }
    }

    pub fn atoms(&self) -> &[ZmatrixAtom] {
        &self.atoms
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ZmatrixAtom> {
        self.atoms.iter()
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn push(&mut self, atom: ZmatrixAtom) {
        self.atoms.push(atom);
    }

    /// Compact formula of the real atoms; see [`element::formula`].
    pub fn formula(&self) -> String {
        element::formula(self.atoms.iter().map(|a| a.symbol.as_str()))
    }

    /// Checks the structural invariants of the Z-matrix.
    ///
    /// Atom `i` must carry exactly `min(i, 3)` internal coordinates, every reference
    /// must point to an atom with a smaller index, and no row may reference the same
    /// atom twice.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, scanning rows in order.
    pub fn validate(&self) -> Result<(), ZmatrixError> {
        if self.atoms.is_empty() {
            return Err(ZmatrixError::Empty);
        }

        for (index, atom) in self.atoms.iter().enumerate() {
            let expected = index.min(3);
            let found = atom.internal.arity();
            if found != expected {
                return Err(ZmatrixError::Malformed {
                    atom: index,
                    expected,
                    found,
                });
            }

            let mut seen = [usize::MAX; 3];
            for (slot, reference) in atom.internal.references().enumerate() {
                if reference.atom >= index {
                    return Err(ZmatrixError::InvalidReference {
                        atom: index,
                        reference: reference.atom,
                    });
                }
                if seen[..slot].contains(&reference.atom) {
                    return Err(ZmatrixError::DuplicateReference {
                        atom: index,
                        reference: reference.atom,
                    });
                }
                seen[slot] = reference.atom;
            }
        }
        Ok(())
    }
}

impl FromIterator<ZmatrixAtom> for ZMatrix {
    fn from_iter<I: IntoIterator<Item = ZmatrixAtom>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ZMatrix {
    type Item = &'a ZmatrixAtom;
    type IntoIter = std::slice::Iter<'a, ZmatrixAtom>;

    fn into_iter(self) -> Self::IntoIter {
        self.atoms.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::{InternalCoordinates, Reference};

    fn row(symbol: &str, internal: InternalCoordinates) -> ZmatrixAtom {
        ZmatrixAtom::new(symbol, internal).unwrap()
    }

    fn peroxide() -> ZMatrix {
        ZMatrix::new(vec![
            row("H", InternalCoordinates::Origin),
            row(
                "O",
                InternalCoordinates::Bond {
                    bond: Reference::new(0, 0.9),
                },
            ),
            row(
                "O",
                InternalCoordinates::BondAngle {
                    bond: Reference::new(1, 1.4),
                    angle: Reference::new(0, 105f64.to_radians()),
                },
            ),
            row(
                "H",
                InternalCoordinates::Full {
                    bond: Reference::new(2, 0.9),
                    angle: Reference::new(1, 105f64.to_radians()),
                    dihedral: Reference::new(0, 120f64.to_radians()),
                },
            ),
        ])
    }

    #[test]
    fn well_formed_zmatrix_validates() {
        assert_eq!(peroxide().validate(), Ok(()));
    }

    #[test]
    fn empty_zmatrix_is_rejected() {
        assert_eq!(ZMatrix::default().validate(), Err(ZmatrixError::Empty));
    }

    #[test]
    fn wrong_arity_is_malformed() {
        let mut zmatrix = peroxide();
        zmatrix.push(row(
            "H",
            InternalCoordinates::Bond {
                bond: Reference::new(0, 1.0),
            },
        ));
        assert_eq!(
            zmatrix.validate(),
            Err(ZmatrixError::Malformed {
                atom: 4,
                expected: 3,
                found: 1
            })
        );
    }

    #[test]
    fn forward_reference_is_invalid() {
        let zmatrix = ZMatrix::new(vec![
            row("H", InternalCoordinates::Origin),
            row(
                "H",
                InternalCoordinates::Bond {
                    bond: Reference::new(1, 0.74),
                },
            ),
        ]);
        assert_eq!(
            zmatrix.validate(),
            Err(ZmatrixError::InvalidReference {
                atom: 1,
                reference: 1
            })
        );
    }

    #[test]
    fn repeated_reference_is_rejected() {
        let mut zmatrix = peroxide();
        zmatrix.push(row(
            "H",
            InternalCoordinates::Full {
                bond: Reference::new(1, 1.0),
                angle: Reference::new(2, 1.0),
                dihedral: Reference::new(1, 1.0),
            },
        ));
        assert_eq!(
            zmatrix.validate(),
            Err(ZmatrixError::DuplicateReference {
                atom: 4,
                reference: 1
            })
        );
    }

    #[test]
    fn collects_from_iterator() {
        let zmatrix: ZMatrix = peroxide().iter().cloned().collect();
        assert_eq!(zmatrix.len(), 4);
        assert_eq!((&zmatrix).into_iter().filter(|a| a.symbol == "O").count(), 2);
        assert_eq!(zmatrix.formula(), "H2O2");
    }
}
