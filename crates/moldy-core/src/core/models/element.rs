use phf::{Map, phf_map};
use thiserror::Error;

/// Symbol of the placeholder atom used only to anchor Z-matrix geometry.
pub const DUMMY_SYMBOL: &str = "X";

/// Standard atomic masses in atomic mass units, keyed by element symbol.
static ATOMIC_MASSES: Map<&'static str, f64> = phf_map! {
    "X" => 0.0, "Ac" => 227.028, "Al" => 26.981539, "Am" => 243.0, "Sb" => 121.757,
    "Ar" => 39.948, "As" => 74.92159, "At" => 210.0, "Ba" => 137.327, "Bk" => 247.0,
    "Be" => 9.012182, "Bi" => 208.98037, "Bh" => 262.0, "B" => 10.811, "Br" => 79.904,
    "Cd" => 112.411, "Ca" => 40.078, "Cf" => 251.0, "C" => 12.011, "Ce" => 140.115,
    "Cs" => 132.90543, "Cl" => 35.4527, "Cr" => 51.9961, "Co" => 58.9332, "Cu" => 63.546,
    "Cm" => 247.0, "Db" => 262.0, "Dy" => 162.5, "Es" => 252.0, "Er" => 167.26,
    "Eu" => 151.965, "Fm" => 257.0, "F" => 18.9984032, "Fr" => 223.0, "Gd" => 157.25,
    "Ga" => 69.723, "Ge" => 72.61, "Au" => 196.96654, "Hf" => 178.49, "Hs" => 265.0,
    "He" => 4.002602, "Ho" => 164.93032, "H" => 1.00794, "In" => 114.82, "I" => 126.90447,
    "Ir" => 192.22, "Fe" => 55.847, "Kr" => 83.8, "La" => 138.9055, "Lr" => 262.0,
    "Pb" => 207.2, "Li" => 6.941, "Lu" => 174.967, "Mg" => 24.305, "Mn" => 54.93805,
    "Mt" => 266.0, "Md" => 258.0, "Hg" => 200.59, "Mo" => 95.94, "Nd" => 144.24,
    "Ne" => 20.1797, "Np" => 237.048, "Ni" => 58.6934, "Nb" => 92.90638, "N" => 14.00674,
    "No" => 259.0, "Os" => 190.2, "O" => 15.9994, "Pd" => 106.42, "P" => 30.973762,
    "Pt" => 195.08, "Pu" => 244.0, "Po" => 209.0, "K" => 39.0983, "Pr" => 140.90765,
    "Pm" => 145.0, "Pa" => 231.0359, "Ra" => 226.025, "Rn" => 222.0, "Re" => 186.207,
    "Rh" => 102.9055, "Rb" => 85.4678, "Ru" => 101.07, "Rf" => 261.0, "Sm" => 150.36,
    "Sc" => 44.95591, "Sg" => 263.0, "Se" => 78.96, "Si" => 28.0855, "Ag" => 107.8682,
    "Na" => 22.989768, "Sr" => 87.62, "S" => 32.066, "Ta" => 180.9479, "Tc" => 98.0,
    "Te" => 127.6, "Tb" => 158.92534, "Tl" => 204.3833, "Th" => 232.0381, "Tm" => 168.93421,
    "Sn" => 118.71, "Ti" => 47.88, "W" => 183.85, "U" => 238.0289, "V" => 50.9415,
    "Xe" => 131.29, "Yb" => 173.04, "Y" => 88.90585, "Zn" => 65.39, "Zr" => 91.224,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ElementError {
    #[error("Unknown element symbol: '{0}'")]
    Unknown(String),
}

/// Looks up the standard atomic mass for an element symbol.
///
/// Surrounding whitespace is ignored and the symbol is matched case-insensitively
/// (`"cl"`, `"CL"` and `"Cl"` all resolve to chlorine).
///
/// # Errors
///
/// Returns [`ElementError::Unknown`] if the symbol is not in the periodic table.
pub fn atomic_mass(symbol: &str) -> Result<f64, ElementError> {
    let canonical = canonical_symbol(symbol);
    ATOMIC_MASSES
        .get(canonical.as_str())
        .copied()
        .ok_or_else(|| ElementError::Unknown(symbol.trim().to_string()))
}

/// Normalizes capitalization to the periodic-table form (first letter upper-case).
pub fn canonical_symbol(symbol: &str) -> String {
    let mut chars = symbol.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

pub fn is_dummy(symbol: &str) -> bool {
    symbol.trim() == DUMMY_SYMBOL
}

/// Compact formula for a sequence of element symbols, dummies excluded.
///
/// Elements appear in order of first occurrence, each followed by its count when
/// greater than one (`H2O2` for hydrogen peroxide). Intended for naming output
/// files rather than as a canonical formula.
pub fn formula<'a>(symbols: impl IntoIterator<Item = &'a str>) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for symbol in symbols.into_iter().filter(|s| !is_dummy(s)) {
        match counts.iter_mut().find(|(seen, _)| *seen == symbol) {
            Some((_, count)) => *count += 1,
            None => counts.push((symbol, 1)),
        }
    }
    counts
        .into_iter()
        .map(|(symbol, count)| {
            if count > 1 {
                format!("{}{}", symbol, count)
            } else {
                symbol.to_string()
            }
        })
        .collect()
}
