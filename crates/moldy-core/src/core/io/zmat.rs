use super::traits::{MolecularFile, WriteOptions, write_columns};
use crate::core::models::atom::{InternalCoordinates, Reference, ZmatrixAtom};
use crate::core::models::element::ElementError;
use crate::core::models::zmatrix::{ZMatrix, ZmatrixError};
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Number of header lines preceding the rows of a `.zmat` file.
const HEADER_LINES: usize = 2;

#[derive(Debug, Error)]
pub enum ZmatFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: ZmatParseErrorKind },
    #[error("File contains no Z-matrix rows")]
    Empty,
    #[error("Invalid Z-matrix: {0}")]
    Structure(#[from] ZmatrixError),
    #[error("A .zmat file holds exactly one Z-matrix, got {0}")]
    FrameCount(usize),
}

#[derive(Debug, Error)]
pub enum ZmatParseErrorKind {
    #[error("Row needs {expected} reference/value pair(s), found {found}")]
    MissingColumns { expected: usize, found: usize },
    #[error("Invalid reference '{value}' (expected a 1-based atom number)")]
    InvalidReference { value: String },
    #[error("Invalid number '{value}'")]
    InvalidFloat { value: String },
    #[error(transparent)]
    Element(#[from] ElementError),
}

/// Reader and writer for the `.zmat` text format.
///
/// Two header lines are followed by one row per atom:
///
/// ```text
/// symbol [ref bond [ref angle [ref dihedral]]]
/// ```
///
/// References are 1-based and angles are in degrees. Row `i` (0-based) uses its first
/// `min(i, 3)` pairs; further columns are ignored, as are blank lines. Headers are
/// ignored on read and written as the atom count and the formula.
pub struct ZmatFile;

impl MolecularFile for ZmatFile {
    type Frame = ZMatrix;
    type Error = ZmatFileError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<ZMatrix>, Self::Error> {
        let mut zmatrix = ZMatrix::default();

        for (line_num, line_res) in reader.lines().enumerate().skip(HEADER_LINES) {
            let line = line_res?;
            let line_num = line_num + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            let Some((symbol, values)) = fields.split_first() else {
                continue;
            };

            let atom = parse_row(symbol, values, zmatrix.len())
                .map_err(|kind| ZmatFileError::Parse {
                    line: line_num,
                    kind,
                })?;
            zmatrix.push(atom);
        }

        if zmatrix.is_empty() {
            return Err(ZmatFileError::Empty);
        }
        zmatrix.validate()?;
        Ok(vec![zmatrix])
    }

    fn write_to(
        frames: &[ZMatrix],
        options: &WriteOptions,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let [zmatrix] = frames else {
            return Err(ZmatFileError::FrameCount(frames.len()));
        };

        writeln!(writer, "{}", zmatrix.len())?;
        writeln!(writer, "{}", zmatrix.formula())?;

        let precision = options.precision;
        let rows: Vec<Vec<String>> = zmatrix
            .iter()
            .map(|atom| {
                let internal = atom.internal.map_angles(f64::to_degrees);
                std::iter::once(atom.symbol.clone())
                    .chain(internal.references().flat_map(|r| {
                        [
                            (r.atom + 1).to_string(),
                            format!("{:.*}", precision, r.value),
                        ]
                    }))
                    .collect()
            })
            .collect();
        write_columns(writer, &rows)?;
        Ok(())
    }
}

fn parse_row(
    symbol: &str,
    values: &[&str],
    index: usize,
) -> Result<ZmatrixAtom, ZmatParseErrorKind> {
    let expected = index.min(3);
    let found = values.len() / 2;
    if found < expected {
        return Err(ZmatParseErrorKind::MissingColumns { expected, found });
    }

    let slots = values
        .chunks_exact(2)
        .take(expected)
        .enumerate()
        .map(|(slot, pair)| {
            let reference = parse_reference(pair[0])?;
            let value = parse_float(pair[1])?;
            // Slot 0 is the bond length; the others are angles in degrees.
            let value = if slot == 0 { value } else { value.to_radians() };
            Ok(Reference::new(reference, value))
        })
        .collect::<Result<Vec<_>, ZmatParseErrorKind>>()?;

    let internal = match *slots {
        [] => InternalCoordinates::Origin,
        [bond] => InternalCoordinates::Bond { bond },
        [bond, angle] => InternalCoordinates::BondAngle { bond, angle },
        [bond, angle, dihedral, ..] => InternalCoordinates::Full {
            bond,
            angle,
            dihedral,
        },
    };
    Ok(ZmatrixAtom::new(symbol, internal)?)
}

fn parse_reference(value: &str) -> Result<usize, ZmatParseErrorKind> {
    match value.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(ZmatParseErrorKind::InvalidReference {
            value: value.to_string(),
        }),
    }
}

fn parse_float(value: &str) -> Result<f64, ZmatParseErrorKind> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ZmatParseErrorKind::InvalidFloat {
            value: value.to_string(),
        })
}
