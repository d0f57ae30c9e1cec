use super::traits::{MolecularFile, WriteOptions, write_columns};
use crate::core::models::atom::CartesianAtom;
use crate::core::models::element::ElementError;
use crate::core::models::molecule::Molecule;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XyzFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XyzParseErrorKind },
    #[error("Frame {frame} declares {expected} atom(s) but the file ends after {found}")]
    UnexpectedEof {
        frame: usize,
        expected: usize,
        found: usize,
    },
    #[error("File contains no frames")]
    Empty,
}

#[derive(Debug, Error)]
pub enum XyzParseErrorKind {
    #[error("Invalid atom count '{value}' (expected a positive integer)")]
    InvalidAtomCount { value: String },
    #[error("Invalid coordinate '{value}'")]
    InvalidFloat { value: String },
    #[error(transparent)]
    Element(#[from] ElementError),
}

/// Reader and writer for the `.xyz` text format.
///
/// Each frame is an atom-count line, a comment line and one `symbol x y z` row per
/// atom. Frames may be concatenated into a listing. Within a frame, lines that do not
/// have exactly four fields are skipped; blank lines between frames are allowed. The
/// writer puts the formula on the comment line.
pub struct XyzFile;

impl MolecularFile for XyzFile {
    type Frame = Molecule;
    type Error = XyzFileError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Molecule>, Self::Error> {
        let mut lines = reader
            .lines()
            .enumerate()
            .map(|(index, line)| line.map(|text| (index + 1, text)));
        let mut frames = Vec::new();

        loop {
            let Some((count_line, count_text)) = next_non_blank(&mut lines)? else {
                break;
            };
            let expected = count_text
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| XyzFileError::Parse {
                    line: count_line,
                    kind: XyzParseErrorKind::InvalidAtomCount {
                        value: count_text.trim().to_string(),
                    },
                })?;

            let frame = frames.len() + 1;
            let eof = |found| XyzFileError::UnexpectedEof {
                frame,
                expected,
                found,
            };
            // Comment line.
            lines.next().transpose()?.ok_or_else(|| eof(0))?;

            let mut molecule = Molecule::default();
            while molecule.len() < expected {
                let (line_num, text) = lines
                    .next()
                    .transpose()?
                    .ok_or_else(|| eof(molecule.len()))?;
                let fields: Vec<&str> = text.split_whitespace().collect();
                let &[symbol, x, y, z] = fields.as_slice() else {
                    continue;
                };
                let atom = parse_atom(symbol, [x, y, z]).map_err(|kind| XyzFileError::Parse {
                    line: line_num,
                    kind,
                })?;
                molecule.push(atom);
            }
            frames.push(molecule);
        }

        if frames.is_empty() {
            return Err(XyzFileError::Empty);
        }
        Ok(frames)
    }

    fn write_to(
        frames: &[Molecule],
        options: &WriteOptions,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let precision = options.precision;
        for molecule in frames {
            writeln!(writer, "{}", molecule.len())?;
            writeln!(writer, "{}", molecule.formula())?;
            let rows: Vec<Vec<String>> = molecule
                .iter()
                .map(|atom| {
                    let p = atom.position;
                    vec![
                        atom.symbol.clone(),
                        format!("{:.*}", precision, p.x),
                        format!("{:.*}", precision, p.y),
                        format!("{:.*}", precision, p.z),
                    ]
                })
                .collect();
            write_columns(writer, &rows)?;
        }
        Ok(())
    }
}

fn next_non_blank(
    lines: &mut impl Iterator<Item = io::Result<(usize, String)>>,
) -> io::Result<Option<(usize, String)>> {
    for line in lines {
        let (index, text) = line?;
        if !text.trim().is_empty() {
            return Ok(Some((index, text)));
        }
    }
    Ok(None)
}

fn parse_atom(symbol: &str, coords: [&str; 3]) -> Result<CartesianAtom, XyzParseErrorKind> {
    let mut values = [0.0; 3];
    for (value, text) in values.iter_mut().zip(coords) {
        *value = text
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| XyzParseErrorKind::InvalidFloat {
                value: text.to_string(),
            })?;
    }
    let [x, y, z] = values;
    Ok(CartesianAtom::new(symbol, Point3::new(x, y, z))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    const WATER: &str = "3
Water molecule
O     0.0000    0.0000    0.0000
H     0.9572    0.0000    0.0000
H    -0.2400    0.9266    0.0000
";

    fn read(text: &str) -> Result<Vec<Molecule>, XyzFileError> {
        XyzFile::read_from(&mut Cursor::new(text))
    }

    #[test]
    fn reads_a_single_frame() {
        let frames = read(WATER).unwrap();
        assert_eq!(frames.len(), 1);
        let water = &frames[0];
        assert_eq!(water.len(), 3);
        assert_eq!(water.atoms()[1].symbol, "H");
        assert_eq!(water.atoms()[2].position, Point3::new(-0.24, 0.9266, 0.0));
        assert_eq!(water.atoms()[0].mass, 15.9994);
    }

    #[test]
    fn reads_a_multi_frame_listing() {
        let text = format!("{}\n{}2\nsecond\nH 0 0 0\nH 0.74 0 0\n", WATER, WATER);
        let frames = read(&text).unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2].formula(), "H2");
    }

    #[test]
    fn skips_rows_without_four_fields() {
        let text = "2\ncomment\nH 0 0 0 extra\n\nH 0 0 0\nH 1 0 0\n";
        let frames = read(text).unwrap();
        assert_eq!(frames[0].len(), 2);
        assert_eq!(frames[0].atoms()[1].position.x, 1.0);
    }

    #[test]
    fn truncated_frame_is_an_error() {
        match read("3\ncomment\nO 0 0 0\n") {
            Err(XyzFileError::UnexpectedEof {
                frame: 1,
                expected: 3,
                found: 1,
            }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn invalid_lines_report_their_number() {
        assert!(matches!(
            read("two\ncomment\n"),
            Err(XyzFileError::Parse {
                line: 1,
                kind: XyzParseErrorKind::InvalidAtomCount { .. }
            })
        ));
        assert!(matches!(
            read("1\n\nH 0 zero 0\n"),
            Err(XyzFileError::Parse {
                line: 3,
                kind: XyzParseErrorKind::InvalidFloat { .. }
            })
        ));
        assert!(matches!(
            read("1\n\nQq 0 0 0\n"),
            Err(XyzFileError::Parse {
                line: 3,
                kind: XyzParseErrorKind::Element(_)
            })
        ));
        assert!(matches!(read("\n\n"), Err(XyzFileError::Empty)));
    }

    #[test]
    fn writes_count_formula_and_aligned_rows() {
        let frames = read(WATER).unwrap();
        let mut out = Vec::new();
        XyzFile::write_to(&frames, &WriteOptions { precision: 3 }, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "3\nOH2\nO  0.000   0.000  0.000\nH  0.957   0.000  0.000\nH  -0.240  0.927  0.000\n"
        );
    }

    #[test]
    fn round_trips_frames_through_a_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("listing.xyz");
        let frames = read(&format!("{}{}", WATER, WATER)).unwrap();

        XyzFile::write_to_path(&frames, &WriteOptions::default(), &path).unwrap();
        let reread = XyzFile::read_from_path(&path).unwrap();
        assert_eq!(reread, frames);
    }
}
