use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Decimal places used for written coordinates and internal coordinates.
pub const DEFAULT_PRECISION: usize = 7;

/// Formatting options shared by all writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Number of digits after the decimal point for every real value.
    pub precision: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }
}

/// Defines the interface for reading and writing molecular file formats.
///
/// A file holds one or more frames; each frame is an independent structure.
/// Implementors handle format-specific parsing and serialization, while the path
/// helpers take care of opening and buffering files.
pub trait MolecularFile {
    /// The structure stored in one frame of the file.
    type Frame;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads every frame from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Self::Frame>, Self::Error>;

    /// Writes `frames` to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the frames cannot be represented in this format or writing
    /// fails.
    fn write_to(
        frames: &[Self::Frame],
        options: &WriteOptions,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Reads every frame from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Self::Frame>, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes `frames` to a file path, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        frames: &[Self::Frame],
        options: &WriteOptions,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(frames, options, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Writes `rows` as left-aligned columns separated by two spaces.
///
/// Shorter rows are allowed; their missing cells are simply omitted. Trailing
/// whitespace is trimmed from every line.
pub(crate) fn write_columns(
    writer: &mut impl Write,
    rows: &[Vec<String>],
) -> io::Result<()> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(writer, "{}", line.trim_end())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_left_aligned_to_the_widest_cell() {
        let rows = vec![
            vec!["O".to_string()],
            vec!["H".to_string(), "1".to_string(), "0.96".to_string()],
            vec!["Cl".to_string(), "12".to_string(), "1.7".to_string()],
        ];
        let mut out = Vec::new();
        write_columns(&mut out, &rows).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "O\nH   1   0.96\nCl  12  1.7\n"
        );
    }

    #[test]
    fn default_precision_matches_constant() {
        assert_eq!(WriteOptions::default().precision, DEFAULT_PRECISION);
    }
}
