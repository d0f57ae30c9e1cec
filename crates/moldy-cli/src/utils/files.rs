use crate::error::{CliError, Result};
use moldy::core::io::format::FileFormat;
use moldy::core::io::traits::{MolecularFile, WriteOptions};
use moldy::core::io::xyz::XyzFile;
use moldy::core::io::zmat::ZmatFile;
use moldy::core::models::molecule::Molecule;
use moldy::core::models::zmatrix::ZMatrix;
use std::path::{Path, PathBuf};
use tracing::info;

/// The frames of an input file, in the representation the file stores them in.
#[derive(Debug)]
pub enum Frames {
    Zmatrices(Vec<ZMatrix>),
    Molecules(Vec<Molecule>),
}

impl Frames {
    pub fn len(&self) -> usize {
        match self {
            Frames::Zmatrices(frames) => frames.len(),
            Frames::Molecules(frames) => frames.len(),
        }
    }

    pub fn format(&self) -> FileFormat {
        match self {
            Frames::Zmatrices(_) => FileFormat::Zmat,
            Frames::Molecules(_) => FileFormat::Xyz,
        }
    }
}

pub fn detect_format(path: &Path) -> Result<FileFormat> {
    FileFormat::from_path(path).ok_or_else(|| CliError::UnsupportedFormat {
        path: path.to_path_buf(),
    })
}

pub fn read_frames(path: &Path) -> Result<Frames> {
    let format = detect_format(path)?;
    info!("Loading {} input from {:?}", format, path);
    let parse_error = |source: anyhow::Error| CliError::FileParsing {
        path: path.to_path_buf(),
        source,
    };
    let frames = match format {
        FileFormat::Zmat => {
            Frames::Zmatrices(ZmatFile::read_from_path(path).map_err(|e| parse_error(e.into()))?)
        }
        FileFormat::Xyz => {
            Frames::Molecules(XyzFile::read_from_path(path).map_err(|e| parse_error(e.into()))?)
        }
    };
    info!("Read {} frame(s).", frames.len());
    Ok(frames)
}

/// Writes Cartesian frames as a single `.xyz` listing.
pub fn write_molecules(
    path: &Path,
    molecules: &[Molecule],
    options: &WriteOptions,
) -> Result<Vec<PathBuf>> {
    XyzFile::write_to_path(molecules, options, path).map_err(|e| CliError::FileWriting {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    Ok(vec![path.to_path_buf()])
}

/// Writes Z-matrix frames, one file per frame since a `.zmat` file holds a single
/// Z-matrix.
pub fn write_zmatrices(
    path: &Path,
    zmatrices: &[ZMatrix],
    options: &WriteOptions,
) -> Result<Vec<PathBuf>> {
    zmatrices
        .iter()
        .enumerate()
        .map(|(i, zmatrix)| {
            let output_path = generate_output_path(path, i + 1, zmatrices.len());
            ZmatFile::write_to_path(std::slice::from_ref(zmatrix), options, &output_path)
                .map_err(|e| CliError::FileWriting {
                    path: output_path.clone(),
                    source: e.into(),
                })?;
            Ok(output_path)
        })
        .collect()
}

/// Numbers `base` as `stem_N.ext` when more than one file is written.
pub fn generate_output_path(base: &Path, index: usize, total: usize) -> PathBuf {
    if total <= 1 {
        return base.to_path_buf();
    }

    let stem = base.file_stem().unwrap_or_default().to_string_lossy();
    let file_name = match base.extension() {
        Some(ext) => format!("{}_{}.{}", stem, index, ext.to_string_lossy()),
        None => format!("{}_{}", stem, index),
    };
    base.with_file_name(file_name)
}
