use std::fmt;
use std::path::Path;

/// The text formats understood by the reader and writers, detected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// Z-matrix internal coordinates (`.zmat`)
    Zmat,
    /// Cartesian coordinates (`.xyz`)
    Xyz,
}

impl FileFormat {
    /// Get the file format from a file extension, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "zmat" => Some(FileFormat::Zmat),
            "xyz" => Some(FileFormat::Xyz),
            _ => None,
        }
    }

    /// Get the file format from a path
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(FileFormat::from_extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Zmat => "zmat",
            FileFormat::Xyz => "xyz",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Zmat => f.write_str("Z-matrix"),
            FileFormat::Xyz => f.write_str("XYZ"),
        }
    }
}
