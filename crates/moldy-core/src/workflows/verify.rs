use crate::core::models::molecule::Molecule;
use crate::core::models::zmatrix::ZMatrix;
use crate::core::utils::geometry;
use crate::engine::builder::zmatrix_to_cartesian;
use crate::engine::config::ConversionConfig;
use crate::engine::error::ConversionError;
use crate::engine::extractor::cartesian_to_zmatrix;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument, warn};

/// Outcome of comparing a structure with its round-tripped copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundTripReport {
    pub atoms: usize,
    /// Largest change of any inter-atomic distance, in Angstroms.
    pub max_distance_deviation: f64,
    /// RMSD after optimal superposition, in Angstroms.
    pub aligned_rmsd: f64,
    pub tolerance: f64,
}

impl RoundTripReport {
    pub fn passed(&self) -> bool {
        self.max_distance_deviation <= self.tolerance
    }
}

/// Builds `zmatrix`, extracts a new Z-matrix from the result, rebuilds it and compares
/// the two Cartesian structures.
#[instrument(skip_all, name = "zmatrix_round_trip_workflow", fields(atoms = zmatrix.len()))]
pub fn zmatrix_round_trip(
    zmatrix: &ZMatrix,
    config: &ConversionConfig,
    reporter: &ProgressReporter,
) -> Result<RoundTripReport, ConversionError> {
    let reference = reporter.phase("Building", || zmatrix_to_cartesian(zmatrix))?;
    cartesian_round_trip(&reference, config, reporter)
}

/// Extracts a Z-matrix from `molecule`, rebuilds it and compares the result with the
/// input. Dummy atoms in the input are left out of the comparison.
#[instrument(skip_all, name = "cartesian_round_trip_workflow", fields(atoms = molecule.len()))]
pub fn cartesian_round_trip(
    molecule: &Molecule,
    config: &ConversionConfig,
    reporter: &ProgressReporter,
) -> Result<RoundTripReport, ConversionError> {
    let extracted = reporter.phase("Extracting", || cartesian_to_zmatrix(molecule))?;
    let rebuilt = reporter.phase("Rebuilding", || zmatrix_to_cartesian(&extracted))?;

    let reference = molecule.clone().without_dummy_atoms().positions();
    let rebuilt = rebuilt.positions();
    // Mismatched atom counts cannot be compared and count as a failure.
    let report = RoundTripReport {
        atoms: reference.len(),
        max_distance_deviation: geometry::max_pairwise_distance_deviation(&reference, &rebuilt)
            .unwrap_or(f64::INFINITY),
        aligned_rmsd: geometry::aligned_rmsd(&reference, &rebuilt).unwrap_or(f64::INFINITY),
        tolerance: config.tolerance,
    };

    if report.passed() {
        info!(
            deviation = report.max_distance_deviation,
            rmsd = report.aligned_rmsd,
            "Round trip preserved the geometry."
        );
    } else {
        warn!(
            deviation = report.max_distance_deviation,
            tolerance = report.tolerance,
            "Round trip changed the geometry beyond tolerance."
        );
        reporter.report(Progress::Message(format!(
            "Distance deviation {:.3e} Å exceeds tolerance {:e} Å",
            report.max_distance_deviation, report.tolerance
        )));
    }
    Ok(report)
}
