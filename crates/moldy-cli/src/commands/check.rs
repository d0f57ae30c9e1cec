use crate::cli::CheckArgs;
use crate::config::PartialConfig;
use crate::error::{CliError, Result};
use crate::utils::files::{self, Frames};
use crate::utils::progress::CliProgressHandler;
use moldy::engine::config::ConversionConfig;
use moldy::engine::progress::ProgressReporter;
use moldy::workflows::verify::{self, RoundTripReport};
use std::path::Path;
use tracing::{info, warn};

pub fn run(args: CheckArgs, config_path: Option<&Path>) -> Result<()> {
    let partial_config = PartialConfig::load(config_path)?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli((&args).into())?;

    let frames = files::read_frames(&args.input)?;
    println!(
        "Checking {} round trip (tolerance {:e} Å)...",
        frames.format(),
        config.conversion.tolerance
    );

    let reports = check_frames(frames, &config.conversion)?;
    let failed = reports.iter().filter(|(_, report)| !report.passed()).count();

    for (frame, report) in &reports {
        println!(
            "{} Frame {}: {} atoms, max distance deviation {:.3e} Å, aligned RMSD {:.3e} Å",
            if report.passed() { "✓" } else { "✗" },
            frame + 1,
            report.atoms,
            report.max_distance_deviation,
            report.aligned_rmsd
        );
    }

    if failed > 0 {
        warn!("{} of {} frame(s) failed the round-trip check.", failed, reports.len());
        return Err(CliError::RoundTrip {
            failed,
            total: reports.len(),
        });
    }
    Ok(())
}

/// Runs the round trip on every selected frame, keeping each frame's 0-based index.
fn check_frames(
    frames: Frames,
    config: &ConversionConfig,
) -> Result<Vec<(usize, RoundTripReport)>> {
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    match frames {
        Frames::Zmatrices(zmatrices) => config
            .frames
            .select(zmatrices.iter().enumerate().collect())
            .into_iter()
            .map(|(i, zmatrix)| -> Result<_> {
                Ok((i, verify::zmatrix_round_trip(zmatrix, config, &reporter)?))
            })
            .collect(),
        Frames::Molecules(molecules) => config
            .frames
            .select(molecules.iter().enumerate().collect())
            .into_iter()
            .map(|(i, molecule)| -> Result<_> {
                Ok((i, verify::cartesian_round_trip(molecule, config, &reporter)?))
            })
            .collect(),
    }
}
