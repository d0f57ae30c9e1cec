use crate::core::models::molecule::Molecule;
use crate::core::models::zmatrix::ZMatrix;
use crate::engine::builder::zmatrix_to_cartesian;
use crate::engine::config::ConversionConfig;
use crate::engine::error::ConversionError;
use crate::engine::extractor::cartesian_to_zmatrix;
use crate::engine::progress::{Progress, ProgressReporter};
use thiserror::Error;
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BatchError {
    #[error("No frames selected for conversion")]
    EmptyBatch,
    #[error("Frame {} could not be converted: {source}", .frame + 1)]
    Frame {
        /// 0-based position of the frame in the input.
        frame: usize,
        #[source]
        source: ConversionError,
    },
}

/// Builds Cartesian coordinates for every selected Z-matrix frame.
#[instrument(skip_all, name = "zmatrix_batch_workflow", fields(frames = frames.len()))]
pub fn zmatrices_to_cartesian(
    frames: &[ZMatrix],
    config: &ConversionConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<Molecule>, BatchError> {
    run_batch(frames, config, reporter, "Building Cartesian coordinates", |z| {
        zmatrix_to_cartesian(z).map(|m| {
            let atoms = m.len();
            (m, atoms)
        })
    })
}

/// Extracts a Z-matrix from every selected Cartesian frame.
#[instrument(skip_all, name = "cartesian_batch_workflow", fields(frames = frames.len()))]
pub fn molecules_to_zmatrix(
    frames: &[Molecule],
    config: &ConversionConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<ZMatrix>, BatchError> {
    run_batch(frames, config, reporter, "Extracting Z-matrices", |m| {
        cartesian_to_zmatrix(m).map(|z| {
            let atoms = z.len();
            (z, atoms)
        })
    })
}

fn run_batch<T, U, F>(
    frames: &[T],
    config: &ConversionConfig,
    reporter: &ProgressReporter,
    phase: &'static str,
    convert: F,
) -> Result<Vec<U>, BatchError>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> Result<(U, usize), ConversionError> + Sync,
{
    let selected = config
        .frames
        .select(frames.iter().enumerate().collect::<Vec<_>>());
    if selected.is_empty() {
        warn!("Frame selection left nothing to convert.");
        return Err(BatchError::EmptyBatch);
    }

    info!(
        selected = selected.len(),
        total = frames.len(),
        selection = %config.frames,
        "Converting frames."
    );

    let results = reporter.phase(phase, || {
        reporter.report(Progress::FramesStart {
            total: selected.len() as u64,
        });

        #[cfg(not(feature = "parallel"))]
        let iterator = selected.iter();

        #[cfg(feature = "parallel")]
        let iterator = selected.par_iter();

        let results: Vec<Result<U, BatchError>> = iterator
            .map(|&(frame, input)| {
                let (output, atoms) =
                    convert(input).map_err(|source| BatchError::Frame { frame, source })?;
                reporter.report(Progress::FrameDone { frame, atoms });
                Ok(output)
            })
            .collect();

        reporter.report(Progress::FramesFinish);
        results
    });

    let outputs = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    info!(converted = outputs.len(), "Batch conversion finished.");
    Ok(outputs)
}
