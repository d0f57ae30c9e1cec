use crate::cli::ConvertArgs;
use crate::config::PartialConfig;
use crate::error::Result;
use crate::utils::files::{self, Frames};
use crate::utils::progress::CliProgressHandler;
use moldy::core::io::format::FileFormat;
use moldy::engine::progress::ProgressReporter;
use moldy::workflows::batch;
use std::path::Path;
use tracing::info;

pub fn run(args: ConvertArgs, config_path: Option<&Path>) -> Result<()> {
    let partial_config = PartialConfig::load(config_path)?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli((&args).into())?;

    let output_format = files::detect_format(&args.output)?;
    let frames = files::read_frames(&args.input)?;
    let input_format = frames.format();

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Converting {} frame(s) from {} to {}...",
        frames.len(),
        input_format,
        output_format
    );
    info!(
        "Converting {:?} ({}) to {:?} ({}), frames: {}",
        &args.input, input_format, &args.output, output_format, config.conversion.frames
    );

    let written = match (frames, output_format) {
        (Frames::Zmatrices(zmatrices), FileFormat::Xyz) => {
            let molecules =
                batch::zmatrices_to_cartesian(&zmatrices, &config.conversion, &reporter)?;
            files::write_molecules(&args.output, &molecules, &config.write_options)?
        }
        (Frames::Molecules(molecules), FileFormat::Zmat) => {
            let zmatrices =
                batch::molecules_to_zmatrix(&molecules, &config.conversion, &reporter)?;
            files::write_zmatrices(&args.output, &zmatrices, &config.write_options)?
        }
        (Frames::Zmatrices(zmatrices), FileFormat::Zmat) => {
            info!("Input and output formats match; rewriting normalized Z-matrix.");
            let zmatrices = config.conversion.frames.select(zmatrices);
            files::write_zmatrices(&args.output, &zmatrices, &config.write_options)?
        }
        (Frames::Molecules(molecules), FileFormat::Xyz) => {
            info!("Input and output formats match; rewriting normalized XYZ listing.");
            let molecules: Vec<_> = config
                .conversion
                .frames
                .select(molecules)
                .into_iter()
                .map(|molecule| molecule.without_dummy_atoms())
                .collect();
            files::write_molecules(&args.output, &molecules, &config.write_options)?
        }
    };

    for path in &written {
        info!("Wrote {:?}", path);
        println!("✓ Written to: {}", path.display());
    }
    Ok(())
}
