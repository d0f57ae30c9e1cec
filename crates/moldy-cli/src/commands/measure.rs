use crate::cli::MeasureArgs;
use crate::error::{CliError, Result};
use crate::utils::files::{self, Frames};
use moldy::core::models::molecule::Molecule;
use moldy::engine::builder::zmatrix_to_cartesian;
use moldy::engine::measure::{self, AngleArc, Measurement};
use tracing::info;

pub fn run(args: MeasureArgs) -> Result<()> {
    let molecule = load_frame(&args)?;
    let atoms = zero_based(&args.atoms)?;

    let measurement = measure::measure(&molecule, &atoms)?;
    let label = args
        .atoms
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join("-");
    info!("Measured {} for atoms {}.", measurement.kind(), label);
    println!("{} {}: {}", capitalize(measurement.kind()), label, measurement);

    if args.arc {
        let arc = angle_arc(&molecule, &atoms, &measurement)?;
        println!("Arc about atom {} ({} segments):", args.atoms[0], arc.samples.len() - 1);
        for p in &arc.samples {
            println!("  {:>10.4} {:>10.4} {:>10.4}", p.x, p.y, p.z);
        }
        let anchor = arc.label_anchor;
        println!(
            "Label anchor: {:.4} {:.4} {:.4}",
            anchor.x, anchor.y, anchor.z
        );
    }
    Ok(())
}

fn load_frame(args: &MeasureArgs) -> Result<Molecule> {
    let frames = files::read_frames(&args.input)?;
    let total = frames.len();
    let index = args
        .frame
        .checked_sub(1)
        .filter(|&i| i < total)
        .ok_or_else(|| {
            CliError::Argument(format!(
                "Frame {} does not exist; the input has {} frame(s).",
                args.frame, total
            ))
        })?;

    match frames {
        Frames::Zmatrices(zmatrices) => Ok(zmatrix_to_cartesian(&zmatrices[index])?),
        Frames::Molecules(mut molecules) => {
            Ok(molecules.swap_remove(index).without_dummy_atoms())
        }
    }
}

fn zero_based(atoms: &[usize]) -> Result<Vec<usize>> {
    atoms
        .iter()
        .map(|&n| {
            n.checked_sub(1).ok_or_else(|| {
                CliError::Argument("Atom numbers start at 1.".to_string())
            })
        })
        .collect()
}

fn angle_arc(molecule: &Molecule, atoms: &[usize], measurement: &Measurement) -> Result<AngleArc> {
    let (Measurement::Angle(_), &[vertex, a, b]) = (measurement, atoms) else {
        return Err(CliError::Argument(
            "An arc can only be drawn for a bond angle (three atoms).".to_string(),
        ));
    };
    let position = |i: usize| molecule.atoms()[i].position;
    measure::angle_arc(&position(vertex), &position(a), &position(b))
        .map_err(|e| CliError::Measure(e.into()))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
