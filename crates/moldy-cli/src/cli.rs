use clap::{Args, Parser, Subcommand};
use moldy::engine::config::FrameSelection;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Moldy Developers",
    version,
    about = "Moldy CLI - Convert molecular geometries between Z-matrix internal coordinates and Cartesian coordinates.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set the number of threads for batch conversion.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a structure between the .zmat and .xyz formats.
    Convert(ConvertArgs),
    /// Measure a distance, bond angle or dihedral between atoms of a structure.
    Measure(MeasureArgs),
    /// Verify that converting a structure back and forth preserves its geometry.
    Check(CheckArgs),
}

/// Arguments for the `convert` subcommand.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Path to the input structure (.zmat or .xyz).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output structure. Its extension selects the output format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Override the number of decimal places in written values.
    #[arg(short, long, value_name = "INT")]
    pub precision: Option<usize>,

    /// Override which frames of a multi-frame input are converted.
    #[arg(short, long, value_name = "all|first|last")]
    pub frames: Option<FrameSelection>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S output.precision=4
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `measure` subcommand.
#[derive(Args, Debug)]
pub struct MeasureArgs {
    /// Path to the input structure (.zmat or .xyz).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// 1-based atom numbers: two for a distance, three for an angle at the first
    /// atom, four for a dihedral. Dummy (X) atoms are not counted.
    #[arg(required = true, num_args = 2..=4, value_name = "ATOM")]
    pub atoms: Vec<usize>,

    /// 1-based frame number for multi-frame inputs.
    #[arg(long, default_value_t = 1, value_name = "INT")]
    pub frame: usize,

    /// Also print the points of the arc that marks a bond angle.
    #[arg(long)]
    pub arc: bool,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the input structure (.zmat or .xyz).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Override the largest accepted change of any inter-atomic distance, in Angstroms.
    #[arg(short, long, value_name = "FLOAT")]
    pub tolerance: Option<f64>,

    /// Override which frames of a multi-frame input are checked.
    #[arg(short, long, value_name = "all|first|last")]
    pub frames: Option<FrameSelection>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S check.tolerance=1e-4
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
