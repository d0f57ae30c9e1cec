mod defaults;
mod models;

pub use defaults::DefaultsConfig;
pub use models::AppConfig;

use crate::cli::{CheckArgs, ConvertArgs};
use crate::error::{CliError, Result};
use moldy::core::io::traits::WriteOptions;
use moldy::engine::config::{ConversionConfigBuilder, FrameSelection};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialOutputConfig {
    precision: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialCheckConfig {
    tolerance: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialBatchConfig {
    frames: Option<FrameSelection>,
}

/// The contents of a TOML config file. Every section and key is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    output: Option<PartialOutputConfig>,
    check: Option<PartialCheckConfig>,
    batch: Option<PartialBatchConfig>,
}

/// Options given directly on the command line. They take precedence over `--set`
/// values, which in turn override the config file.
#[derive(Debug, Default)]
pub struct CliOverrides<'a> {
    pub precision: Option<usize>,
    pub tolerance: Option<f64>,
    pub frames: Option<FrameSelection>,
    pub set_values: &'a [String],
}

impl<'a> From<&'a ConvertArgs> for CliOverrides<'a> {
    fn from(args: &'a ConvertArgs) -> Self {
        Self {
            precision: args.precision,
            tolerance: None,
            frames: args.frames,
            set_values: &args.set_values,
        }
    }
}

impl<'a> From<&'a CheckArgs> for CliOverrides<'a> {
    fn from(args: &'a CheckArgs) -> Self {
        Self {
            precision: None,
            tolerance: args.tolerance,
            frames: args.frames,
            set_values: &args.set_values,
        }
    }
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Reads the config file when one is given, otherwise starts from an empty config.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_with_cli(mut self, overrides: CliOverrides<'_>) -> Result<AppConfig> {
        self.apply_set_values(overrides.set_values)?;
        let defaults = DefaultsConfig::default();

        let output = self.output.unwrap_or_default();
        let check = self.check.unwrap_or_default();
        let batch = self.batch.unwrap_or_default();

        let precision = overrides
            .precision
            .or(output.precision)
            .unwrap_or(defaults.precision);

        let conversion = ConversionConfigBuilder::new()
            .tolerance(
                overrides
                    .tolerance
                    .or(check.tolerance)
                    .unwrap_or(defaults.tolerance),
            )
            .frames(overrides.frames.or(batch.frames).unwrap_or(defaults.frames))
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        Ok(AppConfig {
            write_options: WriteOptions { precision },
            conversion,
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let value_str = value_str.trim();

            match key.trim() {
                "output.precision" => {
                    self.output.get_or_insert_with(Default::default).precision =
                        Some(value_str.parse().map_err(|_| {
                            CliError::Config(format!(
                                "Invalid integer value for {}: {}",
                                key, value_str
                            ))
                        })?);
                }
                "check.tolerance" => {
                    self.check.get_or_insert_with(Default::default).tolerance =
                        Some(value_str.parse().map_err(|_| {
                            CliError::Config(format!(
                                "Invalid float value for {}: {}",
                                key, value_str
                            ))
                        })?);
                }
                "batch.frames" => {
                    self.batch.get_or_insert_with(Default::default).frames = Some(
                        value_str
                            .parse()
                            .map_err(|e| CliError::Config(format!("{}", e)))?,
                    );
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    fn write_config_file(dir: &TempDir, content: &str) -> PathBuf {
        let file_path = dir.path().join("moldy.toml");
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn convert_args(extra: &[&str]) -> ConvertArgs {
        let mut args = vec!["moldy", "convert", "-i", "in.xyz", "-o", "out.zmat"];
        args.extend_from_slice(extra);
        match Cli::parse_from(args).command {
            Commands::Convert(args) => args,
            other => panic!("Expected 'convert' subcommand, got {:?}", other),
        }
    }

    #[test]
    fn empty_config_uses_defaults() {
        let args = convert_args(&[]);
        let config = PartialConfig::load(None)
            .unwrap()
            .merge_with_cli((&args).into())
            .unwrap();
        let defaults = DefaultsConfig::default();

        assert_eq!(config.write_options.precision, defaults.precision);
        assert_eq!(config.conversion.tolerance, defaults.tolerance);
        assert_eq!(config.conversion.frames, FrameSelection::All);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            [output]
            precision = 4

            [check]
            tolerance = 1e-3

            [batch]
            frames = "first"
            "#,
        );
        let args = convert_args(&[]);
        let config = PartialConfig::from_file(&path)
            .unwrap()
            .merge_with_cli((&args).into())
            .unwrap();

        assert_eq!(config.write_options.precision, 4);
        assert_eq!(config.conversion.tolerance, 1e-3);
        assert_eq!(config.conversion.frames, FrameSelection::First);
    }

    #[test]
    fn cli_arguments_override_set_values_and_file() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "[output]\nprecision = 4\n");
        let args = convert_args(&[
            "--precision",
            "2",
            "-S",
            "output.precision=9",
            "-S",
            "batch.frames=last",
        ]);
        let config = PartialConfig::from_file(&path)
            .unwrap()
            .merge_with_cli((&args).into())
            .unwrap();

        assert_eq!(config.write_options.precision, 2);
        assert_eq!(config.conversion.frames, FrameSelection::Last);
    }

    #[test]
    fn set_values_override_file() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "[check]\ntolerance = 0.5\n");
        let cli = Cli::parse_from([
            "moldy",
            "check",
            "-i",
            "in.zmat",
            "-S",
            "check.tolerance=1e-4",
        ]);
        let Commands::Check(args) = cli.command else {
            panic!("Expected 'check' subcommand");
        };
        let config = PartialConfig::from_file(&path)
            .unwrap()
            .merge_with_cli((&args).into())
            .unwrap();
        assert_eq!(config.conversion.tolerance, 1e-4);
    }

    #[test]
    fn invalid_set_values_are_rejected() {
        for set in ["output.precision", "output.precision=many", "check.colour=red"] {
            let args = convert_args(&["-S", set]);
            let result = PartialConfig::default().merge_with_cli((&args).into());
            assert!(
                matches!(result, Err(CliError::Config(_))),
                "'{}' should be rejected",
                set
            );
        }
    }

    #[test]
    fn non_positive_tolerance_is_a_config_error() {
        let args = convert_args(&["-S", "check.tolerance=0"]);
        let result = PartialConfig::default().merge_with_cli((&args).into());
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "[output]\ndigits = 3\n");
        assert!(matches!(
            PartialConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));
    }
}
