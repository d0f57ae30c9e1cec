use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Which frames of a multi-frame input are processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameSelection {
    #[default]
    All,
    First,
    Last,
}

impl FrameSelection {
    /// Keeps the selected frames, preserving their order.
    pub fn select<T>(self, mut frames: Vec<T>) -> Vec<T> {
        match self {
            Self::All => frames,
            Self::First => {
                frames.truncate(1);
                frames
            }
            Self::Last => frames.pop().into_iter().collect(),
        }
    }
}

impl fmt::Display for FrameSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::All => "all",
            Self::First => "first",
            Self::Last => "last",
        };
        f.write_str(name)
    }
}

impl FromStr for FrameSelection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            other => Err(ConfigError::InvalidParameter {
                name: "frames",
                reason: format!("expected 'all', 'first' or 'last', got '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionConfig {
    pub frames: FrameSelection,
    /// Largest accepted pairwise-distance deviation in a round-trip check, in Angstroms.
    pub tolerance: f64,
}

#[derive(Default)]
pub struct ConversionConfigBuilder {
    frames: Option<FrameSelection>,
    tolerance: Option<f64>,
}

impl ConversionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(mut self, frames: FrameSelection) -> Self {
        self.frames = Some(frames);
        self
    }
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn build(self) -> Result<ConversionConfig, ConfigError> {
        let tolerance = self
            .tolerance
            .ok_or(ConfigError::MissingParameter("tolerance"))?;
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "tolerance",
                reason: format!("must be a positive number, got {}", tolerance),
            });
        }
        Ok(ConversionConfig {
            frames: self
                .frames
                .ok_or(ConfigError::MissingParameter("frames"))?,
            tolerance,
        })
    }
}
