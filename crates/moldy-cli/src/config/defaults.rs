use moldy::core::io::traits::DEFAULT_PRECISION;
use moldy::engine::config::FrameSelection;

/// Values used when neither the command line nor the config file sets an option.
pub struct DefaultsConfig {
    pub precision: usize,
    pub tolerance: f64,
    pub frames: FrameSelection,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            tolerance: 1e-6,
            frames: FrameSelection::All,
        }
    }
}
