use moldy::core::io::traits::WriteOptions;
use moldy::engine::config::ConversionConfig;

/// Fully resolved settings for one command invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppConfig {
    pub write_options: WriteOptions,
    pub conversion: ConversionConfig,
}
