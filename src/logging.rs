//! Logging setup for the binaries. The library itself only uses the `log` facade.

use std::path::Path;

use log::{info, warn, LevelFilter};
use log4rs::{
    append::console::{ConsoleAppender, Target},
    config::{runtime::ConfigErrors, Appender, Root},
    encode::pattern::PatternEncoder,
};
use log4rs_dynamic_filters::DynamicLevelFilter;
use thiserror::Error;

/// The usual logging configuration file.
pub const LOG_CONFIG_FILE: &str = "log4rs.yaml";

/// Name of the dynamic filter guarding the ledger's own output in `log4rs.yaml`.
pub const LEDGER_FILTER: &str = "ledger";

const FALLBACK_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l:<5})} {t} - {m}{n}";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid logging configuration: {0}")]
    Config(#[from] ConfigErrors),
    #[error("Logging already initialised: {0}")]
    AlreadySet(#[from] log::SetLoggerError),
}

/// Initialise logging from the given `log4rs` configuration file. If the file
/// is missing or unusable, warnings and errors go to stderr instead.
pub fn init_logging(path: impl AsRef<Path>) -> Result<(), LoggingError> {
    let path = path.as_ref();
    match log4rs::init_file(path, log4rs_dynamic_filters::default_deserializers()) {
        Ok(()) => {
            info!("Initialised logging from {}", path.display());
        }
        Err(err) => {
            log4rs::init_config(fallback_config(LevelFilter::Warn)?)?;
            warn!(
                "Could not load logging configuration from {}: {err}",
                path.display()
            );
        }
    }
    Ok(())
}

/// Change how much the ledger logs, without touching other targets.
/// Has no effect unless the configuration file declares the ledger filter.
pub fn set_ledger_level(level: LevelFilter) {
    DynamicLevelFilter::set(LEDGER_FILTER, level);
}

/// A console-only configuration, writing to stderr so it never mixes with program output.
fn fallback_config(level: LevelFilter) -> Result<log4rs::Config, ConfigErrors> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(FALLBACK_PATTERN)))
        .build();
    log4rs::Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))
}
