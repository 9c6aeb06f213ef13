// scour/src/logger.rs
//! Logger bootstrap for the CLI. Level selection is flag-driven; RUST_LOG
//! still applies when neither flag is given.

use log::LevelFilter;

pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None);
    // Ignore a second init in tests.
    let _ = builder.try_init();
}
