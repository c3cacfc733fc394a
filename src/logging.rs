use crate::config::GameConfig;
use crate::error::Result;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;

/// Send log records to the configured file. The terminal is busy drawing
/// the board, so nothing is logged to stdout or stderr.
pub fn init_logging(config: &GameConfig) -> Result<()> {
    let file = File::create(&config.log_file)?;
    let log_config = ConfigBuilder::new()
        .set_target_level(config.log_level)
        .build();
    WriteLogger::init(config.log_level, log_config, file)?;
    Ok(())
}
