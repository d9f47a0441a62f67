use anyhow::Result;
use quill_engine::logging::{init_logging, LoggingConfig};
use quill_engine::window::{Runtime, RuntimeConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "Quill".to_string(),
        ..RuntimeConfig::default()
    };
    log::info!(
        "starting {} ({:?}, {} Hz)",
        config.title,
        config.engine.fit_mode,
        config.engine.refresh_hz
    );

    Runtime::run(config)
}
