use std::sync::Once;

use env_logger::Env;

/// Logger configuration.
///
/// `env_filter` uses `env_logger` directives, e.g. "debug" or
/// "diorama_engine::schedule=trace". When unset, `RUST_LOG` applies, then
/// `info` with wgpu internals held at `warn`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

static INIT: Once = Once::new();

/// Installs the global logger. Later calls are no-ops.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER));
        if let Some(filter) = &config.env_filter {
            builder.parse_filters(filter);
        }
        builder.write_style(config.write_style).format_timestamp_millis();

        if builder.try_init().is_err() {
            // Another logger was installed by the host application.
            return;
        }
        log::debug!("logging initialized");
    });
}
