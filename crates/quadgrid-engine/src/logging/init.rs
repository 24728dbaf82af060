use std::sync::Once;

/// Logger settings.
///
/// `env_filter` uses `env_logger` directive syntax, e.g.
/// `"info,quadgrid_engine=debug"`. When unset, `RUST_LOG` is consulted, then
/// [`DEFAULT_FILTER`].
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

/// `info` overall, with the chatty GPU and windowing crates held to `warn`.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn,winit=warn";

static INIT: Once = Once::new();

fn filter_directives(explicit: Option<String>, from_env: Option<String>) -> String {
    explicit
        .or(from_env)
        .unwrap_or_else(|| DEFAULT_FILTER.to_owned())
}

/// Installs the global logger, writing to stderr. Later calls do nothing.
///
/// Stdout is left to program output, so reports can be piped cleanly.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let directives = filter_directives(config.env_filter, std::env::var("RUST_LOG").ok());

        let installed = env_logger::Builder::new()
            .parse_filters(&directives)
            .write_style(config.write_style)
            .target(env_logger::Target::Stderr)
            .try_init();

        // A test harness may already own the logger.
        if installed.is_ok() {
            log::debug!("logging initialized with `{directives}`");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let got = filter_directives(Some("debug".into()), Some("trace".into()));
        assert_eq!(got, "debug");
    }

    #[test]
    fn env_filter_used_when_not_explicit() {
        assert_eq!(filter_directives(None, Some("warn".into())), "warn");
    }

    #[test]
    fn default_caps_gpu_crates() {
        let got = filter_directives(None, None);
        assert!(got.starts_with("info,"));
        assert!(got.contains("wgpu_core=warn"));
        assert!(got.contains("wgpu_hal=warn"));
    }
}
