use std::io::IsTerminal;

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Environment variable read for log directives before `RUST_LOG`.
pub const LOG_ENV: &str = "FWAP_LOG";

/// When to color diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

/// Settings shared by every command of the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub color_enabled: bool,
    /// Log directive used when neither `FWAP_LOG` nor `RUST_LOG` is set.
    pub log_level:     &'static str,
}

impl AppConfig {
    /// Builds the configuration from the global flags.
    ///
    /// `-q` silences everything but errors; each `-v` raises the level from
    /// `warn` to `info`, `debug`, then `trace`.
    #[must_use]
    pub fn new(color: ColorChoice, verbose: u8, quiet: bool) -> Self {
        let color_enabled = match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::io::stderr().is_terminal(),
        };
        let log_level = match (quiet, verbose) {
            (true, _) => "error",
            (false, 0) => "warn",
            (false, 1) => "info",
            (false, 2) => "debug",
            (false, _) => "trace",
        };
        Self { color_enabled,
               log_level }
    }

    /// The log filter: `FWAP_LOG`, else `RUST_LOG`, else the flag level.
    /// An explicit `-v` or `-q` wins over the environment.
    #[must_use]
    pub fn log_filter(&self, explicit: bool) -> EnvFilter {
        if explicit {
            return EnvFilter::new(self.log_level);
        }
        EnvFilter::try_from_env(LOG_ENV).or_else(|_| EnvFilter::try_from_default_env())
                                        .unwrap_or_else(|_| EnvFilter::new(self.log_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_pick_log_level() {
        assert_eq!(AppConfig::new(ColorChoice::Never, 0, false).log_level, "warn");
        assert_eq!(AppConfig::new(ColorChoice::Never, 2, false).log_level, "debug");
        assert_eq!(AppConfig::new(ColorChoice::Never, 5, false).log_level, "trace");
        assert_eq!(AppConfig::new(ColorChoice::Never, 3, true).log_level, "error");
    }

    #[test]
    fn explicit_color_choice_wins() {
        assert!(AppConfig::new(ColorChoice::Always, 0, false).color_enabled);
        assert!(!AppConfig::new(ColorChoice::Never, 0, false).color_enabled);
    }
}
