//! Tracing initialisation
//!
//! Call [`init`] once at program start to configure the global subscriber.
//! Safe to call more than once; subsequent calls are silently ignored
//! (the global subscriber can only be set once per process).

use crate::config::{LogFormat, LogSettings};
use std::str::FromStr;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialise the global tracing subscriber.
///
/// `RUST_LOG` takes precedence when set. Otherwise the configured level
/// applies, and an invalid level falls back to `info`.
pub fn init(settings: &LogSettings) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(validated_level(&settings.level)));

    match settings.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_target(false).json())
                .try_init()
                .ok();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_target(false))
                .try_init()
                .ok();
        }
    }
}

/// Keep the configured level only if it parses as one.
///
/// The filter's directive grammar would accept an arbitrary string as a
/// target name, which silences everything the crate emits, so the level must
/// be validated as a level before it reaches the filter.
fn validated_level(level: &str) -> &str {
    if LevelFilter::from_str(level).is_ok() {
        level
    } else {
        "info"
    }
}
