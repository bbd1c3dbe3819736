//! Logging setup for binaries and examples.
//!
//! The library crates only talk to the `log` facade. [`init_with_level`]
//! installs `env_logger` with the requested level for the `flash_shot*`
//! targets and `warn` for everything else (image decoders are chatty);
//! `RUST_LOG` directives still take precedence.

use log::LevelFilter;

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Prefix shared by every crate target of this workspace.
const OWN_TARGETS: &str = "flash_shot";

/// Filter directives shared by both backends: `level` for our own targets,
/// at most `warn` for dependencies.
pub fn default_directives(level: LevelFilter) -> String {
    let others = LevelFilter::Warn.min(level);
    format!(
        "{},{OWN_TARGETS}={}",
        others.as_str().to_ascii_lowercase(),
        level.as_str().to_ascii_lowercase()
    )
}

fn builder(level: LevelFilter) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder
        .parse_filters(&default_directives(level))
        .format_timestamp_millis();
    builder
}

/// Install `env_logger` on stderr. `RUST_LOG`, when set, is applied on top
/// of the default directives.
///
/// Fails when a logger is already installed.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    builder(level).parse_default_env().try_init()
}

/// Map a `-v` count to a level: warn, info, debug, then trace.
pub fn level_from_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install a `tracing-subscriber` fmt subscriber on stderr, JSON or plain.
/// `RUST_LOG` replaces the default directives when set.
#[cfg(feature = "tracing")]
pub fn init_tracing(level: LevelFilter, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE);
    let _ = if json {
        subscriber.json().flatten_event(true).finish().try_init()
    } else {
        subscriber
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_increasing_levels() {
        assert_eq!(level_from_verbosity(0), LevelFilter::Warn);
        assert_eq!(level_from_verbosity(1), LevelFilter::Info);
        assert_eq!(level_from_verbosity(2), LevelFilter::Debug);
        assert_eq!(level_from_verbosity(9), LevelFilter::Trace);
    }

    fn install(level: LevelFilter) -> Result<(), Box<dyn std::error::Error>> {
        init_with_level(level)?;
        Ok(())
    }

    #[test]
    fn second_install_reports_a_boxable_error() {
        let _ = install(LevelFilter::Warn);
        assert!(install(LevelFilter::Debug).is_err());
    }

    #[test]
    fn dependencies_are_capped_at_warn() {
        assert_eq!(default_directives(LevelFilter::Debug), "warn,flash_shot=debug");
        assert_eq!(default_directives(LevelFilter::Error), "error,flash_shot=error");
    }

    #[test]
    fn own_targets_follow_the_requested_level() {
        let logger = builder(LevelFilter::Debug).build();
        let own = log::Metadata::builder()
            .level(log::Level::Debug)
            .target("flash_shot_detector::detector::pipeline")
            .build();
        let foreign = log::Metadata::builder()
            .level(log::Level::Debug)
            .target("zune_jpeg::decoder")
            .build();
        assert!(log::Log::enabled(&logger, &own));
        assert!(!log::Log::enabled(&logger, &foreign));
    }
}
