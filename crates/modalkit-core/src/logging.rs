#![forbid(unsafe_code)]

//! Logging facade.
//!
//! Library code logs through `tracing` and never installs a subscriber.
//! Binaries enable the `tracing-json` feature and call [`init_subscriber`].
//!
//! Targets in use:
//! - `modalkit.overlay`: lifecycle transitions, backdrop forwarding, config fallbacks.
//! - `modalkit.driver`: run start, cancel, and finish.
//! - `modalkit.demo`: the showcase binary.

pub use tracing::{debug, debug_span, error, info, trace, trace_span, warn};

/// Output format for [`init_subscriber`].
#[cfg(feature = "tracing-json")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Errors from [`init_subscriber`].
#[cfg(feature = "tracing-json")]
#[derive(Debug)]
pub enum LoggingError {
    /// The filter directive did not parse.
    Filter(String),
    /// A global subscriber is already installed.
    Install(String),
}

#[cfg(feature = "tracing-json")]
impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Filter(e) => write!(f, "invalid log filter: {e}"),
            Self::Install(e) => write!(f, "failed to install subscriber: {e}"),
        }
    }
}

#[cfg(feature = "tracing-json")]
impl std::error::Error for LoggingError {}

/// Install a global stderr subscriber.
///
/// `filter` uses `EnvFilter` syntax (for example `"modalkit=debug"`).
#[cfg(feature = "tracing-json")]
pub fn init_subscriber(format: LogFormat, filter: &str) -> Result<(), LoggingError> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(filter).map_err(|e| LoggingError::Filter(e.to_string()))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| LoggingError::Install(e.to_string()))
}
