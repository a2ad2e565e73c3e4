use std::env;
use tracing::Subscriber;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

use crate::config::LogConfig;
use crate::errors::TelemetryError;

/// Handle on the process-wide log filter.
///
/// Every invocation puts the default level back to INFO, whatever `RUST_LOG`
/// or a previous invocation left behind. Directives naming a target, span or
/// field keep their own level.
#[derive(Clone)]
pub struct Verbosity {
    handle: Option<reload::Handle<EnvFilter, Registry>>,
    target_directives: String,
}

impl Verbosity {
    /// A control with no subscriber behind it. Resetting always succeeds.
    pub fn detached() -> Self {
        Self {
            handle: None,
            target_directives: String::new(),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.handle.is_some()
    }

    pub fn reset_to_info(&self) -> Result<(), TelemetryError> {
        let Some(handle) = &self.handle else {
            return Ok(());
        };
        let filter = EnvFilter::builder()
            .parse_lossy(&self.target_directives)
            .add_directive(LevelFilter::INFO.into());
        handle
            .reload(filter)
            .map_err(|e| TelemetryError::Reload {
                reason: e.to_string(),
            })
    }
}

impl std::fmt::Debug for Verbosity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Verbosity")
            .field("attached", &self.is_attached())
            .field("target_directives", &self.target_directives)
            .finish()
    }
}

/// Drops bare level directives such as `info` or `3`, which set the default
/// level, and keeps everything scoped to a target, span or field.
fn target_directives(directives: &str) -> String {
    directives
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty() && d.parse::<LevelFilter>().is_err())
        .collect::<Vec<_>>()
        .join(",")
}

/// `RUST_LOG` when it is set and valid, otherwise `LogConfig::filter`.
pub fn directives_from_env(config: &LogConfig) -> String {
    env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|directives| EnvFilter::try_new(directives).is_ok())
        .unwrap_or_else(|| config.filter.clone())
}

/// Builds the registry without installing it, so callers can scope it with
/// `tracing::subscriber::with_default` or install it globally.
pub fn subscriber<W>(
    directives: &str,
    config: &LogConfig,
    make_writer: W,
) -> Result<(impl Subscriber + Send + Sync + use<W>, Verbosity), TelemetryError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_new(directives).map_err(|e| TelemetryError::InvalidFilter {
        directive: directives.to_string(),
        reason: e.to_string(),
    })?;
    let (filter, handle) = reload::Layer::new(filter);
    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(make_writer)
            .with_ansi(config.ansi)
            .with_target(config.with_target),
    );
    let verbosity = Verbosity {
        handle: Some(handle),
        target_directives: target_directives(directives),
    };
    Ok((subscriber, verbosity))
}

/// Installs the global subscriber writing to stdout, where the Lambda
/// runtime picks up function logs.
pub fn init_tracing(config: &LogConfig) -> Result<Verbosity, TelemetryError> {
    let directives = directives_from_env(config);
    let (subscriber, verbosity) = subscriber(&directives, config, std::io::stdout)?;
    subscriber.try_init().map_err(|e| TelemetryError::Init {
        reason: e.to_string(),
    })?;
    Ok(verbosity)
}
