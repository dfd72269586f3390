//! Telemetry initialization (tracing/tracing-subscriber/tracing-appender).
//!
//! Behavior:
//! - LOG_LEVEL controls the stderr filter (e.g. "debug" or detailed directives like
//!   "warn,match=debug,party_quiz=info").
//! - LOG_FORMAT selects "pretty" (default) or "json" structured logs on stderr.
//! - Game events at info and above also go to a daily rotating file,
//!   `<paths.logs>/game.YYYY-MM-DD.log`.
//!
//! Notes:
//! - Logs go to stderr so they never interleave with the game text on stdout.
//! - Targets are printed: "party_quiz" for setup and persistence, "match" for play.

use std::path::Path;

use tracing::Subscriber;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

// Quiet by default: the console is the game board.
const DEFAULT_DIRECTIVES: &str = "warn";
const FILE_DIRECTIVES: &str = "info";
const LOG_FILE_PREFIX: &str = "game";
const LOG_FILE_SUFFIX: &str = "log";

fn stderr_filter() -> EnvFilter {
    EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

fn stderr_layer<S>() -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => layer.json().boxed(),
        _ => layer.boxed(),
    }
}

/// Appender starting a new file each day. Creates `dir` when missing.
pub fn daily_appender(dir: &Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(dir)
}

fn file_layer<S>(appender: RollingFileAppender) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(appender)
        .with_ansi(false)
        .with_target(true)
        .with_filter(EnvFilter::new(FILE_DIRECTIVES))
}

/// Run `f` with stderr logging only. Used while the config, and with it the log
/// directory, is still being loaded.
pub fn with_startup_logging<T>(f: impl FnOnce() -> T) -> T {
    let subscriber = tracing_subscriber::registry().with(stderr_layer::<Registry>().with_filter(stderr_filter()));
    tracing::subscriber::with_default(subscriber, f)
}

pub fn init_tracing(log_dir: &Path) {
    let (file, failure) = match daily_appender(log_dir) {
        Ok(appender) => (Some(file_layer(appender)), None),
        Err(e) => (None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(stderr_layer::<Registry>().with_filter(stderr_filter()))
        .with(file)
        .init();

    if let Some(e) = failure {
        tracing::warn!(target: "party_quiz", dir = %log_dir.display(), error = %e, "Game log unavailable; logging to stderr only");
    }
}
