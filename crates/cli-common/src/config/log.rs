use std::{
    convert::Infallible,
    fmt::{self, Display, Formatter},
    fs::OpenOptions,
    path::PathBuf,
    str::FromStr,
    sync::Mutex,
};

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use tracing_subscriber::{
    fmt::MakeWriter, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt, Layer,
};

/// Where and how log records are emitted.
///
/// Every sink is optional; a command-line tool usually only needs stdout, but
/// unattended runs (cron, CI) may prefer a file or journald.
#[serde_as]
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LogConfig {
    #[serde(default = "LogConfig::default_file_path")]
    pub file_path: Option<PathBuf>,

    #[serde(default = "LogConfig::default_emit_journald")]
    pub emit_journald: bool,

    #[serde(default = "LogConfig::default_emit_stdout")]
    pub emit_stdout: bool,

    #[serde(default = "LogConfig::default_emit_stderr")]
    pub emit_stderr: bool,

    #[serde(default = "LogConfig::default_log_filters")]
    pub log_filters: String,

    #[serde(default = "LogConfig::default_log_formatter")]
    #[serde_as(as = "DisplayFromStr")]
    pub formatter: LogFormatter,

    // Include the module path of the emitting call site
    #[serde(default = "LogConfig::default_show_target")]
    pub show_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file_path: Self::default_file_path(),
            emit_journald: Self::default_emit_journald(),
            emit_stdout: Self::default_emit_stdout(),
            emit_stderr: Self::default_emit_stderr(),
            log_filters: Self::default_log_filters(),
            formatter: Self::default_log_formatter(),
            show_target: Self::default_show_target(),
        }
    }
}

impl LogConfig {
    #[inline]
    #[must_use]
    pub fn default_log_filters() -> String { "info".to_string() }

    #[inline]
    #[must_use]
    pub const fn default_file_path() -> Option<PathBuf> { None }

    #[inline]
    #[must_use]
    pub const fn default_emit_journald() -> bool { false }

    #[inline]
    #[must_use]
    pub const fn default_emit_stdout() -> bool { true }

    #[inline]
    #[must_use]
    pub const fn default_emit_stderr() -> bool { false }

    #[inline]
    #[must_use]
    pub const fn default_log_formatter() -> LogFormatter { LogFormatter::Compact }

    #[inline]
    #[must_use]
    pub const fn default_show_target() -> bool { false }

    /// Replace the filter directives, e.g. `debug` or `info,akv_keygen_client=trace`.
    #[must_use]
    pub fn with_log_filters<S: Into<String>>(mut self, log_filters: S) -> Self {
        self.log_filters = log_filters.into();
        self
    }

    /// Only let errors through.
    #[must_use]
    pub fn quiet(self) -> Self { self.with_log_filters("error") }

    /// Install the global subscriber.
    ///
    /// # Panics
    ///
    /// Panics if a global subscriber has already been installed.
    pub fn registry(&self) {
        let Self {
            file_path,
            emit_journald,
            emit_stdout,
            emit_stderr,
            log_filters,
            formatter,
            show_target,
        } = self;

        let filter_layer = tracing_subscriber::filter::EnvFilter::new(log_filters.as_str());

        tracing_subscriber::registry()
            .with(filter_layer)
            .with(emit_journald.then(|| LogDriver::Journald.layer(*formatter, *show_target)))
            .with(
                file_path
                    .clone()
                    .and_then(|path| LogDriver::File(path).layer(*formatter, *show_target)),
            )
            .with(emit_stdout.then(|| LogDriver::Stdout.layer(*formatter, *show_target)))
            .with(emit_stderr.then(|| LogDriver::Stderr.layer(*formatter, *show_target)))
            .init();
    }
}

#[derive(Clone, Debug)]
enum LogDriver {
    Stdout,
    Stderr,
    Journald,
    File(PathBuf),
}

impl LogDriver {
    // journald records are structured already, `formatter` is ignored there
    fn layer<S>(
        self,
        formatter: LogFormatter,
        show_target: bool,
    ) -> Option<Box<dyn Layer<S> + Send + Sync + 'static>>
    where
        S: tracing::Subscriber,
        for<'a> S: LookupSpan<'a>,
    {
        match self {
            Self::Stdout => Some(formatted_layer(formatter, std::io::stdout, show_target, true)),
            Self::Stderr => Some(formatted_layer(formatter, std::io::stderr, show_target, true)),
            Self::File(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path).ok()?;
                Some(formatted_layer(formatter, Mutex::new(file), show_target, false))
            }
            Self::Journald => Some(tracing_journald::layer().ok()?.boxed()),
        }
    }
}

fn formatted_layer<S, W>(
    formatter: LogFormatter,
    writer: W,
    show_target: bool,
    ansi: bool,
) -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: tracing::Subscriber,
    for<'a> S: LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let fmt = tracing_subscriber::fmt::layer()
        .with_target(show_target)
        .with_ansi(ansi)
        .with_writer(writer);

    match formatter {
        LogFormatter::Pretty => fmt.pretty().boxed(),
        LogFormatter::Compact => fmt.compact().boxed(),
        LogFormatter::Json => fmt.json().flatten_event(true).boxed(),
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum LogFormatter {
    Pretty,
    Compact,
    Json,
}

impl FromStr for LogFormatter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            _ => Ok(Self::Compact),
        }
    }
}

impl Display for LogFormatter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Compact => write!(f, "compact"),
            Self::Json => write!(f, "json"),
        }
    }
}
