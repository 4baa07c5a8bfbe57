use std::any::Any;
use std::panic;
use std::path::PathBuf;
use std::sync::OnceLock;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogSink {
    #[default]
    Stdout,
    /// `<dir>/<service>.log`, rotated daily.
    DailyFile(PathBuf),
}

/// Resolved logging options; built by the service from its own config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub service: &'static str,
    /// `EnvFilter` directives, e.g. `info,jm_common=debug`.
    pub filter: String,
    pub sink: LogSink,
    /// Also run the default panic hook (prints the backtrace to stderr).
    pub panic_backtrace: bool,
}

impl LogSettings {
    pub fn new(service: &'static str) -> Self {
        Self {
            service,
            filter: "info".into(),
            sink: LogSink::Stdout,
            panic_backtrace: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter `{filter}`: {source}")]
    Filter {
        filter: String,
        #[source]
        source: ParseError,
    },
    #[error("cannot create log directory {dir}: {source}")]
    LogDir {
        dir: String,
        #[source]
        source: std::io::Error,
    },
}

/// Flushes the file writer when dropped. Hold it for the life of the process.
#[must_use]
pub struct LogGuard(#[allow(dead_code)] Option<WorkerGuard>);

/// Install the global subscriber.
///
/// A second call in the same process keeps the first subscriber.
pub fn init_logging(settings: &LogSettings) -> Result<LogGuard, LoggingError> {
    let filter = EnvFilter::try_new(&settings.filter).map_err(|source| LoggingError::Filter {
        filter: settings.filter.clone(),
        source,
    })?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let guard = match &settings.sink {
        LogSink::Stdout => {
            let _ = builder.try_init();
            None
        }
        LogSink::DailyFile(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| LoggingError::LogDir {
                dir: dir.display().to_string(),
                source,
            })?;
            let appender = tracing_appender::rolling::daily(dir, format!("{}.log", settings.service));
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = builder.with_writer(writer).with_ansi(false).try_init();
            Some(guard)
        }
    };

    Ok(LogGuard(guard))
}

/// Route panics through `tracing`, tagged with the service name. Installed once.
pub fn install_panic_hook(settings: &LogSettings) {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    let service = settings.service;
    let chain_default = settings.panic_backtrace;

    INSTALLED.get_or_init(|| {
        let default_hook = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let thread = std::thread::current();
            let location = info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()))
                .unwrap_or_default();

            tracing::error!(
                service,
                thread = thread.name().unwrap_or("unnamed"),
                %location,
                panic_message = panic_message(info.payload()),
                "panic"
            );

            if chain_default {
                default_hook(info);
            }
        }));
    });
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
