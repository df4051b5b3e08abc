use std::io::Write;

use env_logger::{Builder, Env, fmt::Color};
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;
use log::{Level, LevelFilter};
use once_cell::sync::OnceCell;
use thiserror::Error;

/// Environment variable overriding the command line verbosity (e.g. `HEREDITY_LOG=trace`)
pub const LOG_ENV_VAR: &str = "HEREDITY_LOG";

static INSTANCE: OnceCell<Logger> = OnceCell::new();

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Failed to wrap the logger within a progress bar container")]
    WrapLogger(#[from] log::SetLoggerError),

    #[error("The global logger was already initialized")]
    AlreadyInitialized,
}

/// Global logger handle. Keeps track of the `MultiProgress` container that
/// log lines are routed through, so that progress bars are never garbled.
#[derive(Debug)]
pub struct Logger {
    multi_pg: MultiProgress,
}

impl Logger {
    /// Install the global logger.
    /// # Arguments
    /// - `verbosity`: 0: Error | 1: Warn | 2: Info | 3: Debug | 4+: Trace
    ///
    /// # Errors
    /// - if a global logger was already set.
    pub fn init(verbosity: u8) -> Result<(), LoggerError> {
        if INSTANCE.get().is_some() {
            return Err(LoggerError::AlreadyInitialized)
        }

        let env = Env::default().filter(LOG_ENV_VAR);
        let logger = Builder::new().filter_level(Self::u8_to_loglevel(verbosity))
            .format(|buf, record| {
                let (traceback, intense) = match record.level() {
                    Level::Error => (format!("(@ {}:{}) ", record.file().unwrap_or("unknown"), record.line().unwrap_or(0)), true),
                    _            => (String::new(), false),
                };

                let mut arg_style = buf.style();
                arg_style.set_intense(intense);

                let mut level_style = buf.style();
                let color = match record.level() {
                    Level::Error => Color::Red,
                    Level::Warn  => Color::Yellow,
                    Level::Info  => Color::Green,
                    Level::Debug => Color::Blue,
                    Level::Trace => Color::Cyan
                };
                level_style.set_color(color).set_bold(true);

                writeln!(
                    buf,
                    "[{} {: <5} {}] {traceback}{}",
                    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                    level_style.value(record.level()),
                    record.target(),
                    arg_style.value(record.args())
                )
            })
            .parse_env(env)
            .build();

        // ---- Route log lines through a MultiProgress, for progress bar support.
        let multi_pg = MultiProgress::new();
        LogWrapper::new(multi_pg.clone(), logger).try_init()?;
        INSTANCE.set(Self{multi_pg}).map_err(|_| LoggerError::AlreadyInitialized)
    }

    fn u8_to_loglevel(verbosity: u8) -> LevelFilter {
        match verbosity {
            0            => LevelFilter::Error,
            1            => LevelFilter::Warn,
            2            => LevelFilter::Info,
            3            => LevelFilter::Debug,
            4..= u8::MAX => LevelFilter::Trace
        }
    }

    pub fn set_level(verbosity: u8) {
        log::set_max_level(Self::u8_to_loglevel(verbosity));
    }

    /// Shared progress bar container. `None` if the logger was never initialized
    /// (e.g. when the library is used without the command line interface).
    pub fn multi() -> Option<&'static MultiProgress> {
        INSTANCE.get().map(|logger| &logger.multi_pg)
    }
}
