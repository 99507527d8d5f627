//! Diagnostic sink for the indexing pass.
//!
//! All progress and warning output goes through an injected [`Notifier`]
//! rather than a process-global logger, so the core scan stays testable
//! without capturing streams. Everything it emits lands on stderr; stdout is
//! reserved for the JSON index.
//!
//! Verbosity follows the `-v` count:
//! - Quiet (default) → a live spinner; warnings are still printed above it.
//! - Info/Debug/Trace → plain `env_logger`-formatted text logs.

use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Record};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    Quiet = 0,
    Info = 1,
    Debug = 2,
    Trace = 3,
}

impl From<u8> for VerbosityLevel {
    fn from(level: u8) -> Self {
        match level {
            0 => VerbosityLevel::Quiet,
            1 => VerbosityLevel::Info,
            2 => VerbosityLevel::Debug,
            _ => VerbosityLevel::Trace,
        }
    }
}

impl VerbosityLevel {
    fn to_log_level(self) -> LevelFilter {
        match self {
            VerbosityLevel::Quiet => LevelFilter::Warn,
            VerbosityLevel::Info => LevelFilter::Info,
            VerbosityLevel::Debug => LevelFilter::Debug,
            VerbosityLevel::Trace => LevelFilter::Trace,
        }
    }
}

pub struct Notifier {
    verbosity: VerbosityLevel,
    logger: env_logger::Logger,
    spinner: Option<ProgressBar>,
}

impl Notifier {
    pub fn new(verbosity_level: u8) -> Self {
        let verbosity = VerbosityLevel::from(verbosity_level);

        let logger = env_logger::Builder::from_env(Env::default())
            .filter_level(verbosity.to_log_level())
            .build();

        let spinner = if verbosity == VerbosityLevel::Quiet {
            let style = ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap();
            let spinner = ProgressBar::new_spinner().with_style(style);
            spinner.enable_steady_tick(Duration::from_millis(100));
            Some(spinner)
        } else {
            None
        };

        Self {
            verbosity,
            logger,
            spinner,
        }
    }

    pub fn info(&self, message: &str) {
        match &self.spinner {
            Some(spinner) => spinner.set_message(message.to_string()),
            None => self.log(Level::Info, message),
        }
    }

    pub fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    pub fn trace(&self, message: &str) {
        self.log(Level::Trace, message);
    }

    /// Warnings are part of the user-visible contract (one line per skipped
    /// layer), so in Quiet mode they are printed above the spinner instead of
    /// being swallowed.
    pub fn warn(&self, message: &str) {
        match &self.spinner {
            Some(spinner) => spinner.println(format!("warning: {}", message)),
            None => self.log(Level::Warn, message),
        }
    }

    /// Clears the spinner. Call before writing the index to stdout so the
    /// final terminal state is clean.
    pub fn finish(&self) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_and_clear();
        }
    }

    pub fn verbosity_level(&self) -> VerbosityLevel {
        self.verbosity
    }

    fn log(&self, level: Level, message: &str) {
        self.logger.log(
            &Record::builder()
                .args(format_args!("{}", message))
                .level(level)
                .target(module_path!())
                .build(),
        );
    }
}
