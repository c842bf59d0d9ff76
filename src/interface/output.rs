use crate::models::Diagnostic;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
    Verbose,
}

impl LogLevel {
    fn icon(&self) -> &'static str {
        match self {
            LogLevel::Error => "❌",
            LogLevel::Warning => "⚠️",
            LogLevel::Info => "",
            LogLevel::Debug => "🔍",
            LogLevel::Verbose => "💬",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Verbose => write!(f, "VERBOSE"),
        }
    }
}

/// Console logger. Errors and warnings go to stderr, everything else to stdout.
#[derive(Debug, Clone)]
pub struct Logger {
    verbose: bool,
    debug: bool,
}

impl Logger {
    pub fn new(verbose: bool, debug: bool) -> Self {
        Self { verbose, debug }
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        match level {
            LogLevel::Error | LogLevel::Warning | LogLevel::Info => true,
            LogLevel::Debug => self.debug || self.verbose,
            LogLevel::Verbose => self.verbose,
        }
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        if !self.should_log(level) {
            return;
        }
        let line = match level.icon() {
            "" => message.to_string(),
            icon => format!("{} {}", icon, message),
        };
        match level {
            LogLevel::Error | LogLevel::Warning => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    pub fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn verbose(&self, message: &str) {
        self.log(LogLevel::Verbose, message);
    }

    /// One warning per field-scoped resolution failure
    pub fn diagnostics(&self, package: &str, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            self.warning(&format!("{}: {}", package, diagnostic));
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Spinner over the configured packages; plain log lines in verbose mode
pub struct ProgressReporter {
    logger: Logger,
    progress_bar: Option<ProgressBar>,
    current_step: usize,
    total_steps: usize,
    step_name: String,
}

impl ProgressReporter {
    pub fn new(logger: Logger, total_steps: usize) -> Self {
        let progress_bar = (!logger.is_verbose()).then(|| {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
                pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });

        Self {
            logger,
            progress_bar,
            current_step: 0,
            total_steps,
            step_name: String::new(),
        }
    }

    pub fn start_step(&mut self, step_name: &str) {
        self.current_step += 1;
        self.step_name = step_name.to_string();
        let message = format!("{} ({}/{})", step_name, self.current_step, self.total_steps);

        match &self.progress_bar {
            Some(pb) => pb.set_message(message),
            None => self.logger.info(&format!("🚀 {}", message)),
        }
    }

    pub fn complete_step(&mut self, message: &str) {
        if self.progress_bar.is_none() {
            self.logger
                .info(&format!("✅ {} - {}", self.step_name, message));
        }
    }

    /// Report a failed step. The spinner keeps going for the remaining steps.
    pub fn fail_step(&mut self, error: &str) {
        let line = format!("Failed {}: {}", self.step_name, error);
        match &self.progress_bar {
            Some(pb) => pb.suspend(|| self.logger.error(&line)),
            None => self.logger.error(&line),
        }
    }

    /// Log without tearing the spinner line
    pub fn suspend<F: FnOnce()>(&self, f: F) {
        match &self.progress_bar {
            Some(pb) => pb.suspend(f),
            None => f(),
        }
    }

    pub fn finish(&self, total_message: &str) {
        if let Some(pb) = &self.progress_bar {
            pb.finish_and_clear();
        }
        println!("✓ {}", total_message);
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Some(pb) = &self.progress_bar {
            pb.finish_and_clear();
        }
    }
}
