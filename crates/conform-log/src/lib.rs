//! Leveled diagnostic logging for the `conform` engine.
//!
//! The engine explains *why* a value failed a structural check (a missing
//! interface member, a signature mismatch, an enforcement failure) through
//! the macros exported here. Nothing is printed unless the level allows it,
//! and the default level is [`Level::Warn`], so a library user sees nothing
//! until they opt in.
//!
//! The level is read once from the `CONFORM_LOG` environment variable
//! (`error`, `warn`, `info`, `debug`, `trace` or `off`) and can be changed at
//! any time with [`set_level`], [`set_level_from_str`] or [`disable`].
//!
//! # Example
//!
//! ```
//! use conform_log::{debug, trace, Level};
//!
//! conform_log::set_level(Level::Debug);
//!
//! debug!("wrapping {}", "greet");
//! trace!("this one is filtered out");
//! ```

use std::fmt::{self, Arguments};
use std::io::Write;
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Environment variable consulted when the logger is first used.
pub const LOG_ENV: &str = "CONFORM_LOG";

/// Level used when `CONFORM_LOG` is unset or invalid.
pub const DEFAULT_LEVEL: Level = Level::Warn;

/// Severity of a log record, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Failures the caller must act on
    Error = 0,
    /// Suspicious but recoverable situations (bad configuration, ambiguity)
    Warn = 1,
    /// Coarse lifecycle events
    Info = 2,
    /// Enforcement decisions
    Debug = 3,
    /// Per-member conformance reasoning
    Trace = 4,
}

impl Level {
    const ALL: [Level; 5] = [
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Debug,
        Level::Trace,
    ];

    const fn color_code(self) -> &'static str {
        match self {
            Level::Error => "\x1b[31m",
            Level::Warn => "\x1b[33m",
            Level::Info => "\x1b[32m",
            Level::Debug => "\x1b[36m",
            Level::Trace => "\x1b[35m",
        }
    }

    /// Upper-case name used in log output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a level name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError {
    input: String,
}

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid log level '{}' (expected error, warn, info, debug, trace or off)",
            self.input
        )
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    /// Parses a level name, ignoring case.
    ///
    /// ```
    /// use conform_log::Level;
    ///
    /// assert_eq!("trace".parse::<Level>(), Ok(Level::Trace));
    /// assert!("verbose".parse::<Level>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Level::Error),
            "warn" | "warning" => Ok(Level::Warn),
            "info" => Ok(Level::Info),
            "debug" => Ok(Level::Debug),
            "trace" => Ok(Level::Trace),
            _ => Err(ParseLevelError {
                input: s.to_string(),
            }),
        }
    }
}

/// Parses a level filter: a level name or `off`.
///
/// Returns `Ok(None)` for `off`.
///
/// # Errors
///
/// Returns [`ParseLevelError`] for anything else.
pub fn parse_filter(s: &str) -> Result<Option<Level>, ParseLevelError> {
    if s.trim().eq_ignore_ascii_case("off") {
        return Ok(None);
    }
    s.parse().map(Some)
}

/// Process-wide logger state.
///
/// `enabled_count` is the number of levels that pass the filter: `0` means
/// logging is off, `5` means everything up to `Trace` is printed.
pub struct Logger {
    enabled_count: AtomicU8,
    color: AtomicBool,
}

impl Logger {
    const fn new(filter: Option<Level>, color: bool) -> Self {
        Logger {
            enabled_count: AtomicU8::new(Self::encode(filter)),
            color: AtomicBool::new(color),
        }
    }

    const fn encode(filter: Option<Level>) -> u8 {
        match filter {
            Some(level) => level as u8 + 1,
            None => 0,
        }
    }

    /// Sets the most verbose level that is still printed.
    pub fn set_level(&self, level: Level) {
        self.enabled_count
            .store(Self::encode(Some(level)), Ordering::SeqCst);
    }

    /// Turns logging off entirely.
    pub fn disable(&self) {
        self.enabled_count.store(0, Ordering::SeqCst);
    }

    /// Returns the current filter, `None` when logging is off.
    pub fn level(&self) -> Option<Level> {
        match self.enabled_count.load(Ordering::Relaxed) {
            0 => None,
            n => Level::ALL.get(usize::from(n) - 1).copied(),
        }
    }

    /// Checks whether a record at `level` would be printed.
    pub fn enabled(&self, level: Level) -> bool {
        (level as u8) < self.enabled_count.load(Ordering::Relaxed)
    }

    /// Enables or disables ANSI colors in the output.
    pub fn set_color(&self, color: bool) {
        self.color.store(color, Ordering::Relaxed);
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Resolves the raw value of `CONFORM_LOG` into a filter.
fn filter_from_var(raw: Option<&str>) -> Option<Level> {
    match raw.map(parse_filter) {
        Some(Ok(filter)) => filter,
        Some(Err(err)) => {
            eprintln!("[WARN] conform_log: {err}; using {DEFAULT_LEVEL}");
            Some(DEFAULT_LEVEL)
        }
        None => Some(DEFAULT_LEVEL),
    }
}

/// Returns the global logger, reading `CONFORM_LOG` on first use.
///
/// Colors are disabled when `NO_COLOR` is set.
pub fn get_logger() -> &'static Logger {
    LOGGER.get_or_init(|| {
        let color = std::env::var_os("NO_COLOR").is_none();
        Logger::new(filter_from_var(std::env::var(LOG_ENV).ok().as_deref()), color)
    })
}

/// Sets the level of the global logger.
pub fn set_level(level: Level) {
    get_logger().set_level(level);
}

/// Turns the global logger off.
pub fn disable() {
    get_logger().disable();
}

/// Sets the level of the global logger from a level name or `off`.
///
/// # Errors
///
/// Returns [`ParseLevelError`] when the string is not a known level.
///
/// ```
/// conform_log::set_level_from_str("debug").unwrap();
/// assert!(conform_log::set_level_from_str("loud").is_err());
/// ```
pub fn set_level_from_str(s: &str) -> Result<(), ParseLevelError> {
    match parse_filter(s)? {
        Some(level) => set_level(level),
        None => disable(),
    }
    Ok(())
}

#[doc(hidden)]
pub fn __log_with_target(level: Level, target: &str, args: Arguments) {
    const RESET: &str = "\x1b[0m";

    let logger = get_logger();
    if !logger.enabled(level) {
        return;
    }

    let stderr = std::io::stderr();
    let mut out = stderr.lock();
    // Write errors on stderr are ignored.
    let _ = if logger.color.load(Ordering::Relaxed) {
        writeln!(out, "{}[{level}]{RESET} {target}: {args}", level.color_code())
    } else {
        writeln!(out, "[{level}] {target}: {args}")
    };
}

/// Logs a record at an explicit level, tagged with the calling module path.
///
/// ```
/// use conform_log::{log, Level};
///
/// log!(level: Level::Info, "checked {} values", 3);
/// ```
#[macro_export]
macro_rules! log {
    (level: $level:expr, $($arg:tt)*) => {
        {
            if $crate::get_logger().enabled($level) {
                $crate::__log_with_target(
                    $level,
                    module_path!(),
                    format_args!($($arg)*)
                );
            }
        }
    };
}

/// Logs at [`Level::Error`].
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Error, $($arg)*)
    };
}

/// Logs at [`Level::Warn`].
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Warn, $($arg)*)
    };
}

/// Logs at [`Level::Info`].
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Info, $($arg)*)
    };
}

/// Logs at [`Level::Debug`].
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Debug, $($arg)*)
    };
}

/// Logs at [`Level::Trace`].
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Trace, $($arg)*)
    };
}
