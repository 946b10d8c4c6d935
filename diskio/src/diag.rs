//! Diagnostic logging
//!
//! A `log` backend with a fixed set of tiers (error, warn, info, debug)
//! that can be masked independently. The mask is owned by the logger and
//! only changes through [`set_verbosity`].
//!
//! Fatal messages bypass the mask and terminate the process. They are for
//! the binary that hosts the disk layer, not for the layer itself: every
//! operation in this crate reports failures through [`crate::DiskError`].

use core::fmt;
use core::panic::Location;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};

use bitflags::bitflags;
use log::{Level, LevelFilter, Log, Metadata, Record};

bitflags! {
    /// Which tiers are printed
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Verbosity: u8 {
        /// Errors
        const ERROR = 0x01;
        /// Warnings
        const WARN = 0x02;
        /// Informational messages
        const INFO = 0x04;
        /// Per-request tracing, on by default in debug builds
        const DEBUG = 0x10;
    }
}

const DEFAULT_MASK: u8 = {
    let base = Verbosity::ERROR.bits() | Verbosity::WARN.bits() | Verbosity::INFO.bits();
    if cfg!(debug_assertions) {
        base | Verbosity::DEBUG.bits()
    } else {
        base
    }
};

impl Verbosity {
    /// Tier a `log` level is filed under
    pub fn for_level(level: Level) -> Self {
        match level {
            Level::Error => Self::ERROR,
            Level::Warn => Self::WARN,
            Level::Info => Self::INFO,
            Level::Debug | Level::Trace => Self::DEBUG,
        }
    }

    /// Whether messages at `level` pass this mask
    pub fn allows(self, level: Level) -> bool {
        self.contains(Self::for_level(level))
    }
}

impl Default for Verbosity {
    fn default() -> Self {
        Self::from_bits_retain(DEFAULT_MASK)
    }
}

/// Logger writing `[LEVEL] (file:line) message` lines to stderr
pub struct DiagnosticLogger {
    mask: AtomicU8,
}

static LOGGER: DiagnosticLogger = DiagnosticLogger::new(DEFAULT_MASK);

impl DiagnosticLogger {
    const fn new(mask: u8) -> Self {
        Self {
            mask: AtomicU8::new(mask),
        }
    }

    /// Current mask
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_bits_truncate(self.mask.load(Ordering::Relaxed))
    }

    /// Replace the mask
    pub fn set_verbosity(&self, verbosity: Verbosity) {
        self.mask.store(verbosity.bits(), Ordering::Relaxed);
    }

    /// Format one record into `out` if the mask lets it through
    pub fn write_record<W: Write>(&self, out: &mut W, record: &Record) -> io::Result<()> {
        if !self.verbosity().allows(record.level()) {
            return Ok(());
        }
        let tag = match record.level() {
            Level::Error => "[ERROR]",
            Level::Warn => "[WARN]",
            Level::Info => "[INFO]",
            Level::Debug | Level::Trace => "[DEBUG]",
        };
        writeln!(
            out,
            "{:<7} ({}:{}) {}",
            tag,
            record.file().unwrap_or("?"),
            record.line().unwrap_or(0),
            record.args()
        )?;
        out.flush()
    }
}

impl Log for DiagnosticLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.verbosity().allows(metadata.level())
    }

    fn log(&self, record: &Record) {
        let stderr = io::stderr();
        let mut out = stderr.lock();
        // Nowhere left to report a failing stderr
        let _ = self.write_record(&mut out, record);
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

/// Install the logger with an initial mask
pub fn init(verbosity: Verbosity) -> Result<(), log::SetLoggerError> {
    LOGGER.set_verbosity(verbosity);
    log::set_logger(&LOGGER).map(|()| log::set_max_level(LevelFilter::Trace))
}

/// Change which tiers are printed
pub fn set_verbosity(verbosity: Verbosity) {
    LOGGER.set_verbosity(verbosity);
}

/// Tiers currently printed
pub fn verbosity() -> Verbosity {
    LOGGER.verbosity()
}

/// Print an unmaskable fatal message and exit with status 1
pub fn fatal_exit(file: &str, line: u32, args: fmt::Arguments<'_>) -> ! {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    let _ = writeln!(out, "[FATAL] ({}:{}) {}", file, line, args);
    let _ = out.flush();
    std::process::exit(1)
}

/// Log a fatal condition and terminate the process
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)+) => {
        $crate::diag::fatal_exit(file!(), line!(), format_args!($($arg)+))
    };
}

/// Turn an error into process termination at the program boundary
pub trait OrFatal<T> {
    /// Unwrap the value or exit with a fatal message naming `what`
    fn or_fatal(self, what: &str) -> T;
}

impl<T, E: fmt::Display> OrFatal<T> for Result<T, E> {
    #[track_caller]
    fn or_fatal(self, what: &str) -> T {
        match self {
            Ok(value) => value,
            Err(e) => {
                let caller = Location::caller();
                fatal_exit(
                    caller.file(),
                    caller.line(),
                    format_args!("{} failed: {}", what, e),
                )
            }
        }
    }
}
