//! Minimal stderr backend for the `log` facade.

use log::{Level, LevelFilter, Log, Metadata, Record};

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match record.level() {
            Level::Info => eprintln!("* {}", record.args()),
            Level::Warn | Level::Error => {
                eprintln!("{}: {}", record.level().as_str().to_lowercase(), record.args())
            }
            Level::Debug | Level::Trace => {
                eprintln!("[{}] {}: {}", record.level(), record.target(), record.args())
            }
        }
    }

    fn flush(&self) {}
}

/// Install the logger with the given verbosity. Later calls only change the
/// level.
pub fn init(level: LevelFilter) {
    // Fails only if a logger is already installed, which keeps that one.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
