//! Logger setup for the binary: the systemd journal
//! (`journalctl --user -t todolist -f`) when running under systemd, stderr otherwise.

use log::{LevelFilter, Log, Metadata, Record};

use crate::config::APP_NAME;

/// Crate targets log at info (debug when toggled), everything else at warn.
struct Filtered {
    inner: Box<dyn Log>,
}

fn max_level_for(target: &str) -> LevelFilter {
    if target.starts_with(APP_NAME) {
        if crate::debug_logging() {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    } else {
        LevelFilter::Warn
    }
}

impl Log for Filtered {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= max_level_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.inner.log(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

fn backend() -> Box<dyn Log> {
    match systemd_journal_logger::JournalLog::new() {
        Ok(journal) if systemd_journal_logger::connected_to_journal() => {
            Box::new(journal.with_syslog_identifier(APP_NAME.to_string()))
        }
        _ => Box::new(
            env_logger::Builder::new()
                .filter_level(LevelFilter::Trace)
                .format_timestamp_secs()
                .build(),
        ),
    }
}

pub fn init(debug: bool) -> Result<(), log::SetLoggerError> {
    crate::set_debug_logging(debug);
    log::set_boxed_logger(Box::new(Filtered { inner: backend() }))?;
    // Global max must be Debug so crate debug logs can pass through when toggled
    log::set_max_level(LevelFilter::Debug);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_crates_stay_at_warn() {
        assert_eq!(max_level_for("reqwest::connect"), LevelFilter::Warn);
        assert_eq!(max_level_for("hyper"), LevelFilter::Warn);
    }

    #[test]
    fn crate_targets_follow_debug_toggle() {
        crate::set_debug_logging(false);
        assert_eq!(max_level_for("todolist::controller"), LevelFilter::Info);
        crate::set_debug_logging(true);
        assert_eq!(max_level_for("todolist::sync::rest"), LevelFilter::Debug);
        crate::set_debug_logging(false);
    }
}
