use std::fmt;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Warning,
    Error,
    Info,
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Info => "info",
        })
    }
}

/// Where the controller reports outcomes to the user and asks for confirmation.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, message: &str, kind: NoticeKind);

    /// Ask a yes/no question. Front ends with inline confirm buttons drive
    /// `request_delete`/`confirm_delete` directly and never call this.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Sends notices to the log and answers every confirmation with a fixed value.
#[derive(Debug, Clone, Copy)]
pub struct LogSink {
    pub auto_confirm: bool,
}

impl Default for LogSink {
    fn default() -> Self {
        Self { auto_confirm: true }
    }
}

impl NotificationSink for LogSink {
    fn notify(&self, message: &str, kind: NoticeKind) {
        match kind {
            NoticeKind::Error => log::error!("{}", message),
            NoticeKind::Warning => log::warn!("{}", message),
            NoticeKind::Success | NoticeKind::Info => log::info!("{}", message),
        }
    }

    fn confirm(&self, prompt: &str) -> bool {
        log::info!("{} -> {}", prompt, if self.auto_confirm { "yes" } else { "no" });
        self.auto_confirm
    }
}

/// Prints notices to the terminal and reads confirmations from stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalSink {
    /// Skip the prompt and answer yes (`--yes`).
    pub assume_yes: bool,
}

impl NotificationSink for TerminalSink {
    fn notify(&self, message: &str, kind: NoticeKind) {
        match kind {
            NoticeKind::Error | NoticeKind::Warning => eprintln!("[{}] {}", kind, message),
            NoticeKind::Success | NoticeKind::Info => println!("[{}] {}", kind, message),
        }
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{} [y/N] ", prompt);
        if std::io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => parse_answer(&answer),
            Err(e) => {
                log::warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }
}

fn parse_answer(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
