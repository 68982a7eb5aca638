use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

const MAX_TOASTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: Level::Success, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: Level::Info, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: Level::Error, message: message.into() }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Recent notices for the terminal UI status line.
#[derive(Debug, Clone, Default)]
pub struct Toasts {
    queue: Arc<Mutex<VecDeque<Notice>>>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<Notice> {
        self.queue.lock().ok().and_then(|q| q.back().cloned())
    }

    pub fn all(&self) -> Vec<Notice> {
        self.queue
            .lock()
            .map(|q| q.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn dismiss(&self) {
        if let Ok(mut q) = self.queue.lock() {
            q.clear();
        }
    }
}

impl Notifier for Toasts {
    fn notify(&self, notice: Notice) {
        if let Ok(mut q) = self.queue.lock() {
            if q.len() == MAX_TOASTS {
                q.pop_front();
            }
            q.push_back(notice);
        }
    }
}

/// Prints notices for the non-interactive commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    /// Error notices always come with an `Err` from the same call, and that
    /// error is what the command reports, so only the others are printed.
    fn line(notice: &Notice) -> Option<&str> {
        match notice.level {
            Level::Error => None,
            Level::Success | Level::Info => Some(notice.message.as_str()),
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        if let Some(line) = Self::line(&notice) {
            println!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_keep_only_the_most_recent() {
        let toasts = Toasts::new();
        for i in 0..7 {
            toasts.notify(Notice::info(format!("n{i}")));
        }
        let all = toasts.all();
        assert_eq!(all.len(), MAX_TOASTS);
        assert_eq!(all[0].message, "n2");
        assert_eq!(toasts.latest().unwrap().message, "n6");

        toasts.dismiss();
        assert!(toasts.latest().is_none());
    }

    #[test]
    fn console_leaves_errors_to_the_command_result() {
        let saved = Notice::success("New task added!");
        assert_eq!(ConsoleNotifier::line(&saved), Some("New task added!"));
        let expired = Notice::info("Session expired. Please log in again.");
        assert!(ConsoleNotifier::line(&expired).is_some());
        assert_eq!(ConsoleNotifier::line(&Notice::error("Error saving the task.")), None);
    }
}
