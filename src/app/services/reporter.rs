//! Progress reporting for processing runs
//!
//! Every stage of a run emits informational messages (totals, ignored
//! entries, produced rows). Messages go to `tracing` and, when one is
//! attached, to a [`ProgressObserver`] such as a CLI spinner or a UI console.
//! Notification is push-only: the engine never waits on the observer.

use crate::constants::COUNT_WIDTH;
use tracing::{Level, error, info, warn};

/// Receiver of progress messages emitted during a run
pub trait ProgressObserver: Send + Sync {
    /// Called once per message, in emission order
    fn notify(&self, level: Level, message: &str);
}

impl<F> ProgressObserver for F
where
    F: Fn(Level, &str) + Send + Sync,
{
    fn notify(&self, level: Level, message: &str) {
        self(level, message)
    }
}

/// Fan-out of progress messages to `tracing` and an optional observer
#[derive(Clone, Copy, Default)]
pub struct Reporter<'a> {
    observer: Option<&'a dyn ProgressObserver>,
}

impl std::fmt::Debug for Reporter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl<'a> Reporter<'a> {
    /// Reporter that only logs
    pub fn silent() -> Self {
        Self { observer: None }
    }

    /// Reporter forwarding to the given observer as well as logging
    pub fn new(observer: Option<&'a dyn ProgressObserver>) -> Self {
        Self { observer }
    }

    pub fn info(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        info!("{}", message);
        self.forward(Level::INFO, message);
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        warn!("{}", message);
        self.forward(Level::WARN, message);
    }

    pub fn error(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        error!("{}", message);
        self.forward(Level::ERROR, message);
    }

    /// Report a right-aligned count followed by a label, e.g. `"    500 views"`
    pub fn count(&self, count: usize, label: &str) {
        self.info(format_count(count, label));
    }

    fn forward(&self, level: Level, message: &str) {
        if let Some(observer) = self.observer {
            observer.notify(level, message);
        }
    }
}

/// Format a count right-aligned to the standard width
pub fn format_count(count: usize, label: &str) -> String {
    format!("{:>width$} {}", count, label, width = COUNT_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_format_count_alignment() {
        assert_eq!(format_count(500, "views"), "    500 views");
        assert_eq!(format_count(12345678, "views"), "12345678 views");
    }

    #[test]
    fn test_observer_receives_messages_in_order() {
        let received: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());
        let observer = |level: Level, message: &str| {
            received.lock().unwrap().push((level, message.to_string()));
        };

        let reporter = Reporter::new(Some(&observer));
        reporter.info("first");
        reporter.count(3, "views");
        reporter.warn("second");
        reporter.error("third");

        let received = received.into_inner().unwrap();
        assert_eq!(
            received,
            vec![
                (Level::INFO, "first".to_string()),
                (Level::INFO, "      3 views".to_string()),
                (Level::WARN, "second".to_string()),
                (Level::ERROR, "third".to_string()),
            ]
        );
    }

    #[test]
    fn test_silent_reporter_does_not_panic() {
        let reporter = Reporter::silent();
        reporter.info("nothing listens");
        reporter.count(0, "views");
    }
}
