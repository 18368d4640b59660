//! In-memory session message sink

use application::ports::NotificationPort;
use domain::Severity;
use parking_lot::Mutex;
use serde::Serialize;

/// A message waiting to be shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionMessage {
    pub severity: Severity,
    pub text: String,
}

/// Collects severity-tagged messages for the caller to render
///
/// Messages are kept in arrival order until drained.
#[derive(Debug, Default)]
pub struct SessionMessages {
    messages: Mutex<Vec<SessionMessage>>,
}

impl SessionMessages {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all pending messages
    pub fn drain(&self) -> Vec<SessionMessage> {
        std::mem::take(&mut *self.messages.lock())
    }

    /// Most severe pending message level
    pub fn highest_severity(&self) -> Option<Severity> {
        self.messages.lock().iter().map(|m| m.severity).max()
    }
}

impl NotificationPort for SessionMessages {
    fn notify(&self, message: &str, severity: Severity) {
        self.messages.lock().push(SessionMessage {
            severity,
            text: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_keep_arrival_order() {
        let sink = SessionMessages::new();
        sink.notify("first", Severity::Notice);
        sink.notify("second", Severity::Error);

        let messages = sink.drain();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "first");
        assert_eq!(messages[1].severity, Severity::Error);
    }

    #[test]
    fn drain_empties_the_sink() {
        let sink = SessionMessages::new();
        sink.notify("once", Severity::Warning);

        assert_eq!(sink.drain().len(), 1);
        assert!(sink.drain().is_empty());
        assert_eq!(sink.highest_severity(), None);
    }

    #[test]
    fn highest_severity() {
        let sink = SessionMessages::new();
        assert_eq!(sink.highest_severity(), None);
        sink.notify("filed", Severity::Notice);
        sink.notify("failed", Severity::Error);
        sink.notify("careful", Severity::Warning);
        assert_eq!(sink.highest_severity(), Some(Severity::Error));
    }

    #[test]
    fn serializes_for_rendering() {
        let message = SessionMessage {
            severity: Severity::Notice,
            text: "Hardware request filed as bug 1234".to_string(),
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["severity"], "notice");
    }
}
