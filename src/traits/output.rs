use std::sync::Mutex;

/// Output message captured by MockOutput for testing
#[derive(Debug, Clone, PartialEq)]
pub enum OutputMessage {
    Success(String),
    Error(String),
    Warning(String),
    Info(String),
    Dimmed(String),
    Report(String),
}

/// Trait for terminal output operations to enable testing with mocks
pub trait Output: Send + Sync {
    /// Print a success message
    fn success(&self, message: &str);

    /// Print an error message
    fn error(&self, message: &str);

    /// Print a warning message
    fn warning(&self, message: &str);

    /// Print an info message
    fn info(&self, message: &str);

    /// Print a dimmed/muted message
    fn dimmed(&self, message: &str);

    /// Print a rendered report as-is
    fn report(&self, text: &str);
}

/// Real terminal output implementation using the output module
pub struct TerminalOutput;

impl Output for TerminalOutput {
    fn success(&self, message: &str) {
        crate::output::success(message);
    }

    fn error(&self, message: &str) {
        crate::output::error(message);
    }

    fn warning(&self, message: &str) {
        crate::output::warning(message);
    }

    fn info(&self, message: &str) {
        crate::output::info(message);
    }

    fn dimmed(&self, message: &str) {
        crate::output::dimmed(message);
    }

    fn report(&self, text: &str) {
        crate::output::report(text);
    }
}

/// Mock output implementation for testing (captures output)
pub struct MockOutput {
    messages: Mutex<Vec<OutputMessage>>,
}

impl MockOutput {
    /// Create new mock output
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }

    /// Get all captured messages
    pub fn get_messages(&self) -> Vec<OutputMessage> {
        self.messages.lock().unwrap().clone()
    }

    /// Check if a specific message was output
    pub fn contains_message(&self, message: &OutputMessage) -> bool {
        self.messages.lock().unwrap().contains(message)
    }

    /// Check if any error message was output
    pub fn has_error(&self) -> bool {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .any(|m| matches!(m, OutputMessage::Error(_)))
    }

    /// Get all rendered reports
    pub fn get_reports(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter_map(|m| {
                if let OutputMessage::Report(text) = m {
                    Some(text.clone())
                } else {
                    None
                }
            })
            .collect()
    }

    /// Clear all captured messages
    pub fn clear(&self) {
        self.messages.lock().unwrap().clear();
    }
}

impl Default for MockOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Output for MockOutput {
    fn success(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(OutputMessage::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(OutputMessage::Error(message.to_string()));
    }

    fn warning(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(OutputMessage::Warning(message.to_string()));
    }

    fn info(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(OutputMessage::Info(message.to_string()));
    }

    fn dimmed(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(OutputMessage::Dimmed(message.to_string()));
    }

    fn report(&self, text: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(OutputMessage::Report(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_output_captures_messages() {
        let output = MockOutput::new();
        output.info("hello");
        output.report("body");
        output.error("boom");

        assert!(output.contains_message(&OutputMessage::Info("hello".to_string())));
        assert_eq!(output.get_reports(), vec!["body".to_string()]);
        assert!(output.has_error());

        output.clear();
        assert!(output.get_messages().is_empty());
    }
}
