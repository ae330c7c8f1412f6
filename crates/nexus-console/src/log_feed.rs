/*
[INPUT]:  Raw console lines (bootstrap, backend logs, transport errors)
[OUTPUT]: Ordered, categorised log entries for display
[POS]:    Session layer - log feed owned by the session record
[UPDATE]: When marker conventions or feed mutation rules change
*/

use std::fmt;

/// Substring that marks a line as an error.
pub const ERROR_MARKER: &str = "❌";
/// Substring that marks a line as a launch/success highlight.
pub const LAUNCH_MARKER: &str = "🚀";

/// Display category of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    Error,
    Highlight,
    Plain,
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LogCategory::Error => "error",
            LogCategory::Highlight => "highlight",
            LogCategory::Plain => "plain",
        };
        f.write_str(label)
    }
}

/// Classify a line by marker substrings. The error marker takes precedence.
pub fn classify(line: &str) -> LogCategory {
    if line.contains(ERROR_MARKER) {
        LogCategory::Error
    } else if line.contains(LAUNCH_MARKER) {
        LogCategory::Highlight
    } else {
        LogCategory::Plain
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    text: String,
    category: LogCategory,
}

impl LogEntry {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let category = classify(&text);
        Self { text, category }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn category(&self) -> LogCategory {
        self.category
    }
}

/// Ordered feed of console lines.
///
/// The feed is swapped wholesale on every submission and settlement; the only
/// incremental mutation is `append`, reserved for the transport-error line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFeed {
    entries: Vec<LogEntry>,
}

impl LogFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        // Build first so the old feed stays visible until the swap.
        let entries: Vec<LogEntry> = lines.into_iter().map(LogEntry::new).collect();
        self.entries = entries;
    }

    pub fn append(&mut self, line: impl Into<String>) {
        self.entries.push(LogEntry::new(line));
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn lines(&self) -> Vec<&str> {
        self.entries.iter().map(LogEntry::text).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("❌ Security Reject: hardcoded password", LogCategory::Error)]
    #[case("❌ CONNECTION ERROR: Network Error", LogCategory::Error)]
    #[case("🚀 Received Mission: Build a REST API", LogCategory::Highlight)]
    #[case("🚀 SUCCESS: Code ran without errors.", LogCategory::Highlight)]
    #[case("--- Attempt 1 ---", LogCategory::Plain)]
    #[case("💥 Runtime Crash: ZeroDivisionError", LogCategory::Plain)]
    #[case("", LogCategory::Plain)]
    fn test_classify(#[case] line: &str, #[case] expected: LogCategory) {
        assert_eq!(classify(line), expected);
    }

    #[test]
    fn test_error_marker_wins_over_launch_marker() {
        assert_eq!(classify("🚀 launch ❌ failed"), LogCategory::Error);
        assert_eq!(classify("❌ failed 🚀 launch"), LogCategory::Error);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let line = "🚀 SUCCESS";
        assert_eq!(classify(line), classify(line));
    }

    #[test]
    fn test_replace_preserves_order_and_discards_previous() {
        let mut feed = LogFeed::new();
        feed.replace(["a", "b", "c"]);
        feed.replace(vec!["step1".to_string(), "step2".to_string()]);
        assert_eq!(feed.lines(), vec!["step1", "step2"]);
    }

    #[test]
    fn test_append_keeps_existing_entries() {
        let mut feed = LogFeed::new();
        feed.replace(["boot"]);
        feed.append("❌ CONNECTION ERROR: refused");
        assert_eq!(feed.len(), 2);
        assert_eq!(feed.entries()[0].category(), LogCategory::Plain);
        assert_eq!(feed.entries()[1].category(), LogCategory::Error);
    }
}
