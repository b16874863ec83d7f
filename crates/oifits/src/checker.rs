//! Accumulator of validation diagnostics.
//!
//! Loading and checking never stop on a validation problem: every deviation
//! from the OIFITS standard is recorded here with a severity and the caller
//! decides what to do with the report.

use std::fmt;

use log::{debug, error, warn};

const TARGET: &str = "oifits::checker";

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Info,
    Warning,
    Severe,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Severe => "SEVERE",
        })
    }
}

/// One recorded diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub level: Level,
    pub text: String,
}

/// Collects info, warning and severe messages in the order they are raised.
#[derive(Debug, Clone, Default)]
pub struct OIFitsChecker {
    messages: Vec<Message>,
    nb_warnings: usize,
    nb_severes: usize,
}

impl OIFitsChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, text: impl Into<String>) {
        let text = text.into();
        debug!(target: TARGET, "{text}");
        self.push(Level::Info, text);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        let text = text.into();
        warn!(target: TARGET, "{text}");
        self.nb_warnings += 1;
        self.push(Level::Warning, text);
    }

    pub fn severe(&mut self, text: impl Into<String>) {
        let text = text.into();
        error!(target: TARGET, "{text}");
        self.nb_severes += 1;
        self.push(Level::Severe, text);
    }

    fn push(&mut self, level: Level, text: String) {
        self.messages.push(Message { level, text });
    }

    pub fn nb_warnings(&self) -> usize {
        self.nb_warnings
    }

    pub fn nb_severes(&self) -> usize {
        self.nb_severes
    }

    /// Messages in the order they were recorded.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Texts of the messages recorded at `level`.
    pub fn messages_at(&self, level: Level) -> impl Iterator<Item = &str> {
        self.messages
            .iter()
            .filter(move |m| m.level == level)
            .map(|m| m.text.as_str())
    }

    /// `true` if any message at `level` contains `needle`.
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.messages_at(level).any(|t| t.contains(needle))
    }

    /// One-line summary, e.g. `2 warnings, 0 severe errors`.
    pub fn check_status(&self) -> String {
        format!(
            "{} warnings, {} severe errors",
            self.nb_warnings, self.nb_severes
        )
    }

    /// Every message on its own line as `LEVEL<TAB>text`, then a blank line
    /// and the status.
    pub fn check_report(&self) -> String {
        let mut out = String::new();
        for m in &self.messages {
            out.push_str(&format!("{}\t{}\n", m.level, m.text));
        }
        out.push('\n');
        out.push_str(&self.check_status());
        out
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.nb_warnings = 0;
        self.nb_severes = 0;
    }
}
