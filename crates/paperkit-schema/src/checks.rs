//! # Integrity Check Sections
//!
//! Manifest, IDE-sync and registry checks do not validate documents against
//! a schema; they test existence and shape. Their results are collected as
//! [`CheckSection`]s of pass/fail lines with an optional reason.

/// Marker of one check line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    /// The check passed.
    Pass,
    /// The check failed.
    Fail,
    /// The subject is absent; counted as a failure but shown as a warning.
    Warn,
}

impl Mark {
    fn symbol(self) -> &'static str {
        match self {
            Self::Pass => "✓",
            Self::Fail => "✗",
            Self::Warn => "⚠",
        }
    }
}

/// One check line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckItem {
    /// Outcome marker.
    pub mark: Mark,
    /// What was checked, usually a file or entry name.
    pub subject: String,
    /// Why it did not pass. Never empty when present.
    pub reason: Option<String>,
}

impl CheckItem {
    /// A passing check.
    pub fn pass(subject: impl Into<String>) -> Self {
        Self {
            mark: Mark::Pass,
            subject: subject.into(),
            reason: None,
        }
    }

    /// A failure; an empty `reason` means the subject says it all.
    pub fn fail(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            mark: Mark::Fail,
            subject: subject.into(),
            reason: (!reason.is_empty()).then_some(reason),
        }
    }

    /// A warning; counted as a failure.
    pub fn warn(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            mark: Mark::Warn,
            subject: subject.into(),
            reason: Some(reason.into()),
        }
    }

    /// True for [`Mark::Pass`].
    pub fn passed(&self) -> bool {
        self.mark == Mark::Pass
    }

    fn line(&self) -> String {
        format!("{} {}", self.mark.symbol(), self.subject)
    }
}

/// A titled group of check lines plus informational notices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSection {
    /// Heading shown above the items.
    pub title: String,
    /// Checks in the order they ran.
    pub items: Vec<CheckItem>,
    /// Informational lines that do not affect the tally.
    pub notices: Vec<String>,
}

impl CheckSection {
    /// An empty section.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
            notices: Vec::new(),
        }
    }

    /// Record one check.
    pub fn push(&mut self, item: CheckItem) {
        self.items.push(item);
    }

    /// Add an informational line.
    pub fn notice(&mut self, text: impl Into<String>) {
        self.notices.push(text.into());
    }

    /// Number of passing items.
    pub fn passed(&self) -> usize {
        self.items.iter().filter(|i| i.passed()).count()
    }

    /// Number of failing or warning items.
    pub fn failed(&self) -> usize {
        self.items.len() - self.passed()
    }

    /// Aggregate-report layout: heading with a dashed rule, one line per
    /// item, reason after a colon. Passing lines are omitted when
    /// `show_passes` is false.
    pub fn render_compact(&self, show_passes: bool) -> String {
        let mut lines = vec![
            String::new(),
            format!("📋 {}", self.title),
            "-".repeat(40),
        ];
        for notice in &self.notices {
            lines.push(format!("  {notice}"));
        }
        for item in &self.items {
            if item.passed() && !show_passes {
                continue;
            }
            match &item.reason {
                Some(reason) => lines.push(format!("{}: {reason}", item.line())),
                None => lines.push(item.line()),
            }
        }
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Registry-report layout: boxed heading, indented lines, arrow-prefixed
    /// reasons and a per-section tally.
    pub fn render_boxed(&self) -> String {
        let rule = "=".repeat(60);
        let mut lines = vec![String::new(), rule.clone(), format!(" {}", self.title), rule];
        for notice in &self.notices {
            lines.push(format!("  {notice}"));
        }
        for item in &self.items {
            lines.push(format!("  {}", item.line()));
            if !item.passed() {
                if let Some(reason) = &item.reason {
                    lines.push(format!("    → {reason}"));
                }
            }
        }
        lines.push(String::new());
        lines.push(format!(
            "  {} passed, {} failed",
            self.passed(),
            self.failed()
        ));
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}
