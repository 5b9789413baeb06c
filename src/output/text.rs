//! Human-readable listing of duplicate groups.
//!
//! ```text
//! Group 1 (3 prompts)
//!   original   1  Greeting  "Hello world"
//!   duplicate  4  Greeting  "Hello world "
//!
//! 1 duplicate group, 2 redundant prompts (12 of 45 comparisons, 3 ms)
//! ```

use std::io::{self, Write};

use yansi::Paint;

use crate::duplicates::{DuplicateGroup, ScanSummary};
use crate::entry::Entry;

/// Longest content preview, in chars.
const PREVIEW_LEN: usize = 60;

/// Text output formatter.
pub struct TextOutput<'a> {
    groups: &'a [DuplicateGroup],
    summary: &'a ScanSummary,
    color: bool,
}

impl<'a> TextOutput<'a> {
    /// Create a new text formatter.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup], summary: &'a ScanSummary) -> Self {
        Self {
            groups,
            summary,
            color: true,
        }
    }

    /// Enable or disable ANSI colors.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Write the listing to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for (idx, group) in self.groups.iter().enumerate() {
            let heading = format!("Group {} ({} prompts)", idx + 1, group.len());
            if self.color {
                writeln!(writer, "{}", heading.bold())?;
            } else {
                writeln!(writer, "{}", heading)?;
            }

            self.write_entry(writer, "original ", &group.original)?;
            for duplicate in &group.duplicates {
                self.write_entry(writer, "duplicate", duplicate)?;
            }
            writeln!(writer)?;
        }

        let footer = self.footer();
        if self.color {
            writeln!(writer, "{}", footer.dim())
        } else {
            writeln!(writer, "{}", footer)
        }
    }

    /// Render the listing to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if formatting fails.
    pub fn to_string(&self) -> io::Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }

    fn write_entry<W: Write>(&self, writer: &mut W, role: &str, entry: &Entry) -> io::Result<()> {
        let preview = preview(&entry.content);
        if self.color {
            let role = if role.starts_with("original") {
                role.green()
            } else {
                role.yellow()
            };
            writeln!(
                writer,
                "  {}  {}  {}  {:?}",
                role,
                entry.id.cyan(),
                entry.title,
                preview
            )
        } else {
            writeln!(writer, "  {}  {}  {}  {:?}", role, entry.id, entry.title, preview)
        }
    }

    fn footer(&self) -> String {
        if self.groups.is_empty() {
            return format!(
                "No duplicates among {} prompts ({} of {} comparisons, {} ms)",
                self.summary.total_entries,
                self.summary.performed_comparisons,
                self.summary.total_comparisons,
                self.summary.scan_duration.as_millis()
            );
        }
        format!(
            "{} duplicate group{}, {} redundant prompt{} ({} of {} comparisons, {} ms)",
            self.summary.duplicate_groups,
            plural(self.summary.duplicate_groups),
            self.summary.duplicate_entries,
            plural(self.summary.duplicate_entries),
            self.summary.performed_comparisons,
            self.summary.total_comparisons,
            self.summary.scan_duration.as_millis()
        )
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// First line of `content`, cut to `PREVIEW_LEN` chars.
fn preview(content: &str) -> String {
    let line = content.trim().lines().next().unwrap_or_default();
    if line.chars().count() > PREVIEW_LEN {
        let cut: String = line.chars().take(PREVIEW_LEN).collect();
        format!("{}...", cut)
    } else {
        line.to_string()
    }
}
