//! Rendering of results and mapping to the process exit status
//!
//! Text output is streamed: each reporter writes one line per entry as it
//! arrives and a summary block when finished. JSON output is a single
//! document written by [`finish`](ComparisonReporter::finish).

use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::access::{AccessIssue, AuditSummary};
use crate::comparison::{Classification, ComparisonResult, ComparisonSummary};
use crate::scanner::{FsObject, ObjectKind};

/// Output rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Human readable lines
    #[default]
    Text,
    /// One JSON document
    Json,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Nothing to report
    Clean,
    /// Differences or issues were found
    Findings,
    /// The tool could not do its job
    Fatal,
    /// Stopped by Ctrl+C
    Interrupted,
}

impl ExitStatus {
    /// Process exit code
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Clean => 0,
            Self::Findings => 1,
            Self::Fatal => 2,
            Self::Interrupted => 130,
        }
    }

    const fn from_findings(found: bool) -> Self {
        if found { Self::Findings } else { Self::Clean }
    }
}

/// Renders a stream of [`ComparisonResult`]s
pub struct ComparisonReporter<W: Write> {
    out: W,
    format: Format,
    show_all: bool,
    summary: ComparisonSummary,
    shown: Vec<ComparisonResult>,
}

#[derive(Serialize)]
struct ComparisonDocument<'a> {
    results: &'a [ComparisonResult],
    summary: &'a ComparisonSummary,
}

impl<W: Write> ComparisonReporter<W> {
    /// Reporter that lists differences only, unless `show_all`
    pub fn new(out: W, format: Format, show_all: bool) -> Self {
        Self {
            out,
            format,
            show_all,
            summary: ComparisonSummary::default(),
            shown: Vec::new(),
        }
    }

    /// Take one result
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output fails.
    pub fn record(&mut self, result: ComparisonResult) -> io::Result<()> {
        self.summary.record(&result);
        if !self.show_all && !result.classification.is_difference() {
            return Ok(());
        }

        match self.format {
            Format::Text => writeln!(self.out, "{}", comparison_line(&result)),
            Format::Json => {
                self.shown.push(result);
                Ok(())
            }
        }
    }

    /// Write the summary and return the counts
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output fails.
    pub fn finish(mut self) -> io::Result<ComparisonSummary> {
        match self.format {
            Format::Text => write!(self.out, "{}", comparison_summary(&self.summary))?,
            Format::Json => {
                let doc = ComparisonDocument {
                    results: &self.shown,
                    summary: &self.summary,
                };
                serde_json::to_writer_pretty(&mut self.out, &doc)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()?;
        Ok(self.summary)
    }
}

impl ComparisonSummary {
    /// Exit status for this comparison
    #[must_use]
    pub const fn exit_status(&self) -> ExitStatus {
        ExitStatus::from_findings(!self.is_identical())
    }
}

/// `<classification> <path>  (<detail>)`
#[must_use]
pub fn comparison_line(result: &ComparisonResult) -> String {
    let mut line = format!(
        "{:<17} {}",
        result.classification.as_str(),
        result.path.display()
    );
    if let Some(detail) = &result.detail {
        let _ = write!(line, "  ({detail})");
    }
    line
}

fn comparison_summary(summary: &ComparisonSummary) -> String {
    let mut output = String::from("\n=== Comparison Summary ===\n");
    for classification in Classification::ALL {
        let count = summary.count(classification);
        if count > 0 {
            let label = format!("{classification}:");
            let _ = writeln!(output, "{label:<18} {count}");
        }
    }
    let _ = writeln!(output, "\nTotal paths: {}", summary.total);
    if summary.is_identical() {
        output.push_str("Status: ✓ Identical\n");
    } else {
        let _ = writeln!(output, "Status: ✗ {} differences", summary.differences());
    }
    output
}

/// Renders a stream of [`AccessIssue`]s
pub struct AccessReporter<W: Write> {
    out: W,
    format: Format,
    summary: AuditSummary,
    issues: Vec<AccessIssue>,
}

#[derive(Serialize)]
struct AccessDocument<'a> {
    issues: &'a [AccessIssue],
    summary: &'a AuditSummary,
}

impl<W: Write> AccessReporter<W> {
    /// Create a reporter
    pub fn new(out: W, format: Format) -> Self {
        Self {
            out,
            format,
            summary: AuditSummary::default(),
            issues: Vec::new(),
        }
    }

    /// Take one issue
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output fails.
    pub fn record(&mut self, issue: AccessIssue) -> io::Result<()> {
        self.summary.record(&issue);
        match self.format {
            Format::Text => writeln!(self.out, "{}", access_line(&issue)),
            Format::Json => {
                self.issues.push(issue);
                Ok(())
            }
        }
    }

    /// Write the summary and return the counts
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output fails.
    pub fn finish(mut self) -> io::Result<AuditSummary> {
        match self.format {
            Format::Text => writeln!(self.out, "{} inaccessible objects", self.summary.total)?,
            Format::Json => {
                let doc = AccessDocument {
                    issues: &self.issues,
                    summary: &self.summary,
                };
                serde_json::to_writer_pretty(&mut self.out, &doc)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()?;
        Ok(self.summary)
    }
}

impl AuditSummary {
    /// Exit status for this audit
    #[must_use]
    pub const fn exit_status(&self) -> ExitStatus {
        ExitStatus::from_findings(self.total > 0)
    }
}

/// `<permissions> <owner>:<group>\t<path>\t<reason>`
///
/// Objects whose metadata could not be read show `?` placeholders.
#[must_use]
pub fn access_line(issue: &AccessIssue) -> String {
    format!(
        "{} {}:{}\t{}\t{}",
        issue.permissions.as_deref().unwrap_or("?????????"),
        issue.owner.as_deref().unwrap_or("?"),
        issue.group.as_deref().unwrap_or("?"),
        issue.path.display(),
        issue.reason
    )
}

/// One object matched by `find`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FindMatch {
    /// Relative or absolute path, as requested
    pub path: PathBuf,
    /// Object kind
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ObjectKind>,
    /// Raw link text, for symlinks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,
}

impl FindMatch {
    /// Build from a walked object
    #[must_use]
    pub fn from_object(obj: FsObject, full_paths: bool) -> Self {
        let target = obj.meta().and_then(|m| m.link_target.clone());
        Self {
            path: if full_paths { obj.full_path } else { obj.path },
            kind: obj.kind,
            target,
        }
    }
}

/// Renders `find` matches
pub struct FindReporter<W: Write> {
    out: W,
    format: Format,
    matches: Vec<FindMatch>,
    total: usize,
}

#[derive(Serialize)]
struct FindDocument<'a> {
    matches: &'a [FindMatch],
    total: usize,
}

impl<W: Write> FindReporter<W> {
    /// Create a reporter
    pub fn new(out: W, format: Format) -> Self {
        Self {
            out,
            format,
            matches: Vec::new(),
            total: 0,
        }
    }

    /// Take one match
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output fails.
    pub fn record(&mut self, found: FindMatch) -> io::Result<()> {
        self.total += 1;
        match self.format {
            Format::Text => writeln!(self.out, "{}", find_line(&found.path, found.target.as_deref())),
            Format::Json => {
                self.matches.push(found);
                Ok(())
            }
        }
    }

    /// Write the match count and return it
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output fails.
    pub fn finish(mut self) -> io::Result<usize> {
        match self.format {
            Format::Text => writeln!(self.out, "{} matching objects", self.total)?,
            Format::Json => {
                let doc = FindDocument {
                    matches: &self.matches,
                    total: self.total,
                };
                serde_json::to_writer_pretty(&mut self.out, &doc)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()?;
        Ok(self.total)
    }
}

fn find_line(path: &Path, target: Option<&Path>) -> String {
    match target {
        Some(target) => format!("{} -> {}", path.display(), target.display()),
        None => path.display().to_string(),
    }
}
