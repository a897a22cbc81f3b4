extern crate self as refence;

use regex::Regex;

#[macro_use]
mod macros;
mod api;
mod engine;
mod rules;

pub use api::{
    CodeSpan, MergePass, Options, TransformDetails, TransformResult, TransformResultVerbose, transform,
    transform_verbose_with, transform_with,
};

// --- Internal types ---------------------------------------------------------

/// Code flavor attached to classified lines and assembled fragments.
///
/// `Qiskit` is a Python specialization (it renders with the `python` fence
/// tag but carries extra keyword weight during detection). `Generic` is the
/// "confirmed code, no library claimed it" state and renders as `text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Dialect {
    Python,
    Qiskit,
    QSharp,
    JavaScript,
    Generic,
}

impl Dialect {
    /// Markdown fence tag emitted for this dialect.
    pub fn fence_tag(self) -> &'static str {
        match self {
            Dialect::Python | Dialect::Qiskit => "python",
            Dialect::QSharp => "qsharp",
            Dialect::JavaScript => "javascript",
            Dialect::Generic => "text",
        }
    }

    /// Relative specificity used when two hints compete for a merged
    /// fragment. Higher wins.
    pub(crate) fn specificity(self) -> u8 {
        match self {
            Dialect::QSharp => 4,
            Dialect::Qiskit => 3,
            Dialect::Python | Dialect::JavaScript => 2,
            Dialect::Generic => 1,
        }
    }
}

/// One line of the (sanitized) input: its index and raw content.
/// Immutable once the input has been split.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Line<'a> {
    pub index: usize,
    pub raw: &'a str,
}

/// Per-line verdict produced by the classifier; never mutated afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Classification {
    Code(Dialect),
    Prose,
    FenceMarker,
}

/// A contiguous (possibly merged) run of lines judged to be a single
/// source-code unit.
///
/// Invariant: `start_line <= end_line`, and the assembler's output list is
/// sorted and disjoint over the line index space.
#[derive(Debug, Clone)]
pub(crate) struct Fragment {
    pub start_line: usize,
    pub end_line: usize,
    pub content: String,
    pub dialect: Option<Dialect>,
}

/// A line-level detection rule: a regex plus the dialect hint it carries.
///
/// Rule tables are static and read-only; the aggregate table is ordered by
/// `priority` (higher first) so dialect-specific rules are evaluated before
/// the generic fallback.
pub(crate) struct PatternRule {
    pub name: &'static str,
    pub matcher: &'static Regex,
    pub dialect: Dialect,
    pub priority: u8,
}

impl std::fmt::Debug for PatternRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternRule")
            .field("name", &self.name)
            .field("dialect", &self.dialect)
            .field("priority", &self.priority)
            .finish()
    }
}

/// A dialect-scoped syntax fix applied to fragment content after a library
/// claims it.
pub(crate) struct CorrectionRule {
    pub name: &'static str,
    pub matcher: &'static Regex,
    pub rewrite: fn(&regex::Captures) -> String,
}

impl std::fmt::Debug for CorrectionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorrectionRule").field("name", &self.name).field("rewrite", &"<function>").finish()
    }
}
