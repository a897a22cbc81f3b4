//! Dialect pattern libraries.
//!
//! Each submodule owns one dialect: its line-level detection rules (fed into
//! the aggregate table consumed by the classifier), its fragment-level
//! signatures, and — where the dialect defines any — its correction rules.
//!
//! ## Dispatch order
//!
//! Libraries are consulted per fragment in a fixed order, most specific
//! first:
//!
//! ```text
//! Q# → Qiskit → generic scientific Python → generic JavaScript → generic Python
//! ```
//!
//! Q# keyword sets are the most specific and the most likely to be
//! mis-claimed by a laxer generic rule if checked later, so Q# always goes
//! first. The first library whose `detect_and_refine` returns a dialect
//! claims the fragment; its `correct` is then applied to the content.
//! Fragments no library claims keep `Generic` and render as `text`.
//!
//! ## Adding a library
//!
//! - Add a module with a unit struct implementing [`DialectLibrary`] and a
//!   `line_rules()` constructor returning its `PatternRule`s.
//! - Insert the struct at the right place in [`libraries`] — order is the
//!   precedence, there is no other priority channel between libraries.
//! - Extend `TriggerInfo::scan` (in `engine/trigger.rs`) so the quick-reject
//!   pass knows about the new dialect's signals.

#[path = "rules/generic.rs"]
pub(crate) mod generic;
#[path = "rules/qiskit.rs"]
pub(crate) mod qiskit;
#[path = "rules/qsharp.rs"]
pub(crate) mod qsharp;

#[cfg(test)]
#[path = "rules/tests.rs"]
mod tests;

use crate::{Dialect, Fragment, PatternRule};
use once_cell::sync::Lazy;

/// Strategy interface implemented by each dialect library.
pub(crate) trait DialectLibrary: Sync {
    fn name(&self) -> &'static str;

    /// Inspect an assembled fragment; return the refined dialect to claim it.
    fn detect_and_refine(&self, fragment: &Fragment) -> Option<Dialect>;

    /// Apply dialect-scoped syntax fixes. Default: leave content as-is.
    fn correct(&self, content: &str) -> String {
        content.to_string()
    }
}

/// The fixed dispatch list. Order is load-bearing; see the module doc.
pub(crate) fn libraries() -> &'static [&'static dyn DialectLibrary] {
    static LIBRARIES: Lazy<Vec<&'static dyn DialectLibrary>> = Lazy::new(|| {
        vec![
            &qsharp::QSharpLibrary,
            &qiskit::QiskitLibrary,
            &generic::ScientificLibrary,
            &generic::JavaScriptLibrary,
            &generic::PythonLibrary,
        ]
    });
    &LIBRARIES
}

/// Line-classification rules from every dialect table, ordered by priority
/// (higher first). The classifier takes the first match.
pub(crate) fn line_rules() -> &'static [PatternRule] {
    static LINE_RULES: Lazy<Vec<PatternRule>> = Lazy::new(|| {
        let mut rules = Vec::new();
        rules.extend(qsharp::line_rules());
        rules.extend(qiskit::line_rules());
        rules.extend(generic::line_rules());
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        rules
    });
    &LINE_RULES
}

/// Total keyword-rule occurrences in `content`, across every dialect table.
/// Used by the assembler's noise rejection: prose that merely mentions an
/// API name once scores 1 and gets dropped.
pub(crate) fn keyword_hits(content: &str) -> usize {
    line_rules().iter().map(|rule| rule.matcher.find_iter(content).count()).sum()
}
