//! Q# pattern library.
//!
//! Q# snippets are the ones most often torn apart by upstream formatting
//! (a `namespace` line stranded from its `open` directives, an `operation`
//! signature stranded from its body), so this library's job is fragment
//! recognition. It defines no correction rules: malformed Q# is left as-is.

use super::DialectLibrary;
use crate::{Dialect, Fragment, PatternRule};
use once_cell::sync::Lazy;
use regex::Regex;

/// Line-level detection rules contributed to the classifier table.
pub(crate) fn line_rules() -> Vec<PatternRule> {
    vec![
        kw! {
            name: "qsharp namespace declaration",
            re: r"(?m)^\s*namespace\s+[A-Za-z_][\w.]*\s*\{?\s*$",
            dialect: Dialect::QSharp,
            priority: 40,
        },
        kw! {
            name: "qsharp open directive",
            re: r"(?m)^\s*open\s+[A-Z][\w.]*\s*;?\s*$",
            dialect: Dialect::QSharp,
            priority: 40,
        },
        kw! {
            name: "qsharp operation/function declaration",
            re: r"(?m)^\s*(operation\s+\w+|function\s+[A-Z]\w*)\s*\(",
            dialect: Dialect::QSharp,
            priority: 40,
        },
        kw! {
            name: "qsharp qubit allocation",
            re: r"\buse\s+\w+\s*=\s*Qubit",
            dialect: Dialect::QSharp,
            priority: 38,
        },
        kw! {
            name: "qsharp within/apply block",
            re: r"(?m)^\s*(within|apply)\s*\{",
            dialect: Dialect::QSharp,
            priority: 38,
        },
        kw! {
            name: "qsharp functor application",
            re: r"\b(Controlled|Adjoint)\s+\w+\s*\(",
            dialect: Dialect::QSharp,
            priority: 36,
        },
        kw! {
            name: "qsharp characteristics clause",
            re: r"\bis\s+Adj(\s*\+\s*Ctl)?\b",
            dialect: Dialect::QSharp,
            priority: 36,
        },
        kw! {
            // Full-line call shape only: a bare `X (` can open an ordinary
            // English sentence.
            name: "qsharp intrinsic call",
            re: r"(?m)^\s*(H|X|Y|Z|CNOT|M|Measure|MeasureWithProbability|Reset|ResetAll)\s*\([^)]*\)\s*;?\s*$",
            dialect: Dialect::QSharp,
            priority: 36,
        },
    ]
}

// Fragment-level signatures. One strong hit claims the fragment outright;
// weak hits need corroboration.

static STRONG: Lazy<Vec<&'static Regex>> = Lazy::new(|| {
    vec![
        regex!(r"(?m)^\s*namespace\s+[A-Za-z_][\w.]*\s*\{?\s*$"),
        regex!(r"\bMicrosoft\.Quantum\."),
        regex!(r"(?m)^\s*open\s+[A-Z][\w.]*\s*;"),
        regex!(r"(?m)^\s*(operation\s+\w+|function\s+[A-Z]\w*)\s*\("),
    ]
});

static WEAK: Lazy<Vec<&'static Regex>> = Lazy::new(|| {
    vec![
        regex!(r"\buse\s+\w+\s*=\s*Qubit"),
        regex!(r"(?m)^\s*(within|apply)\s*\{"),
        regex!(r"\b(Controlled|Adjoint)\s+\w+\s*\("),
        regex!(r"(?m)^\s*(H|X|Y|Z|CNOT|M|Measure|MeasureWithProbability|Reset|ResetAll)\s*\([^)]*\)\s*;?\s*$"),
        regex!(r"\bis\s+Adj(\s*\+\s*Ctl)?\b"),
    ]
});

pub(crate) struct QSharpLibrary;

impl DialectLibrary for QSharpLibrary {
    fn name(&self) -> &'static str {
        "qsharp"
    }

    fn detect_and_refine(&self, fragment: &Fragment) -> Option<Dialect> {
        if fragment.dialect == Some(Dialect::QSharp) {
            return Some(Dialect::QSharp);
        }
        let content = fragment.content.as_str();
        if STRONG.iter().any(|re| re.is_match(content)) {
            return Some(Dialect::QSharp);
        }
        let weak = WEAK.iter().filter(|re| re.is_match(content)).count();
        (weak >= 2).then_some(Dialect::QSharp)
    }
}
