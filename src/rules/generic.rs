//! Generic fallback libraries: scientific Python, JavaScript, plain Python.
//!
//! Lowest dispatch priority — these only see fragments the specialized
//! libraries declined. Three separate strategy structs keep the dispatch
//! order (scientific → JS → Python) inspectable in `rules::libraries`.

use super::DialectLibrary;
use crate::{Dialect, Fragment, PatternRule};
use once_cell::sync::Lazy;
use regex::Regex;

/// Line-level detection rules contributed to the classifier table.
///
/// Flow-keyword rules are case-sensitive and require the trailing colon so
/// that prose like "For example:" (capitalized) or "while we wait" (no
/// colon) stays prose.
pub(crate) fn line_rules() -> Vec<PatternRule> {
    vec![
        kw! {
            name: "scientific python call",
            re: r"\b(np|numpy|pd|pandas|plt|scipy)\.\w+\s*[\(\[]",
            dialect: Dialect::Python,
            priority: 24,
        },
        kw! {
            name: "python def/class declaration",
            re: r"(?m)^\s*(def\s+\w+\s*\(|class\s+\w+\s*[:\(])",
            dialect: Dialect::Python,
            priority: 22,
        },
        kw! {
            name: "python import",
            re: r"(?m)^\s*(import\s+[A-Za-z_][\w.]*|from\s+[A-Za-z_][\w.]*\s+import\b)",
            dialect: Dialect::Python,
            priority: 20,
        },
        kw! {
            name: "dataframe manipulation",
            re: r"\b\w+\.(head|describe|groupby|merge|fillna|dropna|pivot_table|iloc|loc|to_csv)\s*[\(\[]",
            dialect: Dialect::Python,
            priority: 20,
        },
        kw! {
            name: "python flow block",
            re: r"(?m)^\s*(if|elif|else|for|while|try|except|finally|with)\b[^:\n]*:\s*$",
            dialect: Dialect::Python,
            priority: 18,
        },
        kw! {
            name: "python indented return",
            re: r"(?m)^\s{4,}return\b",
            dialect: Dialect::Python,
            priority: 16,
        },
        kw! {
            name: "javascript declaration",
            re: r"(?m)^\s*(const|let|var)\s+\w+\s*=",
            dialect: Dialect::JavaScript,
            priority: 20,
        },
        kw! {
            name: "javascript function declaration",
            re: r"(?m)^\s*(export\s+)?(async\s+)?function\s+\w+\s*\(",
            dialect: Dialect::JavaScript,
            priority: 20,
        },
        kw! {
            name: "javascript console call",
            re: r"\bconsole\.(log|error|warn|info)\s*\(",
            dialect: Dialect::JavaScript,
            priority: 20,
        },
        kw! {
            name: "javascript arrow function",
            re: r"\(([^()\n]*)\)\s*=>",
            dialect: Dialect::JavaScript,
            priority: 18,
        },
    ]
}

// --- Scientific Python -------------------------------------------------------

static SCIENTIFIC: Lazy<Vec<&'static Regex>> = Lazy::new(|| {
    vec![
        regex!(r"(?m)^\s*import\s+(numpy|pandas|scipy|matplotlib)\b"),
        regex!(r"\b(np|pd|plt)\.\w+\s*[\(\[]"),
        regex!(r"\b\w+\.(head|describe|groupby|merge|fillna|dropna|pivot_table)\s*\("),
    ]
});

pub(crate) struct ScientificLibrary;

impl DialectLibrary for ScientificLibrary {
    fn name(&self) -> &'static str {
        "generic-scientific"
    }

    fn detect_and_refine(&self, fragment: &Fragment) -> Option<Dialect> {
        SCIENTIFIC.iter().any(|re| re.is_match(&fragment.content)).then_some(Dialect::Python)
    }
}

// --- JavaScript --------------------------------------------------------------

static JAVASCRIPT: Lazy<Vec<&'static Regex>> = Lazy::new(|| {
    vec![
        regex!(r"(?m)^\s*(const|let|var)\s+\w+\s*="),
        regex!(r"(?m)^\s*(export\s+)?(async\s+)?function\s+\w+\s*\("),
        regex!(r"\bconsole\.(log|error|warn|info)\s*\("),
        regex!(r"\(([^()\n]*)\)\s*=>"),
    ]
});

pub(crate) struct JavaScriptLibrary;

impl DialectLibrary for JavaScriptLibrary {
    fn name(&self) -> &'static str {
        "generic-js"
    }

    fn detect_and_refine(&self, fragment: &Fragment) -> Option<Dialect> {
        if fragment.dialect == Some(Dialect::JavaScript) {
            return Some(Dialect::JavaScript);
        }
        JAVASCRIPT.iter().any(|re| re.is_match(&fragment.content)).then_some(Dialect::JavaScript)
    }
}

// --- Plain Python ------------------------------------------------------------

static PYTHON: Lazy<Vec<&'static Regex>> = Lazy::new(|| {
    vec![
        regex!(r"(?m)^\s*(def\s+\w+\s*\(|class\s+\w+\s*[:\(])"),
        regex!(r"(?m)^\s*(import\s+[A-Za-z_][\w.]*|from\s+[A-Za-z_][\w.]*\s+import\b)"),
        regex!(r"(?m)^\s*(if|elif|else|for|while|try|except|finally|with)\b[^:\n]*:\s*$"),
        regex!(r"(?m)^\s{4,}return\b"),
    ]
});

pub(crate) struct PythonLibrary;

impl DialectLibrary for PythonLibrary {
    fn name(&self) -> &'static str {
        "generic-python"
    }

    fn detect_and_refine(&self, fragment: &Fragment) -> Option<Dialect> {
        if fragment.dialect == Some(Dialect::Python) {
            return Some(Dialect::Python);
        }
        PYTHON.iter().any(|re| re.is_match(&fragment.content)).then_some(Dialect::Python)
    }
}
