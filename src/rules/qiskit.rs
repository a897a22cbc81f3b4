//! Qiskit pattern library.
//!
//! Recognizes the circuit-construction idiom (`qc = QuantumCircuit(2)`),
//! gate-application chains, simulator execution and result/plot calls, with
//! priority above the generic Python rules.
//!
//! This is the one dialect with correction rules. Search results routinely
//! arrive with method calls mangled into index syntax (`qc.h[0]`) and
//! constructor arguments wrapped in a spurious list (`QuantumCircuit([2])`);
//! both have a single deterministic repair.

use super::DialectLibrary;
use crate::{CorrectionRule, Dialect, Fragment, PatternRule};
use once_cell::sync::Lazy;
use regex::Regex;

// The gate/method alternation appears in both the gate-chain rule and the
// bracket-call correction below; the two lists must stay in sync. Keeping
// the set closed stops the rewrite from touching real Python indexing like
// `df.iloc[0]`.

/// Line-level detection rules contributed to the classifier table.
pub(crate) fn line_rules() -> Vec<PatternRule> {
    vec![
        kw! {
            name: "qiskit import",
            re: r"(?m)^\s*(from\s+qiskit[\w.]*\s+import\b|import\s+qiskit\b)",
            dialect: Dialect::Qiskit,
            priority: 36,
        },
        kw! {
            name: "qiskit circuit construction",
            re: r"\b(QuantumCircuit|QuantumRegister|ClassicalRegister)\s*[\(\[]",
            dialect: Dialect::Qiskit,
            priority: 34,
        },
        kw! {
            name: "qiskit gate chain",
            re: r"(?m)^\s*\w+\.(h|x|y|z|s|t|sdg|tdg|cx|cy|cz|ccx|ch|swap|rx|ry|rz|crx|cry|crz|measure|measure_all|barrier|reset|draw|initialize|append)\s*[\(\[]",
            dialect: Dialect::Qiskit,
            priority: 32,
        },
        kw! {
            name: "qiskit simulator execution",
            re: r"\b(Aer\.get_backend|execute|transpile|assemble)\s*[\(\[]",
            dialect: Dialect::Qiskit,
            priority: 32,
        },
        kw! {
            name: "qiskit simulator backend name",
            re: r"\b(aer_simulator|qasm_simulator|statevector_simulator)\b",
            dialect: Dialect::Qiskit,
            priority: 30,
        },
        kw! {
            name: "qiskit result/plot call",
            re: r"\b(get_counts|plot_histogram|plot_bloch_multivector|plot_state_city|result)\s*[\(\[]",
            dialect: Dialect::Qiskit,
            priority: 30,
        },
    ]
}

static STRONG: Lazy<Vec<&'static Regex>> = Lazy::new(|| {
    vec![
        regex!(r"(?m)^\s*(from\s+qiskit[\w.]*\s+import\b|import\s+qiskit\b)"),
        regex!(r"\b(QuantumCircuit|QuantumRegister|ClassicalRegister)\s*[\(\[]"),
        regex!(r"\bAer\.get_backend\s*\("),
    ]
});

static WEAK: Lazy<Vec<&'static Regex>> = Lazy::new(|| {
    vec![
        regex!(r"(?m)^\s*\w+\.(h|x|y|z|cx|cy|cz|ccx|swap|rx|ry|rz|measure|measure_all|barrier|draw)\s*[\(\[]"),
        regex!(r"\b(aer_simulator|qasm_simulator|statevector_simulator)\b"),
        regex!(r"\b(execute|transpile|assemble)\s*\("),
        regex!(r"\b(get_counts|plot_histogram|plot_bloch_multivector)\s*[\(\[]"),
    ]
});

/// Correction rule table; applied in order via `replace_all`.
fn corrections() -> &'static [CorrectionRule] {
    static CORRECTIONS: Lazy<Vec<CorrectionRule>> = Lazy::new(|| {
        vec![
            fix! {
                name: "bracket call to paren call",
                re: r"\b(\w+)\.(h|x|y|z|s|t|sdg|tdg|cx|cy|cz|ccx|ch|swap|rx|ry|rz|crx|cry|crz|u|p|measure|measure_all|barrier|reset|draw|initialize|append)\[([^\[\]]*)\]",
                rewrite: |caps| format!("{}.{}({})", &caps[1], &caps[2], respace_args(&caps[3])),
            },
            fix! {
                name: "constructor list argument to scalar",
                re: r"\b(QuantumCircuit|QuantumRegister|ClassicalRegister)\(\s*\[([^\[\]]*)\]\s*\)",
                rewrite: |caps| format!("{}({})", &caps[1], respace_args(&caps[2])),
            },
            fix! {
                name: "constructor bracket to paren",
                re: r"\b(QuantumCircuit|QuantumRegister|ClassicalRegister)\[([^\[\]]*)\]",
                rewrite: |caps| format!("{}({})", &caps[1], respace_args(&caps[2])),
            },
        ]
    });
    &CORRECTIONS
}

/// Re-join a comma-separated argument list with canonical `", "` spacing.
fn respace_args(args: &str) -> String {
    args.split(',').map(str::trim).collect::<Vec<_>>().join(", ")
}

pub(crate) struct QiskitLibrary;

impl DialectLibrary for QiskitLibrary {
    fn name(&self) -> &'static str {
        "qiskit"
    }

    fn detect_and_refine(&self, fragment: &Fragment) -> Option<Dialect> {
        if fragment.dialect == Some(Dialect::Qiskit) {
            return Some(Dialect::Qiskit);
        }
        let content = fragment.content.as_str();
        if STRONG.iter().any(|re| re.is_match(content)) {
            return Some(Dialect::Qiskit);
        }
        let weak = WEAK.iter().filter(|re| re.is_match(content)).count();
        (weak >= 2).then_some(Dialect::Qiskit)
    }

    fn correct(&self, content: &str) -> String {
        let mut out = content.to_string();
        for rule in corrections() {
            if std::env::var_os("REFENCE_DEBUG_RULES").is_some() && rule.matcher.is_match(&out) {
                eprintln!("[correct] applying \"{}\"", rule.name);
            }
            out = rule.matcher.replace_all(&out, |caps: &regex::Captures| (rule.rewrite)(caps)).into_owned();
        }
        out
    }
}
