//! Per-line code/prose classification.
//!
//! A single greedy forward pass with one line of look-back and no
//! backtracking. Reclassification is the assembler's job (its merge step can
//! bridge runs this pass split); keeping this pass simple keeps it provably
//! terminating and cheap.
//!
//! Decision order per line:
//!
//! 1. fence delimiter → `FenceMarker` (toggles an in-fence flag local to
//!    this pass; fenced regions classify as passthrough prose)
//! 2. forced index from the sanitizer → `Code(Generic)`
//! 3. first keyword-rule match → `Code(dialect_hint)`
//! 4. continuation: the previous line was code and this line is structural,
//!    short, or a comment → inherit the predecessor's hint
//! 5. otherwise `Prose`

use super::sanitize::is_fence_marker;
use crate::rules;
use crate::{Classification, Dialect, Line};

/// Classify every line. `forced` must be sorted ascending (the sanitizer
/// produces it in line order).
pub(crate) fn classify(lines: &[Line<'_>], forced: &[usize], continuation_max_len: usize) -> Vec<Classification> {
    let debug = std::env::var_os("REFENCE_DEBUG_RULES").is_some();
    let mut out: Vec<Classification> = Vec::with_capacity(lines.len());
    let mut in_fence = false;

    for line in lines {
        if is_fence_marker(line.raw) {
            in_fence = !in_fence;
            out.push(Classification::FenceMarker);
            continue;
        }
        if in_fence {
            out.push(Classification::Prose);
            continue;
        }
        if forced.binary_search(&line.index).is_ok() {
            out.push(Classification::Code(Dialect::Generic));
            continue;
        }
        if let Some(rule) = rules::line_rules().iter().find(|r| r.matcher.is_match(line.raw)) {
            if debug {
                eprintln!("[classify:keyword] line={} rule=\"{}\" dialect={:?}", line.index, rule.name, rule.dialect);
            }
            out.push(Classification::Code(rule.dialect));
            continue;
        }
        if let Some(Classification::Code(dialect)) = out.last().copied() {
            if continues_code(line.raw, continuation_max_len) {
                out.push(Classification::Code(dialect));
                continue;
            }
        }
        out.push(Classification::Prose);
    }

    out
}

/// Continuation heuristic: code blocks are rarely interrupted by short
/// connector lines, structural punctuation, or comments.
fn continues_code(raw: &str, continuation_max_len: usize) -> bool {
    let trimmed = raw.trim();
    if trimmed.len() < continuation_max_len {
        return true;
    }
    if trimmed.starts_with('#') || trimmed.starts_with("//") || trimmed.starts_with("/*") {
        return true;
    }
    trimmed.contains(|c: char| matches!(c, '(' | ')' | '{' | '}' | '=' | ':'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &str) -> Vec<String> {
        raw.split('\n').map(str::to_string).collect()
    }

    fn run(raw: &str, forced: &[usize]) -> Vec<Classification> {
        let owned = lines(raw);
        let line_refs: Vec<Line<'_>> =
            owned.iter().enumerate().map(|(index, raw)| Line { index, raw }).collect();
        classify(&line_refs, forced, 20)
    }

    #[test]
    fn prose_stays_prose() {
        let out = run("This is a plain explanation of quantum computing concepts.", &[]);
        assert_eq!(out, vec![Classification::Prose]);
    }

    #[test]
    fn keyword_lines_classify_with_hint() {
        let out = run("from qiskit import QuantumCircuit", &[]);
        assert_eq!(out, vec![Classification::Code(Dialect::Qiskit)]);
    }

    #[test]
    fn continuation_inherits_dialect() {
        let out = run("namespace Foo {\n    body();\n}", &[]);
        assert_eq!(
            out,
            vec![
                Classification::Code(Dialect::QSharp),
                Classification::Code(Dialect::QSharp),
                Classification::Code(Dialect::QSharp),
            ]
        );
    }

    #[test]
    fn long_structureless_prose_breaks_continuation() {
        let out = run("import numpy as np\nThe paragraph above demonstrates loading the library itself", &[]);
        assert_eq!(out[0], Classification::Code(Dialect::Python));
        assert_eq!(out[1], Classification::Prose);
    }

    #[test]
    fn fenced_region_is_passthrough() {
        let out = run("```python\nimport numpy as np\n```", &[]);
        assert_eq!(
            out,
            vec![Classification::FenceMarker, Classification::Prose, Classification::FenceMarker]
        );
    }

    #[test]
    fn forced_lines_classify_generic() {
        let out = run("totally plain words here\nanother plain line of text", &[1]);
        assert_eq!(out[0], Classification::Prose);
        assert_eq!(out[1], Classification::Code(Dialect::Generic));
    }
}
