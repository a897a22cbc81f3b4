//! Fragment assembly: grouping, structural merge, noise rejection.
//!
//! The classifier splits torn-apart code into several short `Code` runs; the
//! assembler's job is to weld them back together. It is a two-phase
//! algorithm with an explicit termination guarantee:
//!
//! ```text
//! (1) contiguous grouping   -> initial fragments
//! (2) pairwise merge pass   -> repeat until fixed point, capped
//! (3) noise rejection       -> drop keyword-poor fragments
//! ```
//!
//! Merging is transitive: each pass walks the list pairwise and re-walks
//! until a pass changes nothing. The list strictly shrinks on every changed
//! pass, so the loop converges; `max_merge_passes` is the defensive cap that
//! turns a would-be cycle into "return the fragments as they stood before
//! the failing iteration" instead of a hang.
//!
//! Fence markers are inviolable: a marker terminates a run in phase 1 and a
//! gap containing one can never be merged across in phase 2, so pre-existing
//! fenced blocks are never absorbed.

use super::metrics::{MergeMetrics, PassMetrics};
use crate::rules;
use crate::{Classification, Dialect, Fragment, Line, Options};
use std::time::Instant;

pub(crate) fn assemble(
    lines: &[Line<'_>],
    classifications: &[Classification],
    forced: &[usize],
    options: &Options,
) -> (Vec<Fragment>, MergeMetrics) {
    let debug = std::env::var_os("REFENCE_DEBUG_RULES").is_some();
    let mut fragments = group(lines, classifications);
    let mut metrics = MergeMetrics::default();

    for pass in 0..options.max_merge_passes {
        let pass_start = Instant::now();
        let before = fragments.clone();
        let merges = merge_pass(&mut fragments, lines, classifications, options);
        metrics.passes.push(PassMetrics {
            duration: pass_start.elapsed(),
            merges,
            fragments: fragments.len(),
        });
        if debug {
            eprintln!("[assemble:pass] pass={} merges={} fragments={}", pass, merges, fragments.len());
        }
        if merges == 0 {
            break;
        }
        if pass == options.max_merge_passes - 1 {
            // Cap reached while still changing: discard the failing
            // iteration and keep the last converged-enough state.
            fragments = before;
            metrics.aborted = true;
        }
    }

    fragments.retain(|fragment| {
        let keep = keyword_rich(fragment, options) || contains_forced(fragment, forced);
        if debug && !keep {
            eprintln!(
                "[assemble:reject] lines={}..{} content={:?}",
                fragment.start_line,
                fragment.end_line,
                preview(&fragment.content)
            );
        }
        keep
    });

    (fragments, metrics)
}

/// Phase 1: collapse consecutive `Code` lines into initial fragments.
fn group(lines: &[Line<'_>], classifications: &[Classification]) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut run_start: Option<usize> = None;
    let mut run_dialect: Option<Dialect> = None;

    for (index, classification) in classifications.iter().enumerate() {
        match classification {
            Classification::Code(dialect) => {
                if run_start.is_none() {
                    run_start = Some(index);
                }
                run_dialect = Some(prefer(run_dialect, *dialect));
            }
            Classification::Prose | Classification::FenceMarker => {
                if let Some(start) = run_start.take() {
                    fragments.push(make_fragment(lines, start, index - 1, run_dialect.take()));
                }
            }
        }
    }
    if let Some(start) = run_start {
        fragments.push(make_fragment(lines, start, classifications.len() - 1, run_dialect));
    }
    fragments
}

/// Phase 2, one pass: merge qualifying neighbor pairs in place. Returns the
/// number of merges performed.
fn merge_pass(
    fragments: &mut Vec<Fragment>,
    lines: &[Line<'_>],
    classifications: &[Classification],
    options: &Options,
) -> usize {
    let mut merges = 0;
    let mut i = 0;
    while i + 1 < fragments.len() {
        if can_merge(&fragments[i], &fragments[i + 1], classifications, options) {
            let next = fragments.remove(i + 1);
            let start = fragments[i].start_line;
            let dialect = match (fragments[i].dialect, next.dialect) {
                (Some(a), Some(b)) => Some(prefer(Some(a), b)),
                (a, b) => a.or(b),
            };
            fragments[i] = make_fragment(lines, start, next.end_line, dialect);
            merges += 1;
            // Do not advance: the merged fragment may chain further.
        } else {
            i += 1;
        }
    }
    merges
}

fn can_merge(a: &Fragment, b: &Fragment, classifications: &[Classification], options: &Options) -> bool {
    debug_assert!(a.end_line < b.start_line);
    let gap = b.start_line - a.end_line - 1;
    if gap > options.merge_gap {
        return false;
    }
    if ((a.end_line + 1)..b.start_line).any(|idx| classifications[idx] == Classification::FenceMarker) {
        return false;
    }
    bracket_continuity(a, b) || opener_pair(a, b)
}

/// The last line of `a` leaves a paren or brace open that `b` closes.
fn bracket_continuity(a: &Fragment, b: &Fragment) -> bool {
    let last = match a.content.lines().last() {
        Some(line) => line,
        None => return false,
    };
    let (parens, braces) = open_balance(last);
    (parens > 0 && b.content.contains(')')) || (braces > 0 && b.content.contains('}'))
}

/// Net open `(` and `{` counts for one line.
fn open_balance(line: &str) -> (i32, i32) {
    let mut parens = 0i32;
    let mut braces = 0i32;
    for ch in line.chars() {
        match ch {
            '(' => parens += 1,
            ')' => parens -= 1,
            '{' => braces += 1,
            '}' => braces -= 1,
            _ => {}
        }
    }
    (parens, braces)
}

/// Known opener keyword pairs: `a`'s tail introduces a construct whose
/// natural successor starts `b`.
fn opener_pair(a: &Fragment, b: &Fragment) -> bool {
    let tail = match a.content.lines().rev().find(|line| !line.trim().is_empty()) {
        Some(line) => line.trim(),
        None => return false,
    };
    let head = match b.content.lines().find(|line| !line.trim().is_empty()) {
        Some(line) => line.trim(),
        None => return false,
    };

    if tail.starts_with("namespace") && head.starts_with("open") {
        return true;
    }
    if tail.starts_with("open") && (head.starts_with("open") || head.starts_with("operation") || head.starts_with("function")) {
        return true;
    }
    // A bare call left open: `Foo(` at the tail, its `)` somewhere in b.
    tail.ends_with('(') && b.content.contains(')')
}

fn make_fragment(lines: &[Line<'_>], start: usize, end: usize, dialect: Option<Dialect>) -> Fragment {
    let content = lines[start..=end].iter().map(|line| line.raw).collect::<Vec<_>>().join("\n");
    Fragment { start_line: start, end_line: end, content, dialect }
}

fn prefer(current: Option<Dialect>, candidate: Dialect) -> Dialect {
    match current {
        Some(existing) if existing.specificity() >= candidate.specificity() => existing,
        _ => candidate,
    }
}

/// Noise gate: a fragment survives on keyword mass or structural syntax.
fn keyword_rich(fragment: &Fragment, options: &Options) -> bool {
    if fragment.content.contains(|c: char| matches!(c, '(' | ')' | '{' | '}')) {
        return true;
    }
    rules::keyword_hits(&fragment.content) >= options.min_keyword_hits
}

fn contains_forced(fragment: &Fragment, forced: &[usize]) -> bool {
    forced.iter().any(|&idx| idx >= fragment.start_line && idx <= fragment.end_line)
}

fn preview(content: &str) -> String {
    content.chars().take(60).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assemble_raw(raw: &str) -> Vec<Fragment> {
        let owned: Vec<String> = raw.split('\n').map(str::to_string).collect();
        let line_refs: Vec<Line<'_>> =
            owned.iter().enumerate().map(|(index, raw)| Line { index, raw }).collect();
        let classifications = crate::engine::classifier::classify(&line_refs, &[], 20);
        let (fragments, _) = assemble(&line_refs, &classifications, &[], &Options::default());
        fragments
    }

    #[test]
    fn contiguous_code_forms_one_fragment() {
        let fragments = assemble_raw("import numpy as np\nx = np.zeros(4)");
        assert_eq!(fragments.len(), 1);
        assert_eq!((fragments[0].start_line, fragments[0].end_line), (0, 1));
    }

    #[test]
    fn opener_pair_bridges_a_prose_gap() {
        let fragments = assemble_raw(
            "namespace Quantum.Demo {\n\nAs explained, the operation needs these namespaces available first.\n\nopen Microsoft.Quantum.Intrinsic;",
        );
        assert_eq!(fragments.len(), 1);
        assert_eq!((fragments[0].start_line, fragments[0].end_line), (0, 4));
        assert!(fragments[0].content.contains("namespace Quantum.Demo {"));
        assert!(fragments[0].content.contains("open Microsoft.Quantum.Intrinsic;"));
    }

    #[test]
    fn distant_fragments_stay_apart() {
        // Past the merge-gap threshold the stranded `open` line is never
        // welded on, and alone it is keyword-poor enough to be rejected.
        let gap = "this is a long unrelated prose paragraph with no structure\n".repeat(12);
        let input = format!("namespace Quantum.Demo {{\n{gap}open Microsoft.Quantum.Intrinsic;");
        let fragments = assemble_raw(&input);
        assert_eq!(fragments.len(), 1);
        assert_eq!((fragments[0].start_line, fragments[0].end_line), (0, 0));
    }

    #[test]
    fn lone_keyword_mention_is_rejected() {
        // A single short mention with no structural syntax scores one
        // keyword hit and gets dropped as prose noise.
        let fragments = assemble_raw("import antigravity");
        assert!(fragments.is_empty());
    }

    #[test]
    fn merge_never_crosses_a_fence() {
        // Bracket continuity holds across the gap (open paren on the first
        // fragment, close on the second), but the fence in between wins.
        let fragments = assemble_raw("x = np.zeros(\n```\nfenced text\n```\nnp.ones(4))");
        assert_eq!(fragments.len(), 2);
        assert_eq!((fragments[0].start_line, fragments[0].end_line), (0, 0));
        assert_eq!((fragments[1].start_line, fragments[1].end_line), (4, 4));
    }
}
