//! Stage sequencing and dialect-library dispatch.
//!
//! `Pipeline` owns the per-call working state — the sanitized text, the
//! line vector, the classifications, the fragments — for the duration of
//! one run and drops all of it at return. Stages receive borrowed views.
//!
//! High-level flow inside `run_with_metrics`:
//!
//! ```text
//! sanitize() -> classify() -> assemble() -> refine() -> render()
//!                                 │            └─ ordered library dispatch,
//!                                 │               first claim wins
//!                                 └─ capped fixed-point merge
//! ```

use super::metrics::{RunMetrics, RunResult};
use super::trigger::TriggerInfo;
use super::{assembler, classifier, renderer, sanitize};
use crate::rules;
use crate::{Dialect, Fragment, Line, Options};
use std::time::Instant;

pub(crate) struct Pipeline<'a> {
    input: &'a str,
    options: &'a Options,
}

impl<'a> Pipeline<'a> {
    pub fn new(input: &'a str, options: &'a Options) -> Self {
        Pipeline { input, options }
    }

    /// Run every stage and return the output with timing details.
    pub fn run_with_metrics(self) -> RunResult {
        let total_start = Instant::now();
        let mut metrics = RunMetrics::default();

        let trigger = TriggerInfo::scan(self.input);
        metrics.trigger = trigger.elapsed;
        let signals = trigger.signal_names();
        if trigger.quiet() {
            metrics.total = total_start.elapsed();
            return RunResult { output: self.input.to_string(), fragments: Vec::new(), signals, metrics };
        }

        let sanitize_start = Instant::now();
        let sanitized = sanitize::sanitize(self.input);
        metrics.sanitize = sanitize_start.elapsed();

        let lines: Vec<Line<'_>> =
            sanitized.text.split('\n').enumerate().map(|(index, raw)| Line { index, raw }).collect();

        let classify_start = Instant::now();
        let classifications = classifier::classify(&lines, &sanitized.forced, self.options.continuation_max_len);
        metrics.classify = classify_start.elapsed();

        let assemble_start = Instant::now();
        let (fragments, merge) = assembler::assemble(&lines, &classifications, &sanitized.forced, self.options);
        metrics.assemble = assemble_start.elapsed();
        metrics.merge = merge;

        let refine_start = Instant::now();
        let fragments: Vec<Fragment> = fragments.into_iter().map(refine).collect();
        metrics.refine = refine_start.elapsed();

        let render_start = Instant::now();
        let output = renderer::render(&lines, &fragments);
        metrics.render = render_start.elapsed();

        metrics.total = total_start.elapsed();
        RunResult { output, fragments, signals, metrics }
    }
}

/// Dispatch the dialect libraries in their fixed order; the first claim
/// refines the fragment and applies that library's corrections. Unclaimed
/// fragments stay `Generic`.
fn refine(fragment: Fragment) -> Fragment {
    let debug = std::env::var_os("REFENCE_DEBUG_RULES").is_some();
    for library in rules::libraries() {
        if let Some(dialect) = library.detect_and_refine(&fragment) {
            if debug {
                eprintln!(
                    "[refine:claim] library=\"{}\" lines={}..{} dialect={:?}",
                    library.name(),
                    fragment.start_line,
                    fragment.end_line,
                    dialect
                );
            }
            let content = library.correct(&fragment.content);
            return Fragment { dialect: Some(dialect), content, ..fragment };
        }
    }
    Fragment { dialect: Some(Dialect::Generic), ..fragment }
}
