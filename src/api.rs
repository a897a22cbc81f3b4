use crate::engine::{Pipeline, TriggerInfo};
use crate::{Dialect, Fragment};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

/// Options that affect classification and assembly behavior.
///
/// The defaults are the empirically chosen production thresholds. They are
/// preserved as configuration rather than hard-coded constants because they
/// are candidates for tuning against a corpus of real fragmented responses.
#[derive(Debug, Clone)]
pub struct Options {
    /// Maximum number of lines between two fragments for the merge step to
    /// consider welding them.
    pub merge_gap: usize,
    /// Minimum keyword occurrences for a fragment with no structural syntax
    /// to survive noise rejection.
    pub min_keyword_hits: usize,
    /// Lines shorter than this continue a preceding code run.
    pub continuation_max_len: usize,
    /// Defensive cap on merge passes; reaching it aborts the merge step.
    pub max_merge_passes: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options { merge_gap: 10, min_keyword_hits: 2, continuation_max_len: 20, max_merge_passes: 16 }
    }
}

/// A recovered code region in the output.
///
/// `start_line`/`end_line` index the (sanitized) input lines the region was
/// assembled from; `content` is the corrected text emitted inside the fence.
#[derive(Debug, Clone)]
pub struct CodeSpan {
    pub start_line: usize,
    pub end_line: usize,
    /// Fence tag: `python`, `qsharp`, `javascript`, or `text`.
    pub tag: &'static str,
    pub content: String,
}

/// Result from [`transform_with`].
#[derive(Debug, Clone)]
pub struct TransformResult {
    /// The input text.
    pub text: String,
    /// The output text, safe to hand to a markdown renderer.
    pub output: String,
    /// Recovered code regions, in line order.
    pub spans: Vec<CodeSpan>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// A compact per-pass merge trace.
#[derive(Debug, Clone)]
pub struct MergePass {
    pub pass: usize,
    pub duration: Duration,
    pub merges: usize,
    pub fragments: usize,
}

/// Additional details returned by [`transform_verbose_with`].
///
/// This is intentionally compact: it is meant for debugging and performance
/// inspection without dumping the entire internal state.
#[derive(Debug, Clone)]
pub struct TransformDetails {
    pub total: Duration,
    pub trigger: Duration,
    pub sanitize: Duration,
    pub classify: Duration,
    pub assemble: Duration,
    pub refine: Duration,
    pub render: Duration,
    /// Per-pass merge trace.
    pub merge_passes: Vec<MergePass>,
    /// True when the merge-pass cap was hit before convergence.
    pub merge_aborted: bool,
    /// Names of the trigger signals that fired for this input.
    pub signals: Vec<String>,
}

/// Result from [`transform_verbose_with`].
#[derive(Debug, Clone)]
pub struct TransformResultVerbose {
    pub text: String,
    pub output: String,
    pub spans: Vec<CodeSpan>,
    pub elapsed: Duration,
    pub details: TransformDetails,
}

/// Recover unfenced code in `text` and return the re-fenced output.
///
/// This is the fail-open entry point: it never panics and never errors. If
/// the input carries no code signal it is returned unchanged without
/// allocating pipeline state; if anything inside the pipeline panics, the
/// original text is returned so a user-facing response can always render.
///
/// # Example
/// ```
/// use refence::transform;
///
/// let out = transform("qc.h[0]\nqc.cx[0,1]");
/// assert!(out.contains("```python"));
/// ```
pub fn transform(text: &str) -> String {
    if TriggerInfo::scan(text).quiet() {
        return text.to_string();
    }
    match catch_unwind(AssertUnwindSafe(|| Pipeline::new(text, &Options::default()).run_with_metrics().output)) {
        Ok(output) => output,
        Err(_) => text.to_string(),
    }
}

/// Run the pipeline with explicit `options`.
///
/// Unlike [`transform`] this returns the structured result (spans, timing)
/// and does not install a panic boundary; use it when the caller wants to
/// observe the run rather than fire-and-forget.
pub fn transform_with(text: &str, options: &Options) -> TransformResult {
    let run = Pipeline::new(text, options).run_with_metrics();
    TransformResult {
        text: text.to_string(),
        output: run.output,
        spans: run.fragments.iter().map(fragment_to_span).collect(),
        elapsed: run.metrics.total,
    }
}

/// Run the pipeline with `options` and return extra (compact) debug details.
///
/// Useful for profiling and rule debugging; the default [`transform_with`]
/// path does not allocate these extra traces.
pub fn transform_verbose_with(text: &str, options: &Options) -> TransformResultVerbose {
    let run = Pipeline::new(text, options).run_with_metrics();

    let merge_passes = run
        .metrics
        .merge
        .passes
        .iter()
        .enumerate()
        .map(|(idx, pass)| MergePass {
            pass: idx,
            duration: pass.duration,
            merges: pass.merges,
            fragments: pass.fragments,
        })
        .collect();

    let details = TransformDetails {
        total: run.metrics.total,
        trigger: run.metrics.trigger,
        sanitize: run.metrics.sanitize,
        classify: run.metrics.classify,
        assemble: run.metrics.assemble,
        refine: run.metrics.refine,
        render: run.metrics.render,
        merge_passes,
        merge_aborted: run.metrics.merge.aborted,
        signals: run.signals.clone(),
    };

    TransformResultVerbose {
        text: text.to_string(),
        output: run.output,
        spans: run.fragments.iter().map(fragment_to_span).collect(),
        elapsed: run.metrics.total,
        details,
    }
}

fn fragment_to_span(fragment: &Fragment) -> CodeSpan {
    CodeSpan {
        start_line: fragment.start_line,
        end_line: fragment.end_line,
        tag: fragment.dialect.unwrap_or(Dialect::Generic).fence_tag(),
        content: fragment.content.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_on_code_free_text() {
        let input = "The weather is nice today.\nShall we talk about cooking instead?\n";
        assert_eq!(transform(input), input);
    }

    #[test]
    fn correction_determinism() {
        let out = transform("qc.h[0]\nqc.cx[0,1]");
        assert_eq!(out, "```python\nqc.h(0)\nqc.cx(0, 1)\n```");
    }

    #[test]
    fn qsharp_fragment_fusion() {
        let input = "namespace Foo {\nThis long explanatory sentence interrupts the snippet badly.\nopen Microsoft.Quantum.Intrinsic;";
        let out = transform(input);
        assert_eq!(out.matches("```qsharp").count(), 1);
        let block_start = out.find("```qsharp").unwrap();
        let namespace_at = out.find("namespace Foo {").unwrap();
        let open_at = out.find("open Microsoft.Quantum.Intrinsic;").unwrap();
        assert!(block_start < namespace_at && namespace_at < open_at);
    }

    #[test]
    fn already_fenced_passthrough() {
        let input = "Here is the snippet.\n```python\nprint('hello world')\n```\nDone.";
        assert_eq!(transform(input), input);
    }

    #[test]
    fn idempotence() {
        let inputs = [
            "qc.h[0]\nqc.cx[0,1]",
            "namespace Foo {\nopen Microsoft.Quantum.Intrinsic;",
            "Prose first.\nimport numpy as np\nx = np.zeros(4)\nProse after the snippet explains the result in detail.",
            "Nothing code-like at all.",
        ];
        for input in inputs {
            let once = transform(input);
            assert_eq!(transform(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn fence_balance() {
        let inputs = [
            "qc.h[0]\nqc.cx[0,1]",
            "```\ndangling fence without a close",
            "a\n```\nb\n```\nc\n```",
            "const x = 1;\nconsole.log(x);",
        ];
        for input in inputs {
            let out = transform(input);
            assert_eq!(out.matches("```").count() % 2, 0, "unbalanced fences for {input:?}");
        }
    }

    #[test]
    fn line_order_preservation() {
        let input = "Intro prose explains what the snippet is going to compute.\nimport numpy as np\nx = np.zeros(4)\nClosing prose summarizes the numerical result in a sentence.";
        let out = transform(input);
        let intro = out.find("Intro prose").unwrap();
        let code = out.find("import numpy").unwrap();
        let closing = out.find("Closing prose").unwrap();
        assert!(intro < code && code < closing);
        assert!(out.starts_with("Intro prose explains what the snippet is going to compute.\n"));
        assert!(out.ends_with("Closing prose summarizes the numerical result in a sentence."));
    }

    #[test]
    fn forced_code_marker_renders_as_text_block() {
        let out = transform("CODE: someObj.doThing(42);");
        assert_eq!(out, "```text\nsomeObj.doThing(42);\n```");
    }

    #[test]
    fn fail_open_on_pathological_input() {
        // Heavy nesting plus keyword bait: must terminate, stay balanced,
        // and stay idempotent. The regex engine is linear-time, so the old
        // catastrophic-backtracking failure mode degrades to plain work.
        let mut input = String::from("import numpy as np\n");
        input.push_str(&"(".repeat(4096));
        input.push('\n');
        input.push_str(&"np.zeros(1) ".repeat(256));
        input.push('\n');
        input.push_str(&")".repeat(4096));
        let out = transform(&input);
        assert_eq!(out.matches("```").count() % 2, 0);
        assert_eq!(transform(&out), out);
    }

    #[test]
    fn verbose_details_track_stages() {
        let res = transform_verbose_with("import numpy as np\nx = np.zeros(4)", &Options::default());
        assert_eq!(res.spans.len(), 1);
        assert_eq!(res.spans[0].tag, "python");
        assert!(res.details.total >= res.details.classify);
        assert!(!res.details.signals.is_empty());
        assert!(!res.details.merge_aborted);
    }

    #[test]
    fn quick_reject_allocates_no_spans() {
        let res = transform_with("Only prose lives here.", &Options::default());
        assert_eq!(res.output, res.text);
        assert!(res.spans.is_empty());
    }
}
