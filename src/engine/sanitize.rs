//! Pre-analysis sanitation of externally sourced text.
//!
//! The RAG layer upstream splices search-result text into responses, and it
//! marks lines it already suspects are code with a `CODE:` prefix. This pass
//! runs before classification and does three things:
//!
//! - strips `CODE:` markers and queues those line indices for forced
//!   classification as `Code(Generic)`;
//! - escapes markdown-breaking characters inside those externally sourced
//!   lines (backticks, `$`, brackets, emphasis markers, `#`);
//! - neutralizes an unpaired trailing fence marker by escaping it, so every
//!   downstream stage — and the final output — sees balanced fences.
//!
//! Fenced regions pass through untouched. The pass never fails: it is a
//! total function over `&str`, and the orchestrator's fail-open boundary
//! covers rule-table construction.

/// Sanitizer output: the cleaned text plus the indices of lines forced to
/// classify as code. `forced` is strictly increasing.
#[derive(Debug, Clone)]
pub(crate) struct Sanitized {
    pub text: String,
    pub forced: Vec<usize>,
}

/// True for a line that opens or closes a fenced block.
pub(crate) fn is_fence_marker(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

pub(crate) fn sanitize(raw: &str) -> Sanitized {
    let lines: Vec<&str> = raw.split('\n').collect();
    let marker_total = lines.iter().filter(|l| is_fence_marker(l)).count();

    let mut out_lines: Vec<String> = Vec::with_capacity(lines.len());
    let mut forced = Vec::new();
    let mut markers_seen = 0;
    let mut in_fence = false;

    for (index, line) in lines.iter().enumerate() {
        if is_fence_marker(line) {
            markers_seen += 1;
            // The last marker of an odd total would open a fence nothing
            // closes; escape it so fence accounting stays balanced.
            let unpaired = !in_fence && markers_seen == marker_total && marker_total % 2 == 1;
            if unpaired {
                out_lines.push(escape_markdown(line));
            } else {
                in_fence = !in_fence;
                out_lines.push((*line).to_string());
            }
            continue;
        }
        if in_fence {
            out_lines.push((*line).to_string());
            continue;
        }
        if let Some(rest) = strip_code_marker(line) {
            forced.push(index);
            out_lines.push(escape_markdown(rest));
            continue;
        }
        out_lines.push((*line).to_string());
    }

    if std::env::var_os("REFENCE_DEBUG_RULES").is_some() && !forced.is_empty() {
        eprintln!("[sanitize] forced_code_lines={forced:?}");
    }

    Sanitized { text: out_lines.join("\n"), forced }
}

/// Strip a leading `CODE:` marker, returning the remainder of the line.
fn strip_code_marker(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let rest = trimmed.strip_prefix("CODE:")?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

/// Backslash-escape the characters that corrupt markdown rendering when
/// externally sourced text lands outside a fence.
fn escape_markdown(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if matches!(ch, '`' | '$' | '[' | ']' | '*' | '_' | '#') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_without_markers() {
        let input = "plain prose\nmore prose\n";
        let out = sanitize(input);
        assert_eq!(out.text, input);
        assert!(out.forced.is_empty());
    }

    #[test]
    fn strips_code_marker_and_forces_line() {
        let out = sanitize("intro\nCODE: const x = 5;\noutro");
        assert_eq!(out.text, "intro\nconst x = 5;\noutro");
        assert_eq!(out.forced, vec![1]);
    }

    #[test]
    fn escapes_markdown_in_marked_lines() {
        let out = sanitize("CODE: price is $5 *today*");
        assert_eq!(out.text, "price is \\$5 \\*today\\*");
    }

    #[test]
    fn balanced_fences_untouched() {
        let input = "```python\nprint(1)\n```";
        assert_eq!(sanitize(input).text, input);
    }

    #[test]
    fn unpaired_trailing_fence_is_escaped() {
        let out = sanitize("prose\n```\ncode inside\n```\ndangling:\n```");
        assert_eq!(out.text.matches("```").count(), 2);
        assert!(out.text.ends_with("\\`\\`\\`"));
    }

    #[test]
    fn code_marker_inside_fence_is_preserved() {
        let input = "```\nCODE: not a marker here\n```";
        let out = sanitize(input);
        assert_eq!(out.text, input);
        assert!(out.forced.is_empty());
    }
}
