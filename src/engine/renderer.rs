//! Fenced-block emission.
//!
//! Walks the original lines in order. Indices covered by a fragment emit
//! exactly one fenced block (dialect tag, content trimmed of leading and
//! trailing blank lines, closing fence); every other line — blank lines and
//! pre-existing fence markers included — is emitted verbatim. Emitted fences
//! are always paired and the sanitizer has already neutralized any unpaired
//! input marker, so the output fence count is always even.

use crate::{Dialect, Fragment, Line};

/// Render the final output. `fragments` must be sorted and disjoint (the
/// assembler's invariant).
pub(crate) fn render(lines: &[Line<'_>], fragments: &[Fragment]) -> String {
    let mut out: Vec<String> = Vec::with_capacity(lines.len() + fragments.len() * 2);
    let mut frag_iter = fragments.iter().peekable();
    let mut index = 0;

    while index < lines.len() {
        match frag_iter.peek() {
            Some(fragment) if fragment.start_line == index => {
                let tag = fragment.dialect.unwrap_or(Dialect::Generic).fence_tag();
                out.push(format!("```{tag}"));
                for line in trimmed_block(&fragment.content) {
                    out.push(line.to_string());
                }
                out.push("```".to_string());
                index = fragment.end_line + 1;
                frag_iter.next();
            }
            _ => {
                out.push(lines[index].raw.to_string());
                index += 1;
            }
        }
    }

    out.join("\n")
}

/// Fragment content minus leading/trailing blank lines.
fn trimmed_block(content: &str) -> Vec<&str> {
    let lines: Vec<&str> = content.split('\n').collect();
    let first = lines.iter().position(|line| !line.trim().is_empty());
    let last = lines.iter().rposition(|line| !line.trim().is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].to_vec(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_refs(owned: &[String]) -> Vec<Line<'_>> {
        owned.iter().enumerate().map(|(index, raw)| Line { index, raw }).collect()
    }

    #[test]
    fn uncovered_lines_pass_through_verbatim() {
        let owned: Vec<String> = "alpha\nbeta\n".split('\n').map(str::to_string).collect();
        let rendered = render(&line_refs(&owned), &[]);
        assert_eq!(rendered, "alpha\nbeta\n");
    }

    #[test]
    fn fragment_emits_one_tagged_block() {
        let owned: Vec<String> = "before\nx = np.zeros(4)\nafter".split('\n').map(str::to_string).collect();
        let fragments = vec![Fragment {
            start_line: 1,
            end_line: 1,
            content: "x = np.zeros(4)".to_string(),
            dialect: Some(Dialect::Python),
        }];
        let rendered = render(&line_refs(&owned), &fragments);
        assert_eq!(rendered, "before\n```python\nx = np.zeros(4)\n```\nafter");
    }

    #[test]
    fn block_content_is_blank_trimmed() {
        let owned: Vec<String> = "\ncode(1)\n\n".split('\n').map(str::to_string).collect();
        let fragments = vec![Fragment {
            start_line: 0,
            end_line: 3,
            content: "\ncode(1)\n\n".to_string(),
            dialect: None,
        }];
        let rendered = render(&line_refs(&owned), &fragments);
        assert_eq!(rendered, "```text\ncode(1)\n```");
    }

    #[test]
    fn output_fences_are_balanced() {
        let owned: Vec<String> = "a(1)\nprose\nb(2)".split('\n').map(str::to_string).collect();
        let fragments = vec![
            Fragment { start_line: 0, end_line: 0, content: "a(1)".into(), dialect: Some(Dialect::JavaScript) },
            Fragment { start_line: 2, end_line: 2, content: "b(2)".into(), dialect: Some(Dialect::QSharp) },
        ];
        let rendered = render(&line_refs(&owned), &fragments);
        assert_eq!(rendered.matches("```").count() % 2, 0);
        assert!(rendered.contains("```javascript"));
        assert!(rendered.contains("```qsharp"));
    }
}
