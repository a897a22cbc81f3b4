use refence::TransformResultVerbose;

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(input: &str, res: &TransformResultVerbose, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Refencing {} bytes of input", input.len()), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Trigger ━━━", ansi::GRAY));
    if res.details.signals.is_empty() {
        println!("{}", palette.dim("  No code signals — input returned unchanged"));
    } else {
        println!("  Signals: {}", palette.paint(res.details.signals.join(", "), ansi::BLUE));
    }

    println!("\n{}", palette.paint("━━━ Merge ━━━", ansi::GRAY));
    for pass in &res.details.merge_passes {
        println!(
            "  {} {}",
            palette.paint(format!("Pass {}:", pass.pass), ansi::BLUE),
            if pass.merges > 0 {
                palette.paint(format!("✓ {} merges → {} fragments", pass.merges, pass.fragments), ansi::GREEN)
            } else {
                palette.dim(format!("✗ 0 merges, {} fragments", pass.fragments))
            }
        );
    }
    if res.details.merge_aborted {
        println!("  {}", palette.paint("merge aborted: pass cap reached before convergence", ansi::YELLOW));
    }

    println!("\n{}", palette.paint("━━━ Spans ━━━", ansi::GRAY));
    if res.spans.is_empty() {
        println!("{}", palette.dim("  No code spans recovered"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • No line passed the keyword or continuation tests");
        println!("  • Fragments were rejected as keyword-poor noise");
        println!("  • All code was already inside well-formed fences");
        println!("\n{}", palette.dim("  Tip: Set REFENCE_DEBUG_RULES=1 to see rule-level traces"));
    } else {
        for (idx, span) in res.spans.iter().enumerate() {
            println!(
                "  {} {} {} {}",
                palette.paint(format!("[{}]", idx), ansi::GRAY),
                palette.bold(palette.paint(span.tag, ansi::GREEN)),
                palette.dim("│"),
                palette.paint(format!("lines {}..{}", span.start_line, span.end_line), ansi::YELLOW),
            );
            let preview: String = span.content.chars().take(72).collect();
            println!("      {}", palette.dim(preview.replace('\n', "⏎")));
        }
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Classify: {}  │  Assemble: {}  │  Render: {}",
        palette.paint(format!("{:?}", res.details.total), ansi::GREEN),
        palette.paint(format!("{:?}", res.details.classify), ansi::CYAN),
        palette.paint(format!("{:?}", res.details.assemble), ansi::CYAN),
        palette.dim(format!("{:?}", res.details.render)),
    );

    println!("\n{}", palette.paint("━━━ Output ━━━", ansi::GRAY));
    println!("{}", res.output);
}
