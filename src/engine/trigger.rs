//! Trigger scanning (input pre-classification).
//!
//! One cheap pass over the raw input computes a [`SignalMask`] of coarse
//! code signals. An empty mask is the quick-reject: the dominant case in
//! production is a response with no code at all, and it must return without
//! allocating any pipeline state.
//!
//! ## Design notes
//!
//! - This is a *heuristic* scan. False positives are acceptable: the full
//!   pipeline still has to find classifiable lines, and an input with no
//!   real code falls through unchanged anyway. False negatives only skip
//!   the transform, which degrades to the identity — the fail-open
//!   direction.
//! - Keep the scan cheap. Signals exist to avoid work, not to duplicate the
//!   classifier's rule table.

use std::time::Duration;

bitflags::bitflags! {
    /// Coarse code signals detected in the raw input.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SignalMask: u32 {
        const HAS_FENCE     = 1 << 0;
        const CODE_MARKED   = 1 << 1;
        const QSHARPISH     = 1 << 2;
        const QISKITISH     = 1 << 3;
        const PYTHONISH     = 1 << 4;
        const JSISH         = 1 << 5;
        const SCIENTIFICISH = 1 << 6;
    }
}

/// Input characteristics detected from the raw input.
#[derive(Debug, Clone)]
pub struct TriggerInfo {
    pub signals: SignalMask,
    /// Time spent scanning; folded into run metrics on the verbose path.
    pub elapsed: Duration,
}

impl TriggerInfo {
    /// Scan `input` for coarse code signals.
    pub fn scan(input: &str) -> Self {
        let start = std::time::Instant::now();
        let mut signals = SignalMask::empty();

        if input.contains("```") {
            signals |= SignalMask::HAS_FENCE;
        }
        if regex!(r"(?m)^\s*CODE:").is_match(input) {
            signals |= SignalMask::CODE_MARKED;
        }
        // Each signal pattern is a superset of the matching dialect's line
        // rules: anything the classifier could tag must get past this gate.
        if regex!(r"(?m)\bMicrosoft\.Quantum\.|^\s*namespace\s+[A-Za-z_][\w.]*\s*\{?\s*$|^\s*open\s+[A-Z][\w.]*\s*;?\s*$|^\s*(operation\s+\w+|function\s+[A-Z]\w*)\s*\(|\buse\s+\w+\s*=\s*Qubit|^\s*(within|apply)\s*\{|\b(Controlled|Adjoint)\s+\w+\s*\(|\bis\s+Adj\b|^\s*(H|X|Y|Z|CNOT|M|Measure|MeasureWithProbability|Reset|ResetAll)\s*\([^)]*\)\s*;?\s*$")
            .is_match(input)
        {
            signals |= SignalMask::QSHARPISH;
        }
        if regex!(r"(?m)\b(qiskit|QuantumCircuit|QuantumRegister|ClassicalRegister|aer_simulator|qasm_simulator|statevector_simulator|get_counts|plot_histogram|plot_bloch_multivector|plot_state_city)\b|\bAer\b|\b(execute|transpile|assemble|result)\s*[\(\[]|^\s*\w+\.(h|x|y|z|s|t|sdg|tdg|cx|cy|cz|ccx|ch|swap|rx|ry|rz|crx|cry|crz|measure|measure_all|barrier|reset|draw|initialize|append)\s*[\(\[]")
            .is_match(input)
        {
            signals |= SignalMask::QISKITISH;
        }
        if regex!(r"(?m)^\s*(import\s+[A-Za-z_][\w.]*|from\s+[A-Za-z_][\w.]*\s+import\b|def\s+\w+\s*\(|class\s+\w+\s*[:\(])|^\s*(if|elif|else|for|while|try|except|finally|with)\b[^:\n]*:\s*$|^\s{4,}return\b")
            .is_match(input)
        {
            signals |= SignalMask::PYTHONISH;
        }
        if regex!(r"(?m)^\s*(const|let|var)\s+\w+\s*=|^\s*(export\s+)?(async\s+)?function\s+\w+\s*\(|\bconsole\.(log|error|warn|info)\s*\(|\([^()\n]*\)\s*=>")
            .is_match(input)
        {
            signals |= SignalMask::JSISH;
        }
        if regex!(r"\b(numpy|pandas|scipy)\b|\b(np|pd|plt)\.\w+|\b\w+\.(head|describe|groupby|merge|fillna|dropna|pivot_table|iloc|loc|to_csv)\s*[\(\[]")
            .is_match(input)
        {
            signals |= SignalMask::SCIENTIFICISH;
        }

        if std::env::var_os("REFENCE_DEBUG_RULES").is_some() {
            eprintln!("[trigger_scan] signals={signals:?}");
        }

        TriggerInfo { signals, elapsed: start.elapsed() }
    }

    /// True when no signal fired: the input cannot contain recoverable code
    /// and the pipeline is skipped entirely.
    pub fn quiet(&self) -> bool {
        self.signals.is_empty()
    }

    /// Names of the signals that fired, for verbose reporting.
    pub fn signal_names(&self) -> Vec<String> {
        self.signals.iter_names().map(|(name, _)| name.to_string()).collect()
    }
}
