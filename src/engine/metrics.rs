//! Engine run metrics.
//!
//! A small set of structs used to observe and debug pipeline behavior.
//! Metrics are intentionally simple and *opt-in*: the normal `transform`
//! path collects stage durations only, and the verbose API surfaces them
//! without dumping internal state.

use crate::Fragment;
use std::time::Duration;

// --- Metrics -----------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Total elapsed time for one pipeline run.
    pub total: Duration,
    /// Trigger scan (quick-reject) time.
    pub trigger: Duration,
    pub sanitize: Duration,
    pub classify: Duration,
    /// Assembly phase, including the merge-pass trace.
    pub assemble: Duration,
    pub merge: MergeMetrics,
    /// Dialect-library dispatch + corrections.
    pub refine: Duration,
    pub render: Duration,
}

/// Fixed-point merge trace.
#[derive(Debug, Default, Clone)]
pub struct MergeMetrics {
    /// One entry per merge pass, in order.
    pub passes: Vec<PassMetrics>,
    /// True when the pass cap was hit before convergence and the last
    /// iteration was discarded.
    pub aborted: bool,
}

/// Timing and merge counts for a single pass.
#[derive(Debug, Default, Clone)]
pub struct PassMetrics {
    pub duration: Duration,
    /// Merges performed during the pass.
    pub merges: usize,
    /// Fragment count after the pass.
    pub fragments: usize,
}

/// Pipeline output bundled with timing information.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// The rendered output text.
    pub output: String,
    /// Final fragments, post-refinement, in line order.
    pub fragments: Vec<Fragment>,
    /// Names of the trigger signals that fired.
    pub signals: Vec<String>,
    /// Timing measurements for the run.
    pub metrics: RunMetrics,
}
