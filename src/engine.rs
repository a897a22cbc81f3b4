//! Fence-recovery pipeline.
//!
//! This module is the *operational core* of the crate: the staged transform
//! that takes one complete response string and re-emits it with recovered
//! code wrapped in fenced blocks. The public surface lives in `src/api.rs`;
//! this facade keeps paths stable (for example `crate::engine::Pipeline` and
//! `crate::engine::TriggerInfo`) while the stages live in focused submodules.
//!
//! ## How the parts work together
//!
//! ```text
//! input ── TriggerInfo::scan ──── quick reject (no signal → identity)
//!             (trigger.rs)            │
//!                                     v
//!                          sanitize (sanitize.rs)
//!                            - strip CODE: markers, queue forced lines
//!                            - neutralize an unpaired trailing fence
//!                                     │
//!                                     v
//!                          classify (classifier.rs)
//!                            - per-line Code/Prose/FenceMarker
//!                            - greedy, one line of look-back
//!                                     │
//!                                     v
//!                          assemble (assembler.rs)
//!                            - group runs into fragments
//!                            - merge to fixed point (capped)
//!                            - reject keyword-poor noise
//!                                     │
//!                                     v
//!                          refine + correct (rules/, ordered dispatch)
//!                                     │
//!                                     v
//!                          render (renderer.rs)
//!                            - fenced blocks at original positions
//! ```
//!
//! Every stage is a pure function from string/line data to string/line data;
//! nothing holds state across calls. All rule tables are `Lazy` statics.
//!
//! ## Responsibilities by module
//!
//! - `trigger.rs`: cheap signal scan used for the quick-reject path.
//! - `sanitize.rs`: pre-analysis cleanup of externally sourced text.
//! - `classifier.rs`: per-line code/prose decision.
//! - `assembler.rs`: fragment grouping, capped fixed-point merge, noise
//!   rejection.
//! - `renderer.rs`: fenced-block emission with verbatim passthrough.
//! - `metrics.rs`: opt-in timing/trace data for runs and merge passes.
//! - `pipeline.rs`: sequences the stages and dispatches dialect libraries.
//!
//! ## Debugging
//!
//! Set `REFENCE_DEBUG_RULES=1` to print trigger, classification, merge and
//! library-claim traces to stderr.

#[path = "engine/assembler.rs"]
mod assembler;
#[path = "engine/classifier.rs"]
mod classifier;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/pipeline.rs"]
mod pipeline;
#[path = "engine/renderer.rs"]
mod renderer;
#[path = "engine/sanitize.rs"]
mod sanitize;
#[path = "engine/trigger.rs"]
mod trigger;

#[allow(unused_imports)]
pub(crate) use metrics::{MergeMetrics, PassMetrics, RunMetrics, RunResult};
#[allow(unused_imports)]
pub(crate) use pipeline::Pipeline;
#[allow(unused_imports)]
pub(crate) use trigger::{SignalMask, TriggerInfo};
