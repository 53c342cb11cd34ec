//! Iteration loop for voxweb
//!
//! The session engine drives command → generate → parse → materialize →
//! host → continue? cycles until the user declines to go on. Every
//! recoverable failure funnels into the same continue prompt, so the user
//! always gets one consistent recovery point.

mod engine;

pub use engine::{FailureReason, IterationOutcome, SessionEngine, SessionSummary};
