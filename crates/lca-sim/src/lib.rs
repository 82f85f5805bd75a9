//! Accumulator race engine for the Leaky, Competing Accumulator model
//! (Usher & McClelland, 2001).
//!
//! Provides:
//! - Batch-immutable configuration with pre-entry validation
//! - Injectable, batch-scoped noise sources (seeded StdRng)
//! - Single-trial stochastic race driver with trajectory tracing
//! - Batch driver over caller-owned output buffers, plus summaries

pub mod batch;
pub mod config;
pub mod error;
pub mod noise;
pub mod trial;

// Re-exports for public API
pub use batch::{BatchSummary, run_batch, simulate, summarize};
pub use config::LcaConfig;
pub use error::{SimError, SimResult};
pub use noise::{GaussianNoise, NoiseSource, ScriptedNoise};
pub use trial::{NO_RESPONSE, TrialOutcome, TrialTrace, run_trial, run_trial_traced};
