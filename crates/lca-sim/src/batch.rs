//! Batch driver over independent trials.

use lca_core::Real;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LcaConfig;
use crate::error::SimResult;
use crate::noise::NoiseSource;
use crate::trial::{NO_RESPONSE, run_trial};

/// Fill caller-owned output slices with one outcome per trial.
///
/// Trials are statistically independent but draw sequentially from the
/// one `noise` stream, which advances monotonically across the batch
/// (no per-trial reseeding). Every index of `responses` and `rts` is
/// written exactly once, in trial order. Assumes a validated
/// configuration and equal-length output slices.
pub fn run_batch<N: NoiseSource>(
    cfg: &LcaConfig,
    noise: &mut N,
    responses: &mut [i32],
    rts: &mut [Real],
) {
    debug_assert_eq!(responses.len(), rts.len());
    for (resp, rt) in responses.iter_mut().zip(rts.iter_mut()) {
        let outcome = run_trial(cfg, noise);
        *resp = outcome.response;
        *rt = outcome.rt;
    }
}

/// Validate, allocate, and run a batch of `n_trials` trials.
///
/// This is the collaborator wrapper around the core: it performs the
/// pre-entry validation the raw drivers assume, allocates the output
/// buffers, and delegates to [`run_batch`]. `n_trials == 0` is valid
/// and yields empty outputs.
pub fn simulate<N: NoiseSource>(
    cfg: &LcaConfig,
    n_trials: usize,
    noise: &mut N,
) -> SimResult<(Vec<i32>, Vec<Real>)> {
    cfg.validate()?;
    debug!(n_acc = cfg.n_acc, n_trials, "running race batch");

    let mut responses = vec![NO_RESPONSE; n_trials];
    let mut rts = vec![0.0; n_trials];
    run_batch(cfg, noise, &mut responses, &mut rts);
    Ok((responses, rts))
}

/// Aggregate view of a finished batch.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Total trials in the batch
    pub trials: usize,
    /// Response counts; index `z` holds the count for accumulator `z+1`
    pub response_counts: Vec<usize>,
    /// Trials that exhausted the step budget without a winner
    pub no_response_count: usize,
    /// Mean reaction time over responded trials, seconds
    pub mean_rt_s: Option<Real>,
    /// Fastest responded trial, seconds
    pub min_rt_s: Option<Real>,
    /// Slowest responded trial, seconds
    pub max_rt_s: Option<Real>,
}

/// Summarize a batch's parallel response/RT arrays.
pub fn summarize(n_acc: usize, responses: &[i32], rts: &[Real]) -> BatchSummary {
    let mut response_counts = vec![0usize; n_acc];
    let mut no_response_count = 0usize;
    let mut rt_sum = 0.0;
    let mut rt_min = Real::INFINITY;
    let mut rt_max = Real::NEG_INFINITY;
    let mut responded = 0usize;

    for (&resp, &rt) in responses.iter().zip(rts.iter()) {
        if resp == NO_RESPONSE {
            no_response_count += 1;
        } else {
            response_counts[(resp - 1) as usize] += 1;
            responded += 1;
            rt_sum += rt;
            rt_min = rt_min.min(rt);
            rt_max = rt_max.max(rt);
        }
    }

    BatchSummary {
        trials: responses.len(),
        response_counts,
        no_response_count,
        mean_rt_s: (responded > 0).then(|| rt_sum / responded as Real),
        min_rt_s: (responded > 0).then_some(rt_min),
        max_rt_s: (responded > 0).then_some(rt_max),
    }
}
