//! Single-trial race driver.
//!
//! One trial races `n_acc` leaky, mutually inhibiting accumulators from
//! their starting points until one reaches threshold or the step budget
//! runs out. The per-step update is two-phase: inhibition contributions
//! are snapshotted from the pre-step activations first, then every
//! accumulator is updated from that snapshot. Mixing partially-updated
//! values into the inhibition sum would change the model.

use lca_core::Real;

use crate::config::LcaConfig;
use crate::noise::NoiseSource;

/// Response code reported when no accumulator reaches threshold within
/// the step budget.
pub const NO_RESPONSE: i32 = -1;

/// Outcome of one race trial.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrialOutcome {
    /// 1-based index of the winning accumulator, or [`NO_RESPONSE`]
    pub response: i32,
    /// Reaction time in seconds, midpoint convention (`steps*dt - dt/2`);
    /// written for every trial, including timeouts
    pub rt: Real,
    /// Steps taken before termination
    pub steps: usize,
}

/// Recorded trajectory of one trial.
#[derive(Clone, Debug)]
pub struct TrialTrace {
    /// Time points in seconds; `t[0] == 0` is the starting state
    pub t: Vec<Real>,
    /// Activation snapshots, one vector of length `n_acc` per time point
    pub x: Vec<Vec<Real>>,
    pub outcome: TrialOutcome,
}

/// Run one trial to termination.
///
/// Assumes a validated configuration (see [`LcaConfig::validate`]);
/// shapes are not re-checked here. Consumes exactly `n_acc` noise draws
/// per step taken, regardless of `noise_scale`.
pub fn run_trial<N: NoiseSource>(cfg: &LcaConfig, noise: &mut N) -> TrialOutcome {
    race(cfg, noise, &mut |_, _| {})
}

/// Run one trial, recording the activation vector after every step.
pub fn run_trial_traced<N: NoiseSource>(cfg: &LcaConfig, noise: &mut N) -> TrialTrace {
    let mut t = vec![0.0];
    let mut x_record = vec![cfg.x0.clone()];

    let outcome = race(cfg, noise, &mut |time, x| {
        t.push(time);
        x_record.push(x.to_vec());
    });

    TrialTrace {
        t,
        x: x_record,
        outcome,
    }
}

/// Core race loop shared by the plain and tracing drivers. The observer
/// sees each post-step state (after the threshold scan and, in
/// non-linear mode, after rectification).
fn race<N: NoiseSource>(
    cfg: &LcaConfig,
    noise: &mut N,
    observer: &mut dyn FnMut(Real, &[Real]),
) -> TrialOutcome {
    // Starting points are copied: the shared x0 must survive the batch.
    let mut x = cfg.x0.clone();
    let mut contrib = vec![0.0; cfg.n_acc];
    let noise_factor = cfg.noise_factor();

    let mut steps = 0usize;
    let mut winner = false;
    let mut response = NO_RESPONSE;

    while steps < cfg.max_iter && !winner {
        step_once(cfg, noise_factor, &mut x, &mut contrib, noise);
        steps += 1;

        // Ascending scan with unconditional overwrite: when several
        // accumulators cross in the same step, the highest index wins.
        // The tie-break affects reproducibility; keep it exact.
        for (z, &xz) in x.iter().enumerate() {
            if xz >= cfg.threshold {
                response = (z + 1) as i32;
                winner = true;
            }
        }

        // Rectification happens after the threshold scan, so a value
        // can be read at threshold and still be floored the same step.
        if cfg.non_linear {
            for xz in x.iter_mut() {
                if *xz < 0.0 {
                    *xz = 0.0;
                }
            }
        }

        observer(steps as Real * cfg.dt, &x);
    }

    TrialOutcome {
        response,
        rt: steps as Real * cfg.dt - cfg.dt / 2.0,
        steps,
    }
}

/// Advance all accumulators by one step from a consistent pre-step
/// snapshot of the inhibition contributions.
fn step_once<N: NoiseSource>(
    cfg: &LcaConfig,
    noise_factor: Real,
    x: &mut [Real],
    contrib: &mut [Real],
    noise: &mut N,
) {
    // Phase 1: snapshot each accumulator's inhibition contribution.
    for (c, &xz) in contrib.iter_mut().zip(x.iter()) {
        *c = xz * cfg.dt * cfg.beta;
    }
    let sum: Real = contrib.iter().sum();

    // Phase 2: apply input, leak, lateral inhibition, and noise.
    // Lateral inhibition as "subtract the total, add back your own":
    // every other accumulator inhibits this one in proportion to its
    // activity, but an accumulator never inhibits itself.
    for z in 0..x.len() {
        let draw = noise.next_standard_normal();
        x[z] += cfg.dt * cfg.input[z] - cfg.dt * cfg.kappa * x[z] - sum
            + contrib[z]
            + noise_factor * draw;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::ScriptedNoise;
    use lca_core::{Tolerances, nearly_equal};

    fn cfg(n_acc: usize, input: Vec<Real>) -> LcaConfig {
        LcaConfig {
            n_acc,
            x0: vec![0.0; n_acc],
            input,
            kappa: 0.0,
            beta: 0.0,
            threshold: 1.0,
            noise_scale: 0.0,
            dt: 0.1,
            max_iter: 100,
            non_linear: false,
        }
    }

    #[test]
    fn single_step_matches_update_equation() {
        // x <- x + dt*I - dt*kappa*x - sum + contrib + sqrt(dt)*s*draw
        let config = LcaConfig {
            kappa: 0.5,
            beta: 0.4,
            noise_scale: 2.0,
            x0: vec![0.3],
            threshold: 100.0,
            max_iter: 1,
            ..cfg(1, vec![1.0])
        };
        let mut noise = ScriptedNoise::new(vec![0.25]);
        let trace = run_trial_traced(&config, &mut noise);

        // With one accumulator the inhibition cancels exactly.
        let expected = 0.3 + 0.1 * 1.0 - 0.1 * 0.5 * 0.3 + (0.1f64).sqrt() * 2.0 * 0.25;
        let tol = Tolerances::default();
        assert!(nearly_equal(trace.x[1][0], expected, tol));
        assert_eq!(noise.draws(), 1);
    }

    #[test]
    fn one_draw_per_accumulator_per_step_even_at_zero_noise() {
        let config = LcaConfig {
            threshold: 100.0,
            max_iter: 7,
            ..cfg(3, vec![0.0, 0.0, 0.0])
        };
        let mut noise = ScriptedNoise::new(vec![1.0]);
        let out = run_trial(&config, &mut noise);
        assert_eq!(out.response, NO_RESPONSE);
        assert_eq!(noise.draws(), 3 * 7);
    }

    #[test]
    fn crossing_on_first_step_reports_half_step_rt() {
        let config = LcaConfig {
            threshold: 0.05,
            ..cfg(1, vec![1.0])
        };
        let mut noise = ScriptedNoise::new(vec![]);
        let out = run_trial(&config, &mut noise);
        assert_eq!(out.response, 1);
        assert_eq!(out.steps, 1);
        assert!(nearly_equal(out.rt, 0.05, Tolerances::default()));
    }

    #[test]
    fn simultaneous_crossers_resolve_to_highest_index() {
        // Symmetric drives keep all three accumulators identical, so
        // they cross threshold in the same step.
        let config = LcaConfig {
            beta: 0.1,
            threshold: 0.25,
            ..cfg(3, vec![1.0, 1.0, 1.0])
        };
        let mut noise = ScriptedNoise::new(vec![]);
        let out = run_trial(&config, &mut noise);
        assert_eq!(out.response, 3);
    }

    #[test]
    fn rectification_floors_post_step_state() {
        // Second accumulator has no drive and is dragged negative by
        // the first one's inhibition; the clamp must floor it at zero.
        let config = LcaConfig {
            beta: 0.8,
            threshold: 10.0,
            max_iter: 50,
            non_linear: true,
            ..cfg(2, vec![2.0, 0.0])
        };
        let mut noise = ScriptedNoise::new(vec![]);
        let trace = run_trial_traced(&config, &mut noise);
        for snapshot in &trace.x {
            for &v in snapshot {
                assert!(v >= 0.0);
            }
        }
    }

    #[test]
    fn without_rectification_activations_go_negative() {
        let config = LcaConfig {
            beta: 0.8,
            threshold: 10.0,
            max_iter: 50,
            ..cfg(2, vec![2.0, 0.0])
        };
        let mut noise = ScriptedNoise::new(vec![]);
        let trace = run_trial_traced(&config, &mut noise);
        let any_negative = trace.x.iter().any(|s| s.iter().any(|&v| v < 0.0));
        assert!(any_negative);
    }

    #[test]
    fn trace_records_initial_state_and_every_step() {
        let config = LcaConfig {
            threshold: 100.0,
            max_iter: 5,
            ..cfg(2, vec![0.1, 0.2])
        };
        let mut noise = ScriptedNoise::new(vec![]);
        let trace = run_trial_traced(&config, &mut noise);
        assert_eq!(trace.t.len(), 6);
        assert_eq!(trace.x.len(), 6);
        assert_eq!(trace.t[0], 0.0);
        assert_eq!(trace.x[0], vec![0.0, 0.0]);
        assert!(nearly_equal(trace.t[5], 0.5, Tolerances::default()));
        assert_eq!(trace.outcome.steps, 5);
    }

    #[test]
    fn starting_points_are_not_mutated() {
        let config = LcaConfig {
            x0: vec![0.2, 0.1],
            max_iter: 10,
            threshold: 100.0,
            ..cfg(2, vec![1.0, 1.0])
        };
        let mut noise = ScriptedNoise::new(vec![0.5, -0.5]);
        let before = config.x0.clone();
        let _ = run_trial(&config, &mut noise);
        assert_eq!(config.x0, before);
    }
}
