//! Batch-immutable simulation configuration.

use lca_core::{Real, ensure_finite};

use crate::error::{SimError, SimResult};

/// Configuration for one batch of LCA race trials.
///
/// Immutable for the whole batch. Each of `n_acc` accumulators
/// integrates its input drive, leaks in proportion to its own
/// activation (`kappa`), and is laterally inhibited by the combined
/// activity of the others (`beta`). The race ends when an accumulator
/// reaches `threshold`, or after `max_iter` steps.
#[derive(Clone, Debug)]
pub struct LcaConfig {
    /// Number of racing accumulators (>= 1)
    pub n_acc: usize,
    /// Input drive per accumulator, length `n_acc`
    pub input: Vec<Real>,
    /// Leak rate (>= 0)
    pub kappa: Real,
    /// Lateral inhibition strength (>= 0)
    pub beta: Real,
    /// Decision threshold
    pub threshold: Real,
    /// Standard deviation of the underlying Wiener-like noise (>= 0).
    /// Per-step noise is `sqrt(dt) * noise_scale * N(0,1)`.
    pub noise_scale: Real,
    /// Step size in seconds (> 0); 0.001 = 1 ms
    pub dt: Real,
    /// Maximum steps per trial (>= 1)
    pub max_iter: usize,
    /// Rectify activations below zero back to zero after each step
    pub non_linear: bool,
    /// Starting activation per accumulator, length `n_acc`
    pub x0: Vec<Real>,
}

impl LcaConfig {
    /// Multiplier applied to each standard-normal draw.
    pub fn noise_factor(&self) -> Real {
        self.dt.sqrt() * self.noise_scale
    }

    /// Midpoint-convention reaction time reported when a trial exhausts
    /// its step budget without a winner.
    pub fn timeout_rt(&self) -> Real {
        self.max_iter as Real * self.dt - self.dt / 2.0
    }

    /// Pre-entry validation for collaborators (CLI, bindings, tests).
    ///
    /// The trial and batch drivers assume a validated configuration and
    /// perform no defensive checks of their own. Input drives and
    /// starting points are deliberately not checked for finiteness: a
    /// NaN there degenerates to a no-response trial rather than an
    /// error, keeping batch semantics uniform.
    pub fn validate(&self) -> SimResult<()> {
        if self.n_acc == 0 {
            return Err(SimError::InvalidArg {
                what: "n_acc must be at least 1",
            });
        }
        if self.input.len() != self.n_acc {
            return Err(SimError::InvalidArg {
                what: "input length must equal n_acc",
            });
        }
        if self.x0.len() != self.n_acc {
            return Err(SimError::InvalidArg {
                what: "x0 length must equal n_acc",
            });
        }
        if !(self.dt > 0.0) {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if self.max_iter == 0 {
            return Err(SimError::InvalidArg {
                what: "max_iter must be at least 1",
            });
        }
        if !(self.kappa >= 0.0) {
            return Err(SimError::InvalidArg {
                what: "kappa must be non-negative",
            });
        }
        if !(self.beta >= 0.0) {
            return Err(SimError::InvalidArg {
                what: "beta must be non-negative",
            });
        }
        if !(self.noise_scale >= 0.0) {
            return Err(SimError::InvalidArg {
                what: "noise_scale must be non-negative",
            });
        }
        ensure_finite(self.threshold, "threshold")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> LcaConfig {
        LcaConfig {
            n_acc: 2,
            input: vec![0.5, 0.3],
            kappa: 0.1,
            beta: 0.2,
            threshold: 1.0,
            noise_scale: 0.5,
            dt: 1e-3,
            max_iter: 1000,
            non_linear: false,
            x0: vec![0.0, 0.0],
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn rejects_zero_accumulators() {
        let cfg = LcaConfig {
            n_acc: 0,
            input: vec![],
            x0: vec![],
            ..base()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_length_mismatch() {
        let cfg = LcaConfig {
            input: vec![0.5],
            ..base()
        };
        assert!(cfg.validate().is_err());

        let cfg = LcaConfig {
            x0: vec![0.0, 0.0, 0.0],
            ..base()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_dt() {
        assert!(LcaConfig { dt: 0.0, ..base() }.validate().is_err());
        assert!(LcaConfig { dt: -1.0, ..base() }.validate().is_err());
        // NaN fails the `dt > 0` comparison, so it is rejected too
        assert!(
            LcaConfig {
                dt: f64::NAN,
                ..base()
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn rejects_negative_rates() {
        assert!(
            LcaConfig {
                kappa: -0.1,
                ..base()
            }
            .validate()
            .is_err()
        );
        assert!(
            LcaConfig {
                beta: -0.1,
                ..base()
            }
            .validate()
            .is_err()
        );
        assert!(
            LcaConfig {
                noise_scale: -0.1,
                ..base()
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn rejects_non_finite_threshold() {
        assert!(
            LcaConfig {
                threshold: f64::NAN,
                ..base()
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn noise_factor_and_timeout() {
        let cfg = base();
        assert!((cfg.noise_factor() - (1e-3f64).sqrt() * 0.5).abs() < 1e-15);
        assert!((cfg.timeout_rt() - (1000.0 * 1e-3 - 0.5e-3)).abs() < 1e-12);
    }
}
