//! Rule-based policies.
use beamsel_core::{Configurable, Policy};
use beamsel_env::{BeamAct, BeamObs, BeamSelectionEnv};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Deserialize;

/// Configuration of [`ArgmaxPolicy`].
#[derive(Clone, Debug, Deserialize)]
pub struct ArgmaxPolicyConfig {
    /// Number of beams.
    pub num_beams: usize,
}

/// Selects the beam with the largest measured SINR.
///
/// Only the most recent `num_beams` components of the observation are looked
/// at, so the policy works with any history length. Ties go to the lowest
/// beam index.
pub struct ArgmaxPolicy {
    num_beams: usize,
}

impl ArgmaxPolicy {
    /// Creates the policy for `num_beams` beams.
    pub fn new(num_beams: usize) -> Self {
        Self { num_beams }
    }
}

impl Configurable for ArgmaxPolicy {
    type Config = ArgmaxPolicyConfig;

    fn build(config: Self::Config) -> Self {
        Self::new(config.num_beams)
    }
}

impl Policy<BeamSelectionEnv> for ArgmaxPolicy {
    fn sample(&mut self, obs: &BeamObs) -> BeamAct {
        let latest = obs.latest(self.num_beams);
        debug_assert!(!latest.is_empty(), "empty observation");
        let mut best = 0;
        for (i, v) in latest.iter().enumerate() {
            if *v > latest[best] {
                best = i;
            }
        }
        BeamAct(best)
    }
}

/// Configuration of [`RandomPolicy`].
#[derive(Clone, Debug, Deserialize)]
pub struct RandomPolicyConfig {
    /// Number of beams.
    pub num_beams: usize,

    /// Random seed.
    #[serde(default)]
    pub seed: u64,
}

/// Selects a beam uniformly at random.
pub struct RandomPolicy {
    num_beams: usize,
    rng: StdRng,
}

impl RandomPolicy {
    /// Creates the policy for `num_beams` beams.
    pub fn new(num_beams: usize, seed: u64) -> Self {
        Self {
            num_beams,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Configurable for RandomPolicy {
    type Config = RandomPolicyConfig;

    fn build(config: Self::Config) -> Self {
        Self::new(config.num_beams, config.seed)
    }
}

impl Policy<BeamSelectionEnv> for RandomPolicy {
    fn sample(&mut self, _obs: &BeamObs) -> BeamAct {
        BeamAct(self.rng.gen_range(0..self.num_beams))
    }
}
