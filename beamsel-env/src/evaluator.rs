//! Evaluator for the beam selection environment.
use crate::{BeamSelectionEnv, BeamSelectionEnvConfig};
use anyhow::Result;
use beamsel_core::{record::Record, Env, Evaluator, Policy};

/// Runs a policy for a number of episodes and reports, averaged over
/// episodes:
///
/// * `"Episode return"` - sum of rewards,
/// * `"Accuracy"` - fraction of steps selecting the optimal beam,
/// * `"Mean selected SINR"` - true SINR of the selected beam.
pub struct BeamEvaluator {
    n_episodes: usize,
    env: BeamSelectionEnv,
}

impl Evaluator<BeamSelectionEnv> for BeamEvaluator {
    fn evaluate<P>(&mut self, policy: &mut P) -> Result<Record>
    where
        P: Policy<BeamSelectionEnv>,
    {
        log::debug!("Evaluation");
        let mut r_total = 0f32;
        let mut acc_total = 0f32;
        let mut sinr_total = 0f32;

        for ix in 0..self.n_episodes {
            log::trace!("Episode: {:?}", ix);
            let mut prev_obs = self.env.reset_with_index(ix)?;
            let (mut n_steps, mut n_correct, mut sinr_sum) = (0usize, 0usize, 0f32);

            loop {
                let act = policy.sample(&prev_obs);
                let (step, _) = self.env.step(&act)?;
                r_total += step.reward;
                n_steps += 1;
                if act.0 == step.info.label {
                    n_correct += 1;
                }
                sinr_sum += step.info.sinr_selected;

                let done = step.is_done();
                match step.obs {
                    Some(obs) if !done => prev_obs = obs,
                    _ => break,
                }
            }

            acc_total += n_correct as f32 / n_steps as f32;
            sinr_total += sinr_sum / n_steps as f32;
        }

        let n = self.n_episodes.max(1) as f32;
        let mut record = Record::from_scalar("Episode return", r_total / n);
        record.merge_inplace(Record::from_scalar("Accuracy", acc_total / n));
        record.merge_inplace(Record::from_scalar("Mean selected SINR", sinr_total / n));
        Ok(record)
    }
}

impl BeamEvaluator {
    /// Constructs [`BeamEvaluator`] on an existing environment.
    ///
    /// `env` - Instance of the environment.
    /// `n_episodes` - The number of episodes for evaluation.
    pub fn new(env: BeamSelectionEnv, n_episodes: usize) -> Self {
        Self { n_episodes, env }
    }

    /// Constructs [`BeamEvaluator`], loading the dataset of `config`.
    pub fn from_config(
        config: &BeamSelectionEnvConfig,
        seed: u64,
        n_episodes: usize,
    ) -> Result<Self> {
        Ok(Self::new(BeamSelectionEnv::build(config, seed)?, n_episodes))
    }

    /// The environment used for evaluation.
    pub fn env(&self) -> &BeamSelectionEnv {
        &self.env
    }
}
