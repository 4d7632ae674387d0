//! Beam selection environment.
use crate::{
    BeamDataset, BeamEnvError, BeamObs, BeamSelectionEnvConfig, EpisodeIndexer,
    ObservationPipeline, RewardType,
};
use anyhow::Result;
use beamsel_core::{
    record::{Record, RecordValue::Scalar},
    Act, Env, Info, Step,
};
use rand::{rngs::StdRng, SeedableRng};
use std::sync::Arc;

/// Index of the selected beam.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BeamAct(pub usize);

impl Act for BeamAct {
    fn len(&self) -> usize {
        1
    }
}

impl From<usize> for BeamAct {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

/// Ground truth of a step, always taken from the noiseless dataset row.
#[derive(Clone, Debug, PartialEq)]
pub struct BeamInfo {
    /// Optimal beam, 0-based.
    pub label: usize,

    /// SINR of the optimal beam.
    pub sinr_optimal: f32,

    /// SINR of the selected beam.
    pub sinr_selected: f32,

    /// Dataset index of the row the action was scored on.
    pub row: usize,
}

impl Info for BeamInfo {}

/// Lifecycle of an episode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvState {
    /// Between a reset and the end of the episode.
    Ready,

    /// The episode has ended, or none has started yet; only `reset` is valid.
    Terminated,
}

/// Beam selection over a dataset of per-beam SINR records.
///
/// Each step the policy observes (possibly noisy, delayed and stacked) CSI of
/// the current row and selects a beam. The action is scored against the
/// noiseless SINR of that row, then the episode moves to the next row of the
/// visitation order. An episode terminates after `max_steps` steps; it is
/// never truncated.
///
/// The dataset is shared read-only through an [`Arc`]; the random source used
/// for shuffling and noise is owned by each instance.
pub struct BeamSelectionEnv {
    dataset: Arc<BeamDataset>,
    reward_type: RewardType,
    max_steps: usize,
    shuffle: bool,
    indexer: EpisodeIndexer,
    pipeline: ObservationPipeline,
    seed: u64,
    rng: StdRng,
    state: EnvState,
    episode_return: f32,
}

impl BeamSelectionEnv {
    /// Builds the environment on a dataset already in memory.
    ///
    /// `config.data_path` and `config.user_stream` are ignored.
    pub fn from_dataset(
        dataset: Arc<BeamDataset>,
        config: &BeamSelectionEnvConfig,
        seed: u64,
    ) -> Result<Self> {
        config.validate()?;

        let num_rows = dataset.len();
        let max_steps = match config.max_steps {
            None => num_rows,
            Some(n) if n <= num_rows => n,
            Some(n) => {
                return Err(BeamEnvError::Config(format!(
                    "max_steps {} exceeds the number of rows {}",
                    n, num_rows
                ))
                .into())
            }
        };
        let pipeline = ObservationPipeline::new(
            dataset.num_beams(),
            config.csi_noise_std,
            config.delay_steps,
            config.history_steps,
        )?;

        Ok(Self {
            indexer: EpisodeIndexer::new(num_rows),
            dataset,
            reward_type: config.reward_type,
            max_steps,
            shuffle: config.shuffle,
            pipeline,
            seed,
            rng: StdRng::seed_from_u64(seed),
            state: EnvState::Terminated,
            episode_return: 0.0,
        })
    }

    /// Number of beams, the size of the action space.
    pub fn num_beams(&self) -> usize {
        self.dataset.num_beams()
    }

    /// Length of observations, `num_beams * history_steps`.
    pub fn obs_dim(&self) -> usize {
        self.pipeline.obs_dim()
    }

    /// Steps per episode.
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Reward shaping of this environment.
    pub fn reward_type(&self) -> RewardType {
        self.reward_type
    }

    /// The dataset.
    pub fn dataset(&self) -> &Arc<BeamDataset> {
        &self.dataset
    }

    /// Current state of the episode.
    pub fn state(&self) -> EnvState {
        self.state
    }

    /// Steps taken in the current episode.
    pub fn pointer(&self) -> usize {
        self.indexer.pointer()
    }

    /// The observation pipeline.
    pub fn pipeline(&self) -> &ObservationPipeline {
        &self.pipeline
    }
}

impl Env for BeamSelectionEnv {
    type Config = BeamSelectionEnvConfig;
    type Obs = BeamObs;
    type Act = BeamAct;
    type Info = BeamInfo;

    /// Loads the dataset of `config` and builds the environment.
    fn build(config: &Self::Config, seed: u64) -> Result<Self> {
        config.validate()?;
        let dataset = BeamDataset::load(&config.data_path, config.user_stream)?;
        Self::from_dataset(Arc::new(dataset), config, seed)
    }

    fn reset(&mut self, seed: Option<u64>) -> Result<(Self::Obs, Record)> {
        if let Some(seed) = seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        self.indexer.reset(self.shuffle, &mut self.rng);

        let ix = self.indexer.row_at(0);
        let obs = self.pipeline.reset(self.dataset.row(ix), &mut self.rng);
        self.state = EnvState::Ready;
        self.episode_return = 0.0;
        log::debug!("Reset: first row {}, seed {:?}", ix, seed);

        Ok((obs, Record::from_scalar("row", ix as f32)))
    }

    fn step(&mut self, act: &Self::Act) -> Result<(Step<Self>, Record)> {
        if self.state != EnvState::Ready {
            return Err(BeamEnvError::InvalidState(
                "step() requires an active episode, call reset() first".to_string(),
            )
            .into());
        }
        let num_beams = self.num_beams();
        if act.0 >= num_beams {
            return Err(BeamEnvError::InvalidAction {
                action: act.0,
                num_beams,
            }
            .into());
        }

        // Score against the current row before advancing.
        let dataset = Arc::clone(&self.dataset);
        let ix = self.indexer.row_at(0);
        let row = dataset.row(ix);
        let label = row.label();
        let reward = self.reward_type.score(act.0, label, &row.sinr);
        let info = BeamInfo {
            label,
            sinr_optimal: row.sinr_optimal(),
            sinr_selected: row.sinr[act.0],
            row: ix,
        };
        log::trace!(
            "Step {}: row {}, action {}, label {}, reward {}",
            self.indexer.pointer(),
            ix,
            act.0,
            label,
            reward
        );

        self.indexer.advance();
        self.episode_return += reward;

        let mut record = Record::empty();
        let is_terminated = self.indexer.pointer() >= self.max_steps;
        let obs = if is_terminated {
            self.state = EnvState::Terminated;
            record.insert("episode_length", Scalar(self.indexer.pointer() as _));
            record.insert("episode_return", Scalar(self.episode_return));
            None
        } else {
            let next = dataset.row(self.indexer.row_at(0));
            Some(self.pipeline.advance(next, &mut self.rng))
        };

        Ok((
            Step::new(obs, *act, reward, is_terminated, false, info),
            record,
        ))
    }

    /// Resets with the seed `build seed + ix`, so episode `ix` is the same
    /// across evaluations.
    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
        let seed = self.seed.wrapping_add(ix as u64);
        Ok(self.reset(Some(seed))?.0)
    }
}
