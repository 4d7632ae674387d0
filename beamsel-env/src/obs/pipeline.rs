//! Observation pipeline.
use super::{BeamObs, CsiNoise, DelayLine, HistoryStack};
use crate::{BeamEnvError, BeamRow};
use anyhow::Result;
use rand::Rng;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Turns dataset rows into the observations handed to a policy.
///
/// The stages are composed as follows; the delay and history stages are
/// transparent with `delay_steps = 0` and `history_steps = 1` respectively.
///
/// ```mermaid
/// graph LR
///     Row --> Raw[raw SINR]
///     Raw --> Noise[CsiNoise]
///     Noise --> Delay[DelayLine]
///     Delay --> History[HistoryStack]
///     History --> BeamObs
/// ```
///
/// At the start of an episode both buffers are backfilled with the first
/// measurement, so the first observation repeats the step-0 vector
/// `history_steps` times.
#[derive(Clone, Debug)]
pub struct ObservationPipeline {
    num_beams: usize,
    noise: CsiNoise,
    delay: DelayLine,
    history: HistoryStack,
}

impl ObservationPipeline {
    /// Creates the pipeline.
    pub fn new(
        num_beams: usize,
        csi_noise_std: f32,
        delay_steps: usize,
        history_steps: usize,
    ) -> Result<Self> {
        if history_steps == 0 {
            return Err(BeamEnvError::Config("history_steps must be at least 1".to_string()).into());
        }
        Ok(Self {
            num_beams,
            noise: CsiNoise::new(csi_noise_std)?,
            delay: DelayLine::new(delay_steps),
            history: HistoryStack::new(history_steps),
        })
    }

    /// Length of the observations, `num_beams * history_steps`.
    pub fn obs_dim(&self) -> usize {
        self.num_beams * self.history.n_stack()
    }

    /// SINR of the row, unmodified.
    pub fn raw_vector<'a>(&self, row: &'a BeamRow) -> &'a [f32] {
        &row.sinr
    }

    /// SINR of the row as measured with noise.
    pub fn noisy_vector<R: Rng + ?Sized>(&self, row: &BeamRow, rng: &mut R) -> Vec<f32> {
        self.noise.apply(self.raw_vector(row), rng)
    }

    /// Backfills the buffers from the first row of an episode and returns
    /// the initial observation.
    pub fn reset<R: Rng + ?Sized>(&mut self, row: &BeamRow, rng: &mut R) -> BeamObs {
        let measured = self.noisy_vector(row, rng);
        self.delay.fill(&measured);
        self.history.fill_buffer(self.delay.delivered());
        BeamObs(self.history.stacked().to_vec())
    }

    /// Measures the row of the new step and returns the next observation.
    pub fn advance<R: Rng + ?Sized>(&mut self, row: &BeamRow, rng: &mut R) -> BeamObs {
        let measured = self.noisy_vector(row, rng);
        let delivered = self.delay.push(measured);
        self.history.update_buffer(delivered);
        BeamObs(self.history.stacked().to_vec())
    }

    /// The vector delivered at the current step, before history stacking.
    pub fn delivered(&self) -> &[f32] {
        self.delay.delivered()
    }

    /// Number of measurements in the delay queue.
    pub fn delay_len(&self) -> usize {
        self.delay.len()
    }

    /// Number of slots in the history stack.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}
