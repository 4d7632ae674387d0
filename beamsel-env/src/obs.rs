//! Observations of the beam selection environment.
//!
//! The observation handed to a policy is synthesized from the SINR of the
//! current row by [`ObservationPipeline`], which applies measurement noise
//! ([`CsiNoise`]), reporting delay ([`DelayLine`]) and history stacking
//! ([`HistoryStack`]) in this order.
mod delay;
mod history;
mod noise;
mod pipeline;
pub use delay::DelayLine;
pub use history::HistoryStack;
pub use noise::CsiNoise;
pub use pipeline::ObservationPipeline;

use beamsel_core::Obs;

/// Observation of [`BeamSelectionEnv`](crate::BeamSelectionEnv).
///
/// A non-negative vector of length `num_beams * history_steps`: the delivered
/// SINR vectors of the last `history_steps` steps, oldest first.
#[derive(Clone, Debug, PartialEq)]
pub struct BeamObs(pub Vec<f32>);

impl BeamObs {
    /// Components of the observation.
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// The most recent block of `num_beams` components.
    pub fn latest(&self, num_beams: usize) -> &[f32] {
        &self.0[self.0.len().saturating_sub(num_beams)..]
    }
}

impl Obs for BeamObs {
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<f32>> for BeamObs {
    fn from(v: Vec<f32>) -> Self {
        Self(v)
    }
}
