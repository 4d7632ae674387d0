//! Environment.
use super::{Act, Info, Obs, Step};
use crate::record::Record;
use anyhow::Result;

/// Represents an environment, typically an MDP.
///
/// Every random draw an environment makes comes from a random source it owns,
/// seeded in [`Env::build`] and optionally reseeded in [`Env::reset`]. Two
/// instances never share random state, and a fixed seed replays an episode
/// exactly.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Information in the [`Step`] object.
    type Info: Info;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: u64) -> Result<Self>
    where
        Self: Sized;

    /// Starts a new episode and returns the initial observation.
    ///
    /// If `seed` is given, the random source of the environment is reseeded
    /// before anything else happens. The returned [`Record`] carries
    /// episode-level information.
    fn reset(&mut self, seed: Option<u64>) -> Result<(Self::Obs, Record)>;

    /// Performs an environment step.
    ///
    /// Fails if the episode has already terminated or if the action is not
    /// valid for this environment. Failures never advance the episode.
    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)>
    where
        Self: Sized;

    /// Resets the environment with a given index.
    ///
    /// The index is used to derive a reproducible seed for the episode, which
    /// is useful when evaluating a policy over a fixed set of episodes.
    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs>;
}
