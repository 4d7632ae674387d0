#![warn(missing_docs)]
//! Core abstractions for sequential beam selection.
//!
//! This crate knows nothing about beams. It defines the vocabulary shared by
//! environments, policies and evaluation loops:
//!
//! * [`Env`] - an environment with `reset`/`step` and a seedable random source,
//! * [`Step`] - the transition emitted by [`Env::step`],
//! * [`Policy`] - a mapping from observations to actions,
//! * [`record`] - key/value records used for logging and aggregation,
//! * [`Evaluator`] - runs a policy for a number of episodes.
pub mod error;
pub mod record;
pub mod util;

mod base;
pub use base::{Act, Configurable, Env, Info, Obs, Policy, Step};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};
