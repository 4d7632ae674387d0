#![warn(missing_docs)]
//! Beam selection environment under imperfect channel knowledge.
//!
//! [`BeamSelectionEnv`] replays a dataset of per-beam SINR records. At each
//! step a policy observes channel state information of the current time
//! slot and selects a beam; the choice is scored against the noiseless
//! ground truth of that slot. Channel knowledge can be degraded with
//! Gaussian measurement noise, a sample-and-hold reporting delay, and
//! stacking of past measurements.
//!
//! ```no_run
//! # use anyhow::Result;
//! use beamsel_core::Env;
//! use beamsel_env::{BeamAct, BeamSelectionEnv, BeamSelectionEnvConfig, RewardType};
//!
//! fn main() -> Result<()> {
//!     let config = BeamSelectionEnvConfig::default()
//!         .data_path("data/beam_dataset_speed60_snr20.csv")
//!         .reward_type(RewardType::Relative)
//!         .csi_noise_std(0.2)
//!         .delay_steps(1)
//!         .history_steps(3);
//!     let mut env = BeamSelectionEnv::build(&config, 42)?;
//!
//!     let (mut obs, _) = env.reset(None)?;
//!     loop {
//!         // Select the strongest beam of the most recent measurement.
//!         let latest = obs.latest(env.num_beams());
//!         let best = (0..latest.len())
//!             .max_by(|&i, &j| latest[i].total_cmp(&latest[j]))
//!             .unwrap_or(0);
//!         let (step, _) = env.step(&BeamAct(best))?;
//!         match step.obs {
//!             Some(next) => obs = next,
//!             None => break,
//!         }
//!     }
//!     Ok(())
//! }
//! ```
mod config;
mod dataset;
mod env;
mod error;
mod evaluator;
mod indexer;
pub mod obs;
mod reward;
pub use config::BeamSelectionEnvConfig;
pub use dataset::{discover_user_streams, BeamDataset, BeamRow, DatasetMeta, DatasetSummary};
pub use env::{BeamAct, BeamInfo, BeamSelectionEnv, EnvState};
pub use error::BeamEnvError;
pub use evaluator::BeamEvaluator;
pub use indexer::EpisodeIndexer;
pub use obs::{BeamObs, ObservationPipeline};
pub use reward::{RewardType, SINR_EPS};
