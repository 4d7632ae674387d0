//! Beam selection under imperfect channel knowledge.
//!
//! The workspace consists of the following crates:
//!
//! * [`beamsel_core`] provides traits and records generic to environments and
//!   policies, with a default evaluator.
//! * [`beamsel_env`] implements the beam selection environment on datasets of
//!   per-beam SINR records, with configurable CSI noise, reporting delay and
//!   observation history.
//! * `beamsel` (this crate) adds rule-based policies to compare learned
//!   agents against, and a sweep example.
pub use beamsel_core;
pub use beamsel_env;

pub mod policy;
pub use policy::{ArgmaxPolicy, ArgmaxPolicyConfig, RandomPolicy, RandomPolicyConfig};
