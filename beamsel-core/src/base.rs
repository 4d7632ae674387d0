//! Core functionalities.
mod env;
mod policy;
mod step;
pub use env::Env;
pub use policy::{Configurable, Policy};
use std::fmt::Debug;
pub use step::{Info, Step};

/// An observation of an environment.
///
/// Environments in this library are not vectorized, so an observation always
/// describes a single time step. [`Obs::len`] returns the number of scalar
/// components in it.
pub trait Obs: Clone + Debug {
    /// Returns the number of components in the observation.
    fn len(&self) -> usize;

    /// Returns `true` if the observation has no component.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An action of an environment.
pub trait Act: Clone + Debug {
    /// Returns the number of actions in the object.
    fn len(&self) -> usize;
}
