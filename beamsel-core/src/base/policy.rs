//! Policy.
use super::Env;
use anyhow::Result;
use serde::de::DeserializeOwned;
use std::{fs::File, io::BufReader, path::Path};

/// Maps observations of `E` to actions.
///
/// Takes `&mut self` so that stochastic policies can own their random source.
pub trait Policy<E: Env> {
    /// Selects an action for `obs`.
    fn sample(&mut self, obs: &E::Obs) -> E::Act;
}

/// Something built from a serde-deserializable configuration.
pub trait Configurable {
    /// Configuration.
    type Config: Clone + DeserializeOwned;

    /// Builds the object.
    fn build(config: Self::Config) -> Self;

    /// Reads the configuration from a YAML file and builds the object.
    fn build_from_path(path: impl AsRef<Path>) -> Result<Self>
    where
        Self: Sized,
    {
        let rdr = BufReader::new(File::open(path)?);
        let config: Self::Config = serde_yaml::from_reader(rdr)?;
        Ok(Self::build(config))
    }
}
