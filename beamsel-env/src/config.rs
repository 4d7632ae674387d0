//! Configuration of [`BeamSelectionEnv`](crate::BeamSelectionEnv).
use crate::{BeamEnvError, RewardType};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

/// Configuration of [`BeamSelectionEnv`](crate::BeamSelectionEnv).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BeamSelectionEnvConfig {
    /// Path of the CSV dataset.
    pub data_path: PathBuf,

    /// `(user, stream)` of a multi-user dataset, `None` for the flat layout.
    pub user_stream: Option<(u32, u32)>,

    /// Reward shaping.
    pub reward_type: RewardType,

    /// Steps per episode, the number of rows if `None`.
    pub max_steps: Option<usize>,

    /// Visit rows in a random order in every episode.
    pub shuffle: bool,

    /// Standard deviation of the Gaussian CSI noise.
    pub csi_noise_std: f32,

    /// Reporting delay of CSI in steps.
    pub delay_steps: usize,

    /// Number of delivered vectors stacked into an observation.
    pub history_steps: usize,
}

impl Default for BeamSelectionEnvConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::new(),
            user_stream: None,
            reward_type: RewardType::Accuracy,
            max_steps: None,
            shuffle: true,
            csi_noise_std: 0.2,
            delay_steps: 0,
            history_steps: 1,
        }
    }
}

impl BeamSelectionEnvConfig {
    /// Sets the path of the dataset.
    pub fn data_path(mut self, v: impl Into<PathBuf>) -> Self {
        self.data_path = v.into();
        self
    }

    /// Selects a user and stream of a multi-user dataset.
    pub fn user_stream(mut self, user: u32, stream: u32) -> Self {
        self.user_stream = Some((user, stream));
        self
    }

    /// Sets the reward shaping.
    pub fn reward_type(mut self, v: RewardType) -> Self {
        self.reward_type = v;
        self
    }

    /// Sets the number of steps per episode.
    pub fn max_steps(mut self, v: Option<usize>) -> Self {
        self.max_steps = v;
        self
    }

    /// Sets whether the rows are shuffled in every episode.
    pub fn shuffle(mut self, v: bool) -> Self {
        self.shuffle = v;
        self
    }

    /// Sets the standard deviation of CSI noise.
    pub fn csi_noise_std(mut self, v: f32) -> Self {
        self.csi_noise_std = v;
        self
    }

    /// Sets the CSI reporting delay.
    pub fn delay_steps(mut self, v: usize) -> Self {
        self.delay_steps = v;
        self
    }

    /// Sets the number of stacked steps.
    pub fn history_steps(mut self, v: usize) -> Self {
        self.history_steps = v;
        self
    }

    /// Checks the values that do not depend on the dataset.
    pub fn validate(&self) -> Result<()> {
        if !self.csi_noise_std.is_finite() || self.csi_noise_std < 0.0 {
            return Err(BeamEnvError::Config(format!(
                "csi_noise_std must be finite and non-negative, got {}",
                self.csi_noise_std
            ))
            .into());
        }
        if self.history_steps == 0 {
            return Err(BeamEnvError::Config("history_steps must be at least 1".to_string()).into());
        }
        if self.max_steps == Some(0) {
            return Err(BeamEnvError::Config("max_steps must be at least 1".to_string()).into());
        }
        Ok(())
    }

    /// Constructs [`BeamSelectionEnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(rdr)
            .map_err(|e| BeamEnvError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Saves [`BeamSelectionEnvConfig`] as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_config() -> Result<()> {
        let config = BeamSelectionEnvConfig::default()
            .data_path("data/beam_dataset_K4.csv")
            .user_stream(2, 1)
            .reward_type(RewardType::Relative)
            .max_steps(Some(100))
            .shuffle(false)
            .csi_noise_std(0.5)
            .delay_steps(1)
            .history_steps(3);

        let dir = TempDir::new("env_config")?;
        let path = dir.path().join("env.yaml");
        config.save(&path)?;
        let loaded = BeamSelectionEnvConfig::load(&path)?;
        assert_eq!(config, loaded);
        Ok(())
    }

    #[test]
    fn test_partial_yaml_uses_defaults() -> Result<()> {
        let config: BeamSelectionEnvConfig =
            serde_yaml::from_str("data_path: a.csv\nreward_type: sinr\n")?;
        assert_eq!(config.reward_type, RewardType::Sinr);
        assert!(config.shuffle);
        assert_eq!(config.history_steps, 1);
        Ok(())
    }

    #[test]
    fn test_unknown_reward_type_is_a_config_error() -> Result<()> {
        let dir = TempDir::new("env_config")?;
        let path = dir.path().join("env.yaml");
        std::fs::write(&path, "reward_type: throughput\n")?;
        let err = BeamSelectionEnvConfig::load(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BeamEnvError>(),
            Some(BeamEnvError::Config(_))
        ));
        Ok(())
    }

    #[test]
    fn test_validate() {
        let ok = BeamSelectionEnvConfig::default();
        assert!(ok.validate().is_ok());
        assert!(ok.clone().csi_noise_std(-1.0).validate().is_err());
        assert!(ok.clone().history_steps(0).validate().is_err());
        assert!(ok.max_steps(Some(0)).validate().is_err());
    }
}
