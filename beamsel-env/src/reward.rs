//! Reward shaping.
use crate::BeamEnvError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Added to the optimal SINR in the denominator of [`RewardType::Sinr`].
pub const SINR_EPS: f32 = 1e-8;

/// How a selected beam is scored against the ground truth.
///
/// Rewards are always computed from the noiseless SINR of the current row,
/// never from the observation the policy saw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RewardType {
    /// `1` if the optimal beam is selected, `0` otherwise.
    #[default]
    Accuracy,

    /// SINR of the selected beam relative to the optimal one.
    Sinr,

    /// `log2(1 + sinr)` of the selected beam.
    SumRate,

    /// `1 - (s_opt - s_sel) / s_opt`, clipped below at 0. Zero when the
    /// optimal SINR is zero.
    Relative,
}

impl RewardType {
    /// Scores `action` against the optimal beam `label` given the noiseless
    /// SINR of every beam.
    pub fn score(&self, action: usize, label: usize, sinr: &[f32]) -> f32 {
        let selected = sinr[action];
        let optimal = sinr[label];

        match self {
            Self::Accuracy => {
                if action == label {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Sinr => selected / (optimal + SINR_EPS),
            Self::SumRate => (1.0 + selected).log2(),
            Self::Relative => {
                if optimal == 0.0 {
                    0.0
                } else {
                    (1.0 - (optimal - selected) / optimal).max(0.0)
                }
            }
        }
    }

    /// Name as used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accuracy => "accuracy",
            Self::Sinr => "sinr",
            Self::SumRate => "sum-rate",
            Self::Relative => "relative",
        }
    }
}

impl fmt::Display for RewardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RewardType {
    type Err = BeamEnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accuracy" => Ok(Self::Accuracy),
            "sinr" => Ok(Self::Sinr),
            "sum-rate" => Ok(Self::SumRate),
            "relative" => Ok(Self::Relative),
            _ => Err(BeamEnvError::Config(format!(
                "unknown reward_type '{}', expected one of accuracy, sinr, sum-rate, relative",
                s
            ))),
        }
    }
}
