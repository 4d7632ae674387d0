//! Gaussian CSI measurement noise.
use crate::BeamEnvError;
use anyhow::Result;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Additive Gaussian noise on SINR measurements, clipped at zero.
#[derive(Clone, Debug)]
pub struct CsiNoise {
    normal: Option<Normal<f32>>,
}

impl CsiNoise {
    /// Creates the noise model with standard deviation `std`.
    ///
    /// `std == 0` gives oracle measurements.
    pub fn new(std: f32) -> Result<Self> {
        if !std.is_finite() || std < 0.0 {
            return Err(BeamEnvError::Config(format!(
                "csi_noise_std must be finite and non-negative, got {}",
                std
            ))
            .into());
        }
        let normal = if std > 0.0 {
            Some(Normal::new(0.0, std).map_err(|e| BeamEnvError::Config(e.to_string()))?)
        } else {
            None
        };
        Ok(Self { normal })
    }

    /// Returns `true` if measurements equal the ground truth.
    pub fn is_oracle(&self) -> bool {
        self.normal.is_none()
    }

    /// Returns a noisy copy of `raw`.
    ///
    /// One independent draw is made per component, then every component is
    /// clipped to `[0, inf)`. Without noise `raw` is copied as is and `rng` is
    /// left untouched.
    pub fn apply<R: Rng + ?Sized>(&self, raw: &[f32], rng: &mut R) -> Vec<f32> {
        match &self.normal {
            None => raw.to_vec(),
            Some(normal) => raw
                .iter()
                .map(|&v| (v + normal.sample(rng)).max(0.0))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_oracle_is_exact() -> Result<()> {
        let noise = CsiNoise::new(0.0)?;
        let mut rng = StdRng::seed_from_u64(0);
        let raw = vec![0.1, 3.25, 0.0, 1e-7];
        assert!(noise.is_oracle());
        assert_eq!(noise.apply(&raw, &mut rng), raw);
        Ok(())
    }

    #[test]
    fn test_noisy_values_are_clipped() -> Result<()> {
        let noise = CsiNoise::new(5.0)?;
        let mut rng = StdRng::seed_from_u64(1);
        let raw = vec![0.0; 256];
        let noisy = noise.apply(&raw, &mut rng);
        assert!(noisy.iter().all(|v| v.is_finite() && *v >= 0.0));
        assert!(noisy.iter().any(|v| *v > 0.0));
        assert!(noisy.iter().any(|v| *v == 0.0));
        Ok(())
    }

    #[test]
    fn test_same_seed_same_noise() -> Result<()> {
        let noise = CsiNoise::new(0.2)?;
        let raw = vec![1.0, 2.0, 3.0];
        let a = noise.apply(&raw, &mut StdRng::seed_from_u64(9));
        let b = noise.apply(&raw, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
        assert_ne!(a, raw);
        Ok(())
    }

    #[test]
    fn test_rejects_invalid_std() {
        assert!(CsiNoise::new(-0.1).is_err());
        assert!(CsiNoise::new(f32::NAN).is_err());
    }
}
