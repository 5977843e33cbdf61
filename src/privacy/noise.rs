//! Laplace mechanism for numeric fields.
//!
//! Noise scale is `SENSITIVITY / epsilon`. Every call draws independently;
//! there is no shared state between fields and no budget accounting across
//! calls.

use rand::distributions::Open01;
use rand::Rng;

use crate::error::{PrivflowError, Result};

/// L1 sensitivity of every counter in the engine
pub const SENSITIVITY: f64 = 1.0;

/// Draw one Laplace(0, scale) sample.
///
/// `u` is uniform on the open interval (-0.5, 0.5), so the logarithm's
/// argument stays strictly positive.
pub fn sample_laplace<R: Rng + ?Sized>(scale: f64, rng: &mut R) -> f64 {
    if scale == 0.0 {
        return 0.0;
    }
    let u: f64 = rng.sample::<f64, _>(Open01) - 0.5;
    let magnitude = (1.0 - 2.0 * u.abs()).max(f64::MIN_POSITIVE).ln();
    -scale * u.signum() * magnitude
}

/// Laplace scale `SENSITIVITY / epsilon`.
///
/// Infinite epsilon gives scale 0 (no noise). Zero, negative and NaN are
/// rejected before the division, and so is any epsilon small enough that the
/// scale overflows to infinity.
pub fn noise_scale(epsilon: f64) -> Result<f64> {
    if !(epsilon > 0.0) {
        return Err(PrivflowError::InvalidConfig(format!(
            "epsilon must be greater than 0, got {}",
            epsilon
        )));
    }

    let scale = SENSITIVITY / epsilon;
    if !scale.is_finite() {
        return Err(PrivflowError::InvalidConfig(format!(
            "epsilon {:e} is too small: noise scale is not finite",
            epsilon
        )));
    }
    Ok(scale)
}

/// Adds calibrated Laplace noise for a fixed epsilon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseInjector {
    epsilon: f64,
    scale: f64,
}

impl NoiseInjector {
    /// See [`noise_scale`] for which epsilons are accepted
    pub fn new(epsilon: f64) -> Result<Self> {
        Ok(Self {
            epsilon,
            scale: noise_scale(epsilon)?,
        })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// `value` plus zero-mean noise, unclamped
    pub fn add_noise<R: Rng + ?Sized>(&self, value: f64, rng: &mut R) -> f64 {
        value + sample_laplace(self.scale, rng)
    }

    /// Noisy version of a non-negative integer field: clamped at zero, rounded
    pub fn noisy_count<R: Rng + ?Sized>(&self, value: u64, rng: &mut R) -> u64 {
        let noisy = self.add_noise(value as f64, rng);
        noisy.max(0.0).round() as u64
    }
}

/// One-shot [`NoiseInjector::add_noise`]
pub fn add_noise<R: Rng + ?Sized>(value: f64, epsilon: f64, rng: &mut R) -> Result<f64> {
    Ok(NoiseInjector::new(epsilon)?.add_noise(value, rng))
}
