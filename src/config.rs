//! Engine configuration
//!
//! Defines the privacy parameters threaded through every transformation call,
//! the evaluator's tunables, and the TOML file that carries both. Values are
//! validated eagerly: out-of-range settings are rejected with
//! [`PrivflowError::InvalidConfig`], never clamped behind the caller's back.

use crate::error::{PrivflowError, Result};
use crate::privacy::noise::noise_scale;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Granularity at which traces are categorized.
///
/// Each level discards strictly more detail than the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AbstractionLevel {
    Token = 1,
    Statement = 2,
    Function = 3,
    Module = 4,
    Workflow = 5,
}

impl TryFrom<u8> for AbstractionLevel {
    type Error = PrivflowError;

    fn try_from(level: u8) -> Result<Self> {
        match level {
            1 => Ok(AbstractionLevel::Token),
            2 => Ok(AbstractionLevel::Statement),
            3 => Ok(AbstractionLevel::Function),
            4 => Ok(AbstractionLevel::Module),
            5 => Ok(AbstractionLevel::Workflow),
            other => Err(PrivflowError::InvalidConfig(format!(
                "abstraction_level must be between 1 and 5, got {}",
                other
            ))),
        }
    }
}

impl From<AbstractionLevel> for u8 {
    fn from(level: AbstractionLevel) -> Self {
        level as u8
    }
}

impl fmt::Display for AbstractionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbstractionLevel::Token => write!(f, "token"),
            AbstractionLevel::Statement => write!(f, "statement"),
            AbstractionLevel::Function => write!(f, "function"),
            AbstractionLevel::Module => write!(f, "module"),
            AbstractionLevel::Workflow => write!(f, "workflow"),
        }
    }
}

/// Privacy parameters for one transformation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivacyConfig {
    /// Differential-privacy parameter; smaller means more noise. May be
    /// infinite (no noise).
    pub epsilon: f64,

    /// Probability of suppressing a non-sensitive token, in [0, 1]
    pub redaction_level: f64,

    pub abstraction_level: AbstractionLevel,

    pub redact_names: bool,
    pub redact_numbers: bool,
    pub redact_emails: bool,
}

impl Default for PrivacyConfig {
    fn default() -> Self {
        Self {
            epsilon: 1.0,
            redaction_level: 0.5,
            abstraction_level: AbstractionLevel::Function,
            redact_names: true,
            redact_numbers: true,
            redact_emails: true,
        }
    }
}

impl PrivacyConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        noise_scale(self.epsilon)?;

        if !(0.0..=1.0).contains(&self.redaction_level) {
            return Err(PrivflowError::InvalidConfig(format!(
                "redaction_level must be between 0 and 1, got {}",
                self.redaction_level
            )));
        }

        Ok(())
    }

    /// Apply a partial update, returning the validated merged config.
    ///
    /// Fields the update leaves unset keep their current values. `self` is
    /// never modified, so a rejected update leaves the caller's config intact.
    pub fn merged(&self, update: &PrivacyConfigUpdate) -> Result<PrivacyConfig> {
        let mut merged = self.clone();

        if let Some(epsilon) = update.epsilon {
            merged.epsilon = epsilon;
        }
        if let Some(level) = update.redaction_level {
            merged.redaction_level = level;
        }
        if let Some(level) = update.abstraction_level {
            merged.abstraction_level = AbstractionLevel::try_from(level)?;
        }
        if let Some(flag) = update.redact_names {
            merged.redact_names = flag;
        }
        if let Some(flag) = update.redact_numbers {
            merged.redact_numbers = flag;
        }
        if let Some(flag) = update.redact_emails {
            merged.redact_emails = flag;
        }

        merged.validate()?;
        Ok(merged)
    }
}

/// Partial privacy config; unset fields retain prior values when merged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrivacyConfigUpdate {
    pub epsilon: Option<f64>,
    pub redaction_level: Option<f64>,
    /// Raw level so out-of-range values surface as `InvalidConfig`
    pub abstraction_level: Option<u8>,
    pub redact_names: Option<bool>,
    pub redact_numbers: Option<bool>,
    pub redact_emails: Option<bool>,
}

impl PrivacyConfigUpdate {
    pub fn is_empty(&self) -> bool {
        *self == PrivacyConfigUpdate::default()
    }
}

/// Weights of the composite expressiveness score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub clustering: f64,
    pub classification: f64,
    pub preservation: f64,
    pub retention: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            clustering: 0.3,
            classification: 0.3,
            preservation: 0.2,
            retention: 0.2,
        }
    }
}

impl ScoreWeights {
    fn validate(&self) -> Result<()> {
        let named = [
            ("clustering", self.clustering),
            ("classification", self.classification),
            ("preservation", self.preservation),
            ("retention", self.retention),
        ];
        for (name, weight) in named {
            if !weight.is_finite() || weight < 0.0 {
                return Err(PrivflowError::InvalidConfig(format!(
                    "weights.{} must be a finite non-negative number, got {}",
                    name, weight
                )));
            }
        }
        Ok(())
    }
}

/// Expressiveness evaluator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub weights: ScoreWeights,

    /// Upper bound on k for partition clustering
    pub cluster_count: usize,

    /// Iteration cap for the clustering fixed-point loop
    pub max_iterations: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            cluster_count: 5,
            max_iterations: 100,
        }
    }
}

impl EvaluationConfig {
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;

        if self.cluster_count == 0 {
            return Err(PrivflowError::InvalidConfig(
                "cluster_count must be at least 1".to_string(),
            ));
        }

        if self.max_iterations == 0 {
            return Err(PrivflowError::InvalidConfig(
                "max_iterations must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub privacy: PrivacyConfig,
    pub evaluation: EvaluationConfig,
}

impl EngineConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading engine config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.privacy.validate()?;
        self.evaluation.validate()?;
        Ok(())
    }

    /// Save configuration to TOML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| PrivflowError::Other(e.to_string()))
    }
}
