//! Privacy transformations applied to extracted workflows.
//!
//! # Architecture
//!
//! - **Redactor**: pattern substitution over text plus per-token Bernoulli
//!   suppression
//! - **NoiseInjector**: Laplace mechanism on integer fields
//! - **Abstractor**: collapses traces into one of five category levels
//! - **TransformationPipeline**: redact → noise → abstract per trace, and
//!   pseudonymizes workflow ids
//!
//! All randomness comes from a caller-supplied [`rand::Rng`]. Seed it to make
//! a transformation reproducible.

pub mod abstractor;
pub mod noise;
pub mod patterns;
pub mod pipeline;
pub mod redactor;

pub use abstractor::Abstractor;
pub use noise::{add_noise, noise_scale, NoiseInjector, SENSITIVITY};
pub use patterns::{is_sentinel, SensitiveKind, REDACTED, SENTINELS};
pub use pipeline::{pseudonymize, transform, TransformationPipeline};
pub use redactor::{Redaction, Redactor};
