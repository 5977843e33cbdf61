//! Expressiveness evaluation for privacy-transformed workflows.
//!
//! Compares an original batch with its transformed copy and reports how much
//! analytical value survived.
//!
//! # Architecture
//!
//! - **FeatureExtractor**: 16-dimensional statistical vectors per workflow
//! - **KMeans** / **silhouette_score**: clustering quality over those vectors
//! - **edit_distance**: Levenshtein distance over trace label sequences
//! - **information_retention**: share of conversation tokens left unredacted
//! - **ExpressivenessEvaluator**: combines the above into
//!   [`ExpressivenessMetrics`]
//!
//! # Privacy
//!
//! Clustering runs only on computed statistics (intent and outcome one-hots,
//! normalized metadata, trace-kind ratios). No trace content enters a feature
//! vector.

pub mod clustering;
pub mod evaluator;
pub mod features;
pub mod retention;
pub mod sequence;

pub use clustering::{euclidean_distance, silhouette_score, Clustering, KMeans};
pub use evaluator::{classification_proxy, ExpressivenessEvaluator, ExpressivenessMetrics};
pub use features::{FeatureExtractor, FeatureVector, FEATURE_DIMENSIONS};
pub use retention::{information_retention, majority_baseline, token_retention};
pub use sequence::{edit_distance, sequence_similarity, workflow_preservation};
