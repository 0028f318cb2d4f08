//! Knowledge graph embedding inference for recommendation.
//!
//! A trained KGE model is treated as a black box with one capability:
//! given a partial triple `(?, relation, tail)`, rank candidate head
//! entities by plausibility. That capability is the [`LinkPredictor`]
//! trait; everything downstream depends only on it.
//!
//! ## Built-in model
//!
//! [`EmbeddingModel`] loads pre-trained entity and relation vectors
//! (exported from whatever trained them) and scores candidates with one of
//! the classic [`ScoringFunction`]s:
//!
//! | Model | Hypothesis | Score |
//! |-------|------------|-------|
//! | TransE | Relations are translations | -‖h + r - t‖ |
//! | DistMult | Relations are scalings | ⟨h, r, t⟩ |
//! | RotatE | Relations are rotations | -‖h ∘ r - t‖ |
//! | ComplEx | Asymmetric bilinear | Re⟨h, r, conj(t)⟩ |
//!
//! ## Thread safety
//!
//! `LinkPredictor: Send + Sync`. A backend that cannot be called
//! concurrently implements [`SerialPredictor`] instead and is wrapped in
//! [`Exclusive`], which holds a mutex around each call.
//!
//! ```rust
//! use larder_kge::{EmbeddingModel, LinkPredictor, ScoringFunction};
//! use std::collections::HashMap;
//!
//! let entities = HashMap::from([
//!     ("recipe_1".to_string(), vec![0.0, 0.0]),
//!     ("meal_type_dessert".to_string(), vec![1.0, 0.0]),
//! ]);
//! let relations = HashMap::from([("isForMealType".to_string(), vec![1.0, 0.0])]);
//! let model = EmbeddingModel::from_embeddings(ScoringFunction::TransE, entities, relations)?;
//!
//! let ranked = model.predict_head("isForMealType", "meal_type_dessert")?;
//! assert_eq!(ranked[0].entity, "recipe_1");
//! # Ok::<(), larder_kge::Error>(())
//! ```

mod embedding;
mod error;
mod guard;
mod scoring;

pub use embedding::{EmbeddingArtifact, EmbeddingModel};
pub use error::{Error, Result};
pub use guard::{Exclusive, SerialPredictor};
pub use scoring::{LinkPrediction, ScoringFunction};

use std::sync::Arc;

/// Link prediction over a trained model snapshot.
pub trait LinkPredictor: Send + Sync {
    /// Candidate heads for `(?, relation, tail)`, with raw scores.
    ///
    /// How many candidates come back is up to the implementation.
    fn predict_head(&self, relation: &str, tail: &str) -> Result<Vec<LinkPrediction>>;
}

impl<P: LinkPredictor + ?Sized> LinkPredictor for Arc<P> {
    fn predict_head(&self, relation: &str, tail: &str) -> Result<Vec<LinkPrediction>> {
        (**self).predict_head(relation, tail)
    }
}

impl<P: LinkPredictor + ?Sized> LinkPredictor for Box<P> {
    fn predict_head(&self, relation: &str, tail: &str) -> Result<Vec<LinkPrediction>> {
        (**self).predict_head(relation, tail)
    }
}
