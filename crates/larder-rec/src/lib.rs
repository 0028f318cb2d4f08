//! Recipe recommendation on top of a link predictor.
//!
//! A request flows through two stages:
//!
//! 1. [`translate`] turns a [`RecommendationRequest`] into [`Criterion`]s,
//!    partial triples `(?, relation, tail)` with a weight each.
//! 2. [`Ranker`] asks the [`LinkPredictor`](larder_kge::LinkPredictor) for
//!    candidate heads per criterion, min-max normalises and weights the
//!    scores, keeps recipes only, and merges them by union (`flexible`) or
//!    intersection.
//!
//! [`Recommender`] wires both to a shared [`RecipeStore`](larder_core::RecipeStore).
//!
//! ```rust
//! use larder_core::{RecipeRecord, RecipeStore};
//! use larder_kge::{EmbeddingModel, ScoringFunction};
//! use larder_rec::{RecommendationRequest, Recommender};
//! use std::collections::HashMap;
//!
//! let entities = HashMap::from([
//!     ("recipe_10".to_string(), vec![0.0, 0.0]),
//!     ("recipe_7".to_string(), vec![0.0, 0.5]),
//!     ("meal_type_dessert".to_string(), vec![1.0, 0.0]),
//! ]);
//! let relations = HashMap::from([("isForMealType".to_string(), vec![1.0, 0.0])]);
//! let model = EmbeddingModel::from_embeddings(ScoringFunction::TransE, entities, relations)?;
//!
//! let store = RecipeStore::from_records([RecipeRecord::new(10), RecipeRecord::new(7)]);
//! let recommender = Recommender::new(store, model);
//!
//! let request = RecommendationRequest {
//!     meal_type: vec!["dessert".into()],
//!     ..Default::default()
//! };
//! assert_eq!(recommender.recommend(&request)?, ["10", "7"]);
//! # Ok::<(), larder_rec::Error>(())
//! ```

mod aggregate;
mod criteria;
mod error;
mod service;

pub use aggregate::{min_max, Ranker};
pub use criteria::{
    translate, Criterion, RecommendationRequest, DEFAULT_TOP_K, DEFAULT_WEIGHT, WEIGHT_KEYS,
};
pub use error::{Error, Result};
pub use service::Recommender;
