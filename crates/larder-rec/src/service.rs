use crate::{translate, RecommendationRequest, Ranker, Result};
use larder_core::{RecipeRecord, RecipeStore};
use larder_kge::LinkPredictor;
use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;

/// The recommendation service: recipe records plus a link predictor.
///
/// Both are loaded once and never change afterwards, so a `Recommender` is
/// cheap to clone and safe to share between request handlers.
#[derive(Clone)]
pub struct Recommender {
    store: Arc<RecipeStore>,
    predictor: Arc<dyn LinkPredictor>,
}

impl Recommender {
    pub fn new(store: RecipeStore, predictor: impl LinkPredictor + 'static) -> Self {
        Self::from_shared(Arc::new(store), Arc::new(predictor))
    }

    pub fn from_shared(store: Arc<RecipeStore>, predictor: Arc<dyn LinkPredictor>) -> Self {
        Self { store, predictor }
    }

    /// Recipe identifiers best matching `request`, best first.
    pub fn recommend(&self, request: &RecommendationRequest) -> Result<Vec<String>> {
        let criteria = translate(request)?;
        tracing::debug!(criteria = criteria.len(), top_k = request.top_k, "translated request");
        Ranker::new(self.predictor.as_ref()).rank(&criteria, request.top_k, request.flexible)
    }

    /// Score independent requests in parallel. Results line up with
    /// `requests`; one failing request does not affect the others.
    pub fn recommend_batch(&self, requests: &[RecommendationRequest]) -> Vec<Result<Vec<String>>> {
        requests.par_iter().map(|r| self.recommend(r)).collect()
    }

    /// Details for a recipe identifier; anything unparseable is not found.
    pub fn recipe(&self, id: &str) -> Option<&RecipeRecord> {
        self.store.lookup(id)
    }

    pub fn unique_ingredients(&self) -> Vec<String> {
        self.store.unique_ingredients()
    }

    pub fn store(&self) -> &RecipeStore {
        &self.store
    }
}

impl fmt::Debug for Recommender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recommender")
            .field("recipes", &self.store.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_kge::LinkPrediction;

    /// Ranks every recipe in the same fixed order for any query.
    struct Fixed(Vec<LinkPrediction>);

    impl LinkPredictor for Fixed {
        fn predict_head(&self, _relation: &str, _tail: &str) -> larder_kge::Result<Vec<LinkPrediction>> {
            Ok(self.0.clone())
        }
    }

    fn service() -> Recommender {
        let store = RecipeStore::from_records([
            RecipeRecord {
                ingredients: Some("Sugar; cocoa".into()),
                ..RecipeRecord::new(1)
            },
            RecipeRecord {
                ingredients: Some("sugar;unknown;nan".into()),
                ..RecipeRecord::new(2)
            },
        ]);
        let model = Fixed(vec![
            LinkPrediction::new("recipe_2", 2.0),
            LinkPrediction::new("recipe_1", 1.0),
        ]);
        Recommender::new(store, model)
    }

    #[test]
    fn test_recommend() {
        let rec = service();
        let request = RecommendationRequest {
            meal_type: vec!["dessert".into()],
            ..Default::default()
        };
        assert_eq!(rec.recommend(&request).unwrap(), ["2", "1"]);
        assert!(rec.recommend(&RecommendationRequest::default()).unwrap().is_empty());
    }

    #[test]
    fn test_recipe_lookup() {
        let rec = service();
        assert_eq!(rec.recipe("1").map(|r| r.id), Some(1));
        assert!(rec.recipe("99").is_none());
        assert!(rec.recipe("abc").is_none());
    }

    #[test]
    fn test_unique_ingredients() {
        assert_eq!(service().unique_ingredients(), ["cocoa", "sugar"]);
    }

    #[test]
    fn test_batch_keeps_input_order() {
        let rec = service();
        let requests = vec![
            RecommendationRequest {
                meal_type: vec!["dessert".into()],
                top_k: 1,
                ..Default::default()
            },
            RecommendationRequest::default(),
            RecommendationRequest {
                cook_time: Some("quick".into()),
                weights: [("cook_time".to_string(), -2.0)].into_iter().collect(),
                ..Default::default()
            },
        ];
        let results = rec.recommend_batch(&requests);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap(), &["2"]);
        assert!(results[1].as_ref().unwrap().is_empty());
        assert!(results[2].is_err());
    }
}
