use crate::{Error, LinkPrediction, LinkPredictor, Result, ScoringFunction};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// On-disk form of a trained model: a scoring function plus embedding tables
/// keyed by the same canonical strings used in the triple file.
///
/// ```json
/// {
///   "scoring": "TransE",
///   "entities": { "recipe_10": [0.1, 0.2], "meal_type_dessert": [0.3, 0.1] },
///   "relations": { "isForMealType": [0.2, -0.1] }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingArtifact {
    #[serde(default)]
    pub scoring: ScoringFunction,
    pub entities: HashMap<String, Vec<f32>>,
    pub relations: HashMap<String, Vec<f32>>,
}

/// A pre-trained embedding model answering link-prediction queries by
/// exhaustive scoring.
///
/// Read-only after construction, so it is shared across threads without
/// locking.
#[derive(Debug, Clone)]
pub struct EmbeddingModel {
    scoring: ScoringFunction,
    dim: usize,
    entity_embeddings: HashMap<String, Vec<f32>>,
    relation_embeddings: HashMap<String, Vec<f32>>,
    /// Entity names, sorted, for deterministic candidate order.
    entity_names: Vec<String>,
    candidate_limit: Option<usize>,
}

impl EmbeddingModel {
    /// Load a JSON [`EmbeddingArtifact`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let model = Self::from_reader(BufReader::new(file))?;
        tracing::info!(
            path = %path.display(),
            scoring = ?model.scoring,
            entities = model.num_entities(),
            relations = model.num_relations(),
            dim = model.dim,
            "loaded embedding model"
        );
        Ok(model)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let artifact: EmbeddingArtifact = serde_json::from_reader(reader)?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: EmbeddingArtifact) -> Result<Self> {
        Self::from_embeddings(artifact.scoring, artifact.entities, artifact.relations)
    }

    /// Create from pre-trained embeddings, validating that every vector has
    /// the same dimension.
    pub fn from_embeddings(
        scoring: ScoringFunction,
        entity_embeddings: HashMap<String, Vec<f32>>,
        relation_embeddings: HashMap<String, Vec<f32>>,
    ) -> Result<Self> {
        let dim = entity_embeddings
            .values()
            .next()
            .map(Vec::len)
            .ok_or_else(|| Error::InvalidModel("no entity embeddings".into()))?;

        if dim == 0 {
            return Err(Error::InvalidModel("zero-dimensional embeddings".into()));
        }
        if scoring.is_complex() && dim % 2 != 0 {
            return Err(Error::InvalidModel(format!(
                "{scoring:?} needs even-length embeddings, got {dim}"
            )));
        }

        let tables = [("Entity", &entity_embeddings), ("Relation", &relation_embeddings)];
        for (kind, table) in tables {
            if let Some((k, v)) = table.iter().find(|(_, v)| v.len() != dim) {
                return Err(Error::InvalidModel(format!(
                    "{kind} '{k}' has dimension {} but expected {dim}",
                    v.len()
                )));
            }
        }

        let mut entity_names: Vec<String> = entity_embeddings.keys().cloned().collect();
        entity_names.sort();

        Ok(Self {
            scoring,
            dim,
            entity_embeddings,
            relation_embeddings,
            entity_names,
            candidate_limit: None,
        })
    }

    /// Return at most `limit` candidates per query.
    pub fn with_candidate_limit(mut self, limit: usize) -> Self {
        self.candidate_limit = Some(limit);
        self
    }

    fn entity(&self, name: &str) -> Result<&[f32]> {
        self.entity_embeddings
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::EntityNotFound(name.to_string()))
    }

    fn relation(&self, name: &str) -> Result<&[f32]> {
        self.relation_embeddings
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::RelationNotFound(name.to_string()))
    }

    /// Score a triple (h, r, t).
    pub fn score(&self, head: &str, relation: &str, tail: &str) -> Result<f32> {
        Ok(self
            .scoring
            .score(self.entity(head)?, self.relation(relation)?, self.entity(tail)?))
    }

    /// Predict likely tail entities for (head, relation, ?).
    pub fn predict_tail(&self, head: &str, relation: &str) -> Result<Vec<LinkPrediction>> {
        let h = self.entity(head)?;
        let r = self.relation(relation)?;
        Ok(self.rank(|t| self.scoring.score(h, r, t)))
    }

    /// Score every entity, best first; ties keep name order.
    fn rank(&self, score: impl Fn(&[f32]) -> f32) -> Vec<LinkPrediction> {
        let mut predictions: Vec<LinkPrediction> = self
            .entity_names
            .iter()
            .map(|name| LinkPrediction::new(name.clone(), score(&self.entity_embeddings[name])))
            .collect();
        predictions.sort_by(|a, b| b.score.total_cmp(&a.score));
        if let Some(limit) = self.candidate_limit {
            predictions.truncate(limit);
        }
        predictions
    }

    pub fn scoring(&self) -> ScoringFunction {
        self.scoring
    }

    pub fn embedding_dim(&self) -> usize {
        self.dim
    }

    pub fn num_entities(&self) -> usize {
        self.entity_embeddings.len()
    }

    pub fn num_relations(&self) -> usize {
        self.relation_embeddings.len()
    }

    pub fn contains_entity(&self, name: &str) -> bool {
        self.entity_embeddings.contains_key(name)
    }
}

impl LinkPredictor for EmbeddingModel {
    fn predict_head(&self, relation: &str, tail: &str) -> Result<Vec<LinkPrediction>> {
        let r = self.relation(relation)?;
        let t = self.entity(tail)?;
        Ok(self.rank(|h| self.scoring.score(h, r, t)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// recipe_1 + r lands exactly on dessert, recipe_2 half a unit away.
    fn toy_model() -> EmbeddingModel {
        let entities = HashMap::from([
            ("recipe_1".to_string(), vec![0.0, 0.0]),
            ("recipe_2".to_string(), vec![0.0, 0.5]),
            ("meal_type_dessert".to_string(), vec![1.0, 0.0]),
        ]);
        let relations = HashMap::from([("isForMealType".to_string(), vec![1.0, 0.0])]);
        EmbeddingModel::from_embeddings(ScoringFunction::TransE, entities, relations).unwrap()
    }

    #[test]
    fn test_predict_head_sorted() {
        let model = toy_model();
        let preds = model.predict_head("isForMealType", "meal_type_dessert").unwrap();

        assert_eq!(preds.len(), 3);
        assert_eq!(preds[0].entity, "recipe_1");
        assert!(preds[0].score.abs() < 1e-6);
        assert_eq!(preds[1].entity, "recipe_2");
        for w in preds.windows(2) {
            assert!(w[0].score >= w[1].score);
        }
    }

    #[test]
    fn test_candidate_limit() {
        let model = toy_model().with_candidate_limit(1);
        let preds = model.predict_head("isForMealType", "meal_type_dessert").unwrap();
        assert_eq!(preds.len(), 1);
    }

    #[test]
    fn test_unknown_vocabulary() {
        let model = toy_model();
        let err = model.predict_head("isForMealType", "meal_type_brunch").unwrap_err();
        assert!(matches!(err, Error::EntityNotFound(_)));
        assert!(err.is_not_found());

        let err = model.predict_head("hasCookTime", "meal_type_dessert").unwrap_err();
        assert!(matches!(err, Error::RelationNotFound(_)));
    }

    #[test]
    fn test_score_and_predict_tail() {
        let model = toy_model();
        let s = model.score("recipe_2", "isForMealType", "meal_type_dessert").unwrap();
        assert!((s + 0.5).abs() < 1e-6);

        let tails = model.predict_tail("recipe_1", "isForMealType").unwrap();
        assert_eq!(tails[0].entity, "meal_type_dessert");
    }

    #[test]
    fn test_dimension_validation() {
        let entities = HashMap::from([
            ("a".to_string(), vec![1.0, 0.0]),
            ("b".to_string(), vec![1.0]),
        ]);
        let err = EmbeddingModel::from_embeddings(ScoringFunction::TransE, entities, HashMap::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidModel(_)));

        let odd = HashMap::from([("a".to_string(), vec![1.0, 0.0, 0.0])]);
        assert!(EmbeddingModel::from_embeddings(ScoringFunction::RotatE, odd, HashMap::new()).is_err());

        assert!(EmbeddingModel::from_embeddings(
            ScoringFunction::TransE,
            HashMap::new(),
            HashMap::new()
        )
        .is_err());
    }

    #[test]
    fn test_from_reader() {
        let json = r#"{
            "scoring": "DistMult",
            "entities": {"recipe_1": [1.0, 1.0], "diet_type_Vegan": [1.0, 0.0]},
            "relations": {"hasDietType": [1.0, 1.0]}
        }"#;
        let model = EmbeddingModel::from_reader(json.as_bytes()).unwrap();
        assert_eq!(model.scoring(), ScoringFunction::DistMult);
        assert_eq!(model.embedding_dim(), 2);
        assert!(model.contains_entity("diet_type_Vegan"));
    }
}
