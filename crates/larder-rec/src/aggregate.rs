//! Combining per-criterion link predictions into one recipe ranking.

use crate::{Criterion, Result};
use larder_core::Entity;
use larder_kge::{LinkPrediction, LinkPredictor};
use std::collections::{HashMap, HashSet};

/// Min-max normalise scores to `[0, 1]`.
///
/// A set whose maximum equals its minimum (a singleton, say) maps to all
/// zeros. Non-finite scores count as the set minimum.
pub fn min_max(scores: &[f32]) -> Vec<f32> {
    let finite = scores.iter().copied().filter(|s| s.is_finite()).map(f64::from);
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
        (lo.min(s), hi.max(s))
    });
    let range = max - min;
    if range.is_nan() || range <= 0.0 {
        return vec![0.0; scores.len()];
    }
    scores
        .iter()
        .map(|&s| {
            if s.is_finite() {
                ((f64::from(s) - min) / range) as f32
            } else {
                0.0
            }
        })
        .collect()
}

#[derive(Debug)]
struct Candidate {
    recipe_id: String,
    score: f32,
    hits: usize,
}

/// Ranks recipes against a list of criteria using a link predictor.
pub struct Ranker<'a, P: ?Sized> {
    predictor: &'a P,
}

impl<'a, P: LinkPredictor + ?Sized> Ranker<'a, P> {
    pub fn new(predictor: &'a P) -> Self {
        Self { predictor }
    }

    /// The best `k` recipe identifiers (without the `recipe_` prefix).
    ///
    /// With `flexible` a recipe needs to match at least one criterion;
    /// otherwise it must match all of them. Either way its score is the sum
    /// over the criteria it matches. Equal scores keep first-appearance order.
    pub fn rank(&self, criteria: &[Criterion], k: usize, flexible: bool) -> Result<Vec<String>> {
        if criteria.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let mut merged: Vec<Candidate> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();

        for criterion in criteria {
            let mut seen = HashSet::new();
            for (recipe_id, score) in self.score(criterion)? {
                let slot = *slots.entry(recipe_id.clone()).or_insert_with(|| {
                    merged.push(Candidate {
                        recipe_id,
                        score: 0.0,
                        hits: 0,
                    });
                    merged.len() - 1
                });
                // a criterion's candidates form a set; the first score counts
                if seen.insert(slot) {
                    merged[slot].score += score;
                    merged[slot].hits += 1;
                }
            }
        }

        if !flexible {
            merged.retain(|c| c.hits == criteria.len());
        }
        merged.sort_by(|a, b| b.score.total_cmp(&a.score));
        merged.truncate(k);

        tracing::debug!(
            criteria = criteria.len(),
            flexible,
            returned = merged.len(),
            "ranked recipes"
        );
        Ok(merged.into_iter().map(|c| c.recipe_id).collect())
    }

    /// Normalised, weighted recipe scores for one criterion, in adapter order.
    fn score(&self, criterion: &Criterion) -> Result<Vec<(String, f32)>> {
        let tail = criterion.tail.canonical();
        let predictions = match self.predictor.predict_head(criterion.relation.as_str(), &tail) {
            Ok(predictions) => predictions,
            Err(e) if e.is_not_found() => {
                tracing::warn!(tail = %tail, relation = %criterion.relation, error = %e, "criterion unknown to model");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        let raw: Vec<f32> = predictions.iter().map(|p| p.score).collect();
        let normalised = min_max(&raw);

        let mut undecoded = 0usize;
        let recipes: Vec<(String, f32)> = predictions
            .into_iter()
            .zip(normalised)
            .filter_map(|(LinkPrediction { entity, .. }, score)| match Entity::decode(&entity) {
                Entity::Raw(_) => {
                    undecoded += 1;
                    None
                }
                typed => typed
                    .recipe_id()
                    .map(|id| (id.to_string(), score * criterion.weight)),
            })
            .collect();
        if undecoded > 0 {
            tracing::warn!(tail = %tail, undecoded, "model returned non-canonical entities");
        }

        tracing::debug!(
            tail = %tail,
            relation = %criterion.relation,
            candidates = raw.len(),
            recipes = recipes.len(),
            "scored criterion"
        );
        Ok(recipes)
    }
}
