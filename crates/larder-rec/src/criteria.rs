//! Translating a user request into scoring criteria.

use crate::{Error, Result};
use larder_core::{health_relation, is_placeholder, NodeId, NodeType, Relation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Weight applied when a request does not name one for a category.
pub const DEFAULT_WEIGHT: f32 = 1.0;

/// Number of recommendations returned when a request does not say.
pub const DEFAULT_TOP_K: usize = 5;

/// Weight-map keys, in criteria order, with the node type each one targets.
pub const WEIGHT_KEYS: [(&str, NodeType); 8] = [
    ("cooking_method", NodeType::CookingMethod),
    ("servings_bin", NodeType::ServingsBin),
    ("diet_types", NodeType::DietType),
    ("meal_type", NodeType::MealType),
    ("cook_time", NodeType::CookTime),
    ("healthy_type", NodeType::HealthAttribute),
    ("cuisine_region", NodeType::CuisineRegion),
    ("ingredients", NodeType::Ingredient),
];

/// What a user asked for.
///
/// ```json
/// {
///   "cooking_method": "Bake",
///   "meal_type": ["dessert"],
///   "ingredients": ["sugar", "cocoa"],
///   "weights": { "ingredients": 2.0 },
///   "top_k": 3,
///   "flexible": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationRequest {
    pub cooking_method: Option<String>,
    pub servings_bin: Option<String>,
    pub cook_time: Option<String>,
    pub cuisine_region: Option<String>,
    pub diet_types: Vec<String>,
    pub meal_type: Vec<String>,
    pub health_types: Vec<String>,
    pub ingredients: Vec<String>,
    /// Per-category weights keyed as in [`WEIGHT_KEYS`].
    pub weights: HashMap<String, f32>,
    pub top_k: usize,
    /// Union of criteria when set, intersection otherwise.
    pub flexible: bool,
}

impl Default for RecommendationRequest {
    fn default() -> Self {
        Self {
            cooking_method: None,
            servings_bin: None,
            cook_time: None,
            cuisine_region: None,
            diet_types: Vec::new(),
            meal_type: Vec::new(),
            health_types: Vec::new(),
            ingredients: Vec::new(),
            weights: HashMap::new(),
            top_k: DEFAULT_TOP_K,
            flexible: false,
        }
    }
}

impl RecommendationRequest {
    /// Values given for a category, in request order.
    fn values(&self, node_type: NodeType) -> Vec<&str> {
        let values: Vec<&String> = match node_type {
            NodeType::CookingMethod => self.cooking_method.iter().collect(),
            NodeType::ServingsBin => self.servings_bin.iter().collect(),
            NodeType::CookTime => self.cook_time.iter().collect(),
            NodeType::CuisineRegion => self.cuisine_region.iter().collect(),
            NodeType::DietType => self.diet_types.iter().collect(),
            NodeType::MealType => self.meal_type.iter().collect(),
            NodeType::HealthAttribute => self.health_types.iter().collect(),
            NodeType::Ingredient => self.ingredients.iter().collect(),
            NodeType::Recipe => Vec::new(),
        };
        values.into_iter().map(String::as_str).collect()
    }

    fn weight(&self, key: &str) -> Result<f32> {
        match self.weights.get(key).copied() {
            None => Ok(DEFAULT_WEIGHT),
            Some(w) if w.is_finite() && w >= 0.0 => Ok(w),
            Some(weight) => Err(Error::InvalidWeight {
                category: key.to_string(),
                weight,
            }),
        }
    }
}

/// One scoring query: recipes linked to `tail` by `relation`, weighted.
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    pub tail: NodeId,
    pub relation: Relation,
    pub weight: f32,
}

impl Criterion {
    pub fn new(tail: NodeId, relation: Relation, weight: f32) -> Self {
        Self {
            tail,
            relation,
            weight,
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(?, {}, {}) x{}", self.relation, self.tail, self.weight)
    }
}

/// Turn a request into criteria.
///
/// Values are trimmed; cooking methods are lowercased as well, and
/// ingredients get the graph's case-folded identity. Blank and `unknown`
/// values are skipped. An empty result is not an error.
pub fn translate(request: &RecommendationRequest) -> Result<Vec<Criterion>> {
    for key in request.weights.keys() {
        if WEIGHT_KEYS.iter().all(|(k, _)| k != key) {
            tracing::debug!(key = %key, "ignoring weight for unknown category");
        }
    }

    let mut criteria = Vec::new();
    for (key, node_type) in WEIGHT_KEYS {
        let values: Vec<&str> = request
            .values(node_type)
            .into_iter()
            .filter(|v| !is_placeholder(v))
            .collect();
        if values.is_empty() {
            continue;
        }
        let weight = request.weight(key)?;

        for value in values {
            let tail = match node_type {
                NodeType::CookingMethod => NodeId::new(node_type, value.to_lowercase()),
                _ => NodeId::new(node_type, value),
            };
            let relation = match node_type.relation() {
                Some(relation) => relation,
                None => health_relation(&tail.value),
            };
            criteria.push(Criterion::new(tail, relation, weight));
        }
    }
    Ok(criteria)
}
