//! Turning recipe records into the recipe graph.

use crate::record::{is_placeholder, split_clean};
use crate::{health_relation, NodeId, NodeType, RecipeGraph, RecipeRecord, RecipeStore};

/// Builds a [`RecipeGraph`] from recipe records.
///
/// Each record yields its recipe node plus one edge per attribute value:
///
/// | Field | Node type | Relation | Split on |
/// |-------|-----------|----------|----------|
/// | cooking method | `cooking_method` | `usesCookingMethod` | - |
/// | servings bin | `servings_bin` | `hasServingsBin` | - |
/// | cook time | `cook_time` | `hasCookTime` | - |
/// | cuisine region | `cuisine_region` | `hasCuisineRegion` | - |
/// | health types | `health_attribute` | by label | `,` |
/// | diet types | `diet_type` | `hasDietType` | `,` |
/// | meal types | `meal_type` | `isForMealType` | `,` |
/// | ingredients | `ingredient` (lowercased) | `containsIngredient` | `;` |
///
/// Blank and `unknown` values produce nothing.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: RecipeGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for a whole store, in ascending recipe order.
    pub fn build(store: &RecipeStore) -> RecipeGraph {
        let mut builder = Self {
            graph: RecipeGraph::with_capacity(store.len() * 4, store.len() * 8),
        };
        for record in store.iter() {
            builder.add_record(record);
        }
        let graph = builder.finish();
        tracing::info!(
            recipes = store.len(),
            nodes = graph.node_count(),
            triples = graph.triple_count(),
            "built recipe graph"
        );
        graph
    }

    /// Add one record. Safe to call repeatedly with the same record: nodes
    /// are reused, only edges and triples repeat.
    pub fn add_record(&mut self, record: &RecipeRecord) {
        let recipe = NodeId::recipe(record.id);
        self.graph
            .ensure_node(recipe.clone(), record.id.to_string());

        let single = [
            (NodeType::CookingMethod, &record.cooking_method),
            (NodeType::ServingsBin, &record.servings_bin),
            (NodeType::CookTime, &record.cook_time),
            (NodeType::CuisineRegion, &record.cuisine_region),
        ];
        for (node_type, value) in single {
            if let Some(value) = value.as_deref().filter(|v| !is_placeholder(v)) {
                self.link(&recipe, node_type, value.trim());
            }
        }

        if let Some(cell) = record.health_types.as_deref() {
            for label in split_clean(cell, ',') {
                self.graph.add_fact(
                    recipe.clone(),
                    health_relation(label),
                    NodeId::new(NodeType::HealthAttribute, label),
                    label,
                );
            }
        }

        let lists = [
            (NodeType::DietType, &record.diet_types, ','),
            (NodeType::MealType, &record.meal_types, ','),
            (NodeType::Ingredient, &record.ingredients, ';'),
        ];
        for (node_type, cell, delimiter) in lists {
            if let Some(cell) = cell.as_deref() {
                for value in split_clean(cell, delimiter) {
                    self.link(&recipe, node_type, value);
                }
            }
        }
    }

    fn link(&mut self, recipe: &NodeId, node_type: NodeType, value: &str) {
        let Some(relation) = node_type.relation() else {
            return;
        };
        self.graph
            .add_fact(recipe.clone(), relation, NodeId::new(node_type, value), value);
    }

    pub fn finish(self) -> RecipeGraph {
        self.graph
    }
}
