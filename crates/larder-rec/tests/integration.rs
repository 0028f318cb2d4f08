//! End to end: recipe CSV, graph, embedding model, recommendations.

use larder_core::{GraphBuilder, Relation, RecipeStore};
use larder_kge::{EmbeddingModel, Exclusive, LinkPrediction, ScoringFunction, SerialPredictor};
use larder_rec::{translate, RecommendationRequest, Recommender};
use std::collections::HashMap;

const RECIPES: &str = "\
RecipeId,Name,Cooking_Method,servings_bin,Diet_Types,meal_type,cook_time,Healthy_Type,CuisineRegion,BestUsdaIngredientName
10,Brownies,bake,4-6,Vegetarian,dessert,less than 60 Mins,High_Sugar,American,SUGAR;COCOA
7,Fruit salad,unknown,2-4,Vegan,\"dessert, snack\",less than 15 Mins,Low_Fat,unknown,APPLE;sugar
3,Chili,simmer,6-8,Standard,dinner,less than 4 Hours,High_Protein,Mexican,BEANS;BEEF
";

/// A model whose geometry mirrors the graph: each recipe sits exactly one
/// relation step away from the meal types it belongs to.
fn model() -> EmbeddingModel {
    let entities = HashMap::from([
        ("recipe_10".to_string(), vec![0.0, 0.0]),
        ("recipe_7".to_string(), vec![0.0, 0.3]),
        ("recipe_3".to_string(), vec![3.0, 3.0]),
        ("meal_type_dessert".to_string(), vec![1.0, 0.0]),
        ("meal_type_snack".to_string(), vec![1.0, 0.3]),
        ("meal_type_dinner".to_string(), vec![4.0, 3.0]),
    ]);
    let relations = HashMap::from([("isForMealType".to_string(), vec![1.0, 0.0])]);
    EmbeddingModel::from_embeddings(ScoringFunction::TransE, entities, relations).unwrap()
}

#[test]
fn test_graph_vocabulary_matches_criteria() {
    let store = RecipeStore::from_reader(RECIPES.as_bytes()).unwrap();
    let graph = GraphBuilder::build(&store);

    let request = RecommendationRequest {
        meal_type: vec!["dessert".into()],
        ingredients: vec!["Sugar".into()],
        ..Default::default()
    };
    let criteria = translate(&request).unwrap();

    // Every tail the translator asks about exists in the graph under the
    // same relation, so a model trained on the triples knows it.
    for c in &criteria {
        let heads = graph.recipes_with(&c.tail);
        assert!(!heads.is_empty(), "no recipes for {}", c.tail);
        assert!(graph
            .triples()
            .iter()
            .any(|t| t.tail == c.tail && t.relation == c.relation));
    }
    assert_eq!(criteria[1].relation, Relation::ContainsIngredient);
}

#[test]
fn test_recommend_end_to_end() {
    let store = RecipeStore::from_reader(RECIPES.as_bytes()).unwrap();
    let rec = Recommender::new(store, model());

    let dessert = RecommendationRequest {
        meal_type: vec!["dessert".into()],
        top_k: 2,
        ..Default::default()
    };
    assert_eq!(rec.recommend(&dessert).unwrap(), ["10", "7"]);

    let snack = RecommendationRequest {
        meal_type: vec!["snack".into()],
        top_k: 1,
        ..Default::default()
    };
    assert_eq!(rec.recommend(&snack).unwrap(), ["7"]);

    assert_eq!(rec.recipe("3").unwrap().columns["Name"], "Chili");
    assert_eq!(
        rec.unique_ingredients(),
        ["apple", "beans", "beef", "cocoa", "sugar"]
    );
}

#[test]
fn test_unknown_criteria_strict_vs_flexible() {
    let store = RecipeStore::from_reader(RECIPES.as_bytes()).unwrap();
    let rec = Recommender::new(store, model());

    let mut request = RecommendationRequest {
        meal_type: vec!["dessert".into()],
        cuisine_region: Some("Nordic".into()),
        ..Default::default()
    };
    assert!(rec.recommend(&request).unwrap().is_empty());

    request.flexible = true;
    let ranked = rec.recommend(&request).unwrap();
    assert_eq!(&ranked[..2], ["10", "7"]);
}

/// A backend that needs `&mut self`, shared through `Exclusive`.
struct Replay {
    calls: usize,
}

impl SerialPredictor for Replay {
    fn predict_head(&mut self, _relation: &str, _tail: &str) -> larder_kge::Result<Vec<LinkPrediction>> {
        self.calls += 1;
        Ok(vec![
            LinkPrediction::new("recipe_3", 0.2),
            LinkPrediction::new("recipe_10", 0.9),
        ])
    }
}

#[test]
fn test_batch_with_exclusive_predictor() {
    let store = RecipeStore::from_reader(RECIPES.as_bytes()).unwrap();
    let rec = Recommender::new(store, Exclusive::new(Replay { calls: 0 }));

    let requests: Vec<RecommendationRequest> = (0..16)
        .map(|i| RecommendationRequest {
            meal_type: vec![format!("m{i}")],
            ..Default::default()
        })
        .collect();
    for result in rec.recommend_batch(&requests) {
        assert_eq!(result.unwrap(), ["10", "3"]);
    }
}
