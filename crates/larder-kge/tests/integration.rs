//! Loading model artifacts from disk and querying them through the trait.

use larder_kge::{EmbeddingModel, Error, LinkPredictor, ScoringFunction};
use std::io::Write;
use std::sync::Arc;

const ARTIFACT: &str = r#"{
    "scoring": "TransE",
    "entities": {
        "recipe_10": [0.0, 0.0],
        "recipe_7": [0.0, 0.4],
        "recipe_3": [2.0, 2.0],
        "meal_type_dessert": [1.0, 0.0],
        "ingredient_sugar": [0.0, 0.1]
    },
    "relations": {
        "isForMealType": [1.0, 0.0],
        "containsIngredient": [0.0, 0.1]
    }
}"#;

fn write_artifact(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_and_rank_heads() {
    let file = write_artifact(ARTIFACT);
    let model = EmbeddingModel::from_file(file.path()).unwrap();

    assert_eq!(model.scoring(), ScoringFunction::TransE);
    assert_eq!(model.num_entities(), 5);
    assert_eq!(model.num_relations(), 2);

    let ranked = model.predict_head("isForMealType", "meal_type_dessert").unwrap();
    let names: Vec<&str> = ranked.iter().map(|p| p.entity.as_str()).collect();
    assert_eq!(names[0], "recipe_10");
    assert_eq!(names[1], "ingredient_sugar");
    assert_eq!(names[2], "recipe_7");
    assert_eq!(*names.last().unwrap(), "recipe_3");
}

#[test]
fn test_shared_predictor_is_consistent_across_threads() {
    let file = write_artifact(ARTIFACT);
    let model: Arc<dyn LinkPredictor> = Arc::new(EmbeddingModel::from_file(file.path()).unwrap());
    let expected = model.predict_head("isForMealType", "meal_type_dessert").unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let m = Arc::clone(&model);
            std::thread::spawn(move || m.predict_head("isForMealType", "meal_type_dessert").unwrap())
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}

#[test]
fn test_missing_artifact_is_io_error() {
    let err = EmbeddingModel::from_file("/nonexistent/model.json").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_malformed_artifact() {
    let file = write_artifact(r#"{"entities": {"a": [1.0]}}"#);
    let err = EmbeddingModel::from_file(file.path()).unwrap_err();
    assert!(matches!(err, Error::Serialization(_)));

    let file = write_artifact(r#"{"entities": {"a": [1.0]}, "relations": {"r": [1.0, 2.0]}}"#);
    let err = EmbeddingModel::from_file(file.path()).unwrap_err();
    assert!(matches!(err, Error::InvalidModel(_)));
}
