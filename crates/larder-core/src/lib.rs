#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]

//! Recipe knowledge graph construction.
//!
//! - [`RecipeStore`] - read-only recipe records loaded from CSV
//! - [`NodeId`] - typed node identity and its canonical string form
//! - [`Relation`] / [`health_relation`] - edge labels and the health mapper
//! - [`GraphBuilder`] - records to [`RecipeGraph`] plus its [`Triple`] list
//! - [`formats::TriplesCsv`] - the `Head,Relation,Tail` hand-off file
//!
//! # Example
//!
//! ```rust
//! use larder_core::{GraphBuilder, RecipeRecord, RecipeStore};
//!
//! let store = RecipeStore::from_records([RecipeRecord {
//!     meal_types: Some("dessert, snack".into()),
//!     ingredients: Some("Sugar;cocoa".into()),
//!     ..RecipeRecord::new(10)
//! }]);
//!
//! let graph = GraphBuilder::build(&store);
//! let tails: Vec<String> = graph.triples().iter().map(|t| t.tail.canonical()).collect();
//! assert_eq!(
//!     tails,
//!     ["meal_type_dessert", "meal_type_snack", "ingredient_sugar", "ingredient_cocoa"]
//! );
//! ```

mod builder;
mod error;
pub mod formats;
mod graph;
mod node;
mod record;
mod relation;
mod triple;

pub use builder::GraphBuilder;
pub use error::{Error, Result};
pub use graph::{RecipeGraph, RecipeGraphStats};
pub use node::{Entity, Node, NodeId, NodeType};
pub use record::{
    is_placeholder, split_clean, RecipeRecord, RecipeStore, ID_COLUMN, REQUIRED_COLUMNS,
    UNKNOWN_PLACEHOLDER,
};
pub use relation::{health_relation, Relation};
pub use triple::{Triple, TripleRow};

// Re-export petgraph for callers that walk the graph directly
pub use petgraph;
