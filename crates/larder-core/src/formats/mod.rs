//! On-disk formats.

mod triples_csv;

pub use triples_csv::{canonicalize_cell, TriplesCsv};
