//! Triple files: CSV with a `Head,Relation,Tail` header.
//!
//! This is the hand-off to whatever trains or loads the embedding model, so
//! cells hold canonical strings (`recipe_10`, `meal_type_dessert`). Older
//! exports stored tuple literals such as `('meal_type', 'dessert')`; those
//! are canonicalised when read.

use crate::{Result, Triple, TripleRow};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Triple CSV reader/writer.
pub struct TriplesCsv;

impl TriplesCsv {
    /// Write triples, header first.
    pub fn write<'a, W: Write>(
        writer: W,
        triples: impl IntoIterator<Item = &'a Triple>,
    ) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        for triple in triples {
            writer.serialize(triple.to_row())?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_path<'a>(
        path: impl AsRef<Path>,
        triples: impl IntoIterator<Item = &'a Triple>,
    ) -> Result<()> {
        Self::write(BufWriter::new(File::create(path)?), triples)
    }

    /// Read rows, canonicalising head and tail cells and trimming relations.
    pub fn read<R: Read>(reader: R) -> Result<Vec<TripleRow>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for result in reader.deserialize::<TripleRow>() {
            let row = result?;
            rows.push(TripleRow {
                head: canonicalize_cell(&row.head),
                relation: row.relation.trim().to_string(),
                tail: canonicalize_cell(&row.tail),
            });
        }
        Ok(rows)
    }

    pub fn read_path(path: impl AsRef<Path>) -> Result<Vec<TripleRow>> {
        Self::read(BufReader::new(File::open(path)?))
    }
}

/// Canonical form of a triple-file cell.
///
/// Canonical strings pass through unchanged. A tuple literal
/// `('type', 'value')` (or `('recipe', 10)`) becomes `type_value`. A cell
/// that looks like a tuple but cannot be parsed is logged and returned as is.
pub fn canonicalize_cell(cell: &str) -> String {
    let cell = cell.trim();
    let Some(inner) = cell.strip_prefix('(').and_then(|c| c.strip_suffix(')')) else {
        return cell.to_string();
    };
    match split_pair(inner) {
        Some((node_type, value)) => format!("{node_type}_{value}"),
        None => {
            tracing::warn!(cell, "could not parse tuple cell, keeping it verbatim");
            cell.to_string()
        }
    }
}

/// Split `'a', 'b'` at the first comma outside quotes.
fn split_pair(inner: &str) -> Option<(&str, &str)> {
    let mut quote: Option<char> = None;
    let split = inner.char_indices().find_map(|(i, c)| match (quote, c) {
        (None, '\'' | '"') => {
            quote = Some(c);
            None
        }
        (Some(q), c) if c == q => {
            quote = None;
            None
        }
        (None, ',') => Some(i),
        _ => None,
    })?;

    let first = unquote(&inner[..split])?;
    let second = unquote(&inner[split + 1..])?;
    (!first.is_empty() && !second.is_empty()).then_some((first, second))
}

fn unquote(s: &str) -> Option<&str> {
    let s = s.trim();
    for q in ['\'', '"'] {
        if let Some(rest) = s.strip_prefix(q) {
            return rest.strip_suffix(q);
        }
    }
    // bare literal, e.g. an integer recipe id
    (!s.contains(['\'', '"', ','])).then_some(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeId, NodeType, Relation};

    #[test]
    fn test_write_then_read() {
        let triples = vec![
            Triple::new(
                NodeId::recipe(10),
                Relation::IsForMealType,
                NodeId::new(NodeType::MealType, "dessert"),
            ),
            Triple::new(
                NodeId::recipe(10),
                Relation::ContainsIngredient,
                NodeId::new(NodeType::Ingredient, "BUTTER,SALTED"),
            ),
        ];

        let mut buf = Vec::new();
        TriplesCsv::write(&mut buf, &triples).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert_eq!(text.lines().next(), Some("Head,Relation,Tail"));
        assert!(text.contains("recipe_10,isForMealType,meal_type_dessert"));
        // embedded comma is quoted
        assert!(text.contains("\"ingredient_butter,salted\""));

        let rows = TriplesCsv::read(buf.as_slice()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].tail, "ingredient_butter,salted");
        assert_eq!(rows[1].to_triple().unwrap(), triples[1]);
    }

    #[test]
    fn test_read_legacy_tuple_cells() {
        let csv = "Head,Relation,Tail\n\
                   \"('recipe', 38)\", isForMealType ,\"('meal_type', 'dinner')\"\n\
                   \"('recipe', 38)\",containsIngredient,\"('ingredient', \"\"o'brien potatoes\"\")\"\n";
        let rows = TriplesCsv::read(csv.as_bytes()).unwrap();
        assert_eq!(rows[0], TripleRow::new("recipe_38", "isForMealType", "meal_type_dinner"));
        assert_eq!(rows[1].tail, "ingredient_o'brien potatoes");
    }

    #[test]
    fn test_canonicalize_cell() {
        assert_eq!(canonicalize_cell("meal_type_dinner"), "meal_type_dinner");
        assert_eq!(
            canonicalize_cell("('cuisine_region', 'South Asian')"),
            "cuisine_region_South Asian"
        );
        assert_eq!(
            canonicalize_cell("('ingredient', 'butter, salted')"),
            "ingredient_butter, salted"
        );
        // malformed tuple falls back to the raw cell
        assert_eq!(canonicalize_cell("('meal_type')"), "('meal_type')");
    }
}
