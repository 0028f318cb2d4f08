//! Recipe records and the read-only store that holds them.

use crate::{Error, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Value that marks an attribute as unknown in the source data.
pub const UNKNOWN_PLACEHOLDER: &str = "unknown";

/// Column holding the recipe identifier.
pub const ID_COLUMN: &str = "RecipeId";

/// Columns every recipe source must provide.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    ID_COLUMN,
    "Cooking_Method",
    "servings_bin",
    "Diet_Types",
    "meal_type",
    "cook_time",
    "Healthy_Type",
    "CuisineRegion",
    "BestUsdaIngredientName",
];

/// One recipe row.
///
/// Attribute fields hold the raw cell text (`None` for an empty cell);
/// splitting, trimming and placeholder handling happen in the graph builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecipeRecord {
    pub id: i64,
    pub cooking_method: Option<String>,
    pub servings_bin: Option<String>,
    pub cook_time: Option<String>,
    pub cuisine_region: Option<String>,
    /// Comma-delimited.
    pub diet_types: Option<String>,
    /// Comma-delimited.
    pub meal_types: Option<String>,
    /// Comma-delimited.
    pub health_types: Option<String>,
    /// Semicolon-delimited; names may contain commas.
    pub ingredients: Option<String>,
    /// Every column of the source row, including the ones above.
    pub columns: BTreeMap<String, String>,
}

impl RecipeRecord {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }
}

/// True when a value carries no signal: blank or the unknown placeholder.
pub fn is_placeholder(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v == UNKNOWN_PLACEHOLDER
}

/// Split on `delimiter`, trim, and drop blank or placeholder elements.
pub fn split_clean(value: &str, delimiter: char) -> impl Iterator<Item = &str> {
    value
        .split(delimiter)
        .map(str::trim)
        .filter(|v| !is_placeholder(v))
}

/// Immutable recipe collection keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct RecipeStore {
    records: BTreeMap<i64, RecipeRecord>,
}

impl RecipeStore {
    /// Load from a CSV file with a header row.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load from CSV.
    ///
    /// All required columns are checked before any row is read; the error
    /// lists every column that is missing.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| position(c).is_none())
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingColumns(missing));
        }

        let mut idx = [0usize; 9];
        for (slot, name) in idx.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = position(name).unwrap_or_default();
        }

        let mut store = Self::default();
        for (n, result) in reader.records().enumerate() {
            let row = n + 1;
            let record = result?;
            let cell = |i: usize| {
                record
                    .get(idx[i])
                    .filter(|v| !v.trim().is_empty())
                    .map(str::to_string)
            };

            let raw_id = record.get(idx[0]).unwrap_or_default().trim();
            let id: i64 = raw_id.parse().map_err(|_| Error::InvalidRecord {
                row,
                reason: format!("{ID_COLUMN} {raw_id:?} is not an integer"),
            })?;

            let columns = headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.trim().to_string(), v.to_string()))
                .collect();

            store.insert(RecipeRecord {
                id,
                cooking_method: cell(1),
                servings_bin: cell(2),
                diet_types: cell(3),
                meal_types: cell(4),
                cook_time: cell(5),
                health_types: cell(6),
                cuisine_region: cell(7),
                ingredients: cell(8),
                columns,
            });
        }

        tracing::info!(recipes = store.len(), "loaded recipe records");
        Ok(store)
    }

    /// Build from already-constructed records.
    pub fn from_records(records: impl IntoIterator<Item = RecipeRecord>) -> Self {
        let mut store = Self::default();
        for record in records {
            store.insert(record);
        }
        store
    }

    fn insert(&mut self, record: RecipeRecord) {
        let id = record.id;
        if self.records.insert(id, record).is_some() {
            tracing::warn!(recipe_id = id, "duplicate recipe id, keeping the later row");
        }
    }

    pub fn get(&self, id: i64) -> Option<&RecipeRecord> {
        self.records.get(&id)
    }

    /// Look up by a caller-supplied identifier string.
    ///
    /// Strings that are not integers are simply not found.
    pub fn lookup(&self, id: &str) -> Option<&RecipeRecord> {
        id.trim().parse().ok().and_then(|id| self.get(id))
    }

    /// Records in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &RecipeRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted, deduplicated ingredient names as the graph identifies them.
    pub fn unique_ingredients(&self) -> Vec<String> {
        let names: BTreeSet<String> = self
            .iter()
            .filter_map(|r| r.ingredients.as_deref())
            .flat_map(|cell| split_clean(cell, ';'))
            .filter(|name| *name != "nan")
            .map(str::to_lowercase)
            .collect();
        names.into_iter().collect()
    }
}
