//! Relation names and the health-attribute mapper.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An edge label in the recipe graph.
///
/// Every edge runs from a recipe to one of its attributes, so the relation
/// set is closed: one relation per attribute category, plus the family of
/// health relations chosen by [`health_relation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Relation {
    #[serde(rename = "usesCookingMethod")]
    UsesCookingMethod,
    #[serde(rename = "hasServingsBin")]
    HasServingsBin,
    #[serde(rename = "hasCookTime")]
    HasCookTime,
    #[serde(rename = "hasCuisineRegion")]
    HasCuisineRegion,
    #[serde(rename = "hasDietType")]
    HasDietType,
    #[serde(rename = "isForMealType")]
    IsForMealType,
    #[serde(rename = "containsIngredient")]
    ContainsIngredient,
    HasProteinLevel,
    HasCarbLevel,
    HasFatLevel,
    HasSaturatedFatLevel,
    HasCalorieLevel,
    HasSodiumLevel,
    HasSugarLevel,
    HasFiberLevel,
    HasCholesterolLevel,
    /// Catch-all for health labels no specific rule recognises.
    HasHealthAttribute,
}

impl Relation {
    /// All relations, category relations first.
    pub const ALL: [Relation; 17] = [
        Relation::UsesCookingMethod,
        Relation::HasServingsBin,
        Relation::HasCookTime,
        Relation::HasCuisineRegion,
        Relation::HasDietType,
        Relation::IsForMealType,
        Relation::ContainsIngredient,
        Relation::HasProteinLevel,
        Relation::HasCarbLevel,
        Relation::HasFatLevel,
        Relation::HasSaturatedFatLevel,
        Relation::HasCalorieLevel,
        Relation::HasSodiumLevel,
        Relation::HasSugarLevel,
        Relation::HasFiberLevel,
        Relation::HasCholesterolLevel,
        Relation::HasHealthAttribute,
    ];

    /// The name used in triples and by the embedding model.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UsesCookingMethod => "usesCookingMethod",
            Self::HasServingsBin => "hasServingsBin",
            Self::HasCookTime => "hasCookTime",
            Self::HasCuisineRegion => "hasCuisineRegion",
            Self::HasDietType => "hasDietType",
            Self::IsForMealType => "isForMealType",
            Self::ContainsIngredient => "containsIngredient",
            Self::HasProteinLevel => "HasProteinLevel",
            Self::HasCarbLevel => "HasCarbLevel",
            Self::HasFatLevel => "HasFatLevel",
            Self::HasSaturatedFatLevel => "HasSaturatedFatLevel",
            Self::HasCalorieLevel => "HasCalorieLevel",
            Self::HasSodiumLevel => "HasSodiumLevel",
            Self::HasSugarLevel => "HasSugarLevel",
            Self::HasFiberLevel => "HasFiberLevel",
            Self::HasCholesterolLevel => "HasCholesterolLevel",
            Self::HasHealthAttribute => "HasHealthAttribute",
        }
    }

    /// Whether this relation links a recipe to a `health_attribute` node.
    pub fn is_health(&self) -> bool {
        matches!(
            self,
            Self::HasProteinLevel
                | Self::HasCarbLevel
                | Self::HasFatLevel
                | Self::HasSaturatedFatLevel
                | Self::HasCalorieLevel
                | Self::HasSodiumLevel
                | Self::HasSugarLevel
                | Self::HasFiberLevel
                | Self::HasCholesterolLevel
                | Self::HasHealthAttribute
        )
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| Error::UnknownRelation(s.to_string()))
    }
}

/// Map a health-attribute label to its relation.
///
/// Case-insensitive substring rules, first match wins. The generic fat rule
/// excludes anything mentioning "saturated", so saturated-fat labels can
/// never land on `HasFatLevel`.
pub fn health_relation(label: &str) -> Relation {
    let e = label.to_lowercase();
    if e.contains("protein") {
        Relation::HasProteinLevel
    } else if e.contains("carb") {
        Relation::HasCarbLevel
    } else if e.contains("fat") && !e.contains("saturated") {
        Relation::HasFatLevel
    } else if e.contains("saturated_fat") {
        Relation::HasSaturatedFatLevel
    } else if e.contains("calorie") {
        Relation::HasCalorieLevel
    } else if e.contains("sodium") {
        Relation::HasSodiumLevel
    } else if e.contains("sugar") {
        Relation::HasSugarLevel
    } else if e.contains("fiber") {
        Relation::HasFiberLevel
    } else if e.contains("cholesterol") {
        Relation::HasCholesterolLevel
    } else {
        Relation::HasHealthAttribute
    }
}
