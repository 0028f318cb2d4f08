//! Typed node identifiers and their canonical string encoding.
//!
//! Inside the crate a node is always a [`NodeId`]: a (type, value) pair.
//! The flat `"{type}_{value}"` string exists only where the outside world
//! needs it: triple files and the embedding model's vocabulary.

use crate::{Error, Relation, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Recipe,
    CookingMethod,
    ServingsBin,
    CookTime,
    CuisineRegion,
    DietType,
    MealType,
    HealthAttribute,
    Ingredient,
}

impl NodeType {
    /// All node types.
    pub const ALL: [NodeType; 9] = [
        NodeType::Recipe,
        NodeType::CookingMethod,
        NodeType::ServingsBin,
        NodeType::CookTime,
        NodeType::CuisineRegion,
        NodeType::DietType,
        NodeType::MealType,
        NodeType::HealthAttribute,
        NodeType::Ingredient,
    ];

    /// Type name, also the canonical-string prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recipe => "recipe",
            Self::CookingMethod => "cooking_method",
            Self::ServingsBin => "servings_bin",
            Self::CookTime => "cook_time",
            Self::CuisineRegion => "cuisine_region",
            Self::DietType => "diet_type",
            Self::MealType => "meal_type",
            Self::HealthAttribute => "health_attribute",
            Self::Ingredient => "ingredient",
        }
    }

    /// The fixed relation recipes use to reach nodes of this type.
    ///
    /// `None` for recipes themselves and for health attributes, whose
    /// relation depends on the label (see [`crate::health_relation`]).
    pub fn relation(&self) -> Option<Relation> {
        match self {
            Self::CookingMethod => Some(Relation::UsesCookingMethod),
            Self::ServingsBin => Some(Relation::HasServingsBin),
            Self::CookTime => Some(Relation::HasCookTime),
            Self::CuisineRegion => Some(Relation::HasCuisineRegion),
            Self::DietType => Some(Relation::HasDietType),
            Self::MealType => Some(Relation::IsForMealType),
            Self::Ingredient => Some(Relation::ContainsIngredient),
            Self::Recipe | Self::HealthAttribute => None,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::UnknownNodeType(s.to_string()))
    }
}

/// Structural identity of a node: its type and value.
///
/// [`NodeId::new`] trims the value and lowercases ingredient names, so two
/// spellings of the same ingredient share one node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    pub node_type: NodeType,
    pub value: String,
}

impl NodeId {
    /// Create a normalised identifier.
    pub fn new(node_type: NodeType, value: impl AsRef<str>) -> Self {
        let value = value.as_ref().trim();
        let value = match node_type {
            NodeType::Ingredient => value.to_lowercase(),
            _ => value.to_string(),
        };
        Self { node_type, value }
    }

    /// Identifier of a recipe node.
    pub fn recipe(id: i64) -> Self {
        Self {
            node_type: NodeType::Recipe,
            value: id.to_string(),
        }
    }

    /// Flat `"{type}_{value}"` encoding, no escaping.
    pub fn canonical(&self) -> String {
        format!("{}_{}", self.node_type.as_str(), self.value)
    }

    /// Recover a (type, value) pair from its canonical string.
    ///
    /// Type names contain underscores themselves, so the split point is the
    /// end of the longest known type prefix rather than the first `_`. The
    /// value is taken verbatim.
    pub fn parse(s: &str) -> Result<Self> {
        NodeType::ALL
            .into_iter()
            .filter_map(|t| {
                s.strip_prefix(t.as_str())
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|value| (t, value))
            })
            .max_by_key(|(t, _)| t.as_str().len())
            .filter(|(_, value)| !value.is_empty())
            .map(|(node_type, value)| Self {
                node_type,
                value: value.to_string(),
            })
            .ok_or_else(|| Error::MalformedEntity(s.to_string()))
    }

    pub fn is_recipe(&self) -> bool {
        self.node_type == NodeType::Recipe
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.node_type, self.value)
    }
}

/// An entity string seen at query time, decoded as far as possible.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Entity {
    /// A well-formed canonical string.
    Typed(NodeId),
    /// Anything else, kept as given.
    Raw(String),
}

impl Entity {
    /// Decode leniently: parse failures are logged and fall back to the raw
    /// string instead of failing the caller.
    pub fn decode(s: &str) -> Self {
        match NodeId::parse(s) {
            Ok(id) => Self::Typed(id),
            Err(e) => {
                tracing::debug!(entity = s, error = %e, "using raw entity string");
                Self::Raw(s.to_string())
            }
        }
    }

    /// The recipe identifier, if this entity is a recipe node.
    pub fn recipe_id(&self) -> Option<&str> {
        match self {
            Self::Typed(id) if id.is_recipe() => Some(&id.value),
            _ => None,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Typed(id) => write!(f, "{id}"),
            Self::Raw(s) => f.write_str(s),
        }
    }
}

/// A node in the recipe graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Display label; for ingredients, the casing first seen in the data.
    pub label: String,
}

impl Node {
    pub fn new(id: NodeId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.id.node_type
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.id)
    }
}
