//! Triples: the flat form of graph edges.

use crate::{NodeId, Relation, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A (head, relation, tail) fact. The head is always a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub head: NodeId,
    pub relation: Relation,
    pub tail: NodeId,
}

impl Triple {
    pub fn new(head: NodeId, relation: Relation, tail: NodeId) -> Self {
        Self {
            head,
            relation,
            tail,
        }
    }

    /// Flatten to canonical strings.
    pub fn to_row(&self) -> TripleRow {
        TripleRow {
            head: self.head.canonical(),
            relation: self.relation.as_str().to_string(),
            tail: self.tail.canonical(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.head, self.relation, self.tail)
    }
}

/// One row of a triple file: `Head,Relation,Tail`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TripleRow {
    #[serde(rename = "Head")]
    pub head: String,
    #[serde(rename = "Relation")]
    pub relation: String,
    #[serde(rename = "Tail")]
    pub tail: String,
}

impl TripleRow {
    pub fn new(
        head: impl Into<String>,
        relation: impl Into<String>,
        tail: impl Into<String>,
    ) -> Self {
        Self {
            head: head.into(),
            relation: relation.into(),
            tail: tail.into(),
        }
    }

    /// Strictly decode back into a typed triple.
    pub fn to_triple(&self) -> Result<Triple> {
        Ok(Triple {
            head: NodeId::parse(&self.head)?,
            relation: self.relation.parse()?,
            tail: NodeId::parse(&self.tail)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeType;

    #[test]
    fn test_triple_row() {
        let t = Triple::new(
            NodeId::recipe(10),
            Relation::IsForMealType,
            NodeId::new(NodeType::MealType, "dessert"),
        );
        let row = t.to_row();
        assert_eq!(row.head, "recipe_10");
        assert_eq!(row.relation, "isForMealType");
        assert_eq!(row.tail, "meal_type_dessert");
        assert_eq!(row.to_triple().unwrap(), t);
    }

    #[test]
    fn test_triple_display() {
        let t = Triple::new(
            NodeId::recipe(1),
            Relation::ContainsIngredient,
            NodeId::new(NodeType::Ingredient, "Salt"),
        );
        assert_eq!(
            t.to_string(),
            "(recipe_1, containsIngredient, ingredient_salt)"
        );
    }

    #[test]
    fn test_row_with_unknown_relation_fails() {
        let row = TripleRow::new("recipe_1", "likes", "ingredient_salt");
        assert!(row.to_triple().is_err());
    }
}
