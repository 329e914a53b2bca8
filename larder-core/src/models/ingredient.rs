use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::envelope::{Entity, FieldRef};
use super::Table;
use crate::scaling::{format_amount, scale_ingredient};
use crate::wire::FieldMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Ingredient {
    /// Local id of the owning recipe.
    pub recipe_id: Uuid,
    pub amount: Option<f64>,
    pub unit: String,
    pub name: String,
    /// Free text as originally entered or imported.
    pub original: String,
    pub position: i64,
}

impl Entity for Ingredient {
    const TABLE: Table = Table::Ingredients;
    const FIELDS: FieldMap = FieldMap::new(&[
        ("recipe_id", "recipeId"),
        ("amount", "amount"),
        ("unit", "unit"),
        ("name", "name"),
        ("original", "originalText"),
        ("position", "order"),
    ]);
    const REFS: &'static [FieldRef] = &[FieldRef {
        field: "recipe_id",
        table: Table::Recipes,
    }];
}

impl Ingredient {
    pub fn new(amount: Option<f64>, unit: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            amount,
            unit: unit.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// An ingredient known only by its original text.
    pub fn from_original(original: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            ..Self::default()
        }
    }

    /// Structured name, falling back to the original text.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.original
        } else {
            &self.name
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        scale_ingredient(self, factor)
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.trim().is_empty() {
            return write!(f, "{}", self.original);
        }
        let mut parts = Vec::with_capacity(3);
        if let Some(amount) = self.amount {
            parts.push(format_amount(amount));
        }
        if !self.unit.is_empty() {
            parts.push(self.unit.clone());
        }
        parts.push(self.name.clone());
        write!(f, "{}", parts.join(" "))
    }
}
