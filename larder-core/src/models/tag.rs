use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::envelope::{Entity, FieldRef};
use super::Table;
use crate::wire::FieldMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Tag {
    pub name: String,
    pub position: i64,
}

impl Entity for Tag {
    const TABLE: Table = Table::Tags;
    const FIELDS: FieldMap = FieldMap::new(&[("name", "name"), ("position", "order")]);
}

impl Tag {
    pub fn new(name: impl Into<String>, position: i64) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

/// Join entity linking a recipe to a tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecipeTag {
    pub recipe_id: Uuid,
    pub tag_id: Uuid,
}

impl Entity for RecipeTag {
    const TABLE: Table = Table::RecipeTags;
    const FIELDS: FieldMap = FieldMap::new(&[("recipe_id", "recipeId"), ("tag_id", "tagId")]);
    const REFS: &'static [FieldRef] = &[
        FieldRef {
            field: "recipe_id",
            table: Table::Recipes,
        },
        FieldRef {
            field: "tag_id",
            table: Table::Tags,
        },
    ];
}
